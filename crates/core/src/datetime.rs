// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Common date and time functions.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, SecondsFormat};

/// Number of milliseconds in one second.
pub const MILLISECONDS_IN_SECOND: u64 = 1_000;

/// Number of nanoseconds in one second.
pub const NANOSECONDS_IN_SECOND: u64 = 1_000_000_000;

/// Number of nanoseconds in one millisecond.
pub const NANOSECONDS_IN_MILLISECOND: u64 = 1_000_000;

/// Number of microseconds in one millisecond.
pub const MICROSECONDS_IN_MILLISECOND: u64 = 1_000;

/// Millisecond timestamps at or above this magnitude are microsecond-resolution (16 digits).
pub const MICROSECOND_TIMESTAMP_THRESHOLD: i64 = 1_000_000_000_000_000;

/// Millisecond timestamps at or above this magnitude are nanosecond-resolution (19 digits).
pub const NANOSECOND_TIMESTAMP_THRESHOLD: i64 = 1_000_000_000_000_000_000;

/// Converts milliseconds to nanoseconds (ns), saturating at `u64::MAX`.
#[must_use]
pub const fn millis_to_nanos(millis: u64) -> u64 {
    millis.saturating_mul(NANOSECONDS_IN_MILLISECOND)
}

/// Converts seconds to milliseconds (ms), saturating at `u64::MAX`.
#[must_use]
pub const fn secs_to_millis(secs: u64) -> u64 {
    secs.saturating_mul(MILLISECONDS_IN_SECOND)
}

/// Converts nanoseconds (ns) to milliseconds (ms).
#[must_use]
pub const fn nanos_to_millis(nanos: u64) -> u64 {
    nanos / NANOSECONDS_IN_MILLISECOND
}

/// Normalizes a raw epoch timestamp to milliseconds.
///
/// Exchanges and exported candle files mix resolutions. Values with 16 digits are taken
/// as microseconds and values with 19 digits as nanoseconds; anything smaller is
/// already in milliseconds and is returned unchanged.
#[must_use]
pub const fn normalize_timestamp_ms(raw: i64) -> i64 {
    if raw >= NANOSECOND_TIMESTAMP_THRESHOLD {
        raw / NANOSECONDS_IN_MILLISECOND as i64
    } else if raw >= MICROSECOND_TIMESTAMP_THRESHOLD {
        raw / MICROSECONDS_IN_MILLISECOND as i64
    } else {
        raw
    }
}

/// Returns the current UNIX time in milliseconds from the system clock.
///
/// A system clock set before the epoch yields zero.
#[must_use]
pub fn unix_millis_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Returns the current UNIX time in nanoseconds from the system clock.
#[must_use]
pub fn unix_nanos_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Converts a UNIX millisecond timestamp to an ISO 8601 (RFC 3339) string with millisecond precision.
///
/// Out-of-range values render as the epoch.
#[must_use]
pub fn millis_to_iso8601(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1_000_000)]
    #[case(1_000, 1_000_000_000)]
    #[case(u64::MAX, u64::MAX)]
    fn test_millis_to_nanos(#[case] millis: u64, #[case] expected: u64) {
        assert_eq!(millis_to_nanos(millis), expected);
    }

    #[rstest]
    #[case(1_700_000_000_000, 1_700_000_000_000)]
    #[case(1_700_000_000_000_000, 1_700_000_000_000)]
    #[case(1_700_000_000_000_000_000, 1_700_000_000_000)]
    #[case(0, 0)]
    #[case(-1, -1)]
    fn test_normalize_timestamp_ms(#[case] raw: i64, #[case] expected: i64) {
        assert_eq!(normalize_timestamp_ms(raw), expected);
    }

    #[rstest]
    fn test_millis_to_iso8601() {
        assert_eq!(
            millis_to_iso8601(1_700_000_000_123),
            "2023-11-14T22:13:20.123Z"
        );
    }

    #[rstest]
    fn test_unix_millis_now_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(unix_millis_now() > 1_577_836_800_000);
    }

    proptest! {
        #[test]
        fn prop_millis_nanos_round_trip(millis in 0u64..=u64::MAX / NANOSECONDS_IN_MILLISECOND) {
            prop_assert_eq!(nanos_to_millis(millis_to_nanos(millis)), millis);
        }

        #[test]
        fn prop_normalized_is_millisecond_magnitude(raw in 0i64..i64::MAX) {
            prop_assert!(normalize_timestamp_ms(raw) < MICROSECOND_TIMESTAMP_THRESHOLD);
        }
    }
}
