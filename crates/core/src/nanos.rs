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

//! A `UnixNanos` type for event timestamps in nanoseconds since the UNIX epoch.
//!
//! Domain values in the data plane carry millisecond timestamps (the resolution of
//! exchange feeds and historical candle files), while every event published on the
//! message bus is stamped in nanoseconds. `UnixNanos` is the bridge between the two:
//! [`UnixNanos::from_millis`] performs the `millis × 1_000_000` conversion.

use std::{
    cmp::Ordering,
    fmt::Display,
    ops::{Add, Deref, Sub},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::datetime::NANOSECONDS_IN_MILLISECOND;

/// Represents a duration in nanoseconds.
pub type DurationNanos = u64;

/// Represents a timestamp in nanoseconds since the UNIX epoch.
#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UnixNanos(u64);

impl UnixNanos {
    /// Creates a new [`UnixNanos`] instance.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Creates a new [`UnixNanos`] from a UNIX timestamp in milliseconds.
    ///
    /// Negative millisecond values (before the epoch) clamp to zero.
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        if millis <= 0 {
            return Self(0);
        }
        Self((millis as u64).saturating_mul(NANOSECONDS_IN_MILLISECOND))
    }

    /// Returns `true` if the value of this instance is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns the underlying value as `u64`.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns the value truncated to whole milliseconds.
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        self.0 / NANOSECONDS_IN_MILLISECOND
    }

    /// Converts the underlying value to a datetime (UTC).
    ///
    /// Values beyond `i64::MAX` nanoseconds (approximately year 2262) saturate.
    #[must_use]
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        let nanos = i64::try_from(self.0).unwrap_or(i64::MAX);
        DateTime::from_timestamp_nanos(nanos)
    }

    /// Converts the underlying value to an RFC 3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.to_datetime_utc().to_rfc3339()
    }

    /// Returns the duration since `other`, or `None` if `other` is later than `self`.
    #[must_use]
    pub const fn duration_since(&self, other: &Self) -> Option<DurationNanos> {
        self.0.checked_sub(other.0)
    }
}

impl Deref for UnixNanos {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq<u64> for UnixNanos {
    fn eq(&self, other: &u64) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<u64> for UnixNanos {
    fn partial_cmp(&self, other: &u64) -> Option<Ordering> {
        self.0.partial_cmp(other)
    }
}

impl From<u64> for UnixNanos {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<UnixNanos> for u64 {
    fn from(value: UnixNanos) -> Self {
        value.0
    }
}

impl Add<DurationNanos> for UnixNanos {
    type Output = Self;

    fn add(self, rhs: DurationNanos) -> Self::Output {
        Self(self.0.saturating_add(rhs))
    }
}

impl Sub<DurationNanos> for UnixNanos {
    type Output = Self;

    fn sub(self, rhs: DurationNanos) -> Self::Output {
        Self(self.0.saturating_sub(rhs))
    }
}

impl Display for UnixNanos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1_000_000)]
    #[case(1_700_000_000_000, 1_700_000_000_000_000_000)]
    #[case(-5, 0)]
    fn test_from_millis(#[case] millis: i64, #[case] expected: u64) {
        assert_eq!(UnixNanos::from_millis(millis), expected);
    }

    #[rstest]
    fn test_as_millis_truncates() {
        let ts = UnixNanos::new(1_999_999);
        assert_eq!(ts.as_millis(), 1);
    }

    #[rstest]
    fn test_duration_since() {
        let earlier = UnixNanos::new(100);
        let later = UnixNanos::new(350);
        assert_eq!(later.duration_since(&earlier), Some(250));
        assert_eq!(earlier.duration_since(&later), None);
    }

    #[rstest]
    fn test_saturating_arithmetic() {
        assert_eq!(UnixNanos::new(5) - 10, 0);
        assert_eq!(UnixNanos::new(u64::MAX) + 1, u64::MAX);
    }

    #[rstest]
    fn test_to_rfc3339_epoch() {
        assert_eq!(UnixNanos::default().to_rfc3339(), "1970-01-01T00:00:00+00:00");
    }

    #[rstest]
    fn test_serde_is_transparent() {
        let ts = UnixNanos::new(42);
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "42");
        let back: UnixNanos = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }
}
