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

//! Real-time and static `Clock` implementations.

use std::{cell::Cell, fmt::Debug};

use chrono::{DateTime, Utc};
use meridian_core::{
    UnixNanos,
    datetime::{NANOSECONDS_IN_MILLISECOND, unix_nanos_now},
};

/// Represents a source of the current time.
pub trait Clock: Debug {
    /// Returns the current date and time as a timezone-aware `DateTime<UTC>`.
    fn utc_now(&self) -> DateTime<Utc> {
        self.timestamp_ns().to_datetime_utc()
    }

    /// Returns the current UNIX timestamp in nanoseconds (ns).
    fn timestamp_ns(&self) -> UnixNanos;

    /// Returns the current UNIX timestamp in milliseconds (ms).
    fn timestamp_ms(&self) -> i64 {
        i64::try_from(self.timestamp_ns().as_u64() / NANOSECONDS_IN_MILLISECOND)
            .unwrap_or(i64::MAX)
    }
}

/// A static test clock.
///
/// Time only moves when explicitly set or advanced, which keeps event timestamps
/// deterministic in backtests and unit tests.
#[derive(Debug, Default)]
pub struct TestClock {
    time: Cell<UnixNanos>,
}

impl TestClock {
    /// Creates a new [`TestClock`] instance at the UNIX epoch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new [`TestClock`] instance set to `time_ns`.
    #[must_use]
    pub fn at(time_ns: UnixNanos) -> Self {
        Self {
            time: Cell::new(time_ns),
        }
    }

    /// Sets the clock to `to_time_ns`.
    pub fn set_time(&self, to_time_ns: UnixNanos) {
        self.time.set(to_time_ns);
    }

    /// Advances the clock by `delta_ns` nanoseconds, saturating at the maximum.
    pub fn advance_time(&self, delta_ns: u64) {
        self.time.set(self.time.get() + delta_ns);
    }
}

impl Clock for TestClock {
    fn timestamp_ns(&self) -> UnixNanos {
        self.time.get()
    }
}

/// A real-time clock which uses system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiveClock;

impl LiveClock {
    /// Creates a new [`LiveClock`] instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for LiveClock {
    fn timestamp_ns(&self) -> UnixNanos {
        UnixNanos::new(unix_nanos_now())
    }
}
