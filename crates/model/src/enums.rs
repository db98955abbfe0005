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

//! Enumerations for the trading domain model.

use strum::{AsRefStr, Display, EnumIter, EnumString, FromRepr};

use crate::macros::enum_strum_serde;

/// The time interval a bar (candle) aggregates over.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Timeframe {
    /// One second.
    #[strum(serialize = "1s")]
    S1 = 1,
    /// One minute.
    #[strum(serialize = "1m")]
    M1 = 2,
    /// Three minutes.
    #[strum(serialize = "3m")]
    M3 = 3,
    /// Five minutes.
    #[strum(serialize = "5m")]
    M5 = 4,
    /// Fifteen minutes.
    #[strum(serialize = "15m")]
    M15 = 5,
    /// Thirty minutes.
    #[strum(serialize = "30m")]
    M30 = 6,
    /// One hour.
    #[strum(serialize = "1h")]
    H1 = 7,
    /// Two hours.
    #[strum(serialize = "2h")]
    H2 = 8,
    /// Four hours.
    #[strum(serialize = "4h")]
    H4 = 9,
    /// Six hours.
    #[strum(serialize = "6h")]
    H6 = 10,
    /// Eight hours.
    #[strum(serialize = "8h")]
    H8 = 11,
    /// Twelve hours.
    #[strum(serialize = "12h")]
    H12 = 12,
    /// One day.
    #[strum(serialize = "1d")]
    D1 = 13,
    /// One week.
    #[strum(serialize = "1w")]
    W1 = 14,
}

impl Timeframe {
    /// Returns the stable short tag for the timeframe, e.g. `"1h"`.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::S1 => "1s",
            Self::M1 => "1m",
            Self::M3 => "3m",
            Self::M5 => "5m",
            Self::M15 => "15m",
            Self::M30 => "30m",
            Self::H1 => "1h",
            Self::H2 => "2h",
            Self::H4 => "4h",
            Self::H6 => "6h",
            Self::H8 => "8h",
            Self::H12 => "12h",
            Self::D1 => "1d",
            Self::W1 => "1w",
        }
    }

    /// Returns the duration of one interval in seconds.
    #[must_use]
    pub const fn as_secs(&self) -> u64 {
        match self {
            Self::S1 => 1,
            Self::M1 => 60,
            Self::M3 => 180,
            Self::M5 => 300,
            Self::M15 => 900,
            Self::M30 => 1_800,
            Self::H1 => 3_600,
            Self::H2 => 7_200,
            Self::H4 => 14_400,
            Self::H6 => 21_600,
            Self::H8 => 28_800,
            Self::H12 => 43_200,
            Self::D1 => 86_400,
            Self::W1 => 604_800,
        }
    }

    /// Returns the duration of one interval in milliseconds.
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        self.as_secs() * 1_000
    }
}

/// The kind of market data a subscription requests.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "snake_case")]
pub enum SubscriptionType {
    /// Top-of-book quotes.
    Quote = 1,
    /// Order book snapshots.
    Orderbook = 2,
    /// Public trades.
    Trade = 3,
    /// OHLCV candles for a timeframe.
    Candle = 4,
}

/// The order side for a specific order or trade aggressor.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    /// The order is a BUY.
    Buy = 1,
    /// The order is a SELL.
    Sell = 2,
}

/// The type of order.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Executes immediately at the best available price.
    Market = 1,
    /// Rests on the book at a limit price.
    Limit = 2,
}

/// The lifecycle status of an order.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Created locally, not yet acknowledged by the venue.
    Pending = 1,
    /// Accepted and working at the venue.
    Open = 2,
    /// Working with a partial fill.
    PartiallyFilled = 3,
    /// Completely filled.
    Filled = 4,
    /// Cancelled before completion.
    Cancelled = 5,
    /// Rejected by the venue or risk checks.
    Rejected = 6,
}

impl OrderStatus {
    /// Returns `true` if an order with this status can still be filled.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Open | Self::PartiallyFilled)
    }
}

/// The market side of a position.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionSide {
    /// No exposure.
    #[default]
    Flat = 0,
    /// Long exposure.
    Long = 1,
    /// Short exposure.
    Short = 2,
}

/// The side of an order book.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BookSide {
    /// The bid (buy) side.
    Bid = 1,
    /// The ask (sell) side.
    Ask = 2,
}

/// The reason attached to a shutdown event.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ShutdownReason {
    /// Shutdown requested by the operator or the owning component.
    Requested = 1,
    /// The upstream data connection was lost.
    Disconnected = 2,
    /// An unrecoverable or provider-reported error.
    Fatal = 3,
}

/// The lifecycle state of a data engine.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineState {
    /// Not connected to a provider.
    #[default]
    Stopped = 0,
    /// Connecting to the active provider.
    Connecting = 1,
    /// Connected and processing data.
    Running = 2,
    /// The last connection attempt failed.
    Failed = 3,
}

enum_strum_serde!(BookSide);
enum_strum_serde!(EngineState);
enum_strum_serde!(OrderSide);
enum_strum_serde!(OrderStatus);
enum_strum_serde!(OrderType);
enum_strum_serde!(PositionSide);
enum_strum_serde!(ShutdownReason);
enum_strum_serde!(SubscriptionType);
enum_strum_serde!(Timeframe);

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;
    use strum::IntoEnumIterator;

    use super::*;

    #[rstest]
    fn test_timeframe_tag_matches_display_and_parse() {
        for timeframe in Timeframe::iter() {
            assert_eq!(timeframe.to_string(), timeframe.tag());
            assert_eq!(Timeframe::from_str(timeframe.tag()).unwrap(), timeframe);
        }
    }

    #[rstest]
    #[case(Timeframe::M1, 60_000)]
    #[case(Timeframe::H1, 3_600_000)]
    #[case(Timeframe::D1, 86_400_000)]
    fn test_timeframe_millis(#[case] timeframe: Timeframe, #[case] expected: u64) {
        assert_eq!(timeframe.as_millis(), expected);
    }

    #[rstest]
    fn test_timeframe_durations_are_increasing() {
        let durations: Vec<u64> = Timeframe::iter().map(|t| t.as_secs()).collect();
        assert!(durations.windows(2).all(|w| w[0] < w[1]));
    }

    #[rstest]
    fn test_timeframe_unknown_tag() {
        assert!(Timeframe::from_str("7m").is_err());
    }

    #[rstest]
    #[case(SubscriptionType::Orderbook, "orderbook")]
    #[case(SubscriptionType::Candle, "candle")]
    fn test_subscription_type_strings(#[case] value: SubscriptionType, #[case] expected: &str) {
        assert_eq!(value.as_ref(), expected);
        assert_eq!(SubscriptionType::from_str(expected).unwrap(), value);
    }

    #[rstest]
    #[case(OrderStatus::Pending, true)]
    #[case(OrderStatus::PartiallyFilled, true)]
    #[case(OrderStatus::Filled, false)]
    #[case(OrderStatus::Rejected, false)]
    fn test_order_status_is_open(#[case] status: OrderStatus, #[case] expected: bool) {
        assert_eq!(status.is_open(), expected);
    }

    #[rstest]
    fn test_enum_serde_uses_string_form() {
        let json = serde_json::to_string(&OrderStatus::PartiallyFilled).unwrap();
        assert_eq!(json, "\"PARTIALLY_FILLED\"");
        let back: Timeframe = serde_json::from_str("\"4h\"").unwrap();
        assert_eq!(back, Timeframe::H4);
    }
}
