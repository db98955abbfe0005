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

//! Market data types and the provider-facing `DataMessage` envelope.

pub mod bar;
pub mod quote;
pub mod trade;

#[cfg(any(test, feature = "stubs"))]
pub mod stubs;

use std::fmt::Display;

use meridian_core::UnixNanos;
use serde::{Deserialize, Serialize};

// Re-exports
pub use bar::{Bar, BarSeries, DEFAULT_MAX_BARS};
pub use quote::Quote;
pub use trade::Trade;

use crate::{identifiers::Symbol, orderbook::OrderBookSnapshot};

/// Types carrying a UNIX millisecond timestamp.
pub trait HasTimestamp {
    /// Returns the UNIX timestamp (milliseconds) of the value.
    fn timestamp(&self) -> i64;

    /// Returns the timestamp as [`UnixNanos`] for bus events.
    fn ts_event(&self) -> UnixNanos {
        UnixNanos::from_millis(self.timestamp())
    }
}

/// A message produced by a data provider.
///
/// Providers yield these from a non-blocking poll. The `Error`, `Connected` and
/// `Disconnected` variants are provider signals rather than market data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DataMessage {
    /// A top-of-book quote.
    Quote(Quote),
    /// A full order book snapshot.
    OrderbookSnapshot(OrderBookSnapshot),
    /// A public trade.
    Trade(Trade),
    /// A candle, forming or closed.
    Candle(Bar),
    /// A provider-reported error.
    Error {
        /// Provider specific error code.
        code: i32,
        /// Human readable error message.
        message: String,
    },
    /// The provider connection was established.
    Connected,
    /// The provider connection was lost or closed.
    Disconnected,
}

impl DataMessage {
    /// Returns the symbol of a market data message.
    #[must_use]
    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            Self::Quote(quote) => Some(quote.symbol),
            Self::OrderbookSnapshot(snapshot) => Some(snapshot.symbol),
            Self::Trade(trade) => Some(trade.symbol),
            Self::Candle(bar) => Some(bar.symbol),
            Self::Error { .. } | Self::Connected | Self::Disconnected => None,
        }
    }

    /// Returns the UNIX timestamp (milliseconds) of a market data message.
    #[must_use]
    pub fn timestamp(&self) -> Option<i64> {
        match self {
            Self::Quote(quote) => Some(quote.timestamp),
            Self::OrderbookSnapshot(snapshot) => Some(snapshot.timestamp),
            Self::Trade(trade) => Some(trade.timestamp),
            Self::Candle(bar) => Some(bar.timestamp),
            Self::Error { .. } | Self::Connected | Self::Disconnected => None,
        }
    }

    /// Returns a short name for the message kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Quote(_) => "quote",
            Self::OrderbookSnapshot(_) => "orderbook_snapshot",
            Self::Trade(_) => "trade",
            Self::Candle(_) => "candle",
            Self::Error { .. } => "error",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

impl From<Quote> for DataMessage {
    fn from(value: Quote) -> Self {
        Self::Quote(value)
    }
}

impl From<Trade> for DataMessage {
    fn from(value: Trade) -> Self {
        Self::Trade(value)
    }
}

impl From<Bar> for DataMessage {
    fn from(value: Bar) -> Self {
        Self::Candle(value)
    }
}

impl From<OrderBookSnapshot> for DataMessage {
    fn from(value: OrderBookSnapshot) -> Self {
        Self::OrderbookSnapshot(value)
    }
}

impl Display for DataMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quote(quote) => write!(f, "Quote({quote})"),
            Self::OrderbookSnapshot(snapshot) => write!(f, "OrderbookSnapshot({})", snapshot.symbol),
            Self::Trade(trade) => write!(f, "Trade({trade})"),
            Self::Candle(bar) => write!(f, "Candle({bar})"),
            Self::Error { code, message } => write!(f, "Error({code}, {message})"),
            Self::Connected => write!(f, "Connected"),
            Self::Disconnected => write!(f, "Disconnected"),
        }
    }
}
