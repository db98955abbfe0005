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

//! The closed set of domain events carried on the message bus.
//!
//! Every variant carries its own nanosecond `ts_event`. Market data variants derive it
//! from the payload's millisecond timestamp (`millis × 1_000_000`), lifecycle variants
//! take it from the publishing component's clock.

use meridian_core::{UnixNanos, serialization::Serializable};
use serde::{Deserialize, Serialize};

use crate::{
    accounts::AccountBalance,
    data::{Bar, HasTimestamp, Quote, Trade},
    enums::{OrderStatus, ShutdownReason},
    identifiers::{OrderId, Symbol},
    orderbook::{BookLevel, OrderBook},
    orders::Order,
    position::Position,
};

/// A domain event published on the message bus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A top-of-book quote update.
    MarketData { quote: Quote, ts_event: UnixNanos },
    /// An order book change, summarized by its top of book.
    OrderbookUpdate {
        symbol: Symbol,
        best_bid: Option<BookLevel>,
        best_ask: Option<BookLevel>,
        bid_levels: usize,
        ask_levels: usize,
        ts_event: UnixNanos,
    },
    /// A public trade.
    Trade { trade: Trade, ts_event: UnixNanos },
    /// A candle update.
    Candle { bar: Bar, ts_event: UnixNanos },
    /// An order lifecycle change.
    Order {
        order_id: OrderId,
        symbol: Symbol,
        status: OrderStatus,
        ts_event: UnixNanos,
    },
    /// A position change.
    Position {
        position: Position,
        ts_event: UnixNanos,
    },
    /// An account balance change.
    Account {
        balance: AccountBalance,
        ts_event: UnixNanos,
    },
    /// A lifecycle heartbeat carrying a counter.
    Tick { tick_number: u64, ts_event: UnixNanos },
    /// A shutdown or degradation notice.
    Shutdown {
        reason: ShutdownReason,
        message: String,
        ts_event: UnixNanos,
    },
}

impl Event {
    /// Returns the event timestamp (nanoseconds).
    #[must_use]
    pub const fn ts_event(&self) -> UnixNanos {
        match self {
            Self::MarketData { ts_event, .. }
            | Self::OrderbookUpdate { ts_event, .. }
            | Self::Trade { ts_event, .. }
            | Self::Candle { ts_event, .. }
            | Self::Order { ts_event, .. }
            | Self::Position { ts_event, .. }
            | Self::Account { ts_event, .. }
            | Self::Tick { ts_event, .. }
            | Self::Shutdown { ts_event, .. } => *ts_event,
        }
    }

    /// Returns the variant name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MarketData { .. } => "MarketData",
            Self::OrderbookUpdate { .. } => "OrderbookUpdate",
            Self::Trade { .. } => "Trade",
            Self::Candle { .. } => "Candle",
            Self::Order { .. } => "Order",
            Self::Position { .. } => "Position",
            Self::Account { .. } => "Account",
            Self::Tick { .. } => "Tick",
            Self::Shutdown { .. } => "Shutdown",
        }
    }

    /// Returns the symbol the event relates to, if any.
    #[must_use]
    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            Self::MarketData { quote, .. } => Some(quote.symbol),
            Self::OrderbookUpdate { symbol, .. } | Self::Order { symbol, .. } => Some(*symbol),
            Self::Trade { trade, .. } => Some(trade.symbol),
            Self::Candle { bar, .. } => Some(bar.symbol),
            Self::Position { position, .. } => Some(position.symbol),
            Self::Account { .. } | Self::Tick { .. } | Self::Shutdown { .. } => None,
        }
    }

    #[must_use]
    pub fn market_data(quote: Quote) -> Self {
        Self::MarketData {
            ts_event: quote.ts_event(),
            quote,
        }
    }

    #[must_use]
    pub fn orderbook_update(book: &OrderBook) -> Self {
        Self::OrderbookUpdate {
            symbol: book.symbol,
            best_bid: book.best_bid().copied(),
            best_ask: book.best_ask().copied(),
            bid_levels: book.bids().len(),
            ask_levels: book.asks().len(),
            ts_event: UnixNanos::from_millis(book.timestamp),
        }
    }

    #[must_use]
    pub fn trade(trade: Trade) -> Self {
        Self::Trade {
            ts_event: trade.ts_event(),
            trade,
        }
    }

    #[must_use]
    pub fn candle(bar: Bar) -> Self {
        Self::Candle {
            ts_event: bar.ts_event(),
            bar,
        }
    }

    #[must_use]
    pub fn order(order: &Order) -> Self {
        Self::Order {
            order_id: order.id,
            symbol: order.symbol,
            status: order.status,
            ts_event: UnixNanos::from_millis(order.updated_at),
        }
    }

    #[must_use]
    pub fn position(position: Position) -> Self {
        Self::Position {
            ts_event: position.ts_event(),
            position,
        }
    }

    #[must_use]
    pub fn account(balance: AccountBalance) -> Self {
        Self::Account {
            ts_event: balance.ts_event(),
            balance,
        }
    }

    #[must_use]
    pub const fn tick(tick_number: u64, ts_event: UnixNanos) -> Self {
        Self::Tick {
            tick_number,
            ts_event,
        }
    }

    #[must_use]
    pub fn shutdown(reason: ShutdownReason, message: impl Into<String>, ts_event: UnixNanos) -> Self {
        Self::Shutdown {
            reason,
            message: message.into(),
            ts_event,
        }
    }
}

impl Serializable for Event {}
