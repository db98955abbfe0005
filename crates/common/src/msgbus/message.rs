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

//! Request, response and command payloads carried by the message bus.

use std::fmt::Display;

use meridian_model::{
    accounts::AccountBalance,
    data::{Bar, Quote},
    enums::{SubscriptionType, Timeframe},
    identifiers::{Currency, OrderId, Symbol},
    orderbook::OrderBook,
    orders::Order,
    position::Position,
};
use serde::{Deserialize, Serialize};
use ustr::Ustr;

/// A request sent to a named endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// The latest quote for a symbol.
    Quote { symbol: Symbol },
    /// The order book for a symbol.
    OrderBook { symbol: Symbol },
    /// The position for a symbol.
    Position { symbol: Symbol },
    /// The balance for a currency.
    Balance { currency: Currency },
    /// An order by ID.
    Order { order_id: OrderId },
    /// The latest bar for a symbol and timeframe.
    LastBar {
        symbol: Symbol,
        timeframe: Timeframe,
    },
    /// An application defined request.
    Custom {
        name: Ustr,
        payload: serde_json::Value,
    },
}

impl Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quote { symbol } => write!(f, "Quote({symbol})"),
            Self::OrderBook { symbol } => write!(f, "OrderBook({symbol})"),
            Self::Position { symbol } => write!(f, "Position({symbol})"),
            Self::Balance { currency } => write!(f, "Balance({currency})"),
            Self::Order { order_id } => write!(f, "Order({order_id})"),
            Self::LastBar { symbol, timeframe } => write!(f, "LastBar({symbol}, {timeframe})"),
            Self::Custom { name, .. } => write!(f, "Custom({name})"),
        }
    }
}

/// The response returned by an endpoint handler.
///
/// Entity lookups answer with `None` when the entity is not found.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Response {
    Quote(Option<Quote>),
    OrderBook(Option<Box<OrderBook>>),
    Position(Option<Position>),
    Balance(Option<AccountBalance>),
    Order(Option<Order>),
    Bar(Option<Bar>),
    Custom(serde_json::Value),
    /// The request was accepted with no payload.
    Ack,
    /// The handler could not serve the request.
    Error(String),
}

impl Response {
    /// Returns `true` if the response is [`Response::Error`].
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// A fire-and-forget command for the single global command handler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Submit an order to the execution layer.
    SubmitOrder { order: Order },
    /// Cancel an order by ID.
    CancelOrder { order_id: OrderId },
    /// Cancel all open orders, optionally for one symbol only.
    CancelAllOrders { symbol: Option<Symbol> },
    /// Request a market data subscription.
    Subscribe {
        symbol: Symbol,
        subscription_type: SubscriptionType,
    },
    /// Cancel a market data subscription.
    Unsubscribe { symbol: Symbol },
    /// Request an orderly shutdown.
    Shutdown { reason: String },
    /// An application defined command.
    Custom {
        name: Ustr,
        payload: serde_json::Value,
    },
}

impl Command {
    /// Returns the command name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SubmitOrder { .. } => "SubmitOrder",
            Self::CancelOrder { .. } => "CancelOrder",
            Self::CancelAllOrders { .. } => "CancelAllOrders",
            Self::Subscribe { .. } => "Subscribe",
            Self::Unsubscribe { .. } => "Unsubscribe",
            Self::Shutdown { .. } => "Shutdown",
            Self::Custom { .. } => "Custom",
        }
    }
}
