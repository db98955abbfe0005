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

//! Well-known topics and endpoints of the data plane.
//!
//! These string literals are a stable contract between the cache, the data engine
//! and downstream consumers.

/// Published by the cache when an order book changes.
pub const ORDERBOOK_UPDATE_TOPIC: &str = "orderbook.update";
/// Published by the cache when a quote changes.
pub const QUOTE_UPDATE_TOPIC: &str = "quote.update";
/// Published by the cache when a position changes.
pub const POSITION_UPDATE_TOPIC: &str = "position.update";
/// Published by the cache when an account balance changes.
pub const ACCOUNT_UPDATE_TOPIC: &str = "account.update";
/// Published by the cache when an order is added or updated.
pub const ORDER_UPDATE_TOPIC: &str = "order.update";
/// Published by the cache when a closed bar is stored.
pub const BAR_CLOSED_TOPIC: &str = "bar.closed";

pub const MARKET_DATA_QUOTE_TOPIC: &str = "market_data.quote";
pub const MARKET_DATA_ORDERBOOK_TOPIC: &str = "market_data.orderbook";
pub const MARKET_DATA_TRADE_TOPIC: &str = "market_data.trade";
pub const MARKET_DATA_CANDLE_TOPIC: &str = "market_data.candle";

pub const DATA_ENGINE_STARTED_TOPIC: &str = "data_engine.started";
pub const DATA_ENGINE_STOPPED_TOPIC: &str = "data_engine.stopped";
pub const DATA_ENGINE_CONNECTED_TOPIC: &str = "data_engine.connected";
pub const DATA_ENGINE_DISCONNECTED_TOPIC: &str = "data_engine.disconnected";
pub const DATA_ENGINE_ERROR_TOPIC: &str = "data_engine.error";
pub const DATA_ENGINE_REPLAY_COMPLETE_TOPIC: &str = "data_engine.replay_complete";

/// Matches every `market_data.*` topic.
pub const MARKET_DATA_PATTERN: &str = "market_data.*";
/// Matches every `data_engine.*` lifecycle topic.
pub const DATA_ENGINE_PATTERN: &str = "data_engine.*";

/// The request/response endpoint answering cache queries.
pub const CACHE_QUERY_ENDPOINT: &str = "cache.query";
