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

//! Market data fixtures for tests.

use rstest::fixture;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{Bar, Quote, Trade};
use crate::{
    enums::{OrderSide, Timeframe},
    identifiers::Symbol,
    orderbook::{BookLevel, OrderBookSnapshot},
};

/// Base timestamp used across fixtures: 2023-11-14T22:13:20Z.
pub const STUB_TS_MS: i64 = 1_700_000_000_000;

#[fixture]
pub fn quote_btcusdt() -> Quote {
    Quote::new(
        Symbol::from("BTC-USDT"),
        dec!(50000),
        dec!(50010),
        dec!(1.5),
        dec!(2),
        STUB_TS_MS,
    )
}

#[fixture]
pub fn trade_btcusdt() -> Trade {
    Trade::new(
        Symbol::from("BTC-USDT"),
        "T-1",
        dec!(50005),
        dec!(0.5),
        OrderSide::Buy,
        STUB_TS_MS + 500,
    )
}

#[fixture]
pub fn bar_btcusdt_1h() -> Bar {
    Bar::new(
        Symbol::from("BTC-USDT"),
        Timeframe::H1,
        STUB_TS_MS,
        dec!(50000),
        dec!(50100),
        dec!(49900),
        dec!(50050),
        dec!(12.5),
        true,
    )
}

#[fixture]
pub fn snapshot_btcusdt() -> OrderBookSnapshot {
    OrderBookSnapshot::new(
        Symbol::from("BTC-USDT"),
        vec![
            BookLevel::new(dec!(50000), dec!(1)),
            BookLevel::new(dec!(49990), dec!(2)),
            BookLevel::new(dec!(49980), dec!(3)),
        ],
        vec![
            BookLevel::new(dec!(50010), dec!(1.5)),
            BookLevel::new(dec!(50020), dec!(2.5)),
        ],
        STUB_TS_MS,
    )
}

/// Returns a `BTC-USDT` 1h bar at `timestamp` with all prices set to `close`.
#[must_use]
pub fn stub_bar(timestamp: i64, close: Decimal, is_closed: bool) -> Bar {
    Bar::new(
        Symbol::from("BTC-USDT"),
        Timeframe::H1,
        timestamp,
        close,
        close,
        close,
        close,
        dec!(1),
        is_closed,
    )
}

/// Returns a quote for `symbol` at `timestamp`.
#[must_use]
pub fn stub_quote(symbol: &str, bid: Decimal, ask: Decimal, timestamp: i64) -> Quote {
    Quote::new(Symbol::from(symbol), bid, ask, dec!(1), dec!(1), timestamp)
}
