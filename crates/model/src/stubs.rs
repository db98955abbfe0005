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

//! Type stubs to facilitate testing.

use rstest::fixture;
use rust_decimal_macros::dec;

pub use crate::data::stubs::*;
use crate::{
    accounts::AccountBalance,
    enums::{OrderSide, PositionSide},
    identifiers::{Currency, OrderId, Symbol},
    orders::Order,
    position::Position,
};

#[fixture]
pub fn order_limit_buy() -> Order {
    Order::limit(
        OrderId::from("O-001"),
        Symbol::from("BTC-USDT"),
        OrderSide::Buy,
        dec!(49000),
        dec!(1),
        STUB_TS_MS,
    )
}

#[fixture]
pub fn order_limit_sell() -> Order {
    Order::limit(
        OrderId::from("O-002"),
        Symbol::from("ETH-USDT"),
        OrderSide::Sell,
        dec!(3100),
        dec!(5),
        STUB_TS_MS,
    )
}

#[fixture]
pub fn position_long_btcusdt() -> Position {
    Position::new(
        Symbol::from("BTC-USDT"),
        PositionSide::Long,
        dec!(2),
        dec!(50000),
        STUB_TS_MS,
    )
}

#[fixture]
pub fn position_short_ethusdt() -> Position {
    Position::new(
        Symbol::from("ETH-USDT"),
        PositionSide::Short,
        dec!(10),
        dec!(3000),
        STUB_TS_MS,
    )
}

#[fixture]
pub fn balance_usdt() -> AccountBalance {
    AccountBalance::new(
        Currency::from("USDT"),
        dec!(10000),
        dec!(8000),
        dec!(2000),
        STUB_TS_MS,
    )
}

#[fixture]
pub fn balance_btc() -> AccountBalance {
    AccountBalance::new(
        Currency::from("BTC"),
        dec!(1.5),
        dec!(1.5),
        dec!(0),
        STUB_TS_MS,
    )
}
