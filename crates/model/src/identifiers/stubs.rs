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

//! Identifier fixtures for tests.

use rstest::fixture;

use super::{Currency, OrderId, Symbol};

#[fixture]
pub fn symbol_btcusdt() -> Symbol {
    Symbol::from("BTC-USDT")
}

#[fixture]
pub fn symbol_ethusdt() -> Symbol {
    Symbol::from("ETH-USDT")
}

#[fixture]
pub fn order_id() -> OrderId {
    OrderId::from("O-20240101-001")
}

#[fixture]
pub fn usdt() -> Currency {
    Currency::from("USDT")
}
