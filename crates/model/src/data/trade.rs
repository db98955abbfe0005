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

//! A `Trade` data type representing a single public execution.

use std::fmt::Display;

use meridian_core::serialization::Serializable;
use serde::{Deserialize, Serialize};
use ustr::Ustr;

use super::HasTimestamp;
use crate::{
    enums::OrderSide,
    identifiers::Symbol,
    types::{Price, Quantity},
};

/// Represents a single trade print in a market.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trade {
    /// The traded symbol.
    pub symbol: Symbol,
    /// The venue assigned trade ID.
    pub trade_id: Ustr,
    /// The traded price.
    pub price: Price,
    /// The traded size.
    pub size: Quantity,
    /// The aggressor side.
    pub side: OrderSide,
    /// UNIX timestamp (milliseconds) when the trade occurred.
    pub timestamp: i64,
}

impl Trade {
    /// Creates a new [`Trade`] instance.
    #[must_use]
    pub fn new(
        symbol: Symbol,
        trade_id: &str,
        price: Price,
        size: Quantity,
        side: OrderSide,
        timestamp: i64,
    ) -> Self {
        Self {
            symbol,
            trade_id: Ustr::from(trade_id),
            price,
            size,
            side,
            timestamp,
        }
    }

    /// Returns the notional value `price * size`.
    #[must_use]
    pub fn notional(&self) -> Price {
        self.price * self.size
    }
}

impl HasTimestamp for Trade {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl Display for Trade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{}",
            self.symbol, self.price, self.size, self.side, self.trade_id, self.timestamp,
        )
    }
}

impl Serializable for Trade {}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::data::stubs::trade_btcusdt;

    #[rstest]
    fn test_notional(trade_btcusdt: Trade) {
        assert_eq!(trade_btcusdt.notional(), dec!(25002.5));
    }

    #[rstest]
    fn test_display(trade_btcusdt: Trade) {
        assert_eq!(
            trade_btcusdt.to_string(),
            "BTC-USDT,50005,0.5,BUY,T-1,1700000000500"
        );
    }
}
