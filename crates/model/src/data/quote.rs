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

//! A `Quote` data type representing the top-of-book state for a symbol.

use std::fmt::Display;

use meridian_core::serialization::Serializable;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::HasTimestamp;
use crate::{
    identifiers::Symbol,
    types::{Price, Quantity, checked_div, midpoint},
};

/// Represents the best bid and ask for a symbol.
///
/// One quote is kept per symbol and overwritten on update, no history is retained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    /// The quoted symbol.
    pub symbol: Symbol,
    /// The top-of-book bid price.
    pub bid: Price,
    /// The top-of-book ask price.
    pub ask: Price,
    /// The top-of-book bid size.
    pub bid_size: Quantity,
    /// The top-of-book ask size.
    pub ask_size: Quantity,
    /// UNIX timestamp (milliseconds) when the quote was produced.
    pub timestamp: i64,
}

impl Quote {
    /// Creates a new [`Quote`] instance.
    #[must_use]
    pub const fn new(
        symbol: Symbol,
        bid: Price,
        ask: Price,
        bid_size: Quantity,
        ask_size: Quantity,
        timestamp: i64,
    ) -> Self {
        Self {
            symbol,
            bid,
            ask,
            bid_size,
            ask_size,
            timestamp,
        }
    }

    /// Returns the mid price `(bid + ask) / 2`.
    #[must_use]
    pub fn mid_price(&self) -> Price {
        midpoint(self.bid, self.ask)
    }

    /// Returns the spread `ask - bid`.
    #[must_use]
    pub fn spread(&self) -> Price {
        self.ask - self.bid
    }

    /// Returns the spread as a percentage of the mid price.
    ///
    /// Returns zero when the mid price is zero.
    #[must_use]
    pub fn spread_pct(&self) -> Decimal {
        checked_div(self.spread(), self.mid_price())
            .map(|ratio| ratio * Decimal::ONE_HUNDRED)
            .unwrap_or(Decimal::ZERO)
    }

    /// Returns `true` if either side of the quote is negative.
    #[must_use]
    pub fn has_negative_price(&self) -> bool {
        self.bid < Decimal::ZERO || self.ask < Decimal::ZERO
    }
}

impl HasTimestamp for Quote {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{}",
            self.symbol, self.bid, self.ask, self.bid_size, self.ask_size, self.timestamp,
        )
    }
}

impl Serializable for Quote {}
