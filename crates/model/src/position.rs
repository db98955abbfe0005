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

//! A `Position` for one symbol, owned by the cache and updated in place.

use std::fmt::Display;

use meridian_core::serialization::Serializable;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    data::HasTimestamp,
    enums::PositionSide,
    identifiers::Symbol,
    types::{Price, Quantity},
};

/// Represents the net exposure held in a symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// The position symbol.
    pub symbol: Symbol,
    /// The current market side.
    pub side: PositionSide,
    /// The absolute position size.
    pub quantity: Quantity,
    /// The average entry price.
    pub entry_price: Price,
    /// The last mark price used for unrealized PnL.
    pub mark_price: Price,
    /// The unrealized PnL at `mark_price`.
    pub unrealized_pnl: Decimal,
    /// The PnL realized by closing trades.
    pub realized_pnl: Decimal,
    /// UNIX timestamp (milliseconds) when the position was opened.
    pub opened_at: i64,
    /// UNIX timestamp (milliseconds) of the last update.
    pub updated_at: i64,
}

impl Position {
    /// Creates a new [`Position`] marked at its entry price.
    #[must_use]
    pub const fn new(
        symbol: Symbol,
        side: PositionSide,
        quantity: Quantity,
        entry_price: Price,
        timestamp: i64,
    ) -> Self {
        Self {
            symbol,
            side,
            quantity,
            entry_price,
            mark_price: entry_price,
            unrealized_pnl: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            opened_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns `true` if the position carries no exposure.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.side == PositionSide::Flat || self.quantity.is_zero()
    }

    #[must_use]
    pub fn is_long(&self) -> bool {
        self.side == PositionSide::Long && !self.quantity.is_zero()
    }

    #[must_use]
    pub fn is_short(&self) -> bool {
        self.side == PositionSide::Short && !self.quantity.is_zero()
    }

    /// Returns the notional value at the mark price.
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.quantity * self.mark_price
    }

    /// Returns the signed quantity, negative for short positions.
    #[must_use]
    pub fn signed_quantity(&self) -> Decimal {
        match self.side {
            PositionSide::Short => -self.quantity,
            PositionSide::Long => self.quantity,
            PositionSide::Flat => Decimal::ZERO,
        }
    }

    /// Re-marks the position at `price` and recomputes unrealized PnL.
    pub fn update_mark_price(&mut self, price: Price, timestamp: i64) {
        self.mark_price = price;
        self.unrealized_pnl = (price - self.entry_price) * self.signed_quantity();
        self.updated_at = timestamp;
    }

    /// Overwrites this position with the state of `other`, keeping its identity.
    pub fn apply(&mut self, other: &Self) {
        *self = *other;
    }
}

impl HasTimestamp for Position {
    fn timestamp(&self) -> i64 {
        self.updated_at
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Position({} {} {} @ {})",
            self.side, self.quantity, self.symbol, self.entry_price
        )
    }
}

impl Serializable for Position {}
