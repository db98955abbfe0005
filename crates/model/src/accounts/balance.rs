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

//! An `AccountBalance` for a single currency.

use std::fmt::Display;

use meridian_core::serialization::Serializable;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{data::HasTimestamp, identifiers::Currency};

/// Represents the balance held in one currency.
///
/// Balances are value types, an update replaces every field at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The balance currency.
    pub currency: Currency,
    /// The total balance.
    pub total: Decimal,
    /// The balance available for new orders.
    pub available: Decimal,
    /// The balance locked by open orders or margin.
    pub locked: Decimal,
    /// The unrealized PnL attributed to this currency.
    pub unrealized_pnl: Decimal,
    /// UNIX timestamp (milliseconds) of the last update.
    pub updated_at: i64,
}

impl AccountBalance {
    /// Creates a new [`AccountBalance`] instance with no unrealized PnL.
    #[must_use]
    pub const fn new(
        currency: Currency,
        total: Decimal,
        available: Decimal,
        locked: Decimal,
        updated_at: i64,
    ) -> Self {
        Self {
            currency,
            total,
            available,
            locked,
            unrealized_pnl: Decimal::ZERO,
            updated_at,
        }
    }

    /// Returns the total balance plus unrealized PnL.
    #[must_use]
    pub fn equity(&self) -> Decimal {
        self.total + self.unrealized_pnl
    }

    /// Returns `true` if `available + locked` reconciles with `total`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.available + self.locked == self.total
    }
}

impl HasTimestamp for AccountBalance {
    fn timestamp(&self) -> i64 {
        self.updated_at
    }
}

impl Display for AccountBalance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AccountBalance(total={} {c}, available={} {c}, locked={} {c})",
            self.total,
            self.available,
            self.locked,
            c = self.currency,
        )
    }
}

impl Serializable for AccountBalance {}
