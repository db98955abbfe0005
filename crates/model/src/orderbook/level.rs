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

//! Represents a single aggregated price level in an order book.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::types::{Price, Quantity};

/// An aggregated price level: the total resting size at one price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookLevel {
    /// The level price.
    pub price: Price,
    /// The total size resting at the price.
    pub size: Quantity,
}

impl BookLevel {
    /// Creates a new [`BookLevel`] instance.
    #[must_use]
    pub const fn new(price: Price, size: Quantity) -> Self {
        Self { price, size }
    }

    /// Returns the notional value `price * size` of the level.
    #[must_use]
    pub fn notional(&self) -> Price {
        self.price * self.size
    }
}

impl Display for BookLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.size, self.price)
    }
}
