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

//! A full order book snapshot as delivered by a data provider.

use serde::{Deserialize, Serialize};

use super::BookLevel;
use crate::{data::HasTimestamp, identifiers::Symbol};

/// A point-in-time view of both sides of a book.
///
/// Levels are not required to be sorted, the book sorts them when the snapshot is applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    /// The book symbol.
    pub symbol: Symbol,
    /// The bid levels.
    pub bids: Vec<BookLevel>,
    /// The ask levels.
    pub asks: Vec<BookLevel>,
    /// UNIX timestamp (milliseconds) of the snapshot.
    pub timestamp: i64,
}

impl OrderBookSnapshot {
    /// Creates a new [`OrderBookSnapshot`] instance.
    #[must_use]
    pub const fn new(
        symbol: Symbol,
        bids: Vec<BookLevel>,
        asks: Vec<BookLevel>,
        timestamp: i64,
    ) -> Self {
        Self {
            symbol,
            bids,
            asks,
            timestamp,
        }
    }
}

impl HasTimestamp for OrderBookSnapshot {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}
