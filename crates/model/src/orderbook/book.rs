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

//! A price-level order book owned by the cache and updated in place.

use std::{cmp::Ordering, fmt::Write};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BookError, BookLevel, OrderBookSnapshot};
use crate::{
    enums::BookSide,
    identifiers::Symbol,
    types::{Price, Quantity, midpoint},
};

/// Provides an aggregated price-level (L2) order book for a single symbol.
///
/// Bids are kept sorted by descending price and asks by ascending price, so the
/// best level on either side is always at index zero. Levels never carry a zero size.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    /// The symbol for the order book.
    pub symbol: Symbol,
    bids: Vec<BookLevel>,
    asks: Vec<BookLevel>,
    /// UNIX timestamp (milliseconds) of the last applied update.
    pub timestamp: i64,
    /// The current count of updates applied to the order book.
    pub update_count: u64,
}

impl OrderBook {
    /// Creates a new empty [`OrderBook`] instance.
    #[must_use]
    pub const fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            bids: Vec::new(),
            asks: Vec::new(),
            timestamp: 0,
            update_count: 0,
        }
    }

    /// Creates a new [`OrderBook`] from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &OrderBookSnapshot) -> Self {
        let mut book = Self::new(snapshot.symbol);
        book.apply_snapshot(snapshot);
        book
    }

    /// Replaces both sides of the book with the levels of `snapshot`.
    ///
    /// The existing level buffers are reused. Zero-size levels are dropped.
    pub fn apply_snapshot(&mut self, snapshot: &OrderBookSnapshot) {
        Self::replace_side(&mut self.bids, &snapshot.bids, BookSide::Bid);
        Self::replace_side(&mut self.asks, &snapshot.asks, BookSide::Ask);
        self.timestamp = snapshot.timestamp;
        self.update_count += 1;
    }

    /// Applies an incremental change to the level at `price` on `side`.
    ///
    /// A zero `size` removes the level, any other size inserts or replaces it.
    ///
    /// # Errors
    ///
    /// Returns an error if `price` is not positive or `size` is negative.
    pub fn update_level(
        &mut self,
        side: BookSide,
        price: Price,
        size: Quantity,
        timestamp: i64,
    ) -> Result<(), BookError> {
        if price <= Decimal::ZERO {
            return Err(BookError::InvalidPrice(side, price));
        }
        if size < Decimal::ZERO {
            return Err(BookError::NegativeSize(side, size));
        }

        let levels = match side {
            BookSide::Bid => &mut self.bids,
            BookSide::Ask => &mut self.asks,
        };
        let search = levels.binary_search_by(|level| compare_for_side(side, level.price, price));

        match (search, size.is_zero()) {
            (Ok(index), true) => {
                levels.remove(index);
            }
            (Ok(index), false) => levels[index].size = size,
            (Err(_), true) => {}
            (Err(index), false) => levels.insert(index, BookLevel::new(price, size)),
        }

        self.timestamp = timestamp;
        self.update_count += 1;
        Ok(())
    }

    /// Clears all levels from both sides of the book.
    pub fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
    }

    /// Returns the bid levels, best first.
    #[must_use]
    pub fn bids(&self) -> &[BookLevel] {
        &self.bids
    }

    /// Returns the ask levels, best first.
    #[must_use]
    pub fn asks(&self) -> &[BookLevel] {
        &self.asks
    }

    /// Returns up to `n` levels of `side`, best first.
    #[must_use]
    pub fn depth(&self, side: BookSide, n: usize) -> &[BookLevel] {
        let levels = self.side(side);
        &levels[..n.min(levels.len())]
    }

    /// Returns the total size of the top `n` levels of `side`, or of the whole side if `None`.
    #[must_use]
    pub fn volume(&self, side: BookSide, n: Option<usize>) -> Quantity {
        let levels = self.side(side);
        let n = n.unwrap_or(levels.len());
        levels.iter().take(n).map(|level| level.size).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    #[must_use]
    pub fn best_bid(&self) -> Option<&BookLevel> {
        self.bids.first()
    }

    #[must_use]
    pub fn best_ask(&self) -> Option<&BookLevel> {
        self.asks.first()
    }

    #[must_use]
    pub fn best_bid_price(&self) -> Option<Price> {
        self.best_bid().map(|level| level.price)
    }

    #[must_use]
    pub fn best_ask_price(&self) -> Option<Price> {
        self.best_ask().map(|level| level.price)
    }

    /// Returns the spread between best ask and bid prices if both exist.
    #[must_use]
    pub fn spread(&self) -> Option<Price> {
        Some(self.best_ask_price()? - self.best_bid_price()?)
    }

    /// Returns the midpoint between best ask and bid prices if both exist.
    #[must_use]
    pub fn mid_price(&self) -> Option<Price> {
        Some(midpoint(self.best_bid_price()?, self.best_ask_price()?))
    }

    /// Returns `true` if the best bid is at or above the best ask.
    #[must_use]
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid_price(), self.best_ask_price()) {
            (Some(bid), Some(ask)) => bid >= ask,
            _ => false,
        }
    }

    /// Return a formatted string representation of the top `num_levels` of the book.
    #[must_use]
    pub fn pprint(&self, num_levels: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} (updates={})", self.symbol, self.update_count);
        for level in self.depth(BookSide::Ask, num_levels).iter().rev() {
            let _ = writeln!(out, "ASK {} x {}", level.price, level.size);
        }
        for level in self.depth(BookSide::Bid, num_levels) {
            let _ = writeln!(out, "BID {} x {}", level.price, level.size);
        }
        out
    }

    fn side(&self, side: BookSide) -> &[BookLevel] {
        match side {
            BookSide::Bid => &self.bids,
            BookSide::Ask => &self.asks,
        }
    }

    fn replace_side(levels: &mut Vec<BookLevel>, source: &[BookLevel], side: BookSide) {
        levels.clear();
        levels.extend(source.iter().filter(|level| !level.size.is_zero()).copied());
        levels.sort_by(|a, b| compare_for_side(side, a.price, b.price));
        levels.dedup_by(|later, earlier| later.price == earlier.price);
    }
}

/// Orders prices best-first for `side`: descending for bids, ascending for asks.
fn compare_for_side(side: BookSide, a: Price, b: Price) -> Ordering {
    match side {
        BookSide::Bid => b.cmp(&a),
        BookSide::Ask => a.cmp(&b),
    }
}
