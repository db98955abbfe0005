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

//! Bar (OHLCV candle) data types and the bounded per-series bar store.

use std::{collections::VecDeque, fmt::Display};

use meridian_core::serialization::Serializable;
use serde::{Deserialize, Serialize};

use super::HasTimestamp;
use crate::{
    enums::Timeframe,
    identifiers::Symbol,
    types::{Price, Quantity},
};

/// Default maximum number of bars retained per series.
pub const DEFAULT_MAX_BARS: usize = 1_000;

/// Represents an OHLCV bar for a symbol and timeframe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bar {
    /// The bar symbol.
    pub symbol: Symbol,
    /// The bar timeframe.
    pub timeframe: Timeframe,
    /// UNIX timestamp (milliseconds) of the bar open.
    pub timestamp: i64,
    /// The open price.
    pub open: Price,
    /// The high price.
    pub high: Price,
    /// The low price.
    pub low: Price,
    /// The close price.
    pub close: Price,
    /// The traded volume.
    pub volume: Quantity,
    /// Whether the bar interval has completed.
    pub is_closed: bool,
}

impl Bar {
    /// Creates a new [`Bar`] instance.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub const fn new(
        symbol: Symbol,
        timeframe: Timeframe,
        timestamp: i64,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Quantity,
        is_closed: bool,
    ) -> Self {
        Self {
            symbol,
            timeframe,
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            is_closed,
        }
    }

    /// Returns the UNIX timestamp (milliseconds) when the bar interval ends.
    #[must_use]
    pub fn close_time(&self) -> i64 {
        self.timestamp
            .saturating_add(i64::try_from(self.timeframe.as_millis()).unwrap_or(i64::MAX))
    }

    /// Returns `true` if the close is above the open.
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Returns the high-low range.
    #[must_use]
    pub fn range(&self) -> Price {
        self.high - self.low
    }
}

impl HasTimestamp for Bar {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl Display for Bar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{},{},{},{},{},{},{}",
            self.symbol,
            self.timeframe,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
            self.timestamp,
        )
    }
}

impl Serializable for Bar {}

/// A bounded, time-ordered sequence of bars for one symbol and timeframe.
///
/// The series never holds more than `max_size` bars. When full, the oldest bar is
/// evicted before a new one is appended. An update whose timestamp equals the last
/// stored bar, while that bar is still forming (`is_closed == false`), replaces it in
/// place instead of appending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BarSeries {
    symbol: Symbol,
    timeframe: Timeframe,
    max_size: usize,
    bars: VecDeque<Bar>,
}

impl BarSeries {
    /// Creates a new empty [`BarSeries`] instance.
    ///
    /// A `max_size` of zero is treated as one, a series always retains its latest bar.
    #[must_use]
    pub fn new(symbol: Symbol, timeframe: Timeframe, max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            symbol,
            timeframe,
            max_size,
            bars: VecDeque::with_capacity(max_size.min(DEFAULT_MAX_BARS)),
        }
    }

    /// Applies `bar` to the series.
    pub fn update(&mut self, bar: Bar) {
        if let Some(last) = self.bars.back_mut()
            && last.timestamp == bar.timestamp
            && !last.is_closed
        {
            *last = bar;
            return;
        }

        while self.bars.len() >= self.max_size {
            self.bars.pop_front();
        }
        self.bars.push_back(bar);
    }

    #[must_use]
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    #[must_use]
    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    #[must_use]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Returns the most recent bar, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Bar> {
        self.bars.back()
    }

    /// Returns the bar at `index`, where zero is the oldest retained bar.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Returns an iterator over the bars from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Bar> + ExactSizeIterator {
        self.bars.iter()
    }

    /// Returns up to the `n` most recent bars, oldest first.
    #[must_use]
    pub fn latest(&self, n: usize) -> Vec<Bar> {
        let skip = self.bars.len().saturating_sub(n);
        self.bars.iter().skip(skip).copied().collect()
    }

    /// Returns the close prices from oldest to newest.
    #[must_use]
    pub fn closes(&self) -> Vec<Price> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    /// Removes every bar while keeping the series configuration.
    pub fn clear(&mut self) {
        self.bars.clear();
    }
}
