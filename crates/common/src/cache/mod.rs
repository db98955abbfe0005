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

//! In-memory cache holding the authoritative view of market, account and order state.
//!
//! Order books and positions are owned by the cache and mutated in place on every
//! update. Orders are owned by the caller and held here only as weak handles.

pub mod config;
pub mod query;

#[cfg(test)]
mod tests;

use std::{
    cell::RefCell,
    fmt::Debug,
    rc::{Rc, Weak},
};

use ahash::AHashMap;
pub use config::CacheConfig; // Re-export
use meridian_model::{
    accounts::AccountBalance,
    data::{Bar, BarSeries, Quote},
    enums::Timeframe,
    events::Event,
    identifiers::{Currency, OrderId, Symbol},
    orderbook::{OrderBook, OrderBookSnapshot},
    orders::Order,
    position::Position,
    types::Price,
};
pub use query::register_cache_endpoint; // Re-export
use rust_decimal::Decimal;
use serde::Serialize;

use crate::msgbus::{
    MessageBus,
    switchboard::{
        ACCOUNT_UPDATE_TOPIC, BAR_CLOSED_TOPIC, ORDER_UPDATE_TOPIC, ORDERBOOK_UPDATE_TOPIC,
        POSITION_UPDATE_TOPIC, QUOTE_UPDATE_TOPIC,
    },
};

/// Per-kind update counters for a [`Cache`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// The count of order book snapshots applied.
    pub orderbook_updates: u64,
    /// The count of quotes written.
    pub quote_updates: u64,
    /// The count of positions written.
    pub position_updates: u64,
    /// The count of balances written.
    pub balance_updates: u64,
    /// The count of bars written (forming and closed).
    pub bar_updates: u64,
    /// The count of order handles written.
    pub order_updates: u64,
}

impl CacheStats {
    /// Returns the total count of updates across all kinds.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.orderbook_updates
            + self.quote_updates
            + self.position_updates
            + self.balance_updates
            + self.bar_updates
            + self.order_updates
    }
}

/// A common in-memory `Cache` for market, account and order state.
pub struct Cache {
    config: CacheConfig,
    msgbus: Option<Rc<MessageBus>>,
    books: AHashMap<Symbol, OrderBook>,
    quotes: AHashMap<Symbol, Quote>,
    positions: AHashMap<Symbol, Position>,
    balances: AHashMap<Currency, AccountBalance>,
    bars: AHashMap<(Symbol, Timeframe), BarSeries>,
    orders: AHashMap<OrderId, Weak<RefCell<Order>>>,
    stats: CacheStats,
}

impl Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(Cache))
            .field("config", &self.config)
            .field("has_msgbus", &self.msgbus.is_some())
            .field("books", &self.books.len())
            .field("quotes", &self.quotes.len())
            .field("positions", &self.positions.len())
            .field("balances", &self.balances.len())
            .field("bars", &self.bars.len())
            .field("orders", &self.orders.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl Default for Cache {
    /// Creates a new default [`Cache`] instance.
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl Cache {
    /// Creates a new [`Cache`] instance with an optional message bus for notifications.
    #[must_use]
    pub fn new(config: Option<CacheConfig>, msgbus: Option<Rc<MessageBus>>) -> Self {
        Self {
            config: config.unwrap_or_default(),
            msgbus,
            books: AHashMap::new(),
            quotes: AHashMap::new(),
            positions: AHashMap::new(),
            balances: AHashMap::new(),
            bars: AHashMap::new(),
            orders: AHashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Attaches the message bus used for update notifications.
    pub fn register_msgbus(&mut self, msgbus: Rc<MessageBus>) {
        self.msgbus = Some(msgbus);
    }

    /// Returns a reference to the cache configuration.
    #[must_use]
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the current update counters.
    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Returns `true` if updates will be published on the message bus.
    #[must_use]
    pub const fn is_notifying(&self) -> bool {
        self.config.enable_notifications && self.msgbus.is_some()
    }

    /// Destroys every cached entity and resets the counters.
    ///
    /// The attached message bus and configuration are kept, so the cache remains usable.
    pub fn clear(&mut self) {
        log::debug!("Clearing cache");
        self.books.clear();
        self.quotes.clear();
        self.positions.clear();
        self.balances.clear();
        self.bars.clear();
        self.orders.clear();
        self.stats = CacheStats::default();
    }

    fn notify(&self, topic: &str, event: impl FnOnce() -> Event) {
        if !self.config.enable_notifications {
            return;
        }
        if let Some(msgbus) = &self.msgbus {
            msgbus.publish(topic, &event());
        }
    }

    // -- ORDER BOOKS -----------------------------------------------------------------------------

    /// Applies the `snapshot` to the cached order book for its symbol.
    ///
    /// The book is created on first use and updated in place afterwards.
    pub fn update_orderbook(&mut self, snapshot: &OrderBookSnapshot) {
        self.books
            .entry(snapshot.symbol)
            .and_modify(|book| book.apply_snapshot(snapshot))
            .or_insert_with(|| {
                log::debug!("Creating order book for {}", snapshot.symbol);
                OrderBook::from_snapshot(snapshot)
            });
        self.stats.orderbook_updates += 1;

        if let Some(book) = self.books.get(&snapshot.symbol) {
            self.notify(ORDERBOOK_UPDATE_TOPIC, || Event::orderbook_update(book));
        }
    }

    /// Returns a reference to the order book for the `symbol` (if found).
    #[must_use]
    pub fn orderbook(&self, symbol: &Symbol) -> Option<&OrderBook> {
        self.books.get(symbol)
    }

    /// Returns a mutable reference to the order book for the `symbol` (if found).
    #[must_use]
    pub fn orderbook_mut(&mut self, symbol: &Symbol) -> Option<&mut OrderBook> {
        self.books.get_mut(symbol)
    }

    /// Returns the symbols with a cached order book.
    #[must_use]
    pub fn orderbook_symbols(&self) -> Vec<Symbol> {
        sorted_keys(self.books.keys())
    }

    // -- QUOTES ----------------------------------------------------------------------------------

    /// Stores the `quote` as the latest quote for its symbol.
    pub fn update_quote(&mut self, quote: Quote) {
        self.quotes.insert(quote.symbol, quote);
        self.stats.quote_updates += 1;
        self.notify(QUOTE_UPDATE_TOPIC, || Event::market_data(quote));
    }

    /// Returns the latest quote for the `symbol` (if found).
    #[must_use]
    pub fn quote(&self, symbol: &Symbol) -> Option<&Quote> {
        self.quotes.get(symbol)
    }

    /// Returns the symbols with a cached quote.
    #[must_use]
    pub fn quote_symbols(&self) -> Vec<Symbol> {
        sorted_keys(self.quotes.keys())
    }

    /// Returns `true` if the `symbol` has no quote or its quote is older than the
    /// configured expiry at `now_ms`.
    ///
    /// A quote exactly `quote_expiry_ms` old is not expired.
    #[must_use]
    pub fn is_quote_expired(&self, symbol: &Symbol, now_ms: i64) -> bool {
        match self.quotes.get(symbol) {
            Some(quote) => {
                let expiry = i64::try_from(self.config.quote_expiry_ms).unwrap_or(i64::MAX);
                now_ms.saturating_sub(quote.timestamp) > expiry
            }
            None => true,
        }
    }

    /// Returns the mid price of the latest quote for the `symbol`.
    #[must_use]
    pub fn mid_price(&self, symbol: &Symbol) -> Option<Price> {
        self.quotes.get(symbol).map(Quote::mid_price)
    }

    /// Returns the spread of the latest quote for the `symbol`.
    #[must_use]
    pub fn spread(&self, symbol: &Symbol) -> Option<Price> {
        self.quotes.get(symbol).map(Quote::spread)
    }

    /// Returns the spread of the latest quote as a percentage of its mid price.
    #[must_use]
    pub fn spread_pct(&self, symbol: &Symbol) -> Option<Decimal> {
        self.quotes.get(symbol).map(Quote::spread_pct)
    }

    // -- POSITIONS -------------------------------------------------------------------------------

    /// Writes the `position` into the cache, updating an existing instance in place.
    pub fn update_position(&mut self, position: &Position) {
        let cached = self
            .positions
            .entry(position.symbol)
            .and_modify(|cached| cached.apply(position))
            .or_insert(*position);
        let snapshot = *cached;
        self.stats.position_updates += 1;
        self.notify(POSITION_UPDATE_TOPIC, || Event::position(snapshot));
    }

    /// Returns a reference to the position for the `symbol` (if found).
    #[must_use]
    pub fn position(&self, symbol: &Symbol) -> Option<&Position> {
        self.positions.get(symbol)
    }

    /// Returns a mutable reference to the position for the `symbol` (if found).
    #[must_use]
    pub fn position_mut(&mut self, symbol: &Symbol) -> Option<&mut Position> {
        self.positions.get_mut(symbol)
    }

    /// Returns all cached positions ordered by symbol.
    #[must_use]
    pub fn positions(&self) -> Vec<&Position> {
        let mut positions: Vec<&Position> = self.positions.values().collect();
        positions.sort_by_key(|p| p.symbol);
        positions
    }

    /// Returns the positions with non-zero exposure ordered by symbol.
    #[must_use]
    pub fn positions_open(&self) -> Vec<&Position> {
        self.positions()
            .into_iter()
            .filter(|p| !p.is_flat())
            .collect()
    }

    /// Returns the sum of unrealized PnL across all cached positions.
    #[must_use]
    pub fn total_unrealized_pnl(&self) -> Decimal {
        self.positions.values().map(|p| p.unrealized_pnl).sum()
    }

    // -- BALANCES --------------------------------------------------------------------------------

    /// Stores the `balance`, replacing any previous balance for its currency wholesale.
    pub fn update_balance(&mut self, balance: AccountBalance) {
        if !balance.is_consistent() {
            log::warn!(
                "Balance for {} is inconsistent: total={} available={} locked={}",
                balance.currency,
                balance.total,
                balance.available,
                balance.locked,
            );
        }
        self.balances.insert(balance.currency, balance);
        self.stats.balance_updates += 1;
        self.notify(ACCOUNT_UPDATE_TOPIC, || Event::account(balance));
    }

    /// Returns the balance for the `currency` (if found).
    #[must_use]
    pub fn balance(&self, currency: &Currency) -> Option<&AccountBalance> {
        self.balances.get(currency)
    }

    /// Returns all cached balances ordered by currency.
    #[must_use]
    pub fn balances(&self) -> Vec<&AccountBalance> {
        let mut balances: Vec<&AccountBalance> = self.balances.values().collect();
        balances.sort_by_key(|b| b.currency);
        balances
    }

    // -- BARS ------------------------------------------------------------------------------------

    /// Writes the `bar` into the series for its symbol and timeframe.
    ///
    /// A forming bar with the same timestamp as the last stored forming bar replaces
    /// it, any other bar is appended, evicting the oldest bar when the series is full.
    /// Only closed bars are announced on the bus.
    pub fn update_bar(&mut self, bar: Bar) {
        let max_bars = self.config.max_bars_per_series;
        self.bars
            .entry((bar.symbol, bar.timeframe))
            .or_insert_with(|| BarSeries::new(bar.symbol, bar.timeframe, max_bars))
            .update(bar);
        self.stats.bar_updates += 1;

        if bar.is_closed {
            self.notify(BAR_CLOSED_TOPIC, || Event::candle(bar));
        }
    }

    /// Returns the bar series for the `symbol` and `timeframe` (if found).
    #[must_use]
    pub fn bar_series(&self, symbol: &Symbol, timeframe: Timeframe) -> Option<&BarSeries> {
        self.bars.get(&(*symbol, timeframe))
    }

    /// Returns up to the latest `count` bars in time order, or all bars when `count` is `None`.
    #[must_use]
    pub fn bars(&self, symbol: &Symbol, timeframe: Timeframe, count: Option<usize>) -> Vec<Bar> {
        self.bar_series(symbol, timeframe)
            .map(|series| series.latest(count.unwrap_or(series.len())))
            .unwrap_or_default()
    }

    /// Returns the most recent bar for the `symbol` and `timeframe` (if found).
    #[must_use]
    pub fn last_bar(&self, symbol: &Symbol, timeframe: Timeframe) -> Option<&Bar> {
        self.bar_series(symbol, timeframe).and_then(BarSeries::last)
    }

    // -- ORDERS ----------------------------------------------------------------------------------

    /// Records a handle to the externally owned `order`.
    ///
    /// The cache never keeps the order alive. Once the caller drops its last strong
    /// reference the entry resolves to `None` until purged.
    pub fn update_order(&mut self, order: &Rc<RefCell<Order>>) {
        let Ok(snapshot) = order.try_borrow() else {
            log::error!("Cannot cache order: already mutably borrowed");
            return;
        };
        self.orders.insert(snapshot.id, Rc::downgrade(order));
        self.stats.order_updates += 1;
        self.notify(ORDER_UPDATE_TOPIC, || Event::order(&snapshot));
    }

    /// Returns the order for the `order_id` if it is cached and still alive.
    #[must_use]
    pub fn order(&self, order_id: &OrderId) -> Option<Rc<RefCell<Order>>> {
        self.orders.get(order_id).and_then(Weak::upgrade)
    }

    /// Returns the IDs of all cached order handles, including dropped ones.
    #[must_use]
    pub fn order_ids(&self) -> Vec<OrderId> {
        sorted_keys(self.orders.keys())
    }

    /// Returns every live order which is still open, ordered by ID.
    #[must_use]
    pub fn orders_open(&self) -> Vec<Rc<RefCell<Order>>> {
        let mut open: Vec<Rc<RefCell<Order>>> = self
            .orders
            .values()
            .filter_map(Weak::upgrade)
            .filter(|order| order.try_borrow().is_ok_and(|o| o.is_open()))
            .collect();
        open.sort_by_key(|order| order.try_borrow().map(|o| o.id).ok());
        open
    }

    /// Removes the entries of orders whose owner has dropped them, returning the count removed.
    pub fn purge_dropped_orders(&mut self) -> usize {
        let before = self.orders.len();
        self.orders.retain(|_, order| order.strong_count() > 0);
        let purged = before - self.orders.len();
        if purged > 0 {
            log::debug!("Purged {purged} dropped order handle(s)");
        }
        purged
    }
}

fn sorted_keys<'a, K: Copy + Ord + 'a>(keys: impl Iterator<Item = &'a K>) -> Vec<K> {
    let mut keys: Vec<K> = keys.copied().collect();
    keys.sort();
    keys
}
