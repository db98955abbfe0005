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

//! Tests module for `Cache`.

use std::{cell::RefCell, rc::Rc};

use meridian_model::{
    accounts::AccountBalance,
    data::{Bar, Quote},
    enums::{BookSide, OrderStatus, PositionSide, Timeframe},
    events::Event,
    identifiers::{Currency, OrderId, Symbol},
    orderbook::{BookLevel, OrderBookSnapshot},
    orders::Order,
    position::Position,
    stubs::{
        STUB_TS_MS, balance_btc, balance_usdt, bar_btcusdt_1h, order_limit_buy, order_limit_sell,
        position_long_btcusdt, position_short_ethusdt, quote_btcusdt, snapshot_btcusdt, stub_bar,
        stub_quote,
    },
};
use proptest::prelude::*;
use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    cache::{Cache, CacheConfig, CacheStats, register_cache_endpoint},
    msgbus::{
        MessageBus, Request, Response,
        stubs::EventRecorder,
        switchboard::{
            ACCOUNT_UPDATE_TOPIC, BAR_CLOSED_TOPIC, CACHE_QUERY_ENDPOINT, ORDER_UPDATE_TOPIC,
            ORDERBOOK_UPDATE_TOPIC, POSITION_UPDATE_TOPIC, QUOTE_UPDATE_TOPIC,
        },
    },
};

#[fixture]
fn cache() -> Cache {
    Cache::default()
}

#[fixture]
fn btcusdt() -> Symbol {
    Symbol::from("BTC-USDT")
}

/// Returns a notifying cache and a recorder subscribed to every topic.
fn notifying_cache(config: CacheConfig) -> (Cache, EventRecorder) {
    let msgbus = Rc::new(MessageBus::default());
    let recorder = EventRecorder::new();
    msgbus.subscribe("*", recorder.handler()).unwrap();
    (Cache::new(Some(config), Some(msgbus)), recorder)
}

// -- GENERAL -------------------------------------------------------------------------------------

#[rstest]
fn test_new_cache_is_empty(cache: Cache, btcusdt: Symbol) {
    assert_eq!(cache.stats(), CacheStats::default());
    assert!(cache.quote(&btcusdt).is_none());
    assert!(cache.orderbook(&btcusdt).is_none());
    assert!(cache.position(&btcusdt).is_none());
    assert!(cache.last_bar(&btcusdt, Timeframe::H1).is_none());
    assert!(cache.positions().is_empty());
    assert!(cache.balances().is_empty());
    assert!(!cache.is_notifying());
}

#[rstest]
fn test_clear_resets_entities_and_stats(mut cache: Cache, btcusdt: Symbol) {
    cache.update_quote(quote_btcusdt());
    cache.update_orderbook(&snapshot_btcusdt());
    cache.update_position(&position_long_btcusdt());
    cache.update_balance(balance_usdt());
    cache.update_bar(bar_btcusdt_1h());
    assert_eq!(cache.stats().total(), 5);

    cache.clear();

    assert_eq!(cache.stats(), CacheStats::default());
    assert!(cache.quote(&btcusdt).is_none());
    assert!(cache.orderbook(&btcusdt).is_none());
    assert!(cache.position(&btcusdt).is_none());
    assert!(cache.bar_series(&btcusdt, Timeframe::H1).is_none());

    // Still usable after clearing
    cache.update_quote(quote_btcusdt());
    assert_eq!(cache.stats().quote_updates, 1);
}

// -- QUOTES --------------------------------------------------------------------------------------

#[rstest]
fn test_mid_price_scenario(mut cache: Cache, btcusdt: Symbol) {
    cache.update_quote(quote_btcusdt());

    assert_eq!(cache.mid_price(&btcusdt), Some(dec!(50005)));
    assert_eq!(cache.spread(&btcusdt), Some(dec!(10)));
    assert_eq!(
        cache.spread_pct(&btcusdt),
        Some(dec!(10) / dec!(50005) * dec!(100))
    );
}

#[rstest]
fn test_quote_queries_unknown_symbol(cache: Cache, btcusdt: Symbol) {
    assert!(cache.mid_price(&btcusdt).is_none());
    assert!(cache.spread(&btcusdt).is_none());
    assert!(cache.spread_pct(&btcusdt).is_none());
}

#[rstest]
fn test_update_quote_last_write_wins(mut cache: Cache, btcusdt: Symbol) {
    cache.update_quote(stub_quote("BTC-USDT", dec!(1), dec!(2), 1));
    cache.update_quote(stub_quote("BTC-USDT", dec!(3), dec!(4), 2));

    assert_eq!(cache.quote(&btcusdt).map(|q| q.bid), Some(dec!(3)));
    assert_eq!(cache.quote_symbols(), vec![btcusdt]);
    assert_eq!(cache.stats().quote_updates, 2);
}

#[rstest]
#[case(STUB_TS_MS, false)]
#[case(STUB_TS_MS + 60_000, false)]
#[case(STUB_TS_MS + 60_001, true)]
#[case(STUB_TS_MS - 1, false)]
fn test_is_quote_expired(
    mut cache: Cache,
    btcusdt: Symbol,
    #[case] now_ms: i64,
    #[case] expected: bool,
) {
    cache.update_quote(quote_btcusdt());
    assert_eq!(cache.is_quote_expired(&btcusdt, now_ms), expected);
}

#[rstest]
fn test_is_quote_expired_unknown_symbol(cache: Cache, btcusdt: Symbol) {
    assert!(cache.is_quote_expired(&btcusdt, 0));
}

#[rstest]
fn test_is_quote_expired_custom_expiry(btcusdt: Symbol) {
    let mut cache = Cache::new(Some(CacheConfig::new(10, 100, false)), None);
    cache.update_quote(stub_quote("BTC-USDT", dec!(1), dec!(2), 1_000));

    assert!(!cache.is_quote_expired(&btcusdt, 1_100));
    assert!(cache.is_quote_expired(&btcusdt, 1_101));
}

// -- ORDER BOOKS ---------------------------------------------------------------------------------

#[rstest]
fn test_update_orderbook_creates_book(mut cache: Cache, btcusdt: Symbol) {
    cache.update_orderbook(&snapshot_btcusdt());

    let book = cache.orderbook(&btcusdt).unwrap();
    assert_eq!(book.best_bid_price(), Some(dec!(50000)));
    assert_eq!(book.best_ask_price(), Some(dec!(50010)));
    assert_eq!(book.update_count, 1);
    assert_eq!(cache.orderbook_symbols(), vec![btcusdt]);
}

#[rstest]
fn test_update_orderbook_mutates_in_place(mut cache: Cache, btcusdt: Symbol) {
    cache.update_orderbook(&snapshot_btcusdt());
    let snapshot = OrderBookSnapshot::new(
        btcusdt,
        vec![BookLevel::new(dec!(49000), dec!(4))],
        vec![BookLevel::new(dec!(49100), dec!(5))],
        STUB_TS_MS + 1,
    );
    cache.update_orderbook(&snapshot);

    let book = cache.orderbook(&btcusdt).unwrap();
    assert_eq!(book.update_count, 2);
    assert_eq!(book.bids().len(), 1);
    assert_eq!(book.best_ask_price(), Some(dec!(49100)));
    assert_eq!(book.timestamp, STUB_TS_MS + 1);
    assert_eq!(cache.stats().orderbook_updates, 2);
}

#[rstest]
fn test_orderbook_mut_level_update(mut cache: Cache, btcusdt: Symbol) {
    cache.update_orderbook(&snapshot_btcusdt());
    cache
        .orderbook_mut(&btcusdt)
        .unwrap()
        .update_level(BookSide::Bid, dec!(50000), Decimal::ZERO, STUB_TS_MS + 1)
        .unwrap();

    assert_eq!(
        cache.orderbook(&btcusdt).unwrap().best_bid_price(),
        Some(dec!(49990))
    );
}

// -- POSITIONS AND BALANCES ----------------------------------------------------------------------

#[rstest]
fn test_update_position_in_place(
    mut cache: Cache,
    btcusdt: Symbol,
    position_long_btcusdt: Position,
) {
    cache.update_position(&position_long_btcusdt);

    let mut closed = position_long_btcusdt;
    closed.side = PositionSide::Flat;
    closed.quantity = Decimal::ZERO;
    closed.realized_pnl = dec!(150);
    cache.update_position(&closed);

    let position = cache.position(&btcusdt).unwrap();
    assert!(position.is_flat());
    assert_eq!(position.realized_pnl, dec!(150));
    assert_eq!(cache.positions().len(), 1);
    assert!(cache.positions_open().is_empty());
    assert_eq!(cache.stats().position_updates, 2);
}

#[rstest]
fn test_position_mut_and_total_unrealized_pnl(
    mut cache: Cache,
    position_long_btcusdt: Position,
    position_short_ethusdt: Position,
) {
    cache.update_position(&position_long_btcusdt);
    cache.update_position(&position_short_ethusdt);

    cache
        .position_mut(&Symbol::from("BTC-USDT"))
        .unwrap()
        .update_mark_price(dec!(50500), STUB_TS_MS + 1);
    cache
        .position_mut(&Symbol::from("ETH-USDT"))
        .unwrap()
        .update_mark_price(dec!(3100), STUB_TS_MS + 1);

    // Long 2 @ 50000 -> +1000, short 10 @ 3000 -> -1000
    assert_eq!(cache.total_unrealized_pnl(), Decimal::ZERO);
    let symbols: Vec<Symbol> = cache.positions().iter().map(|p| p.symbol).collect();
    assert_eq!(
        symbols,
        vec![Symbol::from("BTC-USDT"), Symbol::from("ETH-USDT")]
    );
}

#[rstest]
fn test_update_balance_overwrites_wholesale(mut cache: Cache, balance_usdt: AccountBalance) {
    cache.update_balance(balance_usdt);
    let replacement = AccountBalance::new(
        Currency::from("USDT"),
        dec!(500),
        dec!(500),
        Decimal::ZERO,
        STUB_TS_MS + 1,
    );
    cache.update_balance(replacement);

    assert_eq!(cache.balance(&Currency::from("USDT")), Some(&replacement));
    assert_eq!(cache.stats().balance_updates, 2);
}

#[rstest]
fn test_balances_sorted(
    mut cache: Cache,
    balance_usdt: AccountBalance,
    balance_btc: AccountBalance,
) {
    cache.update_balance(balance_usdt);
    cache.update_balance(balance_btc);

    let currencies: Vec<Currency> = cache.balances().iter().map(|b| b.currency).collect();
    assert_eq!(currencies, vec![Currency::from("BTC"), Currency::from("USDT")]);
}

// -- BARS ----------------------------------------------------------------------------------------

#[rstest]
fn test_forming_bar_replaced_then_closed(mut cache: Cache, btcusdt: Symbol) {
    cache.update_bar(stub_bar(1_000, dec!(100), false));
    cache.update_bar(stub_bar(1_000, dec!(101), false));
    cache.update_bar(stub_bar(1_000, dec!(102), true));

    let series = cache.bar_series(&btcusdt, Timeframe::H1).unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(
        cache.last_bar(&btcusdt, Timeframe::H1).map(|b| b.close),
        Some(dec!(102))
    );
    assert_eq!(cache.stats().bar_updates, 3);
}

#[rstest]
fn test_closed_bar_with_same_timestamp_is_appended(mut cache: Cache, btcusdt: Symbol) {
    cache.update_bar(stub_bar(1_000, dec!(100), true));
    cache.update_bar(stub_bar(1_000, dec!(101), true));

    assert_eq!(cache.bars(&btcusdt, Timeframe::H1, None).len(), 2);
}

#[rstest]
fn test_bars_evicted_at_capacity(btcusdt: Symbol) {
    let mut cache = Cache::new(Some(CacheConfig::new(3, 60_000, false)), None);
    for i in 0..5 {
        cache.update_bar(stub_bar(i * 3_600_000, Decimal::from(i), true));
    }

    let closes: Vec<Decimal> = cache
        .bars(&btcusdt, Timeframe::H1, None)
        .iter()
        .map(|b| b.close)
        .collect();
    assert_eq!(closes, vec![dec!(2), dec!(3), dec!(4)]);

    let latest: Vec<Decimal> = cache
        .bars(&btcusdt, Timeframe::H1, Some(2))
        .iter()
        .map(|b| b.close)
        .collect();
    assert_eq!(latest, vec![dec!(3), dec!(4)]);
}

#[rstest]
fn test_bar_series_keyed_by_timeframe(mut cache: Cache, btcusdt: Symbol, bar_btcusdt_1h: Bar) {
    let mut bar_1m = bar_btcusdt_1h;
    bar_1m.timeframe = Timeframe::M1;
    cache.update_bar(bar_btcusdt_1h);
    cache.update_bar(bar_1m);

    assert_eq!(cache.bars(&btcusdt, Timeframe::H1, None).len(), 1);
    assert_eq!(cache.bars(&btcusdt, Timeframe::M1, None).len(), 1);
    assert!(cache.bars(&btcusdt, Timeframe::D1, None).is_empty());
}

// -- ORDERS --------------------------------------------------------------------------------------

#[rstest]
fn test_order_is_held_weakly(mut cache: Cache, order_limit_buy: Order) {
    let order_id = order_limit_buy.id;
    let order = Rc::new(RefCell::new(order_limit_buy));
    cache.update_order(&order);

    assert_eq!(Rc::strong_count(&order), 1);
    let cached = cache.order(&order_id).unwrap();
    assert!(Rc::ptr_eq(&cached, &order));
    drop(cached);

    // Mutations by the owner are visible through the cache
    order.borrow_mut().status = OrderStatus::Cancelled;
    assert_eq!(
        cache.order(&order_id).unwrap().borrow().status,
        OrderStatus::Cancelled
    );

    drop(order);
    assert!(cache.order(&order_id).is_none());
    assert_eq!(cache.order_ids(), vec![order_id]);
    assert_eq!(cache.purge_dropped_orders(), 1);
    assert!(cache.order_ids().is_empty());
}

#[rstest]
fn test_orders_open(mut cache: Cache, order_limit_buy: Order, order_limit_sell: Order) {
    let buy = Rc::new(RefCell::new(order_limit_buy));
    let sell = Rc::new(RefCell::new(order_limit_sell));
    cache.update_order(&buy);
    cache.update_order(&sell);
    assert_eq!(cache.orders_open().len(), 2);

    sell.borrow_mut().apply_fill(dec!(5), dec!(3100), STUB_TS_MS + 1);
    let open = cache.orders_open();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].borrow().id, OrderId::from("O-001"));
    assert_eq!(cache.stats().order_updates, 2);
}

#[rstest]
fn test_update_order_while_mutably_borrowed_is_skipped(mut cache: Cache, order_limit_buy: Order) {
    let order = Rc::new(RefCell::new(order_limit_buy));
    let _guard = order.borrow_mut();
    cache.update_order(&order);
    assert_eq!(cache.stats().order_updates, 0);
}

// -- NOTIFICATIONS -------------------------------------------------------------------------------

#[rstest]
fn test_no_notifications_when_disabled() {
    let (mut cache, recorder) = notifying_cache(CacheConfig::default());
    cache.update_quote(quote_btcusdt());
    cache.update_bar(bar_btcusdt_1h());

    assert!(!cache.is_notifying());
    assert!(recorder.is_empty());
}

#[rstest]
fn test_notification_topics(order_limit_buy: Order) {
    let (mut cache, recorder) = notifying_cache(CacheConfig::default().with_notifications());
    let order = Rc::new(RefCell::new(order_limit_buy));

    cache.update_orderbook(&snapshot_btcusdt());
    cache.update_quote(quote_btcusdt());
    cache.update_position(&position_long_btcusdt());
    cache.update_balance(balance_usdt());
    cache.update_bar(bar_btcusdt_1h());
    cache.update_order(&order);

    assert_eq!(
        recorder.topics(),
        vec![
            ORDERBOOK_UPDATE_TOPIC,
            QUOTE_UPDATE_TOPIC,
            POSITION_UPDATE_TOPIC,
            ACCOUNT_UPDATE_TOPIC,
            BAR_CLOSED_TOPIC,
            ORDER_UPDATE_TOPIC,
        ]
    );
}

#[rstest]
fn test_notification_timestamps_are_nanos() {
    let (mut cache, recorder) = notifying_cache(CacheConfig::default().with_notifications());
    cache.update_quote(quote_btcusdt());

    let events = recorder.events_on(QUOTE_UPDATE_TOPIC);
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].ts_event().as_u64(),
        STUB_TS_MS as u64 * 1_000_000
    );
}

#[rstest]
fn test_orderbook_notification_reflects_book() {
    let (mut cache, recorder) = notifying_cache(CacheConfig::default().with_notifications());
    cache.update_orderbook(&snapshot_btcusdt());

    match &recorder.events_on(ORDERBOOK_UPDATE_TOPIC)[0] {
        Event::OrderbookUpdate {
            best_bid,
            bid_levels,
            ask_levels,
            ..
        } => {
            assert_eq!(best_bid.map(|l| l.price), Some(dec!(50000)));
            assert_eq!(*bid_levels, 3);
            assert_eq!(*ask_levels, 2);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[rstest]
fn test_only_closed_bars_notify() {
    let (mut cache, recorder) = notifying_cache(CacheConfig::default().with_notifications());
    cache.update_bar(stub_bar(1_000, dec!(1), false));
    cache.update_bar(stub_bar(1_000, dec!(2), false));
    assert!(recorder.is_empty());

    cache.update_bar(stub_bar(1_000, dec!(3), true));
    assert_eq!(recorder.topics(), vec![BAR_CLOSED_TOPIC]);
}

#[rstest]
fn test_notifications_require_msgbus() {
    let mut cache = Cache::new(Some(CacheConfig::default().with_notifications()), None);
    assert!(!cache.is_notifying());
    cache.update_quote(quote_btcusdt());

    let msgbus = Rc::new(MessageBus::default());
    cache.register_msgbus(msgbus.clone());
    assert!(cache.is_notifying());
    cache.update_quote(quote_btcusdt());
    assert_eq!(msgbus.stats().events_published, 1);
}

// -- QUERY ENDPOINT ------------------------------------------------------------------------------

#[rstest]
fn test_cache_query_endpoint(order_limit_buy: Order) {
    let msgbus = MessageBus::default();
    let cache = Rc::new(RefCell::new(Cache::default()));
    register_cache_endpoint(&cache, &msgbus).unwrap();
    assert!(register_cache_endpoint(&cache, &msgbus).is_err());

    let order = Rc::new(RefCell::new(order_limit_buy));
    {
        let mut cache = cache.borrow_mut();
        cache.update_quote(quote_btcusdt());
        cache.update_orderbook(&snapshot_btcusdt());
        cache.update_bar(bar_btcusdt_1h());
        cache.update_order(&order);
    }

    let symbol = Symbol::from("BTC-USDT");
    let quote = msgbus
        .request(CACHE_QUERY_ENDPOINT, &Request::Quote { symbol })
        .unwrap();
    assert_eq!(quote, Response::Quote(Some(quote_btcusdt())));

    let book = msgbus
        .request(CACHE_QUERY_ENDPOINT, &Request::OrderBook { symbol })
        .unwrap();
    assert!(matches!(book, Response::OrderBook(Some(b)) if b.bids().len() == 3));

    let bar = msgbus
        .request(
            CACHE_QUERY_ENDPOINT,
            &Request::LastBar {
                symbol,
                timeframe: Timeframe::H1,
            },
        )
        .unwrap();
    assert_eq!(bar, Response::Bar(Some(bar_btcusdt_1h())));

    let cached_order = msgbus
        .request(
            CACHE_QUERY_ENDPOINT,
            &Request::Order {
                order_id: OrderId::from("O-001"),
            },
        )
        .unwrap();
    assert_eq!(cached_order, Response::Order(Some(*order.borrow())));

    let missing = msgbus
        .request(
            CACHE_QUERY_ENDPOINT,
            &Request::Position {
                symbol: Symbol::from("ETH-USDT"),
            },
        )
        .unwrap();
    assert_eq!(missing, Response::Position(None));
}

#[rstest]
fn test_cache_query_after_drop() {
    let msgbus = MessageBus::default();
    let cache = Rc::new(RefCell::new(Cache::default()));
    register_cache_endpoint(&cache, &msgbus).unwrap();
    drop(cache);

    let response = msgbus
        .request(
            CACHE_QUERY_ENDPOINT,
            &Request::Balance {
                currency: Currency::from("USDT"),
            },
        )
        .unwrap();
    assert!(response.is_error());
}

#[rstest]
fn test_cache_query_while_updating() {
    let msgbus = Rc::new(MessageBus::default());
    let cache = Rc::new(RefCell::new(Cache::new(
        Some(CacheConfig::default().with_notifications()),
        Some(msgbus.clone()),
    )));
    register_cache_endpoint(&cache, &msgbus).unwrap();

    let responses = Rc::new(RefCell::new(Vec::new()));
    let bus = Rc::downgrade(&msgbus);
    let saved = responses.clone();
    msgbus
        .subscribe(
            QUOTE_UPDATE_TOPIC,
            crate::msgbus::ShareableMessageHandler::from_fn(move |_, event| {
                let Some(bus) = bus.upgrade() else { return };
                let symbol = event.symbol().unwrap();
                let response = bus
                    .request(CACHE_QUERY_ENDPOINT, &Request::Quote { symbol })
                    .unwrap();
                saved.borrow_mut().push(response);
            }),
        )
        .unwrap();

    cache.borrow_mut().update_quote(quote_btcusdt());

    assert_eq!(responses.borrow().len(), 1);
    assert!(responses.borrow()[0].is_error());
}

proptest! {
    #[test]
    fn prop_quote_last_write_wins(
        writes in proptest::collection::vec((0usize..4, 1i64..1_000_000), 1..50),
    ) {
        let symbols = ["BTC-USDT", "ETH-USDT", "SOL-USDT", "XRP-USDT"];
        let mut cache = Cache::default();
        let mut expected: Vec<Option<Quote>> = vec![None; symbols.len()];

        for (index, bid) in writes {
            let quote = stub_quote(symbols[index], Decimal::from(bid), Decimal::from(bid + 1), bid);
            cache.update_quote(quote);
            expected[index] = Some(quote);
        }

        for (index, symbol) in symbols.iter().enumerate() {
            prop_assert_eq!(cache.quote(&Symbol::from(*symbol)).copied(), expected[index]);
        }
        let unique = expected.iter().filter(|q| q.is_some()).count();
        prop_assert_eq!(cache.quote_symbols().len(), unique);
    }
}
