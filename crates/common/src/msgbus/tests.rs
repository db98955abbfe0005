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

use std::{cell::RefCell, rc::Rc};

use meridian_core::UnixNanos;
use meridian_model::{
    events::Event,
    identifiers::Symbol,
    stubs::{quote_btcusdt, stub_quote},
};
use proptest::prelude::*;
use rstest::{fixture, rstest};
use rust_decimal_macros::dec;
use ustr::Ustr;

use super::{
    Command, MessageBus, MessageBusError, Request, Response, ShareableMessageHandler,
    ShareableRequestHandler,
    stubs::{
        EventRecorder, get_ack_request_handler, get_call_counting_handler,
        get_command_saving_handler, get_stub_shareable_handler,
    },
};

#[fixture]
fn msgbus() -> MessageBus {
    MessageBus::default()
}

fn tick(n: u64) -> Event {
    Event::tick(n, UnixNanos::new(n))
}

#[rstest]
fn test_new(msgbus: MessageBus) {
    assert_eq!(msgbus.name, stringify!(MessageBus));
    assert!(msgbus.topics().is_empty());
    assert!(msgbus.patterns().is_empty());
    assert!(msgbus.endpoints().is_empty());
    assert!(!msgbus.has_command_handler());
    assert_eq!(msgbus.stats(), Default::default());
}

#[rstest]
fn test_subscribe_rejects_invalid_topic(msgbus: MessageBus) {
    let handler = get_stub_shareable_handler(None);
    assert!(msgbus.subscribe("", handler.clone()).is_err());
    assert!(msgbus.subscribe("bad topic", handler.clone()).is_err());
    assert!(msgbus.subscribe("*.quote", handler).is_err());
    assert_eq!(msgbus.stats().subscribers_count, 0);
}

#[rstest]
fn test_exact_subscription_receives_only_its_topic(msgbus: MessageBus) {
    let recorder = EventRecorder::new();
    msgbus
        .subscribe("market_data.quote", recorder.handler())
        .unwrap();

    msgbus.publish("market_data.quote", &tick(1));
    msgbus.publish("market_data.quotes", &tick(2));
    msgbus.publish("market_data", &tick(3));

    assert_eq!(recorder.topics(), vec!["market_data.quote"]);
}

#[rstest]
fn test_wildcard_scenario(msgbus: MessageBus) {
    let (handler, count) = get_call_counting_handler(None);
    msgbus.subscribe("order.*", handler).unwrap();

    msgbus.publish("order.filled", &tick(1));
    msgbus.publish("order.rejected", &tick(2));
    assert_eq!(count.get(), 2);

    msgbus.publish("position.opened", &tick(3));
    assert_eq!(count.get(), 2);
}

#[rstest]
fn test_wildcard_does_not_match_bare_prefix(msgbus: MessageBus) {
    let (handler, count) = get_call_counting_handler(None);
    msgbus.subscribe("a.*", handler).unwrap();

    msgbus.publish("a", &tick(1));
    msgbus.publish("ab", &tick(2));
    msgbus.publish("a.b.c", &tick(3));

    assert_eq!(count.get(), 1);
}

#[rstest]
fn test_exact_handlers_run_before_wildcards(msgbus: MessageBus) {
    let order = Rc::new(RefCell::new(Vec::new()));
    let make = |label: &'static str| {
        let order = order.clone();
        ShareableMessageHandler::from_fn(move |_, _| order.borrow_mut().push(label))
    };

    msgbus.subscribe("market_data.*", make("wild-1")).unwrap();
    msgbus.subscribe("market_data.trade", make("exact-1")).unwrap();
    msgbus.subscribe("*", make("wild-2")).unwrap();
    msgbus.subscribe("market_data.trade", make("exact-2")).unwrap();

    msgbus.publish("market_data.trade", &tick(1));

    assert_eq!(
        *order.borrow(),
        vec!["exact-1", "exact-2", "wild-1", "wild-2"]
    );
}

#[rstest]
fn test_publish_delivers_topic_and_event(msgbus: MessageBus) {
    let recorder = EventRecorder::new();
    msgbus.subscribe("market_data.*", recorder.handler()).unwrap();

    let event = Event::market_data(quote_btcusdt());
    msgbus.publish("market_data.quote", &event);

    assert_eq!(
        recorder.received(),
        vec![("market_data.quote".to_string(), event)]
    );
}

#[rstest]
fn test_unsubscribe_removes_all_identical_registrations(msgbus: MessageBus) {
    let (handler, count) = get_call_counting_handler(Some("dup"));
    msgbus.subscribe("topic.a", handler.clone()).unwrap();
    msgbus.subscribe("topic.a", handler.clone()).unwrap();
    assert_eq!(msgbus.stats().subscribers_count, 2);

    msgbus.publish("topic.a", &tick(1));
    assert_eq!(count.get(), 2);

    assert_eq!(msgbus.unsubscribe("topic.a", &handler), 2);
    msgbus.publish("topic.a", &tick(2));
    assert_eq!(count.get(), 2);
    assert_eq!(msgbus.stats().subscribers_count, 0);
    assert!(msgbus.topics().is_empty());
}

#[rstest]
fn test_unsubscribe_keeps_other_handlers(msgbus: MessageBus) {
    let (h1, c1) = get_call_counting_handler(None);
    let (h2, c2) = get_call_counting_handler(None);
    msgbus.subscribe("order.*", h1.clone()).unwrap();
    msgbus.subscribe("order.*", h2).unwrap();

    assert_eq!(msgbus.unsubscribe("order.*", &h1), 1);
    msgbus.publish("order.filled", &tick(1));

    assert_eq!(c1.get(), 0);
    assert_eq!(c2.get(), 1);
    assert_eq!(msgbus.patterns(), vec![Ustr::from("order.*")]);
}

#[rstest]
fn test_unsubscribe_unknown_is_noop(msgbus: MessageBus) {
    let handler = get_stub_shareable_handler(None);
    assert_eq!(msgbus.unsubscribe("never.subscribed", &handler), 0);
    assert_eq!(msgbus.unsubscribe("never.*", &handler), 0);
    assert_eq!(msgbus.stats().subscribers_count, 0);
}

#[rstest]
fn test_has_subscribers_agrees_with_publish(msgbus: MessageBus) {
    msgbus
        .subscribe("data_engine.*", get_stub_shareable_handler(None))
        .unwrap();
    msgbus
        .subscribe("quote.update", get_stub_shareable_handler(None))
        .unwrap();

    assert!(msgbus.has_subscribers("data_engine.started"));
    assert!(msgbus.has_subscribers("quote.update"));
    assert!(!msgbus.has_subscribers("data_engine"));
    assert!(!msgbus.has_subscribers("bar.closed"));
    assert_eq!(msgbus.subscriptions_count("data_engine.stopped"), 1);
}

#[rstest]
fn test_is_subscribed(msgbus: MessageBus) {
    let handler = get_stub_shareable_handler(Some("h"));
    msgbus.subscribe("order.*", handler.clone()).unwrap();

    assert!(msgbus.is_subscribed("order.*", &handler));
    assert!(!msgbus.is_subscribed("order.filled", &handler));
}

#[rstest]
fn test_handler_can_resubscribe_during_publish() {
    let msgbus = Rc::new(MessageBus::default());
    let (inner, inner_count) = get_call_counting_handler(None);

    let bus = Rc::downgrade(&msgbus);
    let outer = ShareableMessageHandler::from_fn(move |_, _| {
        if let Some(bus) = bus.upgrade() {
            bus.subscribe("late.topic", inner.clone()).unwrap();
            bus.publish("late.topic", &tick(99));
        }
    });
    msgbus.subscribe("trigger", outer).unwrap();
    msgbus.publish("trigger", &tick(1));

    assert_eq!(inner_count.get(), 1);
    assert_eq!(msgbus.stats().events_published, 2);
}

#[rstest]
fn test_events_published_counts_every_publish(msgbus: MessageBus) {
    msgbus.publish("nobody.listening", &tick(1));
    msgbus.publish("nobody.listening", &tick(2));
    assert_eq!(msgbus.stats().events_published, 2);
}

#[rstest]
fn test_request_without_endpoint_fails(msgbus: MessageBus) {
    let request = Request::Quote {
        symbol: Symbol::from("BTC-USDT"),
    };
    assert_eq!(
        msgbus.request("cache.query", &request),
        Err(MessageBusError::EndpointNotFound(Ustr::from("cache.query")))
    );
    assert_eq!(msgbus.stats().requests_handled, 0);
}

#[rstest]
fn test_register_twice_fails(msgbus: MessageBus) {
    msgbus
        .register("svc", get_ack_request_handler())
        .unwrap();
    assert_eq!(
        msgbus.register("svc", get_ack_request_handler()),
        Err(MessageBusError::EndpointAlreadyRegistered(Ustr::from("svc")))
    );
    assert_eq!(msgbus.stats().endpoints_count, 1);
}

#[rstest]
fn test_request_response(msgbus: MessageBus) {
    let handler = ShareableRequestHandler::from_fn(|request| match request {
        Request::Quote { symbol } => Response::Quote(Some(stub_quote(
            symbol.as_str(),
            dec!(1),
            dec!(2),
            0,
        ))),
        _ => Response::Error("unsupported".to_string()),
    });
    msgbus.register("quotes", handler).unwrap();

    let response = msgbus
        .request(
            "quotes",
            &Request::Quote {
                symbol: Symbol::from("ETH-USDT"),
            },
        )
        .unwrap();

    match response {
        Response::Quote(Some(quote)) => assert_eq!(quote.symbol, Symbol::from("ETH-USDT")),
        other => panic!("unexpected response {other:?}"),
    }
    assert_eq!(msgbus.stats().requests_handled, 1);
}

#[rstest]
fn test_unregister(msgbus: MessageBus) {
    msgbus.register("svc", get_ack_request_handler()).unwrap();
    assert!(msgbus.is_registered("svc"));

    assert!(msgbus.unregister("svc"));
    assert!(!msgbus.unregister("svc"));
    assert!(!msgbus.is_registered("svc"));
    assert_eq!(msgbus.stats().endpoints_count, 0);

    // Endpoint can be bound again once cleared
    msgbus.register("svc", get_ack_request_handler()).unwrap();
    assert_eq!(msgbus.endpoints(), vec![Ustr::from("svc")]);
}

#[rstest]
fn test_send_without_handler_is_dropped(msgbus: MessageBus) {
    msgbus.send(&Command::Shutdown {
        reason: "test".to_string(),
    });
    assert_eq!(msgbus.stats().commands_sent, 1);
}

#[rstest]
fn test_send_with_handler(msgbus: MessageBus) {
    let (handler, saved) = get_command_saving_handler();
    msgbus.set_command_handler(handler);
    assert!(msgbus.has_command_handler());

    let command = Command::Unsubscribe {
        symbol: Symbol::from("BTC-USDT"),
    };
    msgbus.send(&command);
    assert_eq!(*saved.borrow(), vec![command.clone()]);

    msgbus.clear_command_handler();
    msgbus.send(&command);
    assert_eq!(saved.borrow().len(), 1);
    assert_eq!(msgbus.stats().commands_sent, 2);
}

#[rstest]
fn test_set_command_handler_replaces_previous(msgbus: MessageBus) {
    let (first, first_saved) = get_command_saving_handler();
    let (second, second_saved) = get_command_saving_handler();
    msgbus.set_command_handler(first);
    msgbus.set_command_handler(second);

    msgbus.send(&Command::CancelAllOrders { symbol: None });

    assert!(first_saved.borrow().is_empty());
    assert_eq!(second_saved.borrow().len(), 1);
}

proptest! {
    #[test]
    fn prop_wildcard_subscription_matches_prefix(
        prefix in "[a-z]{1,6}\\.",
        suffix in "[a-z.]{0,8}",
        other in "[a-z]{1,6}",
    ) {
        let msgbus = MessageBus::default();
        let (handler, count) = get_call_counting_handler(None);
        msgbus.subscribe(format!("{prefix}*"), handler).unwrap();

        let topic = format!("{prefix}{suffix}");
        msgbus.publish(&topic, &tick(1));
        prop_assert_eq!(count.get(), 1);

        let expected = usize::from(other.starts_with(&prefix));
        msgbus.publish(&other, &tick(2));
        prop_assert_eq!(count.get(), 1 + expected);
        prop_assert_eq!(msgbus.has_subscribers(&other), expected == 1);
    }
}
