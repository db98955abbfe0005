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

use std::{
    cell::{Cell, RefCell},
    fmt::Debug,
};

use indexmap::IndexMap;
use meridian_core::correctness::check_valid_topic;
use meridian_model::events::Event;
use serde::Serialize;
use ustr::Ustr;
use uuid::Uuid;

use super::{
    error::MessageBusError,
    handler::{ShareableCommandHandler, ShareableMessageHandler, ShareableRequestHandler},
    matching::{is_matching, wildcard_prefix},
    message::{Command, Request, Response},
};

/// Represents a subscription of a handler to a topic or pattern.
#[derive(Clone, Debug)]
pub struct Subscription {
    /// The shareable message handler for the subscription.
    pub handler: ShareableMessageHandler,
    /// Store a copy of the handler ID for faster equality checks.
    pub handler_id: Ustr,
    /// The topic or pattern as subscribed.
    pub pattern: Ustr,
}

impl Subscription {
    /// Creates a new [`Subscription`] instance.
    #[must_use]
    pub fn new(pattern: Ustr, handler: ShareableMessageHandler) -> Self {
        Self {
            handler_id: handler.id(),
            pattern,
            handler,
        }
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        wildcard_prefix(&self.pattern).is_some()
    }
}

impl PartialEq<Self> for Subscription {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.handler_id == other.handler_id
    }
}

impl Eq for Subscription {}

/// Message bus statistics.
///
/// `events_published`, `requests_handled` and `commands_sent` only ever increase.
/// `subscribers_count` and `endpoints_count` track the live registrations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MessageBusStats {
    pub events_published: u64,
    pub requests_handled: u64,
    pub commands_sent: u64,
    pub subscribers_count: usize,
    pub endpoints_count: usize,
}

/// A synchronous, single-threaded message bus.
///
/// The bus provides three independent interaction modes:
///
/// - **Pub/Sub**: handlers subscribe to a topic, or to a prefix pattern ending in `*`.
///   [`MessageBus::publish`] invokes every exact subscriber of the topic in
///   subscription order, then every matching pattern subscriber in subscription order.
/// - **Request/Response**: exactly one handler per named endpoint.
/// - **Command**: at most one global handler receives fire-and-forget commands.
///
/// All handlers run inline on the calling thread. The bus uses interior mutability and
/// is shared as `Rc<MessageBus>`; registries are never borrowed while a handler runs,
/// so handlers may publish, subscribe or unsubscribe re-entrantly.
pub struct MessageBus {
    /// The name for the message bus.
    pub name: String,
    /// The instance ID associated with the message bus.
    pub instance_id: Uuid,
    exact: RefCell<IndexMap<Ustr, Vec<Subscription>>>,
    wildcards: RefCell<Vec<Subscription>>,
    endpoints: RefCell<IndexMap<Ustr, ShareableRequestHandler>>,
    command_handler: RefCell<Option<ShareableCommandHandler>>,
    stats: Cell<MessageBusStats>,
}

impl MessageBus {
    /// Creates a new [`MessageBus`] instance.
    #[must_use]
    pub fn new(name: Option<String>) -> Self {
        Self {
            name: name.unwrap_or_else(|| stringify!(MessageBus).to_owned()),
            instance_id: Uuid::new_v4(),
            exact: RefCell::new(IndexMap::new()),
            wildcards: RefCell::new(Vec::new()),
            endpoints: RefCell::new(IndexMap::new()),
            command_handler: RefCell::new(None),
            stats: Cell::new(MessageBusStats::default()),
        }
    }

    // -- PUB/SUB ---------------------------------------------------------------------------------

    /// Subscribes `handler` to `topic`.
    ///
    /// A topic ending in `*` is a prefix pattern. Subscribing the same handler twice
    /// registers it twice, and it will be invoked twice per matching publish.
    ///
    /// # Errors
    ///
    /// Returns an error if `topic` is not a valid topic string.
    pub fn subscribe<T: AsRef<str>>(
        &self,
        topic: T,
        handler: ShareableMessageHandler,
    ) -> anyhow::Result<()> {
        let topic = topic.as_ref();
        check_valid_topic(topic, stringify!(topic))?;

        let pattern = Ustr::from(topic);
        let sub = Subscription::new(pattern, handler);
        log::debug!("Subscribing {} to '{pattern}'", sub.handler_id);

        if sub.is_wildcard() {
            self.wildcards.borrow_mut().push(sub);
        } else {
            self.exact.borrow_mut().entry(pattern).or_default().push(sub);
        }

        self.update_stats(|stats| stats.subscribers_count += 1);
        Ok(())
    }

    /// Unsubscribes `handler` from `topic`, returning the number of registrations removed.
    ///
    /// Every registration matching both the topic and the handler ID is removed.
    /// Unsubscribing a handler which was never subscribed is a no-op.
    pub fn unsubscribe<T: AsRef<str>>(&self, topic: T, handler: &ShareableMessageHandler) -> usize {
        let pattern = Ustr::from(topic.as_ref());
        let handler_id = handler.id();

        let removed = if wildcard_prefix(&pattern).is_some() {
            let mut wildcards = self.wildcards.borrow_mut();
            let before = wildcards.len();
            wildcards.retain(|sub| !(sub.pattern == pattern && sub.handler_id == handler_id));
            before - wildcards.len()
        } else {
            let mut exact = self.exact.borrow_mut();
            let Some(subs) = exact.get_mut(&pattern) else {
                return 0;
            };
            let before = subs.len();
            subs.retain(|sub| sub.handler_id != handler_id);
            let removed = before - subs.len();
            if subs.is_empty() {
                exact.shift_remove(&pattern);
            }
            removed
        };

        if removed > 0 {
            log::debug!("Unsubscribed {handler_id} from '{pattern}' ({removed})");
            self.update_stats(|stats| {
                stats.subscribers_count = stats.subscribers_count.saturating_sub(removed);
            });
        }
        removed
    }

    /// Publishes `event` to every handler matching `topic`.
    ///
    /// Exact subscribers run first, then pattern subscribers, each group in
    /// subscription order.
    pub fn publish<T: AsRef<str>>(&self, topic: T, event: &Event) {
        let topic = topic.as_ref();
        self.update_stats(|stats| stats.events_published += 1);

        let handlers = self.matching_handlers(topic);
        log::trace!(
            "Publishing {} on '{topic}' to {} handler(s)",
            event.name(),
            handlers.len()
        );

        for handler in &handlers {
            handler.0.handle(topic, event);
        }
    }

    /// Returns whether any handler would be invoked by publishing to `topic`.
    #[must_use]
    pub fn has_subscribers<T: AsRef<str>>(&self, topic: T) -> bool {
        self.subscriptions_count(topic) > 0
    }

    /// Returns the number of handler invocations a publish to `topic` would perform.
    #[must_use]
    pub fn subscriptions_count<T: AsRef<str>>(&self, topic: T) -> usize {
        let topic = topic.as_ref();
        let exact = self
            .exact
            .borrow()
            .get(&Ustr::from(topic))
            .map_or(0, Vec::len);
        let wildcard = self
            .wildcards
            .borrow()
            .iter()
            .filter(|sub| is_matching(topic, &sub.pattern))
            .count();
        exact + wildcard
    }

    /// Returns whether `handler` is subscribed to exactly `topic`.
    #[must_use]
    pub fn is_subscribed<T: AsRef<str>>(&self, topic: T, handler: &ShareableMessageHandler) -> bool {
        let pattern = Ustr::from(topic.as_ref());
        let handler_id = handler.id();
        let matches = |sub: &Subscription| sub.pattern == pattern && sub.handler_id == handler_id;

        if wildcard_prefix(&pattern).is_some() {
            self.wildcards.borrow().iter().any(matches)
        } else {
            self.exact
                .borrow()
                .get(&pattern)
                .is_some_and(|subs| subs.iter().any(matches))
        }
    }

    /// Returns the topics with at least one exact subscriber.
    #[must_use]
    pub fn topics(&self) -> Vec<Ustr> {
        self.exact.borrow().keys().copied().collect()
    }

    /// Returns the subscribed wildcard patterns, in subscription order.
    #[must_use]
    pub fn patterns(&self) -> Vec<Ustr> {
        self.wildcards.borrow().iter().map(|sub| sub.pattern).collect()
    }

    fn matching_handlers(&self, topic: &str) -> Vec<ShareableMessageHandler> {
        let mut handlers: Vec<ShareableMessageHandler> = self
            .exact
            .borrow()
            .get(&Ustr::from(topic))
            .map(|subs| subs.iter().map(|sub| sub.handler.clone()).collect())
            .unwrap_or_default();

        handlers.extend(
            self.wildcards
                .borrow()
                .iter()
                .filter(|sub| is_matching(topic, &sub.pattern))
                .map(|sub| sub.handler.clone()),
        );
        handlers
    }

    // -- REQUEST/RESPONSE ------------------------------------------------------------------------

    /// Registers `handler` as the single handler for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`MessageBusError::EndpointAlreadyRegistered`] if `endpoint` already has a handler.
    pub fn register<T: AsRef<str>>(
        &self,
        endpoint: T,
        handler: ShareableRequestHandler,
    ) -> Result<(), MessageBusError> {
        let endpoint = Ustr::from(endpoint.as_ref());
        let mut endpoints = self.endpoints.borrow_mut();
        if endpoints.contains_key(&endpoint) {
            return Err(MessageBusError::EndpointAlreadyRegistered(endpoint));
        }

        log::debug!("Registering endpoint '{endpoint}' with handler {}", handler.id());
        endpoints.insert(endpoint, handler);
        drop(endpoints);

        self.update_stats(|stats| stats.endpoints_count += 1);
        Ok(())
    }

    /// Removes the handler bound to `endpoint`, returning whether one was bound.
    pub fn unregister<T: AsRef<str>>(&self, endpoint: T) -> bool {
        let endpoint = Ustr::from(endpoint.as_ref());
        let removed = self.endpoints.borrow_mut().shift_remove(&endpoint).is_some();
        if removed {
            log::debug!("Unregistered endpoint '{endpoint}'");
            self.update_stats(|stats| {
                stats.endpoints_count = stats.endpoints_count.saturating_sub(1);
            });
        }
        removed
    }

    /// Sends `request` to the handler bound to `endpoint` and returns its response.
    ///
    /// # Errors
    ///
    /// Returns [`MessageBusError::EndpointNotFound`] if no handler is bound to `endpoint`.
    pub fn request<T: AsRef<str>>(
        &self,
        endpoint: T,
        request: &Request,
    ) -> Result<Response, MessageBusError> {
        let endpoint = Ustr::from(endpoint.as_ref());
        let handler = self
            .endpoints
            .borrow()
            .get(&endpoint)
            .cloned()
            .ok_or(MessageBusError::EndpointNotFound(endpoint))?;

        log::trace!("Request {request} to '{endpoint}'");
        let response = handler.0.handle(request);
        self.update_stats(|stats| stats.requests_handled += 1);
        Ok(response)
    }

    /// Returns whether a handler is bound to `endpoint`.
    #[must_use]
    pub fn is_registered<T: AsRef<str>>(&self, endpoint: T) -> bool {
        self.endpoints
            .borrow()
            .contains_key(&Ustr::from(endpoint.as_ref()))
    }

    /// Returns the registered endpoint names.
    #[must_use]
    pub fn endpoints(&self) -> Vec<Ustr> {
        self.endpoints.borrow().keys().copied().collect()
    }

    // -- COMMANDS --------------------------------------------------------------------------------

    /// Installs `handler` as the global command handler, replacing any previous one.
    pub fn set_command_handler(&self, handler: ShareableCommandHandler) {
        log::debug!("Setting command handler {}", handler.id());
        *self.command_handler.borrow_mut() = Some(handler);
    }

    /// Removes the global command handler.
    pub fn clear_command_handler(&self) {
        *self.command_handler.borrow_mut() = None;
    }

    #[must_use]
    pub fn has_command_handler(&self) -> bool {
        self.command_handler.borrow().is_some()
    }

    /// Sends `command` to the global command handler.
    ///
    /// Without a handler the command is dropped.
    pub fn send(&self, command: &Command) {
        self.update_stats(|stats| stats.commands_sent += 1);

        let handler = self.command_handler.borrow().clone();
        match handler {
            Some(handler) => handler.0.handle(command),
            None => log::trace!("No command handler, dropped {}", command.name()),
        }
    }

    // -- STATS -----------------------------------------------------------------------------------

    /// Returns a snapshot of the bus statistics.
    #[must_use]
    pub fn stats(&self) -> MessageBusStats {
        self.stats.get()
    }

    fn update_stats(&self, f: impl FnOnce(&mut MessageBusStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

impl Default for MessageBus {
    /// Creates a new default [`MessageBus`] instance.
    fn default() -> Self {
        Self::new(None)
    }
}

impl Debug for MessageBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(MessageBus))
            .field("name", &self.name)
            .field("instance_id", &self.instance_id)
            .field("topics", &self.topics())
            .field("patterns", &self.patterns())
            .field("endpoints", &self.endpoints())
            .field("stats", &self.stats())
            .finish()
    }
}
