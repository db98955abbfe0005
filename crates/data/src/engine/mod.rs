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

//! Provides the `DataEngine`, which drives data ingestion for the platform.
//!
//! The engine owns the set of registered [`DataProvider`]s and routes everything
//! through a single active provider. Polling drains the provider and feeds every
//! message through one processing path: validate, write to the [`Cache`], then
//! publish on the [`MessageBus`]. Historical replay reuses the same path so
//! backtests and live sessions update state identically.

pub mod config;
pub mod error;
pub mod replay;


use std::{cell::RefCell, fmt::Debug, rc::Rc};

use indexmap::IndexMap;
use meridian_common::{
    cache::Cache,
    clock::Clock,
    msgbus::{
        Command, MessageBus,
        switchboard::{
            DATA_ENGINE_CONNECTED_TOPIC, DATA_ENGINE_DISCONNECTED_TOPIC, DATA_ENGINE_ERROR_TOPIC,
            DATA_ENGINE_STARTED_TOPIC, DATA_ENGINE_STOPPED_TOPIC, MARKET_DATA_CANDLE_TOPIC,
            MARKET_DATA_ORDERBOOK_TOPIC, MARKET_DATA_QUOTE_TOPIC, MARKET_DATA_TRADE_TOPIC,
        },
    },
};
use meridian_core::correctness::{check_predicate_true, check_valid_string};
use meridian_model::{
    data::{Bar, DataMessage, Quote, Trade},
    enums::{EngineState, ShutdownReason, SubscriptionType, Timeframe},
    events::Event,
    identifiers::Symbol,
    orderbook::OrderBookSnapshot,
};
use serde::Serialize;
use ustr::Ustr;

use self::{config::DataEngineConfig, error::DataEngineError};
use crate::client::{DataProvider, Subscription};

/// Message processing counters for a [`DataEngine`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DataEngineStats {
    /// The count of messages taken from providers or replay.
    pub messages_processed: u64,
    /// The count of quotes written to the cache.
    pub quotes_processed: u64,
    /// The count of order book snapshots written to the cache.
    pub orderbook_updates: u64,
    /// The count of trades published.
    pub trades_processed: u64,
    /// The count of candles written to the cache (forming and closed).
    pub candles_processed: u64,
    /// The count of rejected messages and provider-reported errors.
    pub errors: u64,
}

/// Provides the data ingestion engine for live and historical data.
pub struct DataEngine {
    clock: Rc<dyn Clock>,
    cache: Rc<RefCell<Cache>>,
    msgbus: Rc<MessageBus>,
    config: DataEngineConfig,
    providers: IndexMap<Ustr, Box<dyn DataProvider>>,
    active_provider: Option<Ustr>,
    subscriptions: IndexMap<Symbol, Subscription>,
    state: EngineState,
    stats: DataEngineStats,
}

impl Debug for DataEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(DataEngine))
            .field("config", &self.config)
            .field("providers", &self.provider_names())
            .field("active_provider", &self.active_provider)
            .field("subscriptions", &self.subscriptions.len())
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish()
    }
}

impl DataEngine {
    /// Creates a new [`DataEngine`] instance.
    #[must_use]
    pub fn new(
        clock: Rc<dyn Clock>,
        cache: Rc<RefCell<Cache>>,
        msgbus: Rc<MessageBus>,
        config: Option<DataEngineConfig>,
    ) -> Self {
        let config = config.unwrap_or_default();
        if config.auto_reconnect {
            log::warn!("`auto_reconnect` is set but reconnection is not performed by the engine");
        }

        Self {
            clock,
            cache,
            msgbus,
            config,
            providers: IndexMap::new(),
            active_provider: None,
            subscriptions: IndexMap::new(),
            state: EngineState::Stopped,
            stats: DataEngineStats::default(),
        }
    }

    // -- QUERIES ---------------------------------------------------------------------------------

    /// Returns a reference to the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &DataEngineConfig {
        &self.config
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> EngineState {
        self.state
    }

    /// Returns `true` if the engine is connected and processing data.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    /// Returns the current processing counters.
    #[must_use]
    pub const fn stats(&self) -> DataEngineStats {
        self.stats
    }

    /// Returns a shared handle to the cache the engine writes into.
    #[must_use]
    pub fn cache(&self) -> Rc<RefCell<Cache>> {
        self.cache.clone()
    }

    /// Returns the names of all registered providers in registration order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<Ustr> {
        self.providers.keys().copied().collect()
    }

    /// Returns the name of the active provider (if any).
    #[must_use]
    pub const fn active_provider_name(&self) -> Option<Ustr> {
        self.active_provider
    }

    /// Returns all active subscriptions in the order they were first made.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.subscriptions.values().copied().collect()
    }

    /// Returns the subscription for the `symbol` (if any).
    #[must_use]
    pub fn subscription(&self, symbol: &Symbol) -> Option<&Subscription> {
        self.subscriptions.get(symbol)
    }

    // -- PROVIDERS -------------------------------------------------------------------------------

    /// Registers the `provider` with the engine.
    ///
    /// The first provider registered becomes the active provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider name is invalid or already registered.
    pub fn add_provider(&mut self, provider: Box<dyn DataProvider>) -> anyhow::Result<()> {
        check_valid_string(provider.name(), "provider.name")?;
        let name = Ustr::from(provider.name());
        check_predicate_true(
            !self.providers.contains_key(&name),
            &format!("provider '{name}' already registered"),
        )?;

        log::info!("Registered provider {name}");
        self.providers.insert(name, provider);
        if self.active_provider.is_none() {
            self.active_provider = Some(name);
            log::info!("Active provider set to {name}");
        }
        Ok(())
    }

    /// Makes the registered provider `name` the active provider.
    ///
    /// # Errors
    ///
    /// Returns an error if no provider with that name is registered.
    pub fn set_active_provider(&mut self, name: &str) -> Result<(), DataEngineError> {
        let name = Ustr::from(name);
        if !self.providers.contains_key(&name) {
            return Err(DataEngineError::ProviderError(format!(
                "no provider registered as '{name}'"
            )));
        }
        self.active_provider = Some(name);
        log::info!("Active provider set to {name}");
        Ok(())
    }

    fn active_provider_mut(&mut self) -> Option<&mut Box<dyn DataProvider>> {
        let name = self.active_provider?;
        self.providers.get_mut(&name)
    }

    // -- LIFECYCLE -------------------------------------------------------------------------------

    /// Connects the active provider and starts the engine.
    ///
    /// Starting an engine which is already running does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no active provider or the connection fails, in which
    /// case the engine moves to `Failed`.
    pub fn start(&mut self) -> Result<(), DataEngineError> {
        if self.is_running() {
            log::debug!("Already running");
            return Ok(());
        }

        let Some(provider) = self.active_provider_mut() else {
            return Err(DataEngineError::ProviderError(
                "no active provider".to_string(),
            ));
        };
        let name = Ustr::from(provider.name());

        log::info!("Connecting to {name}");
        self.state = EngineState::Connecting;

        let result = self
            .active_provider_mut()
            .map_or(Ok(()), |provider| provider.connect());
        match result {
            Ok(()) => {
                self.state = EngineState::Running;
                log::info!("Running on {name}");
                let ts = self.clock.timestamp_ns();
                self.msgbus
                    .publish(DATA_ENGINE_STARTED_TOPIC, &Event::tick(0, ts));
                Ok(())
            }
            Err(e) => {
                self.state = EngineState::Failed;
                log::error!("Failed to connect to {name}: {e}");
                self.publish_error(format!("connect to {name} failed: {e}"));
                Err(DataEngineError::ProviderError(e.to_string()))
            }
        }
    }

    /// Disconnects the active provider and stops the engine.
    pub fn stop(&mut self) {
        if let Some(provider) = self.active_provider_mut() {
            provider.disconnect();
        }
        self.state = EngineState::Stopped;
        log::info!("Stopped");

        let ts = self.clock.timestamp_ns();
        self.msgbus.publish(
            DATA_ENGINE_STOPPED_TOPIC,
            &Event::shutdown(ShutdownReason::Requested, "data engine stopped", ts),
        );
    }

    // -- SUBSCRIPTIONS ---------------------------------------------------------------------------

    /// Subscribes to `subscription_type` data for the `symbol`.
    ///
    /// The subscription is recorded before it is forwarded to the active provider, and a
    /// later call for the same symbol replaces it.
    ///
    /// # Errors
    ///
    /// Returns [`DataEngineError::NotConnected`] with no active provider, or
    /// [`DataEngineError::SubscriptionFailed`] if the provider rejects it (the recorded
    /// subscription is kept).
    pub fn subscribe(
        &mut self,
        symbol: Symbol,
        subscription_type: SubscriptionType,
    ) -> Result<(), DataEngineError> {
        self.subscribe_with(Subscription::new(symbol, subscription_type, None))
    }

    /// Subscribes to `timeframe` candles for the `symbol`.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`DataEngine::subscribe`].
    pub fn subscribe_candles(
        &mut self,
        symbol: Symbol,
        timeframe: Timeframe,
    ) -> Result<(), DataEngineError> {
        self.subscribe_with(Subscription::candles(symbol, timeframe))
    }

    fn subscribe_with(&mut self, subscription: Subscription) -> Result<(), DataEngineError> {
        if self.active_provider.is_none() {
            return Err(DataEngineError::NotConnected);
        }

        self.subscriptions
            .insert(subscription.symbol, subscription);
        log::info!("Subscribing {subscription}");

        let result = self
            .active_provider_mut()
            .map_or(Ok(()), |provider| provider.subscribe(&subscription));
        result.map_err(|e| {
            log::error!("Subscription {subscription} failed: {e}");
            DataEngineError::SubscriptionFailed(e.to_string())
        })
    }

    /// Removes the subscription for the `symbol` and forwards the request to the active
    /// provider whether or not the symbol was subscribed.
    ///
    /// Returns `true` if a subscription was removed.
    pub fn unsubscribe(&mut self, symbol: &Symbol) -> bool {
        let removed = self.subscriptions.shift_remove(symbol).is_some();
        log::info!("Unsubscribing {symbol}");
        if let Some(provider) = self.active_provider_mut() {
            provider.unsubscribe(symbol);
        }
        removed
    }

    /// Executes the data related `command`, ignoring any other kind.
    ///
    /// # Errors
    ///
    /// Returns an error if a subscribe command fails.
    pub fn execute(&mut self, command: &Command) -> Result<(), DataEngineError> {
        match command {
            Command::Subscribe {
                symbol,
                subscription_type,
            } => self.subscribe(*symbol, *subscription_type),
            Command::Unsubscribe { symbol } => {
                self.unsubscribe(symbol);
                Ok(())
            }
            _ => {
                log::trace!("Ignoring command {}", command.name());
                Ok(())
            }
        }
    }

    // -- PROCESSING ------------------------------------------------------------------------------

    /// Drains the active provider, processing every message it yields in order.
    ///
    /// Rejected messages are counted in [`DataEngineStats::errors`] and do not stop
    /// the drain. Returns the number of messages taken from the provider.
    ///
    /// # Errors
    ///
    /// Returns [`DataEngineError::NotConnected`] if there is no active provider.
    pub fn poll(&mut self) -> Result<usize, DataEngineError> {
        if self.active_provider.is_none() {
            return Err(DataEngineError::NotConnected);
        }

        let mut count = 0;
        while let Some(message) = self.active_provider_mut().and_then(|p| p.poll()) {
            count += 1;
            if let Err(e) = self.process_message(message) {
                log::warn!("{e}");
            }
        }
        Ok(count)
    }

    /// Processes a single provider `message`.
    ///
    /// # Errors
    ///
    /// Returns [`DataEngineError::InvalidData`] if validation rejects the message.
    pub fn process_message(&mut self, message: DataMessage) -> Result<(), DataEngineError> {
        self.stats.messages_processed += 1;
        log::trace!("Processing {message}");

        match message {
            DataMessage::Quote(quote) => self.handle_quote(quote)?,
            DataMessage::OrderbookSnapshot(snapshot) => self.handle_orderbook(&snapshot),
            DataMessage::Trade(trade) => self.handle_trade(trade),
            DataMessage::Candle(bar) => self.handle_candle(bar),
            DataMessage::Error { code, message } => self.handle_provider_error(code, &message),
            DataMessage::Connected => self.handle_connected(),
            DataMessage::Disconnected => self.handle_disconnected(),
        }
        Ok(())
    }

    fn handle_quote(&mut self, quote: Quote) -> Result<(), DataEngineError> {
        if self.config.data_validation && quote.has_negative_price() {
            self.stats.errors += 1;
            return Err(DataEngineError::InvalidData(format!(
                "negative price in quote for {}: bid={} ask={}",
                quote.symbol, quote.bid, quote.ask
            )));
        }

        self.cache.borrow_mut().update_quote(quote);
        self.stats.quotes_processed += 1;
        self.msgbus
            .publish(MARKET_DATA_QUOTE_TOPIC, &Event::market_data(quote));
        Ok(())
    }

    fn handle_orderbook(&mut self, snapshot: &OrderBookSnapshot) {
        self.cache.borrow_mut().update_orderbook(snapshot);
        self.stats.orderbook_updates += 1;

        let event = self
            .cache
            .borrow()
            .orderbook(&snapshot.symbol)
            .map(Event::orderbook_update);
        if let Some(event) = event {
            self.msgbus.publish(MARKET_DATA_ORDERBOOK_TOPIC, &event);
        }
    }

    fn handle_trade(&mut self, trade: Trade) {
        self.stats.trades_processed += 1;
        self.msgbus
            .publish(MARKET_DATA_TRADE_TOPIC, &Event::trade(trade));
    }

    fn handle_candle(&mut self, bar: Bar) {
        self.cache.borrow_mut().update_bar(bar);
        self.stats.candles_processed += 1;
        if bar.is_closed {
            self.msgbus
                .publish(MARKET_DATA_CANDLE_TOPIC, &Event::candle(bar));
        }
    }

    fn handle_provider_error(&mut self, code: i32, message: &str) {
        self.stats.errors += 1;
        log::error!("Provider error {code}: {message}");
        self.publish_error(format!("provider error {code}: {message}"));
    }

    fn handle_connected(&mut self) {
        self.state = EngineState::Running;
        log::info!("Provider connected");
        let ts = self.clock.timestamp_ns();
        self.msgbus.publish(
            DATA_ENGINE_CONNECTED_TOPIC,
            &Event::tick(self.stats.messages_processed, ts),
        );
    }

    fn handle_disconnected(&mut self) {
        self.state = EngineState::Stopped;
        log::warn!("Provider disconnected");
        let ts = self.clock.timestamp_ns();
        self.msgbus.publish(
            DATA_ENGINE_DISCONNECTED_TOPIC,
            &Event::shutdown(ShutdownReason::Disconnected, "provider disconnected", ts),
        );
    }

    fn publish_error(&self, message: String) {
        let ts = self.clock.timestamp_ns();
        self.msgbus.publish(
            DATA_ENGINE_ERROR_TOPIC,
            &Event::shutdown(ShutdownReason::Fatal, message, ts),
        );
    }
}
