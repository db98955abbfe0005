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

//! Data provider abstraction.
//!
//! A [`DataProvider`] is the seam between the engine and a concrete market data source
//! (an exchange connection, a file reader or a test mock). The engine never performs
//! I/O itself, it only drives a provider through this trait.

use std::fmt::{Debug, Display};

use meridian_model::{
    data::DataMessage,
    enums::{SubscriptionType, Timeframe},
    identifiers::Symbol,
};
use serde::{Deserialize, Serialize};

/// A market data subscription for one symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subscription {
    /// The subscribed symbol.
    pub symbol: Symbol,
    /// The kind of data subscribed to.
    pub subscription_type: SubscriptionType,
    /// The candle timeframe, set for candle subscriptions only.
    pub timeframe: Option<Timeframe>,
}

impl Subscription {
    /// Creates a new [`Subscription`] instance.
    #[must_use]
    pub const fn new(
        symbol: Symbol,
        subscription_type: SubscriptionType,
        timeframe: Option<Timeframe>,
    ) -> Self {
        Self {
            symbol,
            subscription_type,
            timeframe,
        }
    }

    /// Creates a new candle [`Subscription`] for the `timeframe`.
    #[must_use]
    pub const fn candles(symbol: Symbol, timeframe: Timeframe) -> Self {
        Self::new(symbol, SubscriptionType::Candle, Some(timeframe))
    }
}

impl Display for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.timeframe {
            Some(timeframe) => write!(f, "{}:{}:{timeframe}", self.symbol, self.subscription_type),
            None => write!(f, "{}:{}", self.symbol, self.subscription_type),
        }
    }
}

/// A source of market data driven by the `DataEngine`.
///
/// Implementations must never block in [`DataProvider::poll`]: it returns the next
/// queued message or `None` when nothing is pending.
pub trait DataProvider: Debug {
    /// Returns the unique provider name.
    fn name(&self) -> &str;

    /// Opens the connection to the data source.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    fn connect(&mut self) -> anyhow::Result<()>;

    /// Closes the connection to the data source.
    fn disconnect(&mut self);

    /// Returns `true` if the provider currently holds an open connection.
    fn is_connected(&self) -> bool;

    /// Starts streaming data for the `subscription`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source rejects the subscription.
    fn subscribe(&mut self, subscription: &Subscription) -> anyhow::Result<()>;

    /// Stops streaming data for the `symbol`.
    fn unsubscribe(&mut self, symbol: &Symbol);

    /// Returns the next pending message, or `None` when nothing is queued.
    fn poll(&mut self) -> Option<DataMessage>;
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_subscription_display() {
        let symbol = Symbol::from("BTC-USDT");
        assert_eq!(
            Subscription::new(symbol, SubscriptionType::Quote, None).to_string(),
            "BTC-USDT:quote"
        );
        assert_eq!(
            Subscription::candles(symbol, Timeframe::H4).to_string(),
            "BTC-USDT:candle:4h"
        );
    }

    #[rstest]
    fn test_subscription_serde() {
        let subscription = Subscription::candles(Symbol::from("ETH-USDT"), Timeframe::M5);
        let json = serde_json::to_string(&subscription).unwrap();
        assert_eq!(
            json,
            r#"{"symbol":"ETH-USDT","subscription_type":"candle","timeframe":"5m"}"#
        );
    }
}
