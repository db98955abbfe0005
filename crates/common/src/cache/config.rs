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

use meridian_model::data::DEFAULT_MAX_BARS;
use serde::{Deserialize, Serialize};

/// Configuration for `Cache` instances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// The maximum number of bars retained per symbol and timeframe.
    pub max_bars_per_series: usize,
    /// The age (milliseconds) beyond which a cached quote is considered expired.
    pub quote_expiry_ms: u64,
    /// If every cache mutation should be announced on the message bus.
    pub enable_notifications: bool,
}

impl Default for CacheConfig {
    /// Creates a new default [`CacheConfig`] instance.
    fn default() -> Self {
        Self {
            max_bars_per_series: DEFAULT_MAX_BARS,
            quote_expiry_ms: 60_000,
            enable_notifications: false,
        }
    }
}

impl CacheConfig {
    /// Creates a new [`CacheConfig`] instance.
    #[must_use]
    pub const fn new(
        max_bars_per_series: usize,
        quote_expiry_ms: u64,
        enable_notifications: bool,
    ) -> Self {
        Self {
            max_bars_per_series,
            quote_expiry_ms,
            enable_notifications,
        }
    }

    /// Returns a copy of this config with notifications switched on.
    #[must_use]
    pub const fn with_notifications(mut self) -> Self {
        self.enable_notifications = true;
        self
    }
}
