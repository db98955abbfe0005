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

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for `DataEngine` instances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataEngineConfig {
    /// If the engine should reconnect after the provider disconnects.
    ///
    /// Reserved: carried for configuration compatibility but not acted upon.
    pub auto_reconnect: bool,
    /// The delay (milliseconds) between reconnection attempts. Reserved.
    pub reconnect_interval_ms: u64,
    /// The maximum number of reconnection attempts. Reserved.
    pub max_reconnect_attempts: u32,
    /// If incoming quotes are validated before being written to the cache.
    pub data_validation: bool,
    /// The directory holding historical candle CSV files.
    pub historical_data_dir: PathBuf,
}

impl Default for DataEngineConfig {
    fn default() -> Self {
        Self {
            auto_reconnect: false,
            reconnect_interval_ms: 5_000,
            max_reconnect_attempts: 3,
            data_validation: true,
            historical_data_dir: PathBuf::from("data"),
        }
    }
}

impl DataEngineConfig {
    /// Returns a copy of this config reading historical files from `dir`.
    #[must_use]
    pub fn with_historical_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.historical_data_dir = dir.into();
        self
    }

    /// Returns a copy of this config with quote validation switched on or off.
    #[must_use]
    pub const fn with_data_validation(mut self, data_validation: bool) -> Self {
        self.data_validation = data_validation;
        self
    }
}
