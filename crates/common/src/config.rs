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

//! Configuration loading for Meridian components.
//!
//! Component configs (`CacheConfig`, `DataEngineConfig`) derive `serde` with
//! `#[serde(default)]`, so a file may set any subset of fields.

pub use meridian_core::serialization::{ConfigFormat, load_config, parse_config};

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;

    use super::*;
    use crate::cache::CacheConfig;

    #[rstest]
    fn test_load_cache_config_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "enable_notifications = true").unwrap();
        writeln!(file, "max_bars_per_series = 200").unwrap();

        let config: CacheConfig = load_config(file.path()).unwrap();
        assert_eq!(config, CacheConfig::new(200, 60_000, true));
    }

    #[rstest]
    fn test_load_cache_config_from_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"quote_expiry_ms": 1500}}"#).unwrap();

        let config: CacheConfig = load_config(file.path()).unwrap();
        assert_eq!(config.quote_expiry_ms, 1_500);
        assert_eq!(config.max_bars_per_series, 1_000);
    }

    #[rstest]
    fn test_load_config_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let result: anyhow::Result<CacheConfig> = load_config(file.path());
        assert!(result.is_err());
    }
}
