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

//! Common serialization traits and configuration loading.

use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Represents types which are serializable as JSON.
pub trait Serializable: Serialize + for<'de> Deserialize<'de> {
    /// Deserialize an object from JSON encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns serialization errors.
    fn from_json_bytes(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }

    /// Serialize an object to JSON encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns serialization errors.
    fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Serialize an object to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns serialization errors.
    fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Supported configuration file formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON document.
    Json,
    /// TOML document.
    Toml,
}

impl ConfigFormat {
    /// Infers the format from the file extension of `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is missing or unsupported.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            other => anyhow::bail!(
                "Unsupported config format for '{}': {other:?}",
                path.display()
            ),
        }
    }
}

/// Parses a configuration value of type `T` from `content` in the given `format`.
///
/// # Errors
///
/// Returns an error if the content fails to parse.
pub fn parse_config<T: DeserializeOwned>(content: &str, format: ConfigFormat) -> anyhow::Result<T> {
    match format {
        ConfigFormat::Json => serde_json::from_str(content).context("invalid JSON config"),
        ConfigFormat::Toml => toml::from_str(content).context("invalid TOML config"),
    }
}

/// Loads a configuration value of type `T` from a `.json` or `.toml` file.
///
/// Fields absent from the file take their `#[serde(default)]` values.
///
/// # Errors
///
/// Returns an error if the file cannot be read, has an unsupported extension,
/// or fails to parse.
pub fn load_config<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    parse_config(&content, format)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rstest::rstest;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(default)]
    struct SampleConfig {
        depth: usize,
        name: String,
    }

    impl Default for SampleConfig {
        fn default() -> Self {
            Self {
                depth: 10,
                name: "default".to_string(),
            }
        }
    }

    #[rstest]
    #[case("config.json", Some(ConfigFormat::Json))]
    #[case("config.TOML", Some(ConfigFormat::Toml))]
    #[case("config.yaml", None)]
    #[case("config", None)]
    fn test_format_from_path(#[case] path: &str, #[case] expected: Option<ConfigFormat>) {
        let result = ConfigFormat::from_path(&PathBuf::from(path)).ok();
        assert_eq!(result, expected);
    }

    #[rstest]
    fn test_parse_json_with_defaults() {
        let config: SampleConfig = parse_config(r#"{"depth": 25}"#, ConfigFormat::Json).unwrap();
        assert_eq!(config.depth, 25);
        assert_eq!(config.name, "default");
    }

    #[rstest]
    fn test_parse_toml() {
        let config: SampleConfig =
            parse_config("depth = 5\nname = \"book\"\n", ConfigFormat::Toml).unwrap();
        assert_eq!(
            config,
            SampleConfig {
                depth: 5,
                name: "book".to_string()
            }
        );
    }

    #[rstest]
    fn test_parse_invalid_json() {
        let result: anyhow::Result<SampleConfig> = parse_config("{", ConfigFormat::Json);
        assert!(result.is_err());
    }

    #[rstest]
    fn test_load_config_missing_file() {
        let result: anyhow::Result<SampleConfig> = load_config("/nonexistent/config.json");
        assert!(result.is_err());
    }
}
