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

//! The logging framework for Meridian systems.
//!
//! Components log through the `log` facade. Installing a [`logger::Logger`] routes
//! those records to stdout and stderr from a dedicated thread.

pub mod logger;
pub mod writer;

use std::sync::atomic::{AtomicBool, Ordering};

use self::logger::{LogGuard, Logger, LoggerConfig};

static LOGGING_INITIALIZED: AtomicBool = AtomicBool::new(false);
static LOGGING_COLORED: AtomicBool = AtomicBool::new(false);

/// Returns whether the core logger is enabled.
pub fn logging_is_initialized() -> bool {
    LOGGING_INITIALIZED.load(Ordering::Relaxed)
}

/// Returns whether the installed logger writes ANSI colors.
pub fn logging_is_colored() -> bool {
    LOGGING_COLORED.load(Ordering::Relaxed)
}

/// Initialize logging.
///
/// Logging should only be initialized once, which is why a second call fails.
/// The returned [`LogGuard`] must be kept alive for the lifetime of the application;
/// dropping it flushes and stops the logging thread.
///
/// # Errors
///
/// Returns an error if a logger is already installed.
pub fn init_logging(config: LoggerConfig) -> anyhow::Result<LogGuard> {
    let is_colored = config.is_colored;
    let guard = Logger::init_with_config(config)?;
    LOGGING_INITIALIZED.store(true, Ordering::Relaxed);
    LOGGING_COLORED.store(is_colored, Ordering::Relaxed);
    Ok(guard)
}

/// Initialize logging from the `MERIDIAN_LOG` environment variable, falling back to
/// the default configuration when it is unset.
///
/// # Errors
///
/// Returns an error if the variable is invalid or a logger is already installed.
pub fn init_logging_from_env() -> anyhow::Result<LogGuard> {
    let config = match std::env::var(logger::LOG_ENV_VAR) {
        Ok(_) => LoggerConfig::from_env()?,
        Err(_) => LoggerConfig::default(),
    };
    init_logging(config)
}
