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
    collections::HashMap,
    env,
    fmt::Display,
    str::FromStr,
    sync::mpsc::{Receiver, SendError, Sender, channel},
};

use chrono::SecondsFormat;
use log::{Level, LevelFilter, Log, STATIC_MAX_LEVEL, set_boxed_logger, set_max_level};
use meridian_core::{UnixNanos, datetime::unix_nanos_now};
use serde::Serialize;
use ustr::Ustr;

use crate::logging::writer::{LogWriter, StderrWriter, StdoutWriter};

const LOGGING: &str = "logging";

/// The environment variable holding a logger spec string.
pub const LOG_ENV_VAR: &str = "MERIDIAN_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Maximum log level to write to stdout.
    pub stdout_level: LevelFilter,
    /// Per-component log levels, allowing finer-grained control.
    component_level: HashMap<Ustr, LevelFilter>,
    /// If logger is using ANSI color codes.
    pub is_colored: bool,
    /// If the configuration should be printed to stdout at initialization.
    pub print_config: bool,
}

impl Default for LoggerConfig {
    /// Creates a new default [`LoggerConfig`] instance.
    fn default() -> Self {
        Self {
            stdout_level: LevelFilter::Info,
            component_level: HashMap::new(),
            is_colored: false,
            print_config: false,
        }
    }
}

impl LoggerConfig {
    /// Creates a new [`LoggerConfig`] instance.
    #[must_use]
    pub const fn new(
        stdout_level: LevelFilter,
        component_level: HashMap<Ustr, LevelFilter>,
        is_colored: bool,
        print_config: bool,
    ) -> Self {
        Self {
            stdout_level,
            component_level,
            is_colored,
            print_config,
        }
    }

    /// Parses a config from a spec string such as `"stdout=debug;cache=trace;is_colored"`.
    ///
    /// Keys other than `stdout` set the level for the component of that name.
    ///
    /// # Errors
    ///
    /// Returns an error if a pair is malformed or a level is unknown.
    pub fn from_spec(spec: &str) -> anyhow::Result<Self> {
        let mut config = Self::default();
        for kv in spec.split(';') {
            let kv = kv.trim();
            if kv.is_empty() {
                continue;
            }
            let kv_lower = kv.to_lowercase(); // For case-insensitive comparison
            if kv_lower == "is_colored" {
                config.is_colored = true;
            } else if kv_lower == "print_config" {
                config.print_config = true;
            } else {
                let Some((k, v)) = kv.split_once('=') else {
                    anyhow::bail!("Invalid spec pair: {kv}");
                };
                let (k, v) = (k.trim(), v.trim());
                let lvl = parse_level_filter(v)?;
                if k.eq_ignore_ascii_case("stdout") {
                    config.stdout_level = lvl;
                } else {
                    config.component_level.insert(Ustr::from(k), lvl);
                }
            }
        }
        Ok(config)
    }

    /// Retrieves the logger configuration from the "`MERIDIAN_LOG`" environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset or invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        let spec = env::var(LOG_ENV_VAR)?;
        Self::from_spec(&spec)
    }

    /// Returns the level filter configured for `component` (if any).
    #[must_use]
    pub fn component_level(&self, component: &str) -> Option<LevelFilter> {
        self.component_level.get(&Ustr::from(component)).copied()
    }

    /// Returns the most verbose level any output could accept.
    #[must_use]
    pub fn max_level(&self) -> LevelFilter {
        self.component_level
            .values()
            .copied()
            .fold(self.stdout_level.max(LevelFilter::Error), Ord::max)
    }
}

/// Parses a level name, accepting `warning` as an alias of `warn`.
///
/// # Errors
///
/// Returns an error if `s` is not a level name.
pub fn parse_level_filter(s: &str) -> anyhow::Result<LevelFilter> {
    let s = if s.eq_ignore_ascii_case("warning") {
        "warn"
    } else {
        s
    };
    LevelFilter::from_str(s).map_err(|_| anyhow::anyhow!("Invalid log level: {s}"))
}

/// A logger writing from a dedicated thread fed by an MPSC channel.
///
/// Records are tagged with a component derived from the `log` target, which is the
/// last segment of the emitting module path unless the call site sets a target.
#[derive(Debug)]
pub struct Logger {
    /// Configuration for logging levels and behavior.
    pub config: LoggerConfig,
    /// Transmitter for sending log events to the 'logging' thread.
    tx: Sender<LogEvent>,
}

/// Represents a type of log event.
#[derive(Debug)]
pub enum LogEvent {
    /// A log line event.
    Log(LogLine),
    /// A command to flush all logger buffers.
    Flush,
    /// A command to flush and stop the logging thread.
    Close,
}

/// Represents a log event which includes a message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogLine {
    /// The timestamp for the event.
    pub timestamp: UnixNanos,
    /// The log level for the event.
    pub level: Level,
    /// The component the log event originated from.
    pub component: Ustr,
    /// The log message content.
    pub message: String,
}

impl LogLine {
    /// Returns the line formatted for output, with ANSI colors when `is_colored`.
    #[must_use]
    pub fn format(&self, is_colored: bool) -> String {
        let ts = self
            .timestamp
            .to_datetime_utc()
            .to_rfc3339_opts(SecondsFormat::Nanos, true);
        if is_colored {
            format!(
                "\x1b[1m{ts}\x1b[0m {}[{}] {}: {}\x1b[0m\n",
                level_color(self.level),
                self.level,
                self.component,
                self.message,
            )
        } else {
            format!("{ts} [{}] {}: {}\n", self.level, self.component, self.message)
        }
    }
}

impl Display for LogLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.level, self.component, self.message)
    }
}

const fn level_color(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1b[1;31m",
        Level::Warn => "\x1b[1;33m",
        Level::Info => "",
        Level::Debug => "\x1b[94m",
        Level::Trace => "\x1b[90m",
    }
}

/// Returns the component name for a `log` target.
#[must_use]
pub fn component_from_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

impl Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        let component = component_from_target(metadata.target());
        match self.config.component_level(component) {
            Some(filter) => metadata.level() <= filter,
            None => metadata.level() == Level::Error || metadata.level() <= self.config.stdout_level,
        }
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let line = LogLine {
                timestamp: UnixNanos::new(unix_nanos_now()),
                level: record.level(),
                component: Ustr::from(component_from_target(record.target())),
                message: format!("{}", record.args()),
            };
            if let Err(SendError(LogEvent::Log(line))) = self.tx.send(LogEvent::Log(line)) {
                eprintln!("Error sending log event (receiver closed): {line}");
            }
        }
    }

    fn flush(&self) {
        if let Err(e) = self.tx.send(LogEvent::Flush) {
            eprintln!("Error sending flush log event (receiver closed): {e}");
        }
    }
}

impl Logger {
    /// Initializes the logger from the `MERIDIAN_LOG` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is invalid or a logger is already installed.
    pub fn init_with_env() -> anyhow::Result<LogGuard> {
        let config = LoggerConfig::from_env()?;
        Self::init_with_config(config)
    }

    /// Initializes the logger with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a logger is already installed or the thread fails to spawn.
    pub fn init_with_config(config: LoggerConfig) -> anyhow::Result<LogGuard> {
        let (tx, rx) = channel::<LogEvent>();
        let max_level = config.max_level();

        let logger = Self {
            tx: tx.clone(),
            config: config.clone(),
        };

        let print_config = config.print_config;
        if print_config {
            println!("STATIC_MAX_LEVEL={STATIC_MAX_LEVEL}");
            println!("Logger initialized with {config:?}");
        }

        if let Err(e) = set_boxed_logger(Box::new(logger)) {
            anyhow::bail!("Cannot initialize logger because of error: {e}");
        }

        let handle = std::thread::Builder::new()
            .name(LOGGING.to_string())
            .spawn(move || Self::handle_messages(&config, &rx))?;

        set_max_level(max_level);
        if print_config {
            println!("Logger set as `log` implementation with max level {max_level}");
        }

        Ok(LogGuard::new(Some(handle), Some(tx)))
    }

    fn handle_messages(config: &LoggerConfig, rx: &Receiver<LogEvent>) {
        let mut stdout_writer = StdoutWriter::new(config.stdout_level, config.is_colored);
        let mut stderr_writer = StderrWriter::new(config.is_colored);

        // Continue to receive and handle log events until closed or hung up
        while let Ok(event) = rx.recv() {
            match event {
                LogEvent::Log(line) => {
                    if stderr_writer.enabled(&line) {
                        stderr_writer.write(&line.format(stderr_writer.is_colored));
                    }
                    // Component overrides may admit lines below the stdout level
                    let component_enabled = config
                        .component_level(&line.component)
                        .is_some_and(|filter| line.level <= filter && line.level != Level::Error);
                    if stdout_writer.enabled(&line) || component_enabled {
                        stdout_writer.write(&line.format(stdout_writer.is_colored));
                    }
                }
                LogEvent::Flush => {
                    stdout_writer.flush();
                    stderr_writer.flush();
                }
                LogEvent::Close => break,
            }
        }

        stdout_writer.flush();
        stderr_writer.flush();
    }
}

/// Flushes and stops the logging thread when dropped.
#[derive(Debug, Default)]
pub struct LogGuard {
    handle: Option<std::thread::JoinHandle<()>>,
    tx: Option<Sender<LogEvent>>,
}

impl LogGuard {
    /// Creates a new [`LogGuard`] instance.
    #[must_use]
    pub const fn new(
        handle: Option<std::thread::JoinHandle<()>>,
        tx: Option<Sender<LogEvent>>,
    ) -> Self {
        Self { handle, tx }
    }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(LogEvent::Close);
        }
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            eprintln!("Error joining logging thread");
        }
    }
}
