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

//! Historical candle replay and CSV candle loading for the [`DataEngine`].

use std::{
    fmt::Debug,
    path::{Path, PathBuf},
    str::FromStr,
    thread,
    time::{Duration, Instant},
};

use anyhow::Context;
use meridian_common::msgbus::switchboard::DATA_ENGINE_REPLAY_COMPLETE_TOPIC;
use meridian_core::datetime::normalize_timestamp_ms;
use meridian_model::{
    data::{Bar, DataMessage},
    enums::Timeframe,
    events::Event,
    identifiers::Symbol,
};
use rust_decimal::Decimal;

use super::DataEngine;

/// Base delay between replayed candles at a speed multiplier of 1.
const REPLAY_BASE_DELAY: Duration = Duration::from_millis(1);

/// Callback invoked once a replay has completed.
pub type ReplayCallback = Box<dyn FnOnce(&ReplayResult)>;

/// Configuration for a historical replay.
pub struct ReplayConfig {
    /// Pacing factor between candles, where zero (or less) replays as fast as possible.
    pub speed_multiplier: f64,
    /// Invoked with the result once every candle has been processed.
    pub on_complete: Option<ReplayCallback>,
}

impl ReplayConfig {
    /// Creates a new [`ReplayConfig`] instance.
    #[must_use]
    pub fn new(speed_multiplier: f64, on_complete: Option<ReplayCallback>) -> Self {
        Self {
            speed_multiplier,
            on_complete,
        }
    }

    /// Pause between candles, saturating at [`Duration::MAX`] for tiny multipliers.
    fn delay(&self) -> Option<Duration> {
        if !(self.speed_multiplier.is_finite() && self.speed_multiplier > 0.0) {
            return None;
        }
        let secs = REPLAY_BASE_DELAY.as_secs_f64() / self.speed_multiplier;
        Some(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self::new(0.0, None)
    }
}

impl Debug for ReplayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(ReplayConfig))
            .field("speed_multiplier", &self.speed_multiplier)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// The outcome of a historical replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayResult {
    /// The number of candles pushed through the engine.
    pub candles_replayed: usize,
    /// The wall-clock duration of the replay.
    pub duration: Duration,
}

impl DataEngine {
    /// Replays `candles` through the live candle path in the order given.
    ///
    /// The engine does not sort: callers wanting chronological processing must pass
    /// candles sorted by timestamp. With a positive speed multiplier the calling thread
    /// sleeps between consecutive candles.
    pub fn replay_historical_data(&mut self, candles: &[Bar], config: ReplayConfig) -> ReplayResult {
        log::info!("Replaying {} candles", candles.len());
        let delay = config.delay();
        let start = Instant::now();

        for (i, bar) in candles.iter().enumerate() {
            if i > 0
                && let Some(delay) = delay
            {
                thread::sleep(delay);
            }
            if let Err(e) = self.process_message(DataMessage::Candle(*bar)) {
                log::warn!("{e}");
            }
        }

        let result = ReplayResult {
            candles_replayed: candles.len(),
            duration: start.elapsed(),
        };
        log::info!(
            "Replay complete: {} candles in {:?}",
            result.candles_replayed,
            result.duration
        );

        if let Some(on_complete) = config.on_complete {
            on_complete(&result);
        }

        let ts = self.clock.timestamp_ns();
        self.msgbus.publish(
            DATA_ENGINE_REPLAY_COMPLETE_TOPIC,
            &Event::tick(result.candles_replayed as u64, ts),
        );
        result
    }

    /// Loads candles for the `symbol` and `timeframe` from the configured historical
    /// data directory, see [`load_historical_candles`].
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be read as CSV.
    pub fn load_historical_candles(
        &self,
        symbol: Symbol,
        timeframe: Timeframe,
        start_ms: i64,
        end_ms: i64,
    ) -> anyhow::Result<Vec<Bar>> {
        load_historical_candles(
            &self.config.historical_data_dir,
            symbol,
            timeframe,
            start_ms,
            end_ms,
        )
    }
}

/// Returns the CSV file path holding candles for the `symbol` and `timeframe`.
#[must_use]
pub fn historical_candles_path(dir: &Path, symbol: Symbol, timeframe: Timeframe) -> PathBuf {
    dir.join(format!("{symbol}_{}.csv", timeframe.tag()))
}

/// Loads closed candles from `<dir>/<symbol>_<timeframe>.csv`.
///
/// The file has a header row followed by `timestamp,open,high,low,close,volume`
/// records. Malformed or non-UTF-8 numeric fields read as zero, and timestamps are normalized to
/// milliseconds before filtering to `[start_ms, end_ms]` (inclusive).
///
/// A missing file yields no candles.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be opened or a record cannot be read.
pub fn load_historical_candles(
    dir: &Path,
    symbol: Symbol,
    timeframe: Timeframe,
    start_ms: i64,
    end_ms: i64,
) -> anyhow::Result<Vec<Bar>> {
    let path = historical_candles_path(dir, symbol, timeframe);
    if !path.exists() {
        log::debug!("No historical data at {}", path.display());
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(&path)
        .with_context(|| format!("failed to open '{}'", path.display()))?;

    let mut candles = Vec::new();
    for record in reader.byte_records() {
        let record = record.with_context(|| format!("failed to read '{}'", path.display()))?;
        let field = |i: usize| byte_field(&record, i);

        let timestamp = normalize_timestamp_ms(field(0).parse::<i64>().unwrap_or(0));
        if timestamp < start_ms || timestamp > end_ms {
            continue;
        }

        candles.push(Bar::new(
            symbol,
            timeframe,
            timestamp,
            parse_decimal_or_zero(field(1)),
            parse_decimal_or_zero(field(2)),
            parse_decimal_or_zero(field(3)),
            parse_decimal_or_zero(field(4)),
            parse_decimal_or_zero(field(5)),
            true,
        ));
    }

    log::info!(
        "Loaded {} {symbol} {timeframe} candles from {}",
        candles.len(),
        path.display()
    );
    Ok(candles)
}

// Non-UTF-8 fields read as empty so they fall back to zero.
fn byte_field(record: &csv::ByteRecord, i: usize) -> &str {
    record
        .get(i)
        .and_then(|bytes| std::str::from_utf8(bytes).ok())
        .unwrap_or_default()
}

fn parse_decimal_or_zero(s: &str) -> Decimal {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .unwrap_or(Decimal::ZERO)
}
