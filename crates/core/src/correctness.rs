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

//! Functions for correctness checks similar to the *design by contract* philosophy.
//!
//! An [`anyhow::Result`] is returned with a descriptive message when the
//! condition check fails.

use anyhow::{Result, bail};

/// Message prefix of every failed correctness check.
pub const FAILED: &str = "Condition failed:";

/// Checks the `predicate` is true.
///
/// # Errors
///
/// Returns an error if `predicate` is false.
pub fn check_predicate_true(predicate: bool, fail_msg: &str) -> Result<()> {
    if !predicate {
        bail!("{FAILED} {fail_msg}")
    }
    Ok(())
}

/// Checks the string `s` is non-empty, not all whitespace and ASCII only.
///
/// # Errors
///
/// Returns an error if any of the conditions fail.
pub fn check_valid_string(s: &str, param: &str) -> Result<()> {
    if s.is_empty() {
        bail!("{FAILED} invalid string for '{param}', was empty")
    }
    if s.chars().all(char::is_whitespace) {
        bail!("{FAILED} invalid string for '{param}', was all whitespace")
    }
    if !s.is_ascii() {
        bail!("{FAILED} invalid string for '{param}' contained a non-ASCII char, was '{s}'")
    }
    Ok(())
}

/// Checks the message bus `topic` is well formed.
///
/// A topic is a valid string with no interior whitespace. A single `*` is only
/// permitted as the final character, where it marks a prefix pattern.
///
/// # Errors
///
/// Returns an error if the topic is malformed.
pub fn check_valid_topic(topic: &str, param: &str) -> Result<()> {
    check_valid_string(topic, param)?;
    if topic.chars().any(char::is_whitespace) {
        bail!("{FAILED} invalid topic for '{param}' contained whitespace, was '{topic}'")
    }
    if let Some(pos) = topic.find('*')
        && pos != topic.len() - 1
    {
        bail!("{FAILED} invalid topic for '{param}', '*' must be the final char, was '{topic}'")
    }
    Ok(())
}

/// Checks the `u64` value is positive (> 0).
///
/// # Errors
///
/// Returns an error if `value` is zero.
pub fn check_positive_u64(value: u64, param: &str) -> Result<()> {
    if value == 0 {
        bail!("{FAILED} invalid u64 for '{param}' not positive, was {value}")
    }
    Ok(())
}

/// Checks the `f64` value is finite and positive (> 0).
///
/// # Errors
///
/// Returns an error if `value` is not finite or not positive.
pub fn check_positive_f64(value: f64, param: &str) -> Result<()> {
    if !value.is_finite() {
        bail!("{FAILED} invalid f64 for '{param}', was {value}")
    }
    if value <= 0.0 {
        bail!("{FAILED} invalid f64 for '{param}' not positive, was {value}")
    }
    Ok(())
}

/// Checks the `i64` value is in the inclusive range [`l`, `r`].
///
/// # Errors
///
/// Returns an error if `value` is out of range.
pub fn check_in_range_inclusive_i64(value: i64, l: i64, r: i64, param: &str) -> Result<()> {
    if value < l || value > r {
        bail!("{FAILED} invalid i64 for '{param}' not in range [{l}, {r}], was {value}")
    }
    Ok(())
}
