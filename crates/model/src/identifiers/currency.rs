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

//! Represents a currency (or asset) code keying account balances.

use meridian_core::correctness::{FAILED, check_valid_string};
use ustr::Ustr;

use crate::macros::impl_identifier;

/// Represents a currency code such as `USDT` or `BTC`.
///
/// Codes are normalized to upper case on construction.
#[repr(C)]
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Currency(Ustr);

impl Currency {
    /// Creates a new [`Currency`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not a valid string or contains non-alphanumeric chars.
    pub fn new_checked<T: AsRef<str>>(value: T) -> anyhow::Result<Self> {
        let value = value.as_ref();
        check_valid_string(value, stringify!(value))?;
        if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
            anyhow::bail!("{FAILED} invalid currency code, was '{value}'");
        }
        Ok(Self(Ustr::from(&value.to_ascii_uppercase())))
    }

    /// Returns the currency code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl_identifier!(Currency);

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_code_is_uppercased() {
        assert_eq!(Currency::new("usdt").as_str(), "USDT");
        assert_eq!(Currency::new("usdt"), Currency::new("USDT"));
    }

    #[rstest]
    #[case("US-D")]
    #[case("")]
    fn test_invalid_codes(#[case] value: &str) {
        assert!(Currency::new_checked(value).is_err());
    }
}
