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

//! Value types for prices and quantities.
//!
//! Every price and size in the model is an exact [`Decimal`]. Addition, subtraction and
//! multiplication are exact; division goes through [`checked_div`] so that a zero divisor
//! is reported as [`ArithmeticError::DivisionByZero`] instead of panicking.

use rust_decimal::Decimal;

/// A price in quote currency units.
pub type Price = Decimal;

/// A quantity (size or volume) in base currency units.
pub type Quantity = Decimal;

/// Errors raised by decimal arithmetic.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("Division by zero: {0} / 0")]
    DivisionByZero(Decimal),
    #[error("Arithmetic overflow: {0} / {1}")]
    Overflow(Decimal, Decimal),
}

/// Divides `lhs` by `rhs`.
///
/// # Errors
///
/// Returns [`ArithmeticError::DivisionByZero`] if `rhs` is zero, or
/// [`ArithmeticError::Overflow`] if the result is not representable.
pub fn checked_div(lhs: Decimal, rhs: Decimal) -> Result<Decimal, ArithmeticError> {
    if rhs.is_zero() {
        return Err(ArithmeticError::DivisionByZero(lhs));
    }
    lhs.checked_div(rhs)
        .ok_or(ArithmeticError::Overflow(lhs, rhs))
}

/// Returns the midpoint of `a` and `b`.
#[must_use]
pub fn midpoint(a: Decimal, b: Decimal) -> Decimal {
    (a + b) / Decimal::TWO
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;

    #[rstest]
    fn test_checked_div() {
        assert_eq!(checked_div(dec!(10), dec!(4)), Ok(dec!(2.5)));
    }

    #[rstest]
    fn test_checked_div_by_zero() {
        assert_eq!(
            checked_div(dec!(1), Decimal::ZERO),
            Err(ArithmeticError::DivisionByZero(dec!(1)))
        );
    }

    #[rstest]
    fn test_midpoint() {
        assert_eq!(midpoint(dec!(50000), dec!(50010)), dec!(50005));
    }
}
