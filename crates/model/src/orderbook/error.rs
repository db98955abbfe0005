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

//! Errors associated with order book operations.

use rust_decimal::Decimal;

use crate::enums::BookSide;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    #[error("Invalid book operation: price must be positive, was {1} on {0} side")]
    InvalidPrice(BookSide, Decimal),
    #[error("Invalid book operation: size must not be negative, was {1} on {0} side")]
    NegativeSize(BookSide, Decimal),
}
