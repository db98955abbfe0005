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

//! The domain model for the Meridian market data plane.
//!
//! The `meridian-model` crate defines the value types that flow from data providers,
//! through the data engine and into the cache, and the [`events::Event`] union that is
//! published on the message bus. Prices and sizes are exact [`rust_decimal::Decimal`]
//! values, domain timestamps are UNIX milliseconds.
//!
//! # Feature flags
//!
//! - `stubs`: Enables type stubs (`rstest` fixtures) for use in testing scenarios.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]

mod macros;

pub mod accounts;
pub mod data;
pub mod enums;
pub mod events;
pub mod identifiers;
pub mod orderbook;
pub mod orders;
pub mod position;
pub mod types;

#[cfg(any(test, feature = "stubs"))]
pub mod stubs;
