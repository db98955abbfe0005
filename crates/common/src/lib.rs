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

//! Common componentry for the Meridian market data plane.
//!
//! The `meridian-common` crate provides the shared machinery every other component is
//! built on: the in-process [`msgbus::MessageBus`], the authoritative state
//! [`cache::Cache`], clocks, logging and configuration loading.
//!
//! Everything here is single-threaded. Components are shared as `Rc` handles and
//! message handlers run inline on the publishing thread.
//!
//! # Feature flags
//!
//! - `stubs`: Enables recording message handlers and other stubs for use in testing scenarios.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod cache;
pub mod clock;
pub mod config;
pub mod logging;
pub mod msgbus;
pub mod testing;
