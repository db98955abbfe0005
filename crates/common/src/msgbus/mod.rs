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

//! An in-memory `MessageBus` supporting three messaging patterns:
//!
//! - Pub/Sub (exact topics and `*` prefix patterns)
//! - Request/Response (named endpoints)
//! - Fire-and-forget commands

pub mod core;
pub mod error;
pub mod handler;
pub mod matching;
pub mod message;
pub mod switchboard;

#[cfg(any(test, feature = "stubs"))]
pub mod stubs;

#[cfg(test)]
mod tests;

// Re-exports
pub use crate::msgbus::{
    core::{MessageBus, MessageBusStats, Subscription},
    error::MessageBusError,
    handler::{
        CommandHandler, MessageHandler, RequestHandler, ShareableCommandHandler,
        ShareableMessageHandler, ShareableRequestHandler, TypedCommandHandler,
        TypedMessageHandler, TypedRequestHandler,
    },
    message::{Command, Request, Response},
};
