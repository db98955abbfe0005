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

//! Message handler functionality for the message bus system.
//!
//! Each interaction mode of the bus has its own handler trait: [`MessageHandler`] for
//! published events, [`RequestHandler`] for request/response endpoints and
//! [`CommandHandler`] for fire-and-forget commands. Handlers are identified by a
//! [`Ustr`] ID, which is how the bus matches them on unsubscribe.

use std::{fmt::Debug, rc::Rc};

use meridian_model::events::Event;
use ustr::Ustr;
use uuid::Uuid;

use super::message::{Command, Request, Response};

pub trait MessageHandler {
    /// Returns the unique identifier for this handler.
    fn id(&self) -> Ustr;
    /// Handles an `event` published on `topic`.
    fn handle(&self, topic: &str, event: &Event);
}

pub trait RequestHandler {
    /// Returns the unique identifier for this handler.
    fn id(&self) -> Ustr;
    /// Handles a request and produces its response.
    fn handle(&self, request: &Request) -> Response;
}

pub trait CommandHandler {
    /// Returns the unique identifier for this handler.
    fn id(&self) -> Ustr;
    /// Handles a command.
    fn handle(&self, command: &Command);
}

fn handler_id<S: AsRef<str>>(id: Option<S>) -> Ustr {
    id.map_or_else(generate_unique_handler_id, |s| Ustr::from(s.as_ref()))
}

fn generate_unique_handler_id() -> Ustr {
    Ustr::from(&Uuid::new_v4().to_string())
}

/// A [`MessageHandler`] backed by a closure.
pub struct TypedMessageHandler<F: Fn(&str, &Event) + 'static> {
    id: Ustr,
    callback: F,
}

impl<F: Fn(&str, &Event) + 'static> Debug for TypedMessageHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(TypedMessageHandler))
            .field("id", &self.id)
            .finish()
    }
}

impl<F: Fn(&str, &Event) + 'static> TypedMessageHandler<F> {
    /// Creates a new handler with an optional custom ID.
    pub fn new<S: AsRef<str>>(id: Option<S>, callback: F) -> Self {
        Self {
            id: handler_id(id),
            callback,
        }
    }

    /// Creates a new handler with an auto-generated ID.
    pub fn from(callback: F) -> Self {
        Self::new::<Ustr>(None, callback)
    }
}

impl<F: Fn(&str, &Event) + 'static> MessageHandler for TypedMessageHandler<F> {
    fn id(&self) -> Ustr {
        self.id
    }

    fn handle(&self, topic: &str, event: &Event) {
        (self.callback)(topic, event);
    }
}

/// A [`RequestHandler`] backed by a closure.
pub struct TypedRequestHandler<F: Fn(&Request) -> Response + 'static> {
    id: Ustr,
    callback: F,
}

impl<F: Fn(&Request) -> Response + 'static> Debug for TypedRequestHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(TypedRequestHandler))
            .field("id", &self.id)
            .finish()
    }
}

impl<F: Fn(&Request) -> Response + 'static> TypedRequestHandler<F> {
    /// Creates a new handler with an optional custom ID.
    pub fn new<S: AsRef<str>>(id: Option<S>, callback: F) -> Self {
        Self {
            id: handler_id(id),
            callback,
        }
    }
}

impl<F: Fn(&Request) -> Response + 'static> RequestHandler for TypedRequestHandler<F> {
    fn id(&self) -> Ustr {
        self.id
    }

    fn handle(&self, request: &Request) -> Response {
        (self.callback)(request)
    }
}

/// A [`CommandHandler`] backed by a closure.
pub struct TypedCommandHandler<F: Fn(&Command) + 'static> {
    id: Ustr,
    callback: F,
}

impl<F: Fn(&Command) + 'static> Debug for TypedCommandHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(TypedCommandHandler))
            .field("id", &self.id)
            .finish()
    }
}

impl<F: Fn(&Command) + 'static> TypedCommandHandler<F> {
    /// Creates a new handler with an optional custom ID.
    pub fn new<S: AsRef<str>>(id: Option<S>, callback: F) -> Self {
        Self {
            id: handler_id(id),
            callback,
        }
    }
}

impl<F: Fn(&Command) + 'static> CommandHandler for TypedCommandHandler<F> {
    fn id(&self) -> Ustr {
        self.id
    }

    fn handle(&self, command: &Command) {
        (self.callback)(command);
    }
}

#[derive(Clone)]
#[repr(transparent)]
pub struct ShareableMessageHandler(pub Rc<dyn MessageHandler>);

impl ShareableMessageHandler {
    /// Wraps `callback` in a shareable handler with an auto-generated ID.
    pub fn from_fn<F: Fn(&str, &Event) + 'static>(callback: F) -> Self {
        Self(Rc::new(TypedMessageHandler::from(callback)))
    }

    /// Wraps `callback` in a shareable handler with the given `id`.
    pub fn with_id<F: Fn(&str, &Event) + 'static>(id: &str, callback: F) -> Self {
        Self(Rc::new(TypedMessageHandler::new(Some(id), callback)))
    }

    #[must_use]
    pub fn id(&self) -> Ustr {
        self.0.id()
    }
}

impl From<Rc<dyn MessageHandler>> for ShareableMessageHandler {
    fn from(value: Rc<dyn MessageHandler>) -> Self {
        Self(value)
    }
}

impl Debug for ShareableMessageHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple(stringify!(ShareableMessageHandler))
            .field(&self.0.id())
            .finish()
    }
}

#[derive(Clone)]
#[repr(transparent)]
pub struct ShareableRequestHandler(pub Rc<dyn RequestHandler>);

impl ShareableRequestHandler {
    /// Wraps `callback` in a shareable handler with an auto-generated ID.
    pub fn from_fn<F: Fn(&Request) -> Response + 'static>(callback: F) -> Self {
        Self(Rc::new(TypedRequestHandler::new::<Ustr>(None, callback)))
    }

    #[must_use]
    pub fn id(&self) -> Ustr {
        self.0.id()
    }
}

impl Debug for ShareableRequestHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple(stringify!(ShareableRequestHandler))
            .field(&self.0.id())
            .finish()
    }
}

#[derive(Clone)]
#[repr(transparent)]
pub struct ShareableCommandHandler(pub Rc<dyn CommandHandler>);

impl ShareableCommandHandler {
    /// Wraps `callback` in a shareable handler with an auto-generated ID.
    pub fn from_fn<F: Fn(&Command) + 'static>(callback: F) -> Self {
        Self(Rc::new(TypedCommandHandler::new::<Ustr>(None, callback)))
    }

    #[must_use]
    pub fn id(&self) -> Ustr {
        self.0.id()
    }
}

impl Debug for ShareableCommandHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple(stringify!(ShareableCommandHandler))
            .field(&self.0.id())
            .finish()
    }
}
