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

//! Stub handlers for testing against the message bus.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use meridian_model::events::Event;

use super::{
    handler::{ShareableCommandHandler, ShareableMessageHandler, ShareableRequestHandler},
    message::{Command, Response},
};

/// Returns a handler which does nothing.
#[must_use]
pub fn get_stub_shareable_handler(id: Option<&str>) -> ShareableMessageHandler {
    match id {
        Some(id) => ShareableMessageHandler::with_id(id, |_, _| {}),
        None => ShareableMessageHandler::from_fn(|_, _| {}),
    }
}

/// Returns a handler together with a counter of its invocations.
#[must_use]
pub fn get_call_counting_handler(id: Option<&str>) -> (ShareableMessageHandler, Rc<Cell<usize>>) {
    let count = Rc::new(Cell::new(0));
    let counter = count.clone();
    let callback = move |_: &str, _: &Event| counter.set(counter.get() + 1);
    let handler = match id {
        Some(id) => ShareableMessageHandler::with_id(id, callback),
        None => ShareableMessageHandler::from_fn(callback),
    };
    (handler, count)
}

/// Records every `(topic, event)` pair delivered to its handler.
#[derive(Clone, Debug, Default)]
pub struct EventRecorder {
    received: Rc<RefCell<Vec<(String, Event)>>>,
}

impl EventRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handler appending into this recorder.
    #[must_use]
    pub fn handler(&self) -> ShareableMessageHandler {
        let received = self.received.clone();
        ShareableMessageHandler::from_fn(move |topic, event| {
            received.borrow_mut().push((topic.to_string(), event.clone()));
        })
    }

    /// Returns a copy of every recorded `(topic, event)` pair.
    #[must_use]
    pub fn received(&self) -> Vec<(String, Event)> {
        self.received.borrow().clone()
    }

    /// Returns the recorded topics in delivery order.
    #[must_use]
    pub fn topics(&self) -> Vec<String> {
        self.received
            .borrow()
            .iter()
            .map(|(topic, _)| topic.clone())
            .collect()
    }

    /// Returns the recorded events published on `topic`.
    #[must_use]
    pub fn events_on(&self, topic: &str) -> Vec<Event> {
        self.received
            .borrow()
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, event)| event.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.received.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.received.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.received.borrow_mut().clear();
    }
}

/// Returns a request handler which always answers [`Response::Ack`].
#[must_use]
pub fn get_ack_request_handler() -> ShareableRequestHandler {
    ShareableRequestHandler::from_fn(|_| Response::Ack)
}

/// Returns a command handler together with the list of commands it received.
#[must_use]
pub fn get_command_saving_handler() -> (ShareableCommandHandler, Rc<RefCell<Vec<Command>>>) {
    let saved = Rc::new(RefCell::new(Vec::new()));
    let sink = saved.clone();
    let handler = ShareableCommandHandler::from_fn(move |command| {
        sink.borrow_mut().push(command.clone());
    });
    (handler, saved)
}
