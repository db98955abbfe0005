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

//! Mock data provider implementations.
//!
//! Provides a `MockDataProvider` whose queue and call log are shared with the test
//! through a [`MockProviderState`] handle, so a test can keep feeding the provider after
//! handing it to the engine.

// Not every integration test uses every helper
#![allow(dead_code)]

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use meridian_data::client::{DataProvider, Subscription};
use meridian_model::{data::DataMessage, identifiers::Symbol};

/// The state shared between a [`MockDataProvider`] and its test.
#[derive(Debug, Default)]
pub struct MockProviderState {
    pub connected: bool,
    pub fail_connect: bool,
    pub fail_subscribe: bool,
    pub connect_calls: usize,
    pub disconnect_calls: usize,
    pub queue: VecDeque<DataMessage>,
    pub subscribed: Vec<Subscription>,
    pub unsubscribed: Vec<Symbol>,
}

/// A mock implementation of [`DataProvider`] for testing.
#[derive(Debug)]
pub struct MockDataProvider {
    name: String,
    pub state: Rc<RefCell<MockProviderState>>,
}

impl MockDataProvider {
    /// Creates a new [`MockDataProvider`] instance with the given name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: Rc::new(RefCell::new(MockProviderState::default())),
        }
    }

    /// Creates a new provider together with a handle to its shared state.
    #[must_use]
    pub fn with_state(name: &str) -> (Box<dyn DataProvider>, Rc<RefCell<MockProviderState>>) {
        let provider = Self::new(name);
        let state = provider.state.clone();
        (Box::new(provider), state)
    }
}

impl DataProvider for MockDataProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn connect(&mut self) -> anyhow::Result<()> {
        let mut state = self.state.borrow_mut();
        state.connect_calls += 1;
        if state.fail_connect {
            anyhow::bail!("connection refused");
        }
        state.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        let mut state = self.state.borrow_mut();
        state.disconnect_calls += 1;
        state.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.state.borrow().connected
    }

    fn subscribe(&mut self, subscription: &Subscription) -> anyhow::Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_subscribe {
            anyhow::bail!("subscription rejected for {subscription}");
        }
        state.subscribed.push(*subscription);
        Ok(())
    }

    fn unsubscribe(&mut self, symbol: &Symbol) {
        self.state.borrow_mut().unsubscribed.push(*symbol);
    }

    fn poll(&mut self) -> Option<DataMessage> {
        self.state.borrow_mut().queue.pop_front()
    }
}
