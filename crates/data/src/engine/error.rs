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

/// Represents an error returned by `DataEngine` operations.
///
/// Per-message problems raised inside `poll` are counted and logged rather than
/// returned, so these surface only from direct calls.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DataEngineError {
    /// No active provider is set.
    #[error("Data engine has no active provider")]
    NotConnected,
    /// The active provider rejected a subscription.
    #[error("Subscription failed: {0}")]
    SubscriptionFailed(String),
    /// The provider failed or is missing.
    #[error("Provider error: {0}")]
    ProviderError(String),
    /// A message failed validation.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
