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

//! Request/response access to the [`Cache`] through the message bus.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use super::Cache;
use crate::msgbus::{
    MessageBus, MessageBusError, Request, Response, ShareableRequestHandler,
    switchboard::CACHE_QUERY_ENDPOINT,
};

/// Binds the `cache.query` endpoint on the `msgbus` to answer lookups from the `cache`.
///
/// The handler holds only a weak reference, so the endpoint answers with an error
/// once the cache has been dropped. A request made while the cache is mutably
/// borrowed (from inside a cache notification handler) is also answered with an error.
///
/// # Errors
///
/// Returns an error if the endpoint is already registered.
pub fn register_cache_endpoint(
    cache: &Rc<RefCell<Cache>>,
    msgbus: &MessageBus,
) -> Result<(), MessageBusError> {
    let cache = Rc::downgrade(cache);
    let handler = ShareableRequestHandler::from_fn(move |request| query(&cache, request));
    msgbus.register(CACHE_QUERY_ENDPOINT, handler)
}

fn query(cache: &Weak<RefCell<Cache>>, request: &Request) -> Response {
    let Some(cache) = cache.upgrade() else {
        return Response::Error("cache dropped".to_string());
    };
    let Ok(cache) = cache.try_borrow() else {
        log::warn!("Cache query {request} while cache is being updated");
        return Response::Error("cache busy".to_string());
    };

    match request {
        Request::Quote { symbol } => Response::Quote(cache.quote(symbol).copied()),
        Request::OrderBook { symbol } => {
            Response::OrderBook(cache.orderbook(symbol).cloned().map(Box::new))
        }
        Request::Position { symbol } => Response::Position(cache.position(symbol).copied()),
        Request::Balance { currency } => Response::Balance(cache.balance(currency).copied()),
        Request::Order { order_id } => Response::Order(
            cache
                .order(order_id)
                .and_then(|order| order.try_borrow().ok().map(|o| *o)),
        ),
        Request::LastBar { symbol, timeframe } => {
            Response::Bar(cache.last_bar(symbol, *timeframe).copied())
        }
        Request::Custom { name, .. } => Response::Error(format!("unsupported query '{name}'")),
    }
}
