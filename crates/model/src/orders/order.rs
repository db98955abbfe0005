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

//! An `Order` as tracked by the order-execution layer.

use std::fmt::Display;

use meridian_core::serialization::Serializable;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    enums::{OrderSide, OrderStatus, OrderType},
    identifiers::{OrderId, Symbol},
    types::{Price, Quantity},
};

/// Represents an order submitted to a venue.
///
/// Orders are owned by the execution layer. The cache only holds a weak reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    /// The order ID.
    pub id: OrderId,
    /// The order symbol.
    pub symbol: Symbol,
    /// The order side.
    pub side: OrderSide,
    /// The order type.
    pub order_type: OrderType,
    /// The current lifecycle status.
    pub status: OrderStatus,
    /// The limit price (`None` for market orders).
    pub price: Option<Price>,
    /// The order quantity.
    pub quantity: Quantity,
    /// The filled quantity.
    pub filled_quantity: Quantity,
    /// The average fill price.
    pub avg_fill_price: Option<Price>,
    /// UNIX timestamp (milliseconds) when the order was created.
    pub created_at: i64,
    /// UNIX timestamp (milliseconds) of the last update.
    pub updated_at: i64,
}

impl Order {
    /// Creates a new pending limit [`Order`].
    #[must_use]
    pub const fn limit(
        id: OrderId,
        symbol: Symbol,
        side: OrderSide,
        price: Price,
        quantity: Quantity,
        timestamp: i64,
    ) -> Self {
        Self::new(
            id,
            symbol,
            side,
            OrderType::Limit,
            Some(price),
            quantity,
            timestamp,
        )
    }

    /// Creates a new pending market [`Order`].
    #[must_use]
    pub const fn market(
        id: OrderId,
        symbol: Symbol,
        side: OrderSide,
        quantity: Quantity,
        timestamp: i64,
    ) -> Self {
        Self::new(
            id,
            symbol,
            side,
            OrderType::Market,
            None,
            quantity,
            timestamp,
        )
    }

    const fn new(
        id: OrderId,
        symbol: Symbol,
        side: OrderSide,
        order_type: OrderType,
        price: Option<Price>,
        quantity: Quantity,
        timestamp: i64,
    ) -> Self {
        Self {
            id,
            symbol,
            side,
            order_type,
            status: OrderStatus::Pending,
            price,
            quantity,
            filled_quantity: Decimal::ZERO,
            avg_fill_price: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns `true` if the order can still be filled.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Returns the quantity still to be filled.
    #[must_use]
    pub fn remaining_quantity(&self) -> Quantity {
        (self.quantity - self.filled_quantity).max(Decimal::ZERO)
    }

    /// Applies a fill of `quantity` at `price`, updating status and average price.
    pub fn apply_fill(&mut self, quantity: Quantity, price: Price, timestamp: i64) {
        let filled_before = self.filled_quantity;
        let filled_after = filled_before + quantity;
        let notional = self.avg_fill_price.unwrap_or(Decimal::ZERO) * filled_before
            + price * quantity;

        self.avg_fill_price = notional.checked_div(filled_after);
        self.filled_quantity = filled_after;
        self.status = if self.remaining_quantity().is_zero() {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
        self.updated_at = timestamp;
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Order({} {} {} {} {}, status={})",
            self.id, self.side, self.quantity, self.symbol, self.order_type, self.status
        )
    }
}

impl Serializable for Order {}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::stubs::order_limit_buy;

    #[rstest]
    fn test_new_limit_is_pending(order_limit_buy: Order) {
        assert_eq!(order_limit_buy.status, OrderStatus::Pending);
        assert!(order_limit_buy.is_open());
        assert_eq!(order_limit_buy.remaining_quantity(), dec!(1));
    }

    #[rstest]
    fn test_partial_then_full_fill(mut order_limit_buy: Order) {
        order_limit_buy.apply_fill(dec!(0.4), dec!(49000), 2);
        assert_eq!(order_limit_buy.status, OrderStatus::PartiallyFilled);
        assert_eq!(order_limit_buy.remaining_quantity(), dec!(0.6));

        order_limit_buy.apply_fill(dec!(0.6), dec!(49500), 3);
        assert_eq!(order_limit_buy.status, OrderStatus::Filled);
        assert!(!order_limit_buy.is_open());
        assert_eq!(order_limit_buy.avg_fill_price, Some(dec!(49300)));
        assert_eq!(order_limit_buy.updated_at, 3);
    }

    #[rstest]
    fn test_market_order_has_no_price() {
        let order = Order::market(
            OrderId::from("M-1"),
            Symbol::from("BTC-USDT"),
            OrderSide::Sell,
            dec!(2),
            0,
        );
        assert_eq!(order.price, None);
        assert_eq!(order.order_type, OrderType::Market);
    }
}
