//! Order domain types.

use chrono::{DateTime, Utc};

use shopping_cart_core::{CustomerId, OrderId, ProductId, Quantity};

/// A checked-out order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub ordered_at: DateTime<Utc>,
    pub details: Vec<OrderDetail>,
}

/// A product line captured at checkout time.
///
/// Name, price and image are copies, so later catalog edits or deletions do
/// not rewrite order history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetail {
    pub product_id: ProductId,
    pub name: String,
    pub price: i32,
    pub image_url: String,
    pub quantity: Quantity,
}
