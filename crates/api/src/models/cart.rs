//! Cart domain types.

use shopping_cart_core::{CartItemId, CustomerId, Quantity};

use super::product::Product;

/// One line in a customer's cart, joined with the product it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub id: CartItemId,
    /// Owner of this cart line.
    pub customer_id: CustomerId,
    pub product: Product,
    pub quantity: Quantity,
}
