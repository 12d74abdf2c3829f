//! Product catalog types.

use shopping_cart_core::ProductId;

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Price in the smallest currency unit.
    pub price: i32,
    pub image_url: String,
}

/// A product that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: i32,
    pub image_url: String,
}
