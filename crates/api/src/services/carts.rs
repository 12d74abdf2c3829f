//! Per-customer shopping carts.
//!
//! Every operation takes the authenticated customer's ID. Cart items owned
//! by anyone else are reported as missing.

use thiserror::Error;

use shopping_cart_core::{CartItemId, CustomerId, ProductId, Quantity};

use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::models::CartItem;

/// Errors that can occur while managing a cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product to add doesn't exist.
    #[error("존재하지 않는 상품입니다.")]
    ProductNotFound,

    /// No such cart item in this customer's cart.
    #[error("장바구니에 존재하지 않는 상품입니다.")]
    CartItemNotFound,

    /// Quantity below one.
    #[error("수량은 1개 이상이어야 합니다.")]
    InvalidQuantity,

    /// Accumulated quantity no longer fits.
    #[error("담을 수 있는 최대 수량을 초과했습니다.")]
    QuantityOverflow,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Cart service.
pub struct CartService<'a> {
    carts: &'a dyn CartRepository,
    products: &'a dyn ProductRepository,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(carts: &'a dyn CartRepository, products: &'a dyn ProductRepository) -> Self {
        Self { carts, products }
    }

    /// Put `quantity` of a product in the customer's cart.
    ///
    /// Adding a product already in the cart increases that line's quantity
    /// and returns its existing ID.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity < 1`,
    /// `CartError::ProductNotFound` if the product doesn't exist, and
    /// `CartError::QuantityOverflow` if the summed quantity overflows.
    pub async fn add(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartItemId, CartError> {
        let quantity = Quantity::new(quantity).map_err(|_| CartError::InvalidQuantity)?;

        if self.products.find_by_id(product_id).await?.is_none() {
            return Err(CartError::ProductNotFound);
        }

        self.carts
            .add(customer_id, product_id, quantity)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CartError::ProductNotFound,
                RepositoryError::Conflict(_) => CartError::QuantityOverflow,
                other => CartError::Repository(other),
            })
    }

    /// The customer's cart, ordered by cart item ID.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the store fails.
    pub async fn list(&self, customer_id: CustomerId) -> Result<Vec<CartItem>, CartError> {
        Ok(self.carts.list(customer_id).await?)
    }

    /// One line of the customer's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartItemNotFound` if the line isn't in this cart.
    pub async fn find(&self, customer_id: CustomerId, id: CartItemId) -> Result<CartItem, CartError> {
        self.carts
            .find(customer_id, id)
            .await?
            .ok_or(CartError::CartItemNotFound)
    }

    /// Set the quantity of a cart line and return the updated line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity < 1` and
    /// `CartError::CartItemNotFound` if the line isn't in this cart.
    pub async fn update_quantity(
        &self,
        customer_id: CustomerId,
        id: CartItemId,
        quantity: i32,
    ) -> Result<CartItem, CartError> {
        let quantity = Quantity::new(quantity).map_err(|_| CartError::InvalidQuantity)?;

        if !self.carts.update_quantity(customer_id, id, quantity).await? {
            return Err(CartError::CartItemNotFound);
        }

        self.find(customer_id, id).await
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartItemNotFound` if the line isn't in this cart.
    pub async fn remove(&self, customer_id: CustomerId, id: CartItemId) -> Result<(), CartError> {
        if self.carts.delete(customer_id, id).await? {
            Ok(())
        } else {
            Err(CartError::CartItemNotFound)
        }
    }
}
