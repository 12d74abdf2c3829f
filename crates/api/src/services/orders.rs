//! Checkout and order history.

use thiserror::Error;

use shopping_cart_core::{CartItemId, CustomerId, OrderId};

use crate::db::{OrderRepository, RepositoryError};
use crate::models::Order;

/// Errors that can occur while placing or reading orders.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Checkout requested with no cart items.
    #[error("주문할 상품이 없습니다.")]
    EmptyOrder,

    /// A listed cart item isn't in this customer's cart.
    #[error("장바구니에 존재하지 않는 상품입니다.")]
    CartItemNotFound,

    /// No such order for this customer.
    #[error("존재하지 않는 주문입니다.")]
    NotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Order service.
pub struct OrderService<'a> {
    orders: &'a dyn OrderRepository,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(orders: &'a dyn OrderRepository) -> Self {
        Self { orders }
    }

    /// Order the given cart items and remove them from the cart.
    ///
    /// Repeated IDs are ordered once.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyOrder` if `cart_item_ids` is empty and
    /// `OrderError::CartItemNotFound` if any of them isn't in this cart, in
    /// which case nothing is ordered.
    pub async fn checkout(
        &self,
        customer_id: CustomerId,
        cart_item_ids: &[CartItemId],
    ) -> Result<OrderId, OrderError> {
        let mut ids = Vec::with_capacity(cart_item_ids.len());
        for id in cart_item_ids {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }

        if ids.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        self.orders
            .checkout(customer_id, &ids)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => OrderError::CartItemNotFound,
                other => OrderError::Repository(other),
            })
    }

    /// The customer's orders, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the store fails.
    pub async fn list(&self, customer_id: CustomerId) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list(customer_id).await?)
    }

    /// One of the customer's orders.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist or belongs
    /// to someone else.
    pub async fn find(&self, customer_id: CustomerId, id: OrderId) -> Result<Order, OrderError> {
        self.orders
            .find(customer_id, id)
            .await?
            .ok_or(OrderError::NotFound)
    }
}
