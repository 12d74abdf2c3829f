//! Cart repository.
//!
//! Every operation is scoped by `customer_id`: a cart item ID that belongs to
//! someone else behaves exactly like one that does not exist.

use async_trait::async_trait;
use sqlx::PgPool;

use shopping_cart_core::{CartItemId, CustomerId, ProductId, Quantity};

use super::RepositoryError;
use crate::models::{CartItem, Product};

/// Storage operations for cart lines.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// A customer's cart lines, ordered by cart item ID.
    async fn list(&self, customer_id: CustomerId) -> Result<Vec<CartItem>, RepositoryError>;

    /// One of the customer's cart lines.
    async fn find(
        &self,
        customer_id: CustomerId,
        id: CartItemId,
    ) -> Result<Option<CartItem>, RepositoryError>;

    /// Put a product in the cart.
    ///
    /// If the product is already in the customer's cart the quantities are
    /// summed and the existing line's ID is returned. Fails with
    /// `RepositoryError::NotFound` if the product doesn't exist.
    async fn add(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<CartItemId, RepositoryError>;

    /// Set the quantity of one of the customer's cart lines.
    ///
    /// Returns `false` if the line doesn't exist for this customer.
    async fn update_quantity(
        &self,
        customer_id: CustomerId,
        id: CartItemId,
        quantity: Quantity,
    ) -> Result<bool, RepositoryError>;

    /// Remove one of the customer's cart lines.
    ///
    /// Returns `false` if the line doesn't exist for this customer.
    async fn delete(&self, customer_id: CustomerId, id: CartItemId)
    -> Result<bool, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct CartItemRow {
    id: CartItemId,
    customer_id: CustomerId,
    quantity: Quantity,
    product_id: ProductId,
    name: String,
    price: i32,
    image_url: String,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            id: row.id,
            customer_id: row.customer_id,
            product: Product {
                id: row.product_id,
                name: row.name,
                price: row.price,
                image_url: row.image_url,
            },
            quantity: row.quantity,
        }
    }
}

/// `PostgreSQL` cart repository.
pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn list(&self, customer_id: CustomerId) -> Result<Vec<CartItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT c.id, c.customer_id, c.quantity,
                   p.id AS product_id, p.name, p.price, p.image_url
            FROM cart_item c
            JOIN product p ON p.id = c.product_id
            WHERE c.customer_id = $1
            ORDER BY c.id ASC
            ",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CartItem::from).collect())
    }

    async fn find(
        &self,
        customer_id: CustomerId,
        id: CartItemId,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let row = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT c.id, c.customer_id, c.quantity,
                   p.id AS product_id, p.name, p.price, p.image_url
            FROM cart_item c
            JOIN product p ON p.id = c.product_id
            WHERE c.customer_id = $1 AND c.id = $2
            ",
        )
        .bind(customer_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CartItem::from))
    }

    async fn add(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<CartItemId, RepositoryError> {
        let id: CartItemId = sqlx::query_scalar(
            r"
            INSERT INTO cart_item (customer_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (customer_id, product_id)
            DO UPDATE SET quantity = cart_item.quantity + EXCLUDED.quantity
            RETURNING id
            ",
        )
        .bind(customer_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "cart quantity"))?;

        Ok(id)
    }

    async fn update_quantity(
        &self,
        customer_id: CustomerId,
        id: CartItemId,
        quantity: Quantity,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE cart_item
            SET quantity = $3
            WHERE customer_id = $1 AND id = $2
            ",
        )
        .bind(customer_id)
        .bind(id)
        .bind(quantity)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(
        &self,
        customer_id: CustomerId,
        id: CartItemId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM cart_item
            WHERE customer_id = $1 AND id = $2
            ",
        )
        .bind(customer_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
