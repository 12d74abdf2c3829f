//! Order repository.
//!
//! Checkout is the only multi-statement write in the service: it locks the
//! selected cart lines, copies them into `orders_detail`, and deletes them,
//! all in one transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopping_cart_core::{CartItemId, CustomerId, OrderId, ProductId, Quantity};

use super::RepositoryError;
use crate::models::{Order, OrderDetail};

/// Storage operations for orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Turn the given cart lines into an order and remove them from the cart.
    ///
    /// `cart_item_ids` must be non-empty and free of duplicates. Fails with
    /// `RepositoryError::NotFound` (and changes nothing) if any of them is not
    /// in this customer's cart.
    async fn checkout(
        &self,
        customer_id: CustomerId,
        cart_item_ids: &[CartItemId],
    ) -> Result<OrderId, RepositoryError>;

    /// A customer's orders with their details, ordered by order ID.
    async fn list(&self, customer_id: CustomerId) -> Result<Vec<Order>, RepositoryError>;

    /// One of the customer's orders.
    async fn find(
        &self,
        customer_id: CustomerId,
        id: OrderId,
    ) -> Result<Option<Order>, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct CheckoutLineRow {
    product_id: ProductId,
    name: String,
    price: i32,
    image_url: String,
    quantity: Quantity,
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    customer_id: CustomerId,
    ordered_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct OrderDetailRow {
    orders_id: OrderId,
    product_id: ProductId,
    name: String,
    price: i32,
    image_url: String,
    quantity: Quantity,
}

impl From<OrderDetailRow> for OrderDetail {
    fn from(row: OrderDetailRow) -> Self {
        Self {
            product_id: row.product_id,
            name: row.name,
            price: row.price,
            image_url: row.image_url,
            quantity: row.quantity,
        }
    }
}

/// `PostgreSQL` order repository.
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach details to a batch of order rows.
    async fn with_details(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        let order_ids: Vec<i64> = rows.iter().map(|r| r.id.as_i64()).collect();

        let detail_rows = sqlx::query_as::<_, OrderDetailRow>(
            r"
            SELECT orders_id, product_id, name, price, image_url, quantity
            FROM orders_detail
            WHERE orders_id = ANY($1)
            ORDER BY id ASC
            ",
        )
        .bind(&order_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut details: HashMap<OrderId, Vec<OrderDetail>> = HashMap::new();
        for row in detail_rows {
            details.entry(row.orders_id).or_default().push(row.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| Order {
                id: row.id,
                customer_id: row.customer_id,
                ordered_at: row.ordered_at,
                details: details.remove(&row.id).unwrap_or_default(),
            })
            .collect())
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn checkout(
        &self,
        customer_id: CustomerId,
        cart_item_ids: &[CartItemId],
    ) -> Result<OrderId, RepositoryError> {
        let raw_ids: Vec<i64> = cart_item_ids.iter().map(CartItemId::as_i64).collect();

        let mut tx = self.pool.begin().await?;

        let lines = sqlx::query_as::<_, CheckoutLineRow>(
            r"
            SELECT p.id AS product_id, p.name, p.price, p.image_url, c.quantity
            FROM cart_item c
            JOIN product p ON p.id = c.product_id
            WHERE c.customer_id = $1 AND c.id = ANY($2)
            ORDER BY c.id ASC
            FOR UPDATE OF c
            ",
        )
        .bind(customer_id)
        .bind(&raw_ids)
        .fetch_all(&mut *tx)
        .await?;

        // Dropping `tx` rolls back
        if lines.len() != raw_ids.len() {
            return Err(RepositoryError::NotFound);
        }

        let order_id: OrderId = sqlx::query_scalar(
            r"
            INSERT INTO orders (customer_id)
            VALUES ($1)
            RETURNING id
            ",
        )
        .bind(customer_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_write(e, "order"))?;

        for line in &lines {
            sqlx::query(
                r"
                INSERT INTO orders_detail (orders_id, product_id, name, price, image_url, quantity)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(&line.name)
            .bind(line.price)
            .bind(&line.image_url)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r"
            DELETE FROM cart_item
            WHERE customer_id = $1 AND id = ANY($2)
            ",
        )
        .bind(customer_id)
        .bind(&raw_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(order_id)
    }

    async fn list(&self, customer_id: CustomerId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, customer_id, ordered_at
            FROM orders
            WHERE customer_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        self.with_details(rows).await
    }

    async fn find(
        &self,
        customer_id: CustomerId,
        id: OrderId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, customer_id, ordered_at
            FROM orders
            WHERE customer_id = $1 AND id = $2
            ",
        )
        .bind(customer_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(self.with_details(vec![row]).await?.into_iter().next())
    }
}
