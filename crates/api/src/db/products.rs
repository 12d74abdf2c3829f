//! Product repository.

use async_trait::async_trait;
use sqlx::PgPool;

use shopping_cart_core::ProductId;

use super::RepositoryError;
use crate::models::{NewProduct, Product};

/// Storage operations for the product catalog.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products, ordered by ID.
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Get a product by ID.
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Insert a product and return its new ID.
    async fn save(&self, product: &NewProduct) -> Result<ProductId, RepositoryError>;

    /// Delete a product. Cart lines referencing it are removed by cascade.
    ///
    /// Returns `false` if the product didn't exist.
    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError>;
}

#[derive(sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub(crate) id: ProductId,
    pub(crate) name: String,
    pub(crate) price: i32,
    pub(crate) image_url: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            image_url: row.image_url,
        }
    }
}

/// `PostgreSQL` product repository.
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price, image_url
            FROM product
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price, image_url
            FROM product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn save(&self, product: &NewProduct) -> Result<ProductId, RepositoryError> {
        let id: ProductId = sqlx::query_scalar(
            r"
            INSERT INTO product (name, price, image_url)
            VALUES ($1, $2, $3)
            RETURNING id
            ",
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "product"))?;

        Ok(id)
    }

    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM product
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
