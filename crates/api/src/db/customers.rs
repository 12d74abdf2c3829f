//! Customer repository.
//!
//! All lookups by user name ignore case. The `customer` table carries a
//! unique index on `LOWER(user_name)`, so two customers can never differ
//! only by casing.

use async_trait::async_trait;
use sqlx::PgPool;

use shopping_cart_core::{CustomerId, UserName};

use super::RepositoryError;
use crate::models::Customer;

/// Storage operations for customers.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Insert a customer and return its new ID.
    ///
    /// Fails with `RepositoryError::Conflict` if the name is taken (ignoring case).
    async fn save(
        &self,
        user_name: &UserName,
        password_hash: &str,
    ) -> Result<CustomerId, RepositoryError>;

    /// Get a customer by ID.
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;

    /// Get a customer by user name, ignoring case.
    async fn find_by_user_name(&self, user_name: &str)
    -> Result<Option<Customer>, RepositoryError>;

    /// Get only the ID of the customer with this user name, ignoring case.
    async fn find_id_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<CustomerId>, RepositoryError>;

    /// Whether any customer has this user name, ignoring case.
    async fn exists_by_user_name(&self, user_name: &str) -> Result<bool, RepositoryError>;

    /// Replace a customer's name and password hash.
    ///
    /// Fails with `RepositoryError::NotFound` if the customer doesn't exist,
    /// or `RepositoryError::Conflict` if another customer has the name.
    async fn update(
        &self,
        id: CustomerId,
        user_name: &UserName,
        password_hash: &str,
    ) -> Result<Customer, RepositoryError>;

    /// Delete a customer and, by cascade, their cart and orders.
    ///
    /// Returns `false` if the customer didn't exist.
    async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: CustomerId,
    user_name: UserName,
    password: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            user_name: row.user_name,
            password_hash: row.password,
        }
    }
}

/// `PostgreSQL` customer repository.
pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn save(
        &self,
        user_name: &UserName,
        password_hash: &str,
    ) -> Result<CustomerId, RepositoryError> {
        let id: CustomerId = sqlx::query_scalar(
            r"
            INSERT INTO customer (user_name, password)
            VALUES ($1, $2)
            RETURNING id
            ",
        )
        .bind(user_name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "user name"))?;

        Ok(id)
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, user_name, password
            FROM customer
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    async fn find_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, user_name, password
            FROM customer
            WHERE LOWER(user_name) = LOWER($1)
            ",
        )
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    async fn find_id_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<CustomerId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, CustomerId>(
            r"
            SELECT id
            FROM customer
            WHERE LOWER(user_name) = LOWER($1)
            ",
        )
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    async fn exists_by_user_name(&self, user_name: &str) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            r"
            SELECT EXISTS (
                SELECT 1 FROM customer WHERE LOWER(user_name) = LOWER($1)
            )
            ",
        )
        .bind(user_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update(
        &self,
        id: CustomerId,
        user_name: &UserName,
        password_hash: &str,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            UPDATE customer
            SET user_name = $2, password = $3
            WHERE id = $1
            RETURNING id, user_name, password
            ",
        )
        .bind(id)
        .bind(user_name)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "user name"))?;

        row.map(Customer::from).ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM customer
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
