//! Customer registration and profile management.

use thiserror::Error;

use shopping_cart_core::{CustomerId, UserName, UserNameError};

use crate::db::{CustomerRepository, RepositoryError};
use crate::models::Customer;
use crate::services::password::{PasswordHashError, hash_password, is_valid_password};

/// Errors that can occur while managing customers.
#[derive(Debug, Error)]
pub enum CustomerError {
    /// User name is blank, too long, or contains whitespace.
    #[error("유저 이름은 공백 없이 1자 이상 32자 이하여야 합니다.")]
    InvalidUserName(#[source] UserNameError),

    /// Password length is outside the allowed range.
    #[error("비밀번호는 8자 이상 64자 이하여야 합니다.")]
    InvalidPassword,

    /// Another customer already has this name (ignoring case).
    #[error("이미 존재하는 유저 이름입니다.")]
    DuplicateUserName,

    /// No customer with this ID.
    #[error("존재하지 않는 유저입니다.")]
    NotFound,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash(#[from] PasswordHashError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Customer service.
pub struct CustomerService<'a> {
    customers: &'a dyn CustomerRepository,
}

impl<'a> CustomerService<'a> {
    /// Create a new customer service.
    #[must_use]
    pub const fn new(customers: &'a dyn CustomerRepository) -> Self {
        Self { customers }
    }

    /// Register a customer.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::InvalidUserName` or `CustomerError::InvalidPassword`
    /// if validation fails, and `CustomerError::DuplicateUserName` if the name
    /// is taken in any casing.
    pub async fn create(&self, user_name: &str, password: &str) -> Result<CustomerId, CustomerError> {
        let (user_name, password_hash) = validated(user_name, password)?;

        if self.customers.exists_by_user_name(user_name.as_str()).await? {
            return Err(CustomerError::DuplicateUserName);
        }

        self.customers
            .save(&user_name, &password_hash)
            .await
            .map_err(map_conflict)
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if the customer doesn't exist.
    pub async fn find(&self, id: CustomerId) -> Result<Customer, CustomerError> {
        self.customers
            .find_by_id(id)
            .await?
            .ok_or(CustomerError::NotFound)
    }

    /// Replace a customer's user name and password.
    ///
    /// Re-casing one's own name is allowed; taking another customer's name
    /// is not. The password length policy only applies at registration.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::InvalidUserName` for a malformed name,
    /// `CustomerError::NotFound` if the customer doesn't exist, and
    /// `CustomerError::DuplicateUserName` if another customer owns the name.
    pub async fn update(
        &self,
        id: CustomerId,
        user_name: &str,
        password: &str,
    ) -> Result<Customer, CustomerError> {
        let user_name = parse_user_name(user_name)?;

        if self.customers.find_by_id(id).await?.is_none() {
            return Err(CustomerError::NotFound);
        }

        if let Some(owner) = self.customers.find_id_by_user_name(user_name.as_str()).await? {
            if owner != id {
                return Err(CustomerError::DuplicateUserName);
            }
        }

        let password_hash = hash_password(password)?;

        self.customers
            .update(id, &user_name, &password_hash)
            .await
            .map_err(map_conflict)
    }

    /// Delete a customer together with their cart and orders.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if the customer doesn't exist.
    pub async fn delete(&self, id: CustomerId) -> Result<(), CustomerError> {
        if self.customers.delete(id).await? {
            Ok(())
        } else {
            Err(CustomerError::NotFound)
        }
    }
}

fn parse_user_name(user_name: &str) -> Result<UserName, CustomerError> {
    UserName::parse(user_name).map_err(CustomerError::InvalidUserName)
}

fn validated(user_name: &str, password: &str) -> Result<(UserName, String), CustomerError> {
    let user_name = parse_user_name(user_name)?;

    if !is_valid_password(password) {
        return Err(CustomerError::InvalidPassword);
    }

    Ok((user_name, hash_password(password)?))
}

fn map_conflict(e: RepositoryError) -> CustomerError {
    match e {
        RepositoryError::Conflict(_) => CustomerError::DuplicateUserName,
        RepositoryError::NotFound => CustomerError::NotFound,
        other => CustomerError::Repository(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::services::password::verify_password;

    #[tokio::test]
    async fn test_create_hashes_password() {
        let store = MemoryStore::new();
        let service = CustomerService::new(&store);

        let id = service.create("puterism", "password").await.unwrap();
        let customer = service.find(id).await.unwrap();

        assert_eq!(customer.user_name.as_str(), "puterism");
        assert_ne!(customer.password_hash, "password");
        assert!(verify_password("password", &customer.password_hash));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_ignoring_case() {
        let store = MemoryStore::new();
        let service = CustomerService::new(&store);
        service.create("puterism", "password").await.unwrap();

        let result = service.create("PuTeRiSm", "password").await;

        assert!(matches!(result, Err(CustomerError::DuplicateUserName)));
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let store = MemoryStore::new();
        let service = CustomerService::new(&store);

        assert!(matches!(
            service.create("", "password").await,
            Err(CustomerError::InvalidUserName(_))
        ));
        assert!(matches!(
            service.create("has space", "password").await,
            Err(CustomerError::InvalidUserName(_))
        ));
        assert!(matches!(
            service.create("puterism", "short").await,
            Err(CustomerError::InvalidPassword)
        ));
    }

    #[tokio::test]
    async fn test_update_allows_recasing_own_name() {
        let store = MemoryStore::new();
        let service = CustomerService::new(&store);
        let id = service.create("puterism", "password").await.unwrap();

        let updated = service.update(id, "PUTERISM", "new-password").await.unwrap();

        assert_eq!(updated.user_name.as_str(), "PUTERISM");
        assert!(verify_password("new-password", &updated.password_hash));
    }

    #[tokio::test]
    async fn test_update_rejects_taken_name() {
        let store = MemoryStore::new();
        let service = CustomerService::new(&store);
        let id = service.create("puterism", "password").await.unwrap();
        service.create("tanney-102", "password").await.unwrap();

        let result = service.update(id, "Tanney-102", "password").await;

        assert!(matches!(result, Err(CustomerError::DuplicateUserName)));
    }

    #[tokio::test]
    async fn test_update_missing_customer() {
        let store = MemoryStore::new();
        let service = CustomerService::new(&store);

        let result = service
            .update(CustomerId::new(42), "puterism", "password")
            .await;

        assert!(matches!(result, Err(CustomerError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_missing_customer_with_taken_name() {
        let store = MemoryStore::new();
        let service = CustomerService::new(&store);
        service.create("tanney-102", "password").await.unwrap();

        let result = service
            .update(CustomerId::new(42), "tanney-102", "password")
            .await;

        assert!(matches!(result, Err(CustomerError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_accepts_short_password() {
        let store = MemoryStore::new();
        let service = CustomerService::new(&store);
        let id = service.create("puterism", "password").await.unwrap();

        let updated = service.update(id, "puterism", "321").await.unwrap();

        assert!(verify_password("321", &updated.password_hash));
    }

    #[tokio::test]
    async fn test_delete_then_find_is_not_found() {
        let store = MemoryStore::new();
        let service = CustomerService::new(&store);
        let id = service.create("puterism", "password").await.unwrap();

        service.delete(id).await.unwrap();

        assert!(matches!(service.find(id).await, Err(CustomerError::NotFound)));
        assert!(matches!(service.delete(id).await, Err(CustomerError::NotFound)));
    }
}
