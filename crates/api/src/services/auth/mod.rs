//! Authentication service.
//!
//! Provides password login and bearer token verification.

mod error;
mod token;

pub use error::AuthError;
pub use token::JwtTokenProvider;

use shopping_cart_core::CustomerId;

use crate::db::CustomerRepository;
use crate::models::LoginCustomer;
use crate::services::password::verify_password;

/// Authentication service.
///
/// Exchanges credentials for access tokens and resolves tokens back to the
/// customer they were issued to.
pub struct AuthService<'a> {
    customers: &'a dyn CustomerRepository,
    tokens: &'a JwtTokenProvider,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(customers: &'a dyn CustomerRepository, tokens: &'a JwtTokenProvider) -> Self {
        Self { customers, tokens }
    }

    /// Check a user name and password and issue an access token.
    ///
    /// The user name is matched ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no customer has the name.
    /// Returns `AuthError::PasswordMismatch` if the password is wrong.
    pub async fn login(&self, user_name: &str, password: &str) -> Result<String, AuthError> {
        let customer = self
            .customers
            .find_by_user_name(user_name)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(password, &customer.password_hash) {
            return Err(AuthError::PasswordMismatch);
        }

        self.tokens.create_token(&customer.id.to_string())
    }

    /// Resolve a bearer token to the customer it was issued to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token does not verify, its
    /// subject is not a customer ID, or the customer no longer exists.
    pub async fn authenticate(&self, token: &str) -> Result<LoginCustomer, AuthError> {
        let id: CustomerId = self
            .tokens
            .payload(token)?
            .parse()
            .map_err(|_| AuthError::InvalidToken)?;

        let customer = self
            .customers
            .find_by_id(id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        Ok(LoginCustomer { id: customer.id })
    }
}
