//! Customer domain types.

use shopping_cart_core::{CustomerId, UserName};

/// A registered customer (domain type).
///
/// Implements `Debug` manually to redact the password hash.
#[derive(Clone)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Login name, original casing preserved.
    pub user_name: UserName,
    /// Argon2id PHC string.
    pub password_hash: String,
}

impl std::fmt::Debug for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Customer")
            .field("id", &self.id)
            .field("user_name", &self.user_name)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// The customer a bearer token was issued to.
///
/// Produced by token verification; handlers receive it through the
/// `RequireAuth` extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginCustomer {
    /// Customer's database ID.
    pub id: CustomerId,
}
