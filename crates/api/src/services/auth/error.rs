//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during login and token verification.
///
/// The `Display` text of client-facing variants is returned verbatim in the
/// response body.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No customer has the given user name.
    #[error("존재하지 않는 유저입니다.")]
    UserNotFound,

    /// Customer exists but the password is wrong.
    #[error("비밀번호가 일치하지 않습니다.")]
    PasswordMismatch,

    /// Token missing, malformed, tampered with, expired, or issued to a
    /// customer that no longer exists.
    #[error("유효하지 않은 토큰입니다.")]
    InvalidToken,

    /// Signing a token failed.
    #[error("token encoding error: {0}")]
    TokenCreation(#[source] jsonwebtoken::errors::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
