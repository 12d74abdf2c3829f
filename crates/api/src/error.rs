//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Client errors become a JSON
//! body `{"message": ...}` carrying the service error's text; server errors
//! are logged, captured to Sentry, and answered with a generic message.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::{AuthError, CartError, CustomerError, OrderError, ProductError};

/// Message returned for every 5xx response.
pub const INTERNAL_ERROR_MESSAGE: &str = "서버 내부 오류가 발생했습니다.";

/// JSON error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Login or token verification failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Customer operation failed.
    #[error(transparent)]
    Customer(#[from] CustomerError),

    /// Product operation failed.
    #[error(transparent)]
    Product(#[from] ProductError),

    /// Cart operation failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Order operation failed.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Request body or path could not be decoded.
    #[error("잘못된 요청입니다: {0}")]
    BadRequest(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Auth(err) => match err {
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::PasswordMismatch => StatusCode::BAD_REQUEST,
                AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
                AuthError::TokenCreation(_) | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Customer(err) => match err {
                CustomerError::InvalidUserName(_)
                | CustomerError::InvalidPassword
                | CustomerError::DuplicateUserName => StatusCode::BAD_REQUEST,
                CustomerError::NotFound => StatusCode::NOT_FOUND,
                CustomerError::PasswordHash(_) | CustomerError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Product(err) => match err {
                ProductError::InvalidName
                | ProductError::NameTooLong
                | ProductError::ImageUrlTooLong
                | ProductError::InvalidPrice => StatusCode::BAD_REQUEST,
                ProductError::NotFound => StatusCode::NOT_FOUND,
                ProductError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Cart(err) => match err {
                CartError::InvalidQuantity | CartError::QuantityOverflow => StatusCode::BAD_REQUEST,
                CartError::ProductNotFound | CartError::CartItemNotFound => StatusCode::NOT_FOUND,
                CartError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Order(err) => match err {
                OrderError::EmptyOrder => StatusCode::BAD_REQUEST,
                OrderError::CartItemNotFound | OrderError::NotFound => StatusCode::NOT_FOUND,
                OrderError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            tracing::debug!(status = %status, error = %self, "Client error");
            self.to_string()
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a customer ID.
///
/// Called after a bearer token is accepted so errors are associated with
/// the customer.
pub fn set_sentry_user(customer_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(customer_id.to_string()),
            ..Default::default()
        }));
    });
}
