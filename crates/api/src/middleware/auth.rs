//! Bearer token authentication.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::error::{AppError, set_sentry_user};
use crate::models::LoginCustomer;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Extractor that requires a valid `Authorization: Bearer <token>` header.
///
/// Rejects with 401 "유효하지 않은 토큰입니다." when the header is missing or
/// malformed, the token fails verification, or its customer is gone.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(customer): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, customer {}!", customer.id)
/// }
/// ```
pub struct RequireAuth(pub LoginCustomer);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AuthError::InvalidToken)?;

        let customer = AuthService::new(state.customers(), state.tokens())
            .authenticate(token)
            .await?;

        tracing::Span::current().record("customer_id", customer.id.as_i64());
        set_sentry_user(&customer.id);

        Ok(Self(customer))
    }
}

/// Pull the token out of an `Authorization: Bearer` header.
///
/// The scheme is matched ignoring case.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
