//! Login route handler.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::ApiJson;
use crate::services::AuthService;
use crate::state::AppState;

/// Login request body.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub user_name: String,
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
}

/// Exchange a user name and password for an access token.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TokenRequest>,
) -> Result<Json<TokenResponse>> {
    let access_token = AuthService::new(state.customers(), state.tokens())
        .login(&request.user_name, &request.password)
        .await?;

    tracing::info!(user_name = %request.user_name, "Customer logged in");

    Ok(Json(TokenResponse { access_token }))
}
