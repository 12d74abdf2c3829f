//! Customer route handlers.
//!
//! `/api/customers/{id}` addresses any customer by ID; `/api/customers/me`
//! addresses the bearer of the token.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shopping_cart_core::CustomerId;

use super::created;
use crate::error::Result;
use crate::middleware::{ApiJson, ApiPath, RequireAuth};
use crate::models::Customer;
use crate::services::CustomerService;
use crate::state::AppState;

/// Registration and profile update body.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    pub user_name: String,
    pub password: String,
}

/// Public view of a customer.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: CustomerId,
    pub user_name: String,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            user_name: customer.user_name.into_inner(),
        }
    }
}

/// Register a customer.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CustomerRequest>,
) -> Result<Response> {
    let id = CustomerService::new(state.customers())
        .create(&request.user_name, &request.password)
        .await?;

    tracing::info!(customer_id = %id, "Customer registered");

    Ok(created(&format!("/api/customers/{id}")))
}

/// Show a customer.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CustomerId>,
) -> Result<Json<CustomerResponse>> {
    let customer = CustomerService::new(state.customers()).find(id).await?;
    Ok(Json(customer.into()))
}

/// Replace a customer's user name and password.
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CustomerId>,
    ApiJson(request): ApiJson<CustomerRequest>,
) -> Result<Json<CustomerResponse>> {
    update_customer(&state, id, &request).await
}

/// Delete a customer.
#[instrument(skip_all)]
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CustomerId>,
) -> Result<StatusCode> {
    delete_customer(&state, id).await
}

/// Show the authenticated customer.
#[instrument(skip_all)]
pub async fn show_me(
    State(state): State<AppState>,
    RequireAuth(login): RequireAuth,
) -> Result<Json<CustomerResponse>> {
    let customer = CustomerService::new(state.customers())
        .find(login.id)
        .await?;
    Ok(Json(customer.into()))
}

/// Update the authenticated customer.
#[instrument(skip_all)]
pub async fn update_me(
    State(state): State<AppState>,
    RequireAuth(login): RequireAuth,
    ApiJson(request): ApiJson<CustomerRequest>,
) -> Result<Json<CustomerResponse>> {
    update_customer(&state, login.id, &request).await
}

/// Delete the authenticated customer.
#[instrument(skip_all)]
pub async fn delete_me(
    State(state): State<AppState>,
    RequireAuth(login): RequireAuth,
) -> Result<StatusCode> {
    delete_customer(&state, login.id).await
}

async fn update_customer(
    state: &AppState,
    id: CustomerId,
    request: &CustomerRequest,
) -> Result<Json<CustomerResponse>> {
    let customer = CustomerService::new(state.customers())
        .update(id, &request.user_name, &request.password)
        .await?;

    tracing::info!(customer_id = %id, "Customer updated");

    Ok(Json(customer.into()))
}

async fn delete_customer(state: &AppState, id: CustomerId) -> Result<StatusCode> {
    CustomerService::new(state.customers()).delete(id).await?;

    tracing::info!(customer_id = %id, "Customer deleted");

    Ok(StatusCode::NO_CONTENT)
}
