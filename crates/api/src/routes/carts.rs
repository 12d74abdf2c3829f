//! Cart route handlers.
//!
//! All routes act on the authenticated customer's cart.

use axum::{Json, extract::State, http::StatusCode, response::Response};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shopping_cart_core::{CartItemId, ProductId};

use super::created;
use crate::error::Result;
use crate::middleware::{ApiJson, ApiPath, RequireAuth};
use crate::models::CartItem;
use crate::services::CartService;
use crate::state::AppState;

const fn default_quantity() -> i32 {
    1
}

/// Add-to-cart body. `quantity` defaults to 1.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

/// Quantity change body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

/// A cart line joined with its product.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub name: String,
    pub price: i32,
    pub image_url: String,
    pub quantity: i32,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.id,
            product_id: item.product.id,
            name: item.product.name,
            price: item.product.price,
            image_url: item.product.image_url,
            quantity: item.quantity.get(),
        }
    }
}

fn service(state: &AppState) -> CartService<'_> {
    CartService::new(state.carts(), state.products())
}

/// List the cart.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(login): RequireAuth,
) -> Result<Json<Vec<CartItemResponse>>> {
    let items = service(&state).list(login.id).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

/// Put a product in the cart.
#[instrument(skip_all)]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(login): RequireAuth,
    ApiJson(request): ApiJson<AddCartItemRequest>,
) -> Result<Response> {
    let id = service(&state)
        .add(login.id, request.product_id, request.quantity)
        .await?;

    tracing::info!(
        cart_item_id = %id,
        product_id = %request.product_id,
        quantity = request.quantity,
        "Added to cart"
    );

    Ok(created(&format!("/api/customers/me/carts/{id}")))
}

/// Show one cart line.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(login): RequireAuth,
    ApiPath(id): ApiPath<CartItemId>,
) -> Result<Json<CartItemResponse>> {
    let item = service(&state).find(login.id, id).await?;
    Ok(Json(item.into()))
}

/// Change a cart line's quantity.
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(login): RequireAuth,
    ApiPath(id): ApiPath<CartItemId>,
    ApiJson(request): ApiJson<UpdateQuantityRequest>,
) -> Result<Json<CartItemResponse>> {
    let item = service(&state)
        .update_quantity(login.id, id, request.quantity)
        .await?;
    Ok(Json(item.into()))
}

/// Remove a cart line.
#[instrument(skip_all)]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(login): RequireAuth,
    ApiPath(id): ApiPath<CartItemId>,
) -> Result<StatusCode> {
    service(&state).remove(login.id, id).await?;

    tracing::info!(cart_item_id = %id, "Removed from cart");

    Ok(StatusCode::NO_CONTENT)
}
