//! Product catalog route handlers.

use axum::{Json, extract::State, http::StatusCode, response::Response};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shopping_cart_core::ProductId;

use super::created;
use crate::error::Result;
use crate::middleware::{ApiJson, ApiPath};
use crate::models::Product;
use crate::services::ProductService;
use crate::state::AppState;

/// New product body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub price: i32,
    pub image_url: String,
}

/// A catalog entry.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub price: i32,
    pub image_url: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image_url: product.image_url,
        }
    }
}

/// List all products.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>> {
    let products = ProductService::new(state.products()).list().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// Show a product.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<ProductResponse>> {
    let product = ProductService::new(state.products()).find(id).await?;
    Ok(Json(product.into()))
}

/// Add a product to the catalog.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ProductRequest>,
) -> Result<Response> {
    let id = ProductService::new(state.products())
        .create(&request.name, request.price, &request.image_url)
        .await?;

    tracing::info!(product_id = %id, name = %request.name, "Product created");

    Ok(created(&format!("/api/products/{id}")))
}

/// Remove a product.
#[instrument(skip_all)]
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<StatusCode> {
    ProductService::new(state.products()).delete(id).await?;

    tracing::info!(product_id = %id, "Product deleted");

    Ok(StatusCode::NO_CONTENT)
}
