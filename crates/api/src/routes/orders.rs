//! Order route handlers.

use axum::{Json, extract::State, response::Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shopping_cart_core::{CartItemId, OrderId, ProductId};

use super::created;
use crate::error::Result;
use crate::middleware::{ApiJson, ApiPath, RequireAuth};
use crate::models::{Order, OrderDetail};
use crate::services::OrderService;
use crate::state::AppState;

/// Checkout body: the cart lines to order.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub cart_item_ids: Vec<CartItemId>,
}

/// One ordered product, as it was at checkout.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailResponse {
    pub product_id: ProductId,
    pub name: String,
    pub price: i32,
    pub image_url: String,
    pub quantity: i32,
}

/// An order with its lines.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: OrderId,
    pub ordered_at: DateTime<Utc>,
    pub total_price: i64,
    pub order_details: Vec<OrderDetailResponse>,
}

impl From<OrderDetail> for OrderDetailResponse {
    fn from(detail: OrderDetail) -> Self {
        Self {
            product_id: detail.product_id,
            name: detail.name,
            price: detail.price,
            image_url: detail.image_url,
            quantity: detail.quantity.get(),
        }
    }
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let total_price = order
            .details
            .iter()
            .map(|d| i64::from(d.price) * i64::from(d.quantity.get()))
            .sum();

        Self {
            id: order.id,
            ordered_at: order.ordered_at,
            total_price,
            order_details: order.details.into_iter().map(Into::into).collect(),
        }
    }
}

/// Check out cart lines into a new order.
#[instrument(skip_all)]
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(login): RequireAuth,
    ApiJson(request): ApiJson<OrderRequest>,
) -> Result<Response> {
    let id = OrderService::new(state.orders())
        .checkout(login.id, &request.cart_item_ids)
        .await?;

    tracing::info!(order_id = %id, items = request.cart_item_ids.len(), "Order placed");

    Ok(created(&format!("/api/customers/me/orders/{id}")))
}

/// Order history.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(login): RequireAuth,
) -> Result<Json<Vec<OrderResponse>>> {
    let orders = OrderService::new(state.orders()).list(login.id).await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// Show one order.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(login): RequireAuth,
    ApiPath(id): ApiPath<OrderId>,
) -> Result<Json<OrderResponse>> {
    let order = OrderService::new(state.orders()).find(login.id, id).await?;
    Ok(Json(order.into()))
}
