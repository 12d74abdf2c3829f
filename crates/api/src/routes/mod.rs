//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                               - Liveness
//! GET    /health/ready                         - Readiness (store reachable)
//!
//! # Auth
//! POST   /api/login                            - Exchange credentials for a token
//!
//! # Customers
//! POST   /api/customers                        - Register
//! GET    /api/customers/{id}                   - Show
//! PUT    /api/customers/{id}                   - Update
//! DELETE /api/customers/{id}                   - Delete
//! GET    /api/customers/me                     - Show own profile (auth)
//! PUT    /api/customers/me                     - Update own profile (auth)
//! DELETE /api/customers/me                     - Delete own account (auth)
//!
//! # Products
//! GET    /api/products                         - List
//! POST   /api/products                         - Create
//! GET    /api/products/{id}                    - Show
//! DELETE /api/products/{id}                    - Delete
//!
//! # Cart (auth)
//! GET    /api/customers/me/carts               - List cart items
//! POST   /api/customers/me/carts               - Add a product
//! GET    /api/customers/me/carts/{cartItemId}  - Show cart item
//! PATCH  /api/customers/me/carts/{cartItemId}  - Change quantity
//! DELETE /api/customers/me/carts/{cartItemId}  - Remove
//!
//! # Orders (auth)
//! POST   /api/customers/me/orders              - Check out cart items
//! GET    /api/customers/me/orders              - Order history
//! GET    /api/customers/me/orders/{orderId}    - Show order
//! ```

pub mod auth;
pub mod carts;
pub mod customers;
pub mod health;
pub mod orders;
pub mod products;

use axum::{
    Router,
    http::{HeaderValue, StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(auth::login))
}

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/customers", post(customers::create))
        .route(
            "/customers/me",
            get(customers::show_me)
                .put(customers::update_me)
                .delete(customers::delete_me),
        )
        .route(
            "/customers/{id}",
            get(customers::show)
                .put(customers::update)
                .delete(customers::delete),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index).post(products::create))
        .route(
            "/products/{id}",
            get(products::show).delete(products::delete),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/customers/me/carts", get(carts::index).post(carts::add))
        .route(
            "/customers/me/carts/{cart_item_id}",
            get(carts::show).patch(carts::update).delete(carts::remove),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/customers/me/orders",
            get(orders::index).post(orders::checkout),
        )
        .route("/customers/me/orders/{order_id}", get(orders::show))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .merge(auth_routes())
        .merge(customer_routes())
        .merge(product_routes())
        .merge(cart_routes())
        .merge(order_routes());

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api)
}

/// `201 Created` pointing at the new resource.
pub(crate) fn created(location: &str) -> Response {
    let mut response = StatusCode::CREATED.into_response();
    if let Ok(value) = HeaderValue::from_str(location) {
        response.headers_mut().insert(LOCATION, value);
    }
    response
}
