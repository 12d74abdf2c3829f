//! Acceptance test harness for the shopping cart API.
//!
//! Each [`TestContext`] builds the full router over a fresh in-memory store
//! and drives it in-process with `tower::ServiceExt::oneshot`; no database
//! or listener is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopping-cart-integration-tests
//! ```
//!
//! # Fixtures
//!
//! Every context starts with three customers, all with password
//! [`PASSWORD`]: `puterism` (ID 1), `tanney-102` (ID 2) and
//! `gwangyeol-im` (ID 3), plus two products, 치킨 and 피자.

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use shopping_cart_api::config::{ApiConfig, LogFormat, StorageBackend};
use shopping_cart_api::db::{MemoryStore, Repositories};
use shopping_cart_api::services::{CustomerService, ProductService};
use shopping_cart_api::state::AppState;
use shopping_cart_core::{CustomerId, ProductId};

/// Signing secret of every test context.
pub const JWT_SECRET: &str = "kX9mP2vL8nQ4wR7tY1uI3oA6sD5fG0hJ";

/// Password of every seeded customer.
pub const PASSWORD: &str = "password";

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON, a JSON string for non-JSON text, or `Null` when empty.
    pub body: Value,
}

impl TestResponse {
    /// The `message` field of an error body.
    #[must_use]
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }

    /// The `Location` header.
    #[must_use]
    pub fn location(&self) -> &str {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    /// The trailing ID of the `Location` header.
    #[must_use]
    pub fn created_id(&self) -> i64 {
        self.location()
            .rsplit('/')
            .next()
            .and_then(|id| id.parse().ok())
            .unwrap_or_else(|| panic!("no ID in Location {:?}", self.location()))
    }
}

/// The router plus handles on the store it runs over.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
    router: Router,
    pub puterism: CustomerId,
    pub tanney: CustomerId,
    pub gwangyeol: CustomerId,
    pub chicken: ProductId,
    pub pizza: ProductId,
}

impl TestContext {
    /// A context with the standard fixtures.
    pub async fn new() -> Self {
        Self::with_token_validity(Duration::from_secs(3600)).await
    }

    /// A context whose tokens live for `validity`.
    pub async fn with_token_validity(validity: Duration) -> Self {
        let store = Arc::new(MemoryStore::new());
        let config = ApiConfig {
            storage: StorageBackend::Memory,
            database_url: None,
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            jwt_secret: SecretString::from(JWT_SECRET.to_string()),
            jwt_validity: validity,
            log_format: LogFormat::Pretty,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = AppState::new(config, Repositories::in_memory(store.clone()));

        let customers = CustomerService::new(state.customers());
        let puterism = customers.create("puterism", PASSWORD).await.unwrap();
        let tanney = customers.create("tanney-102", PASSWORD).await.unwrap();
        let gwangyeol = customers.create("gwangyeol-im", PASSWORD).await.unwrap();

        let products = ProductService::new(state.products());
        let chicken = products
            .create("치킨", 10_000, "https://img.example/chicken.png")
            .await
            .unwrap();
        let pizza = products
            .create("피자", 20_000, "https://img.example/pizza.png")
            .await
            .unwrap();

        Self {
            router: shopping_cart_api::app(state.clone()),
            store,
            state,
            puterism,
            tanney,
            gwangyeol,
            chicken,
            pizza,
        }
    }

    /// Send a request with an optional bearer token and JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let body = body.map(|b| b.to_string());
        self.send_raw(method, uri, token, body.as_deref()).await
    }

    /// Send a request whose body is sent verbatim as `application/json`.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// Log in through the API and return the access token.
    pub async fn login(&self, user_name: &str) -> String {
        let response = self
            .post(
                "/api/login",
                None,
                json!({ "userName": user_name, "password": PASSWORD }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {response:?}");
        response.body["accessToken"].as_str().unwrap().to_string()
    }

    /// Add a product to the cart of the token's owner and return the cart item ID.
    pub async fn add_to_cart(&self, token: &str, product_id: ProductId, quantity: i32) -> i64 {
        let response = self
            .post(
                "/api/customers/me/carts",
                Some(token),
                json!({ "productId": product_id, "quantity": quantity }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "add failed: {response:?}");
        response.created_id()
    }
}
