//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (per-request hub, capture errors) - added in `main`
//! 2. `TraceLayer` (request span)
//! 3. Request ID (record in span, echo in response)
//!
//! # Extractors
//!
//! - [`RequireAuth`] - Bearer token to `LoginCustomer`
//! - [`ApiJson`] / [`ApiPath`] - `Json` / `Path` with JSON error bodies

pub mod auth;
pub mod extract;
pub mod request_id;

pub use auth::RequireAuth;
pub use extract::{ApiJson, ApiPath};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
