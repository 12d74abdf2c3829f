//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Login, JWT issue/verify
//! - `customers` - Registration and profile management
//! - `products` - Product catalog
//! - `carts` - Per-customer cart lines
//! - `orders` - Checkout and order history
//!
//! Services borrow their repositories from `AppState` and are constructed
//! per request. Each has its own error enum whose `Display` text is the
//! message returned to API clients.

pub mod auth;
pub mod carts;
pub mod customers;
pub mod orders;
pub mod password;
pub mod products;

pub use auth::{AuthError, AuthService, JwtTokenProvider};
pub use carts::{CartError, CartService};
pub use customers::{CustomerError, CustomerService};
pub use orders::{OrderError, OrderService};
pub use products::{ProductError, ProductService};
