//! Domain models.
//!
//! These types represent validated domain objects separate from database row
//! types and from the JSON request/response bodies defined next to each route.

pub mod cart;
pub mod customer;
pub mod order;
pub mod product;

pub use cart::CartItem;
pub use customer::{Customer, LoginCustomer};
pub use order::{Order, OrderDetail};
pub use product::{NewProduct, Product};
