//! Core types for the shopping cart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod quantity;
pub mod user_name;

pub use id::*;
pub use quantity::{Quantity, QuantityError};
pub use user_name::{UserName, UserNameError};
