//! Core types for Basket.
//!
//! This module provides type-safe wrappers for the cart's domain concepts.

pub mod id;
pub mod line;
pub mod price;
pub mod quantity;

pub use id::{ProductId, ProductIdError};
pub use line::{CartLine, NewCartLine};
pub use price::{Price, PriceError};
pub use quantity::{Quantity, QuantityError};
