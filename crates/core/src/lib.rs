//! Basket Core - Cart domain types.
//!
//! This crate provides the value types shared by every Basket component:
//! - `store` - The session cart store and its persistence
//! - `cli` - Command-line host that drives a session cart
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage,
//! no listeners. Every constructor validates its input, so a value of one of
//! these types is always a legal cart value.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product ids, prices, quantities and cart lines

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
