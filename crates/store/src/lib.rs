//! Basket Store - The session cart coordinator.
//!
//! Independent widgets (product cards, the bottom cart bar, a cart sidebar)
//! share one [`CartStore`] instead of each keeping a cart of their own. The
//! store persists every change to session-scoped storage and tells every
//! registered listener about it, in registration order.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//!
//! use basket_core::{NewCartLine, Price, ProductId};
//! use basket_store::{CartStore, CartView, MemoryStorage};
//!
//! let store = Rc::new(CartStore::open(MemoryStorage::new(), "restaurant_cart"));
//! store.add_listener(|snapshot| {
//!     let view = CartView::from(snapshot);
//!     assert_eq!(view.items_label, "1 item");
//! });
//!
//! let tea = NewCartLine::new(ProductId::parse("p1")?, "Tea", "5".parse::<Price>()?);
//! assert!(store.add_to_cart(tea)?.is_saved());
//! assert_eq!(store.total_items(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! - [`store`] - The store and its commit pipeline
//! - [`storage`] - Session storage backends
//! - [`persist`] - Persisted cart format and record validation
//! - [`view`] - Display data for rendering widgets
//! - [`config`] - Environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod listeners;
pub mod persist;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod view;

pub use config::{CartConfig, ConfigError, LogFormat};
pub use error::{CartError, PersistenceError};
pub use listeners::ListenerId;
pub use snapshot::CartSnapshot;
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
pub use store::{CartStore, Commit, RestoreReport};
pub use view::{CartItemView, CartView};
