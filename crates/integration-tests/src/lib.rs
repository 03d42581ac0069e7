//! Integration tests for Basket.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p basket-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_properties` - Store behavior that holds for any mutation sequence
//! - `session_persistence` - Carts surviving a reopen through real storage
//! - `widgets` - Listener fan-out and widget rendering

use std::cell::RefCell;
use std::rc::Rc;

use basket_core::{NewCartLine, Price, ProductId};
use basket_store::{CartSnapshot, CartStore, SessionStorage};

/// Parse a product id that is known to be valid.
///
/// # Panics
///
/// Panics if `raw` is not a valid product id.
#[must_use]
pub fn id(raw: &str) -> ProductId {
    ProductId::parse(raw).expect("test product id should be valid")
}

/// Build a product priced in cents.
///
/// # Panics
///
/// Panics if the id is invalid or the price is negative.
#[must_use]
pub fn product(raw_id: &str, name: &str, cents: i64) -> NewCartLine {
    let price = Price::from_cents(cents).expect("test price should be valid");
    NewCartLine::new(id(raw_id), name, price)
}

/// Snapshots received by a listener, in delivery order.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    received: Rc<RefCell<Vec<CartSnapshot>>>,
}

impl Recorder {
    /// Register a new recorder on `store`.
    pub fn attach<S: SessionStorage>(store: &CartStore<S>) -> Self {
        let recorder = Self::default();
        let sink = Rc::clone(&recorder.received);
        store.add_listener(move |snapshot| sink.borrow_mut().push(snapshot.clone()));
        recorder
    }

    /// Everything received so far.
    #[must_use]
    pub fn snapshots(&self) -> Vec<CartSnapshot> {
        self.received.borrow().clone()
    }

    /// Number of notifications received.
    #[must_use]
    pub fn count(&self) -> usize {
        self.received.borrow().len()
    }

    /// The most recent snapshot, if any.
    #[must_use]
    pub fn last(&self) -> Option<CartSnapshot> {
        self.received.borrow().last().cloned()
    }
}
