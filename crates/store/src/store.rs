//! The session cart store.
//!
//! One [`CartStore`] owns the authoritative cart for a page or application
//! context. Widgets receive it by reference (usually an `Rc<CartStore<_>>`)
//! and never keep carts of their own.
//!
//! Every change runs the same sequence: apply to memory, persist to session
//! storage, notify listeners in registration order. A failed persist is
//! logged and reported in the returned [`Commit`], but never stops the
//! notification, so what listeners render always matches memory.
//!
//! # Re-entrancy
//!
//! Listeners may call back into the store. Reads see the state that was just
//! committed. Mutations requested while listeners are running are queued and
//! applied, each with its own persist and notify round, once the current
//! round has finished; the caller gets [`Commit::Deferred`].
//!
//! The store uses `RefCell`/`Cell` internally and is neither `Send` nor
//! `Sync`: it belongs to a single event loop.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use basket_core::{CartLine, NewCartLine, ProductId, Quantity};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::config::CartConfig;
use crate::error::{CartError, PersistenceError, Result};
use crate::listeners::{self, ListenerId, Listeners};
use crate::persist::{self, RejectedRecord};
use crate::snapshot::{self, CartSnapshot};
use crate::storage::SessionStorage;

/// Outcome of a mutation that the cart accepted.
#[derive(Debug)]
pub enum Commit {
    /// Applied, persisted, and listeners notified.
    Saved,
    /// Applied and listeners notified, but persisting failed.
    ///
    /// Memory and session storage now disagree until the next successful save.
    Unsaved(PersistenceError),
    /// Requested from inside a listener; queued behind the current round.
    ///
    /// The queued mutation is validated only when it runs. If it is refused
    /// then (for example an add past the maximum quantity), the refusal is
    /// logged and dropped, since this caller has already returned.
    Deferred,
    /// The target line does not exist; nothing was persisted or notified.
    Unchanged,
}

impl Commit {
    /// Whether the change reached session storage.
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// What happened when the store restored its cart at construction.
#[derive(Debug, Default)]
pub struct RestoreReport {
    /// Lines restored from session storage.
    pub restored: usize,
    /// Stored records dropped by validation.
    pub rejected: Vec<RejectedRecord>,
    /// Why nothing could be restored, if reading or parsing failed outright.
    pub failure: Option<PersistenceError>,
}

#[derive(Debug)]
enum Mutation {
    Add(NewCartLine),
    Remove(ProductId),
    Set(ProductId, Option<Quantity>),
    Increment(ProductId),
    Decrement(ProductId),
    Clear,
}

/// The authoritative cart for one session.
pub struct CartStore<S: SessionStorage> {
    storage: S,
    key: String,
    lines: RefCell<Vec<CartLine>>,
    listeners: RefCell<Listeners>,
    pending: RefCell<VecDeque<Mutation>>,
    notifying: Cell<bool>,
    degraded: Cell<bool>,
    restore: RestoreReport,
}

impl<S: SessionStorage> CartStore<S> {
    /// Open the cart stored under `key`, restoring whatever valid lines it
    /// holds.
    ///
    /// Never fails: unreadable or corrupt data leaves an empty cart, and the
    /// reason is kept in [`CartStore::restore_report`].
    #[must_use]
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let (lines, restore) = restore(&storage, &key);

        tracing::debug!(
            key = %key,
            restored = restore.restored,
            rejected = restore.rejected.len(),
            "Cart store opened"
        );

        Self {
            storage,
            key,
            lines: RefCell::new(lines),
            listeners: RefCell::new(Listeners::default()),
            pending: RefCell::new(VecDeque::new()),
            notifying: Cell::new(false),
            degraded: Cell::new(false),
            restore,
        }
    }

    /// Open the cart under the configured storage key.
    #[must_use]
    pub fn from_config(storage: S, config: &CartConfig) -> Self {
        Self::open(storage, config.storage_key.clone())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of a product.
    ///
    /// A product already in the cart gains one unit and keeps the name,
    /// price and image it was first added with.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if the line is already at the
    /// maximum quantity.
    #[instrument(skip_all, fields(id = %item.id))]
    pub fn add_to_cart(&self, item: NewCartLine) -> Result<Commit> {
        self.dispatch(Mutation::Add(item))
    }

    /// Remove a product's line.
    ///
    /// Removing a product that is not in the cart is a no-op.
    ///
    /// # Errors
    ///
    /// Never fails today; the `Result` keeps all mutators uniform.
    #[instrument(skip_all, fields(id = %id))]
    pub fn remove_from_cart(&self, id: &ProductId) -> Result<Commit> {
        self.dispatch(Mutation::Remove(id.clone()))
    }

    /// Set a line's quantity.
    ///
    /// `0` removes the line. Products not in the cart are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for negative quantities or
    /// quantities above `u32::MAX`.
    #[instrument(skip_all, fields(id = %id, quantity = quantity))]
    pub fn update_quantity(&self, id: &ProductId, quantity: i64) -> Result<Commit> {
        let quantity =
            Quantity::from_requested(quantity).map_err(|source| CartError::InvalidQuantity {
                id: id.clone(),
                source,
            })?;
        self.dispatch(Mutation::Set(id.clone(), quantity))
    }

    /// Add one unit to an existing line.
    ///
    /// Products not in the cart are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if the line is already at the
    /// maximum quantity.
    #[instrument(skip_all, fields(id = %id))]
    pub fn increment_quantity(&self, id: &ProductId) -> Result<Commit> {
        self.dispatch(Mutation::Increment(id.clone()))
    }

    /// Take one unit off an existing line, removing it at zero.
    ///
    /// # Errors
    ///
    /// Never fails today; the `Result` keeps all mutators uniform.
    #[instrument(skip_all, fields(id = %id))]
    pub fn decrement_quantity(&self, id: &ProductId) -> Result<Commit> {
        self.dispatch(Mutation::Decrement(id.clone()))
    }

    /// Empty the cart.
    ///
    /// Always persists and notifies, even when the cart is already empty.
    ///
    /// # Errors
    ///
    /// Never fails today; the `Result` keeps all mutators uniform.
    #[instrument(skip_all)]
    pub fn clear_cart(&self) -> Result<Commit> {
        self.dispatch(Mutation::Clear)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// A copy of one line, or `None` if the product is not in the cart.
    #[must_use]
    pub fn cart_item(&self, id: &ProductId) -> Option<CartLine> {
        self.lines
            .borrow()
            .iter()
            .find(|line| line.id == *id)
            .cloned()
    }

    /// A copy of every line in cart order.
    #[must_use]
    pub fn cart_items(&self) -> Vec<CartLine> {
        self.lines.borrow().clone()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        snapshot::total_items(&self.lines.borrow())
    }

    /// Sum of `price * quantity` over all lines, unrounded.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        snapshot::total_price(&self.lines.borrow())
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.borrow().is_empty()
    }

    /// The current cart as listeners would receive it.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::from_lines(&self.lines.borrow())
    }

    /// Whether the last persist attempt failed.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded.get()
    }

    /// The outcome of restoring the cart when the store was opened.
    #[must_use]
    pub const fn restore_report(&self) -> &RestoreReport {
        &self.restore
    }

    /// The session storage key the cart is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Register a listener called with a [`CartSnapshot`] after every change.
    ///
    /// Listeners run in registration order. A listener that panics is logged
    /// and skipped; the others still run.
    pub fn add_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&CartSnapshot) + 'static,
    {
        self.listeners.borrow_mut().add(Rc::new(listener))
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.borrow_mut().remove(id)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    // =========================================================================
    // Commit pipeline
    // =========================================================================

    fn dispatch(&self, mutation: Mutation) -> Result<Commit> {
        if self.notifying.get() {
            tracing::debug!(?mutation, "Mutation requested during notification, queued");
            self.pending.borrow_mut().push_back(mutation);
            return Ok(Commit::Deferred);
        }

        let commit = self.commit(mutation)?;
        self.drain_pending();
        Ok(commit)
    }

    fn drain_pending(&self) {
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(mutation) = next else {
                break;
            };
            if let Err(e) = self.commit(mutation) {
                tracing::warn!(error = %e, "Queued cart mutation rejected");
            }
        }
    }

    fn commit(&self, mutation: Mutation) -> Result<Commit> {
        if !self.apply(mutation)? {
            return Ok(Commit::Unchanged);
        }

        let saved = self.persist();
        self.notify();

        Ok(match saved {
            Ok(()) => Commit::Saved,
            Err(e) => Commit::Unsaved(e),
        })
    }

    /// Apply a mutation to memory. Returns whether the cart changed.
    fn apply(&self, mutation: Mutation) -> Result<bool> {
        let mut lines = self.lines.borrow_mut();

        match mutation {
            Mutation::Add(item) => {
                if let Some(line) = lines.iter_mut().find(|l| l.id == item.id) {
                    line.quantity = line.quantity.checked_increment().map_err(|source| {
                        CartError::InvalidQuantity {
                            id: item.id.clone(),
                            source,
                        }
                    })?;
                    tracing::debug!(id = %line.id, quantity = %line.quantity, "Cart line incremented");
                } else {
                    tracing::debug!(id = %item.id, "Cart line added");
                    lines.push(CartLine::from(item));
                }
                Ok(true)
            }
            Mutation::Remove(id) | Mutation::Set(id, None) => {
                let before = lines.len();
                lines.retain(|l| l.id != id);
                if lines.len() == before {
                    return Ok(false);
                }
                tracing::debug!(id = %id, "Cart line removed");
                Ok(true)
            }
            Mutation::Set(id, Some(quantity)) => {
                let Some(line) = lines.iter_mut().find(|l| l.id == id) else {
                    return Ok(false);
                };
                line.quantity = quantity;
                tracing::debug!(id = %id, quantity = %quantity, "Cart line quantity set");
                Ok(true)
            }
            Mutation::Increment(id) => {
                let Some(line) = lines.iter_mut().find(|l| l.id == id) else {
                    return Ok(false);
                };
                line.quantity = line
                    .quantity
                    .checked_increment()
                    .map_err(|source| CartError::InvalidQuantity { id, source })?;
                Ok(true)
            }
            Mutation::Decrement(id) => {
                let Some(line) = lines.iter_mut().find(|l| l.id == id) else {
                    return Ok(false);
                };
                if let Some(quantity) = line.quantity.decrement() {
                    line.quantity = quantity;
                } else {
                    lines.retain(|l| l.id != id);
                    tracing::debug!(id = %id, "Cart line removed at zero");
                }
                Ok(true)
            }
            Mutation::Clear => {
                lines.clear();
                tracing::debug!("Cart cleared");
                Ok(true)
            }
        }
    }

    fn persist(&self) -> std::result::Result<(), PersistenceError> {
        let result = persist::encode(&self.lines.borrow())
            .and_then(|blob| {
                self.storage
                    .set_item(&self.key, &blob)
                    .map_err(PersistenceError::from)
            });

        match &result {
            Ok(()) => {
                if self.degraded.replace(false) {
                    tracing::info!(key = %self.key, "Cart persistence recovered");
                }
            }
            Err(e) => {
                self.degraded.set(true);
                tracing::warn!(key = %self.key, error = %e, "Failed to persist cart");
            }
        }

        result
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        let round = self.listeners.borrow().round();

        self.notifying.set(true);
        let failed = listeners::notify_all(&round, &snapshot);
        self.notifying.set(false);

        if failed > 0 {
            tracing::warn!(failed, listeners = round.len(), "Some cart listeners failed");
        }
    }
}

fn restore<S: SessionStorage>(storage: &S, key: &str) -> (Vec<CartLine>, RestoreReport) {
    let blob = match storage.get_item(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => return (Vec::new(), RestoreReport::default()),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read stored cart, starting empty");
            return (Vec::new(), failed_restore(e.into()));
        }
    };

    match persist::decode(&blob) {
        Ok(decoded) => {
            for record in &decoded.rejected {
                tracing::warn!(
                    key,
                    record = %record.key,
                    reason = %record.reason,
                    "Dropped invalid stored cart record"
                );
            }
            let report = RestoreReport {
                restored: decoded.lines.len(),
                rejected: decoded.rejected,
                failure: None,
            };
            (decoded.lines, report)
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "Stored cart is unreadable, starting empty");
            (Vec::new(), failed_restore(e))
        }
    }
}

fn failed_restore(failure: PersistenceError) -> RestoreReport {
    RestoreReport {
        failure: Some(failure),
        ..RestoreReport::default()
    }
}
