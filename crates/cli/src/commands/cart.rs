//! Cart commands.
//!
//! Mutating commands attach a cart bar listener before touching the store,
//! so the summary line printed after a change comes from the same
//! notification any other widget would receive.

use std::fmt::Write as _;

use basket_core::{NewCartLine, Price, ProductId};
use basket_store::{CartSnapshot, CartStore, CartView, Commit, SessionStorage};

use super::CliError;

/// Log what happened while restoring the session cart.
pub fn report_restore<S: SessionStorage>(store: &CartStore<S>) {
    let key = store.storage_key();
    let report = store.restore_report();
    if let Some(failure) = &report.failure {
        tracing::warn!(key, error = %failure, "Session cart could not be restored, starting empty");
    }
    if !report.rejected.is_empty() {
        tracing::warn!(
            key,
            dropped = report.rejected.len(),
            "Dropped invalid lines from the session cart"
        );
    }
    tracing::debug!(key, restored = report.restored, "Session cart ready");
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if the line is already at its maximum quantity.
pub fn add<S: SessionStorage>(
    store: &CartStore<S>,
    id: ProductId,
    name: String,
    price: Price,
    image: Option<String>,
) -> Result<(), CliError> {
    attach_cart_bar(store);
    let mut item = NewCartLine::new(id, name, price);
    item.image = image;
    report_commit(&store.add_to_cart(item)?);
    Ok(())
}

/// Remove a product's line.
///
/// # Errors
///
/// Currently infallible; kept fallible like the other commands.
pub fn remove<S: SessionStorage>(store: &CartStore<S>, id: &ProductId) -> Result<(), CliError> {
    attach_cart_bar(store);
    report_commit(&store.remove_from_cart(id)?);
    Ok(())
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns an error for negative or oversized quantities.
pub fn set<S: SessionStorage>(
    store: &CartStore<S>,
    id: &ProductId,
    quantity: i64,
) -> Result<(), CliError> {
    attach_cart_bar(store);
    report_commit(&store.update_quantity(id, quantity)?);
    Ok(())
}

/// Add one unit to an existing line.
///
/// # Errors
///
/// Returns an error if the line is already at its maximum quantity.
pub fn increment<S: SessionStorage>(store: &CartStore<S>, id: &ProductId) -> Result<(), CliError> {
    attach_cart_bar(store);
    report_commit(&store.increment_quantity(id)?);
    Ok(())
}

/// Take one unit off an existing line.
///
/// # Errors
///
/// Currently infallible; kept fallible like the other commands.
pub fn decrement<S: SessionStorage>(store: &CartStore<S>, id: &ProductId) -> Result<(), CliError> {
    attach_cart_bar(store);
    report_commit(&store.decrement_quantity(id)?);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Currently infallible; kept fallible like the other commands.
pub fn clear<S: SessionStorage>(store: &CartStore<S>) -> Result<(), CliError> {
    attach_cart_bar(store);
    report_commit(&store.clear_cart()?);
    Ok(())
}

/// Print the cart.
///
/// # Errors
///
/// Returns an error if JSON output was requested and encoding failed.
pub fn show<S: SessionStorage>(store: &CartStore<S>, json: bool) -> Result<(), CliError> {
    let snapshot = store.snapshot();
    let output = if json {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        render_cart(&snapshot)
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}

fn attach_cart_bar<S: SessionStorage>(store: &CartStore<S>) {
    store.add_listener(|snapshot| {
        let bar = render_bar(&CartView::from(snapshot));
        #[allow(clippy::print_stdout)]
        {
            println!("{bar}");
        }
    });
}

fn report_commit(commit: &Commit) {
    match commit {
        Commit::Saved => tracing::debug!("Cart saved"),
        Commit::Unsaved(e) => {
            tracing::warn!(error = %e, "Cart updated but not saved; it will not survive this session");
        }
        Commit::Deferred => tracing::debug!("Cart change deferred"),
        Commit::Unchanged => tracing::info!("Product is not in the cart, nothing changed"),
    }
}

/// One-line cart bar summary, or the empty state.
fn render_bar(view: &CartView) -> String {
    if view.visible {
        format!("[cart] {} | {}", view.items_label, view.badge_total)
    } else {
        "[cart] empty".to_string()
    }
}

/// Multi-line cart listing.
fn render_cart(snapshot: &CartSnapshot) -> String {
    let view = CartView::from(snapshot);
    if !view.visible {
        return "Cart is empty".to_string();
    }

    let mut out = String::new();
    for item in &view.items {
        let _ = writeln!(
            out,
            "{:<12} {:<24} x{:<4} {:>10} {:>10}",
            item.id, item.title, item.quantity, item.price, item.line_price
        );
    }
    let _ = write!(out, "{} | subtotal {}", view.items_label, view.subtotal);
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use basket_store::MemoryStorage;

    use super::*;

    fn store_with_tea() -> CartStore<MemoryStorage> {
        let store = CartStore::open(MemoryStorage::new(), "restaurant_cart");
        store
            .add_to_cart(NewCartLine::new(
                ProductId::parse("p1").unwrap(),
                "Tea",
                "4.5".parse().unwrap(),
            ))
            .unwrap();
        store
    }

    #[test]
    fn test_render_bar() {
        let store = store_with_tea();
        assert_eq!(
            render_bar(&CartView::from(&store.snapshot())),
            "[cart] 1 item | $5"
        );
        assert_eq!(render_bar(&CartView::empty()), "[cart] empty");
    }

    #[test]
    fn test_render_cart() {
        let store = store_with_tea();
        store.update_quantity(&ProductId::parse("p1").unwrap(), 2).unwrap();

        let rendered = render_cart(&store.snapshot());
        let mut lines = rendered.lines();
        let first = lines.next().unwrap();
        assert!(first.starts_with("p1"));
        assert!(first.contains("Tea"));
        assert!(first.contains("x2"));
        assert!(first.contains("$9.00"));
        assert_eq!(lines.next().unwrap(), "2 items | subtotal $9.00");
    }

    #[test]
    fn test_render_empty_cart() {
        let store = CartStore::open(MemoryStorage::new(), "restaurant_cart");
        assert_eq!(render_cart(&store.snapshot()), "Cart is empty");
    }

    #[test]
    fn test_commands_persist_to_session_dir() {
        let dir = tempfile::tempdir().unwrap();
        let id = ProductId::parse("p1").unwrap();

        {
            let store = CartStore::open(basket_store::FileStorage::new(dir.path()), "cart");
            add(&store, id.clone(), "Tea".to_string(), "5".parse().unwrap(), None).unwrap();
            increment(&store, &id).unwrap();
        }

        let store = CartStore::open(basket_store::FileStorage::new(dir.path()), "cart");
        report_restore(&store);
        assert_eq!(store.storage_key(), "cart");
        assert_eq!(store.restore_report().restored, 1);
        assert_eq!(store.total_items(), 2);

        set(&store, &id, 0).unwrap();
        assert!(store.is_empty());
        assert!(set(&store, &id, -1).is_err());
    }
}
