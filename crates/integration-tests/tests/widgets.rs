//! Listener fan-out and the widgets built on top of it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use basket_integration_tests::{Recorder, id, product};
use basket_store::{CartStore, CartView, Commit, MemoryStorage};

fn store() -> Rc<CartStore<MemoryStorage>> {
    Rc::new(CartStore::open(MemoryStorage::new(), "restaurant_cart"))
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn test_listeners_run_in_registration_order_with_same_snapshot() {
    let store = store();
    let order = Rc::new(RefCell::new(Vec::new()));

    for name in ["card", "bar", "sidebar"] {
        let order = Rc::clone(&order);
        store.add_listener(move |snapshot| {
            order.borrow_mut().push((name, snapshot.clone()));
        });
    }

    store.add_to_cart(product("p1", "Tea", 500)).unwrap();

    let order = order.borrow();
    let names: Vec<_> = order.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, ["card", "bar", "sidebar"]);
    let (_, first) = order.first().unwrap();
    assert!(order.iter().all(|(_, snapshot)| snapshot == first));
}

#[test]
fn test_each_mutation_notifies_once() {
    let store = store();
    let recorder = Recorder::attach(&store);

    store.add_to_cart(product("p1", "Tea", 500)).unwrap();
    store.increment_quantity(&id("p1")).unwrap();
    store.decrement_quantity(&id("p1")).unwrap();
    store.remove_from_cart(&id("p1")).unwrap();
    store.remove_from_cart(&id("p1")).unwrap();

    assert_eq!(recorder.count(), 4);
    assert!(recorder.last().unwrap().is_empty());
}

// =============================================================================
// Re-entrancy
// =============================================================================

#[test]
fn test_listener_mutation_runs_after_round_completes() {
    let store = store();
    let weak: Weak<CartStore<MemoryStorage>> = Rc::downgrade(&store);
    let commits = Rc::new(RefCell::new(Vec::new()));

    {
        let commits = Rc::clone(&commits);
        store.add_listener(move |snapshot| {
            // A "free dessert" widget that tops up the cart once.
            if snapshot.total_items == 1
                && let Some(store) = weak.upgrade()
            {
                let commit = store.add_to_cart(product("d1", "Dessert", 0));
                commits.borrow_mut().push(commit);
            }
        });
    }
    let recorder = Recorder::attach(&store);

    store.add_to_cart(product("p1", "Tea", 500)).unwrap();

    let commits = commits.borrow();
    assert!(matches!(commits.as_slice(), [Ok(Commit::Deferred)]));

    let totals: Vec<_> = recorder
        .snapshots()
        .iter()
        .map(|snapshot| snapshot.total_items)
        .collect();
    assert_eq!(totals, [1, 2]);
    assert!(store.cart_item(&id("d1")).is_some());
}

#[test]
fn test_panicking_widget_does_not_block_others() {
    let store = store();
    store.add_listener(|_| panic!("widget crashed"));
    let recorder = Recorder::attach(&store);

    assert!(store.add_to_cart(product("p1", "Tea", 500)).unwrap().is_saved());
    assert_eq!(recorder.count(), 1);
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn test_cart_bar_tracks_changes() {
    let store = store();
    let views = Rc::new(RefCell::new(Vec::new()));
    {
        let views = Rc::clone(&views);
        store.add_listener(move |snapshot| views.borrow_mut().push(CartView::from(snapshot)));
    }

    store.add_to_cart(product("p1", "Tea", 450)).unwrap();
    store.update_quantity(&id("p1"), 3).unwrap();
    store.clear_cart().unwrap();

    let views = views.borrow();
    let bar: Vec<_> = views
        .iter()
        .map(|view| (view.visible, view.items_label.as_str(), view.badge_total.as_str()))
        .collect();
    assert_eq!(
        bar,
        [
            (true, "1 item", "$5"),
            (true, "3 items", "$14"),
            (false, "0 items", "$0"),
        ]
    );
    assert_eq!(views.get(1).unwrap().subtotal, "$13.50");
}
