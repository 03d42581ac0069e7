//! Change listeners and their isolation.

use core::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::snapshot::CartSnapshot;

/// Handle returned when a listener is registered.
///
/// Pass it back to [`CartStore::remove_listener`](crate::CartStore::remove_listener)
/// to unsubscribe. Handles are never reused within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

pub(crate) type Callback = Rc<dyn Fn(&CartSnapshot)>;

/// Registered listeners in registration order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Callback)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, callback: Callback) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// The current listener list, detached from the registry.
    ///
    /// Listeners added or removed while a round is running take effect on
    /// the next round.
    pub(crate) fn round(&self) -> Vec<(ListenerId, Callback)> {
        self.entries.clone()
    }
}

/// Call every listener in order, isolating panics.
///
/// Returns how many listeners panicked.
pub(crate) fn notify_all(round: &[(ListenerId, Callback)], snapshot: &CartSnapshot) -> usize {
    let mut failed = 0;
    for (id, callback) in round {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback(snapshot))) {
            failed += 1;
            tracing::error!(
                listener = %id,
                panic = panic_message(payload.as_ref()),
                "Cart listener panicked"
            );
        }
    }
    failed
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
