//! In-memory session storage.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::{SessionStorage, StorageError};

/// Session storage held in process memory.
///
/// The quota counts the UTF-8 bytes of every key and value in the session,
/// the way browsers account for session storage. Storage can also be
/// switched off entirely, which makes every call fail with
/// [`StorageError::Disabled`].
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
    quota: Option<usize>,
    disabled: Cell<bool>,
}

impl MemoryStorage {
    /// Create an unlimited, empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty storage that refuses writes beyond `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Turn the storage off or back on.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Whether no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    fn ensure_enabled(&self) -> Result<(), StorageError> {
        if self.disabled.get() {
            return Err(StorageError::Disabled);
        }
        Ok(())
    }

    fn usage_after(&self, key: &str, value: &str) -> usize {
        self.items
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum::<usize>()
            + key.len()
            + value.len()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.ensure_enabled()?;
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.ensure_enabled()?;

        if let Some(quota) = self.quota {
            let needed = self.usage_after(key, value);
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.ensure_enabled()?;
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("cart").unwrap(), None);

        storage.set_item("cart", "{}").unwrap();
        assert_eq!(storage.get_item("cart").unwrap().as_deref(), Some("{}"));
        assert_eq!(storage.len(), 1);

        storage.remove_item("cart").unwrap();
        assert!(storage.is_empty());
        storage.remove_item("cart").unwrap();
    }

    #[test]
    fn test_quota_exceeded() {
        let storage = MemoryStorage::with_quota(10);
        storage.set_item("k", "123456789").unwrap();

        let err = storage.set_item("k", "1234567890").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                needed: 11,
                quota: 10
            }
        ));
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("123456789"));
    }

    #[test]
    fn test_quota_counts_replaced_value_once() {
        let storage = MemoryStorage::with_quota(6);
        storage.set_item("k", "abcde").unwrap();
        storage.set_item("k", "vwxyz").unwrap();
    }

    #[test]
    fn test_disabled() {
        let storage = MemoryStorage::new();
        storage.set_disabled(true);
        assert!(matches!(storage.get_item("k"), Err(StorageError::Disabled)));
        assert!(matches!(
            storage.set_item("k", "v"),
            Err(StorageError::Disabled)
        ));

        storage.set_disabled(false);
        storage.set_item("k", "v").unwrap();
    }
}
