//! Key-value storage for saved editor state.
//!
//! Stores are shared-reference APIs with interior mutability, like browser storage, so a
//! store can be read while an autosaver holds on to it.

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    /// The store can't hold a value this large. Retrying won't help until something shrinks.
    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: u64, quota: u64 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    #[must_use]
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}

pub trait KeyValueStore {
    /// Read a value, or `None` if the key was never written or was removed.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Write a value, replacing any previous one. On error, the old value is kept.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// A process-local store, optionally limited to a total number of bytes.
#[derive(Default, Debug)]
pub struct MemoryStore {
    entries: parking_lot::Mutex<hashbrown::HashMap<String, String>>,
    quota: Option<u64>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// A store that refuses to hold more than `quota` bytes of keys and values in total.
    #[must_use]
    pub fn with_quota(quota: u64) -> Self {
        Self {
            entries: parking_lot::Mutex::default(),
            quota: Some(quota),
        }
    }
}

fn byte_len(key: &str, value: &str) -> u64 {
    u64::try_from(key.len() + value.len()).unwrap_or(u64::MAX)
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        if let Some(quota) = self.quota {
            let others: u64 = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| byte_len(k, v))
                .sum();
            let needed = others.saturating_add(byte_len(key, value));
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn get_set_remove() {
        let store = MemoryStore::new();
        assert!(store.get("a").unwrap().is_none());
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        store.remove("a").unwrap();
        store.remove("a").unwrap();
        assert!(store.get("a").unwrap().is_none());
    }
    #[test]
    fn quota_keeps_old_value() {
        let store = MemoryStore::with_quota(10);
        store.set("k", "small").unwrap();
        let err = store.set("k", "far too large for it").unwrap_err();
        assert!(err.is_quota());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("small"));
    }
    #[test]
    fn quota_counts_replaced_value_once() {
        let store = MemoryStore::with_quota(6);
        store.set("k", "12345").unwrap();
        store.set("k", "54321").unwrap();
    }
}
