//! # File-backed storage
//!
//! One file per key, `<dir>/<key>.json`. Writes go to a temporary sibling first and are
//! renamed into place, so a crash mid-write leaves the old value intact.

use captioner_core::io::storage::{KeyValueStore, StorageError};

pub struct FileStore {
    dir: std::path::PathBuf,
    quota: Option<u64>,
}
impl FileStore {
    /// A store under `dir`, created on first write. Values over `quota` bytes are refused.
    #[must_use]
    pub fn new(dir: impl Into<std::path::PathBuf>, quota: Option<u64>) -> Self {
        Self {
            dir: dir.into(),
            quota,
        }
    }
    fn path_of(&self, key: &str) -> std::path::PathBuf {
        // Keys must not escape the directory.
        let file: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(file + ".json")
    }
}
impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_of(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let needed = u64::try_from(value.len()).unwrap_or(u64::MAX);
        if let Some(quota) = self.quota {
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_of(key);
        let temp = path.with_extension("json.tmp");
        std::fs::write(&temp, value)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_of(key)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn scratch(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "captioner-store-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn get_set_remove() {
        let dir = scratch("basic");
        let store = FileStore::new(&dir, None);
        assert!(store.get("state").unwrap().is_none());
        store.set("state", "{}").unwrap();
        store.set("state", "{\"a\":1}").unwrap();
        assert_eq!(store.get("state").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(dir.join("state.json").is_file());
        assert!(!dir.join("state.json.tmp").exists());
        store.remove("state").unwrap();
        store.remove("state").unwrap();
        assert!(store.get("state").unwrap().is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }
    #[test]
    fn quota_keeps_old_value() {
        let dir = scratch("quota");
        let store = FileStore::new(&dir, Some(4));
        store.set("state", "1234").unwrap();
        assert!(store.set("state", "12345").unwrap_err().is_quota());
        assert_eq!(store.get("state").unwrap().as_deref(), Some("1234"));
        let _ = std::fs::remove_dir_all(&dir);
    }
    #[test]
    fn keys_stay_inside() {
        let store = FileStore::new("/base", None);
        assert_eq!(
            store.path_of("../etc/passwd"),
            std::path::Path::new("/base/___etc_passwd.json")
        );
    }
}
