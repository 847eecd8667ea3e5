//! Persistence for sidebar snapshots.
//!
//! A [`StateStore`] maps an instance key (see `SidebarConfig::state_key`) to a
//! serialized [`Snapshot`] blob, the same way the widget kept one JSON string
//! per key in browser storage. Blobs are decoded lazily on `load`, so a
//! single corrupted entry only costs that instance its saved state.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use navtree_types::Snapshot;
use thiserror::Error;
use tracing::warn;

use crate::{default_app_file, expand_tilde};

/// Environment variable controlling the state file location.
pub const STATE_PATH_ENV: &str = "NAVTREE_STATE_PATH";

/// Default filename for the persisted state file.
pub const STATE_FILE_NAME: &str = "sidebar-state.json";

/// Errors surfaced by state store operations.
#[derive(Debug, Error)]
pub enum StateStoreError {
    /// I/O failure while reading or writing the state file.
    #[error("state I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization failure.
    #[error("state serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Shared trait implemented by snapshot persistence backends.
pub trait StateStore: Send + Sync {
    /// Load the snapshot stored under `key`.
    ///
    /// Returns `Ok(None)` both when nothing is stored and when the stored blob
    /// cannot be decoded.
    fn load(&self, key: &str) -> Result<Option<Snapshot>, StateStoreError>;

    /// Store `snapshot` under `key`, replacing any previous value.
    fn save(&self, key: &str, snapshot: &Snapshot) -> Result<(), StateStoreError>;

    /// Drop the value stored under `key`.
    fn remove(&self, key: &str) -> Result<(), StateStoreError>;
}

type Blobs = BTreeMap<String, String>;

fn decode_blob(key: &str, blob: Option<&String>) -> Option<Snapshot> {
    let blob = blob?;
    match serde_json::from_str::<Snapshot>(blob) {
        Ok(snapshot) => Some(snapshot),
        Err(error) => {
            warn!(key, error = %error, "Failed to load sidebar state; using defaults");
            None
        }
    }
}

/// JSON-backed state store persisted on disk.
#[derive(Debug)]
pub struct JsonStateStore {
    path: PathBuf,
    blobs: Mutex<Blobs>,
}

impl JsonStateStore {
    /// Create a store at the provided path (or the default path when omitted).
    pub fn new<P: Into<Option<PathBuf>>>(path: P) -> Result<Self, StateStoreError> {
        let resolved_path = match path.into() {
            Some(path) => expand_tilde(&path.to_string_lossy()),
            None => default_state_path(),
        };
        let blobs = load_state_file(&resolved_path)?;
        Ok(Self {
            path: resolved_path,
            blobs: Mutex::new(blobs),
        })
    }

    /// Access the underlying state file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save_locked(&self, blobs: &Blobs) -> Result<(), StateStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(blobs)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl StateStore for JsonStateStore {
    fn load(&self, key: &str) -> Result<Option<Snapshot>, StateStoreError> {
        let blobs = self.blobs.lock().expect("state lock poisoned");
        Ok(decode_blob(key, blobs.get(key)))
    }

    fn save(&self, key: &str, snapshot: &Snapshot) -> Result<(), StateStoreError> {
        let blob = serde_json::to_string(snapshot)?;
        let mut blobs = self.blobs.lock().expect("state lock poisoned");
        blobs.insert(key.to_string(), blob);
        self.save_locked(&blobs)
    }

    fn remove(&self, key: &str) -> Result<(), StateStoreError> {
        let mut blobs = self.blobs.lock().expect("state lock poisoned");
        if blobs.remove(key).is_some() {
            self.save_locked(&blobs)?;
        }
        Ok(())
    }
}

/// In-memory state store used for tests and for sidebars without `remember-state`.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    blobs: Mutex<Blobs>,
}

impl InMemoryStateStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw blob without validation.
    pub fn insert_raw(&self, key: impl Into<String>, blob: impl Into<String>) {
        self.blobs.lock().expect("state lock poisoned").insert(key.into(), blob.into());
    }

    /// Raw blob currently stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.blobs.lock().expect("state lock poisoned").get(key).cloned()
    }
}

impl StateStore for InMemoryStateStore {
    fn load(&self, key: &str) -> Result<Option<Snapshot>, StateStoreError> {
        let blobs = self.blobs.lock().expect("state lock poisoned");
        Ok(decode_blob(key, blobs.get(key)))
    }

    fn save(&self, key: &str, snapshot: &Snapshot) -> Result<(), StateStoreError> {
        let blob = serde_json::to_string(snapshot)?;
        self.blobs.lock().expect("state lock poisoned").insert(key.to_string(), blob);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StateStoreError> {
        self.blobs.lock().expect("state lock poisoned").remove(key);
        Ok(())
    }
}

fn default_state_path() -> PathBuf {
    if let Ok(path) = env::var(STATE_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }
    default_app_file(STATE_FILE_NAME)
}

fn load_state_file(path: &Path) -> Result<Blobs, StateStoreError> {
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<Blobs>(&content) {
            Ok(blobs) => Ok(blobs),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse sidebar state file; using defaults"
                );
                Ok(Blobs::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Blobs::default()),
        Err(error) => Err(StateStoreError::Io(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use tempfile::tempdir;

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            collapsed: true,
            search_query: "user".into(),
            expanded_items: vec!["users".into(), "reports".into()],
        }
    }

    #[test]
    fn in_memory_store_round_trip() {
        let store = InMemoryStateStore::new();
        assert!(store.load("navtree-sidebar-default").unwrap().is_none());

        store.save("navtree-sidebar-default", &sample_snapshot()).unwrap();
        assert_eq!(store.load("navtree-sidebar-default").unwrap(), Some(sample_snapshot()));
    }

    #[test]
    fn corrupted_blob_is_treated_as_missing() {
        let store = InMemoryStateStore::new();
        store.insert_raw("navtree-sidebar-main", "{not json");
        assert!(store.load("navtree-sidebar-main").unwrap().is_none());
    }

    #[test]
    fn json_store_persists_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = JsonStateStore::new(Some(path.clone())).unwrap();
        store.save("navtree-sidebar-main", &sample_snapshot()).unwrap();

        drop(store);
        let reloaded = JsonStateStore::new(Some(path)).unwrap();
        assert_eq!(reloaded.load("navtree-sidebar-main").unwrap(), Some(sample_snapshot()));
        assert!(reloaded.load("navtree-sidebar-other").unwrap().is_none());
    }

    #[test]
    fn invalid_file_returns_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json").unwrap();

        let store = JsonStateStore::new(Some(path)).unwrap();
        assert!(store.load("navtree-sidebar-default").unwrap().is_none());
    }

    #[test]
    fn one_corrupted_entry_does_not_poison_others() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let good = serde_json::to_string(&sample_snapshot()).unwrap();
        let file = serde_json::json!({
            "navtree-sidebar-good": good,
            "navtree-sidebar-bad": "{\"collapsed\": \"maybe\"}",
        });
        fs::write(&path, file.to_string()).unwrap();

        let store = JsonStateStore::new(Some(path)).unwrap();
        assert_eq!(store.load("navtree-sidebar-good").unwrap(), Some(sample_snapshot()));
        assert!(store.load("navtree-sidebar-bad").unwrap().is_none());
    }

    #[test]
    fn remove_drops_the_entry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = JsonStateStore::new(Some(path.clone())).unwrap();
        store.save("navtree-sidebar-main", &sample_snapshot()).unwrap();
        store.remove("navtree-sidebar-main").unwrap();

        let reloaded = JsonStateStore::new(Some(path)).unwrap();
        assert!(reloaded.load("navtree-sidebar-main").unwrap().is_none());
    }

    #[test]
    fn default_path_honors_env_override() {
        let override_path = "~/custom/state.json";
        temp_env::with_var(STATE_PATH_ENV, Some(override_path), || {
            assert_eq!(default_state_path(), expand_tilde(override_path));
        });
    }

    #[test]
    fn concurrent_saves_leave_a_decodable_value() {
        let dir = tempdir().unwrap();
        let store = Arc::new(JsonStateStore::new(Some(dir.path().join("state.json"))).unwrap());
        let mut handles = Vec::new();
        for index in 0..5 {
            let handle_store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                let snapshot = Snapshot {
                    search_query: format!("query-{index}"),
                    ..Snapshot::default()
                };
                handle_store.save("navtree-sidebar-default", &snapshot).unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        let latest = store.load("navtree-sidebar-default").unwrap().unwrap();
        assert!(latest.search_query.starts_with("query-"));
    }
}
