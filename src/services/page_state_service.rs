//! Page state store for restoring list views across navigation.
//!
//! Maps a [`ListKey`] to the last state a list view saved. Entries are
//! created lazily from a default on first read, overwritten on every save,
//! and live as long as the store. Nothing is written to disk: a full
//! application restart starts from the defaults again.
//!
//! States are kept as JSON values, so every read and write is a deep copy
//! and no caller ever shares live data with the store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::ListKey;

/// Errors that can occur when reading or writing page state.
#[derive(Debug, Error)]
pub enum PageStateError {
    /// The state could not be serialized.
    #[error("failed to encode page state for {key}: {source}")]
    Encode {
        key: ListKey,
        #[source]
        source: serde_json::Error,
    },

    /// The stored state does not decode into the requested type, usually
    /// because two list kinds share a key.
    #[error("stored page state for {key} does not match the requested type: {source}")]
    Decode {
        key: ListKey,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for page state operations.
pub type PageStateResult<T> = Result<T, PageStateError>;

/// One stored list state.
#[derive(Debug, Clone)]
pub struct PageStateEntry {
    /// Optional human label for the list.
    pub label: Option<String>,
    /// Serialized state.
    pub state: Value,
    /// When the entry was last written.
    pub updated_at: DateTime<Utc>,
}

static GLOBAL_STORE: Lazy<PageStateStore> = Lazy::new(PageStateStore::new);

/// Keyed in-memory store of list states.
///
/// Cloning is cheap and clones share the same entries.
#[derive(Clone, Default)]
pub struct PageStateStore {
    entries: Arc<Mutex<HashMap<ListKey, PageStateEntry>>>,
}

impl PageStateStore {
    /// Creates an empty, isolated store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide store.
    pub fn global() -> Self {
        GLOBAL_STORE.clone()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<ListKey, PageStateEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the stored state for `key`, storing and returning `default`
    /// if there is none yet.
    pub fn get<S>(&self, key: &ListKey, default: S) -> PageStateResult<S>
    where
        S: Serialize + DeserializeOwned,
    {
        self.get_labeled(key, default, None)
    }

    /// Like [`get`](Self::get), recording `label` if the default is stored.
    pub fn get_labeled<S>(&self, key: &ListKey, default: S, label: Option<&str>) -> PageStateResult<S>
    where
        S: Serialize + DeserializeOwned,
    {
        let mut entries = self.entries();

        if let Some(entry) = entries.get(key) {
            return serde_json::from_value(entry.state.clone()).map_err(|source| {
                PageStateError::Decode {
                    key: key.clone(),
                    source,
                }
            });
        }

        let state = encode(key, &default)?;
        entries.insert(
            key.clone(),
            PageStateEntry {
                label: label.map(str::to_owned),
                state,
                updated_at: Utc::now(),
            },
        );
        tracing::debug!(%key, "page state initialized from default");

        Ok(default)
    }

    /// Overwrites the stored state for `key`.
    pub fn set<S>(&self, key: &ListKey, state: &S, label: Option<&str>) -> PageStateResult<()>
    where
        S: Serialize,
    {
        let state = encode(key, state)?;
        self.entries().insert(
            key.clone(),
            PageStateEntry {
                label: label.map(str::to_owned),
                state,
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }

    /// Returns a copy of the raw entry for `key`.
    pub fn entry(&self, key: &ListKey) -> Option<PageStateEntry> {
        self.entries().get(key).cloned()
    }

    /// Returns the label stored with `key`.
    pub fn label(&self, key: &ListKey) -> Option<String> {
        self.entries().get(key).and_then(|entry| entry.label.clone())
    }

    /// Returns whether an entry exists for `key`.
    pub fn contains(&self, key: &ListKey) -> bool {
        self.entries().contains_key(key)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

fn encode<S: Serialize>(key: &ListKey, state: &S) -> PageStateResult<Value> {
    serde_json::to_value(state).map_err(|source| PageStateError::Encode {
        key: key.clone(),
        source,
    })
}

impl std::fmt::Debug for PageStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageStateStore")
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RowListState, SortDirection};
    use pretty_assertions::assert_eq;

    fn key() -> ListKey {
        ListKey::from("permit-list")
    }

    #[test]
    fn get_stores_default_on_first_read() {
        let store = PageStateStore::new();
        assert!(store.is_empty());

        let state = store.get(&key(), RowListState::new((), 20)).unwrap();

        assert_eq!(state.page_size, 20);
        assert!(store.contains(&key()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn get_keeps_first_default() {
        let store = PageStateStore::new();
        store.get(&key(), RowListState::new((), 20)).unwrap();

        let state = store.get(&key(), RowListState::new((), 99)).unwrap();

        assert_eq!(state.page_size, 20);
    }

    #[test]
    fn set_overwrites_state_and_label() {
        let store = PageStateStore::new();
        store
            .get_labeled(&key(), RowListState::new((), 20), Some("Permits"))
            .unwrap();
        assert_eq!(store.label(&key()), Some("Permits".to_string()));

        let saved = RowListState::new((), 50).with_sort("name", SortDirection::Desc);
        store.set(&key(), &saved, None).unwrap();

        let restored = store.get(&key(), RowListState::new((), 20)).unwrap();
        assert_eq!(restored, saved);
        assert_eq!(store.label(&key()), None);
    }

    #[test]
    fn stored_state_is_a_copy() {
        let store = PageStateStore::new();
        let mut state = RowListState::new(vec!["ACTIVE".to_string()], 20);
        store.set(&key(), &state, None).unwrap();

        state.filter.push("EXPIRED".to_string());

        let restored: RowListState<Vec<String>> =
            store.get(&key(), RowListState::new(Vec::new(), 20)).unwrap();
        assert_eq!(restored.filter, vec!["ACTIVE".to_string()]);
    }

    #[test]
    fn mismatched_type_is_decode_error() {
        let store = PageStateStore::new();
        store.set(&key(), &RowListState::new((), 20), None).unwrap();

        let result = store.get(&key(), 5_u32);

        assert!(matches!(result, Err(PageStateError::Decode { .. })));
    }

    #[test]
    fn clones_share_entries() {
        let store = PageStateStore::new();
        let other = store.clone();

        other.set(&key(), &RowListState::new((), 10), None).unwrap();

        assert!(store.contains(&key()));
        assert!(store.entry(&key()).is_some());
    }

    #[test]
    fn global_store_is_shared() {
        let key = ListKey::from("page-state-global-test");
        PageStateStore::global()
            .set(&key, &RowListState::new((), 15), Some("Global"))
            .unwrap();

        assert_eq!(PageStateStore::global().label(&key), Some("Global".to_string()));
    }
}
