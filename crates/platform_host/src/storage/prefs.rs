//! Lightweight preference storage contracts and adapters.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Host service for preference values stored as text per key.
///
/// The contract is synchronous because its browser backing (`localStorage`) is synchronous and
/// every desktop mutation persists before it returns.
pub trait PrefsStore {
    /// Loads the raw text stored under `key`.
    fn load_pref(&self, key: &str) -> Result<Option<String>, String>;

    /// Saves raw text under `key`, replacing any previous value.
    fn save_pref(&self, key: &str, raw: &str) -> Result<(), String>;

    /// Deletes `key`.
    fn delete_pref(&self, key: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op preference store for targets without local storage.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_pref(&self, _key: &str) -> Result<Option<String>, String> {
        Ok(None)
    }

    fn save_pref(&self, _key: &str, _raw: &str) -> Result<(), String> {
        Ok(())
    }

    fn delete_pref(&self, _key: &str) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory preference store keyed by string.
///
/// Clones share the same backing map, so a test can keep one handle and inspect what another
/// component persisted.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryPrefsStore {
    /// Returns the raw value stored under `key`, bypassing the trait.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns whether nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn save_pref(&self, key: &str, raw: &str) -> Result<(), String> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn delete_pref(&self, key: &str) -> Result<(), String> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}

/// Loads and deserializes a typed JSON preference through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when the store read or JSON deserialization fails.
pub fn load_pref_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_pref(key)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    Ok(Some(value))
}

/// Serializes and saves a typed JSON preference through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn save_pref_with<S: PrefsStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.save_pref(key, &raw)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct DockPrefs {
        auto_hide: bool,
    }

    #[test]
    fn memory_prefs_store_round_trip_and_delete() {
        let store = MemoryPrefsStore::default();
        let store_obj: &dyn PrefsStore = &store;

        store_obj.save_pref("pref.key", "{\"k\":1}").expect("save");
        assert_eq!(
            store_obj.load_pref("pref.key").expect("load"),
            Some("{\"k\":1}".to_string())
        );
        store_obj.delete_pref("pref.key").expect("delete");
        assert_eq!(store_obj.load_pref("pref.key").expect("load"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn memory_prefs_store_clones_share_backing_map() {
        let store = MemoryPrefsStore::default();
        let other = store.clone();
        other.save_pref("wallpaper", "gradient3").expect("save");
        assert_eq!(store.raw("wallpaper"), Some("gradient3".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn typed_pref_helpers_round_trip() {
        let store = MemoryPrefsStore::default();
        save_pref_with(&store, "dock", &DockPrefs { auto_hide: true }).expect("save typed pref");

        let loaded: Option<DockPrefs> = load_pref_with(&store, "dock").expect("load typed pref");
        assert_eq!(loaded, Some(DockPrefs { auto_hide: true }));
    }

    #[test]
    fn typed_pref_load_reports_malformed_json() {
        let store = MemoryPrefsStore::default();
        store.save_pref("dock", "{not json").expect("save");
        let err = load_pref_with::<_, DockPrefs>(&store, "dock").expect_err("malformed");
        assert!(!err.is_empty());
    }

    #[test]
    fn noop_prefs_store_is_empty_and_successful() {
        let store = NoopPrefsStore;
        let store_obj: &dyn PrefsStore = &store;
        assert_eq!(store_obj.load_pref("k").expect("load"), None);
        store_obj.save_pref("k", "{}").expect("save");
        store_obj.delete_pref("k").expect("delete");
    }
}
