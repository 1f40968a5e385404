use platform_host::{MemoryPrefsStore, PrefsStore};

use crate::WebPrefsStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Compile-time selected host strategy for `platform_host_web` adapters.
pub enum HostStrategy {
    /// Browser-backed adapters from `platform_host_web`.
    Browser,
    /// Process-local in-memory adapters for native builds and the `ephemeral-storage` feature.
    Memory,
}

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(all(target_arch = "wasm32", not(feature = "ephemeral-storage")))]
    {
        HostStrategy::Browser
    }

    #[cfg(any(not(target_arch = "wasm32"), feature = "ephemeral-storage"))]
    {
        HostStrategy::Memory
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    match selected_host_strategy() {
        HostStrategy::Browser => "browser",
        HostStrategy::Memory => "memory",
    }
}

/// Adapter enum that erases the concrete preference backend behind [`PrefsStore`].
#[derive(Debug, Clone)]
pub enum PrefsStoreAdapter {
    /// Browser-backed preference storage.
    Browser(WebPrefsStore),
    /// In-memory preference storage that lives as long as the adapter.
    Memory(MemoryPrefsStore),
}

impl PrefsStore for PrefsStoreAdapter {
    fn load_pref(&self, key: &str) -> Result<Option<String>, String> {
        match self {
            Self::Browser(store) => store.load_pref(key),
            Self::Memory(store) => store.load_pref(key),
        }
    }

    fn save_pref(&self, key: &str, raw: &str) -> Result<(), String> {
        match self {
            Self::Browser(store) => store.save_pref(key, raw),
            Self::Memory(store) => store.save_pref(key, raw),
        }
    }

    fn delete_pref(&self, key: &str) -> Result<(), String> {
        match self {
            Self::Browser(store) => store.delete_pref(key),
            Self::Memory(store) => store.delete_pref(key),
        }
    }
}

/// Builds the preference-store adapter for the compile-time selected host strategy.
pub fn prefs_store() -> PrefsStoreAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => PrefsStoreAdapter::Browser(WebPrefsStore),
        HostStrategy::Memory => PrefsStoreAdapter::Memory(MemoryPrefsStore::default()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn native_builds_select_memory_strategy() {
        assert_eq!(selected_host_strategy(), HostStrategy::Memory);
        assert_eq!(host_strategy_name(), "memory");
    }

    #[test]
    fn memory_adapter_round_trips_through_trait() {
        let adapter = PrefsStoreAdapter::Memory(MemoryPrefsStore::default());
        adapter.save_pref("desktop.wallpaper.v1", "gradient2").expect("save");
        assert_eq!(
            adapter.load_pref("desktop.wallpaper.v1").expect("load"),
            Some("gradient2".to_string())
        );
        adapter.delete_pref("desktop.wallpaper.v1").expect("delete");
        assert_eq!(adapter.load_pref("desktop.wallpaper.v1").expect("load"), None);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn web_store_misses_on_native_targets() {
        let store = WebPrefsStore;
        assert_eq!(store.load_pref("anything").expect("load"), None);
        store.save_pref("anything", "x").expect("save is accepted");
    }
}
