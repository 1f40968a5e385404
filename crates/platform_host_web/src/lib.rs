//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! This crate wires the desktop's preference storage to `window.localStorage` in the browser and
//! to an in-memory map on native targets, selected at compile time by [`adapters`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
pub mod storage;

pub use adapters::{
    host_strategy_name, prefs_store, selected_host_strategy, HostStrategy, PrefsStoreAdapter,
};
pub use storage::local_prefs::WebPrefsStore;
