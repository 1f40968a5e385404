//! Typed host-domain contracts shared by the desktop runtime and browser adapters.
//!
//! This crate is the API-first boundary for platform services. It exposes the synchronous
//! key/value preference contract that mirrors browser `localStorage`, the well-known storage keys
//! used by the desktop, and clock helpers. Concrete browser adapters live in
//! `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod storage;
pub mod time;

pub use storage::keys::{FILES_KEY, SETTINGS_KEY, TRASH_KEY, WALLPAPER_KEY};
pub use storage::prefs::{
    load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore, PrefsStore,
};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now, Clock, ManualClock, SystemClock};
