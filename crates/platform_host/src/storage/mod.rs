//! Preference storage contracts and the storage keys owned by the desktop.

pub mod keys;
pub mod prefs;
