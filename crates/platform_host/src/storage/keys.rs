//! Well-known preference keys.
//!
//! Values under [`FILES_KEY`] and [`TRASH_KEY`] are JSON objects keyed by file name. The
//! wallpaper value is stored as a raw identifier or URL, not JSON.

/// Serialized live file-record mapping.
pub const FILES_KEY: &str = "desktop.files.v1";
/// Serialized trash collection.
pub const TRASH_KEY: &str = "desktop.trash.v1";
/// Selected wallpaper preset identifier or custom image URL.
pub const WALLPAPER_KEY: &str = "desktop.wallpaper.v1";
/// Serialized system settings.
pub const SETTINGS_KEY: &str = "desktop.settings.v1";
