//! Wallpaper persistence through the host preference store.
//!
//! The wallpaper is stored as the raw identifier or URL, not JSON, so older saved values stay
//! readable.

use leptos::logging;
use platform_host::{PrefsStore, WALLPAPER_KEY};

use crate::wallpaper::normalize_wallpaper;

/// Loads the saved wallpaper. Missing or unrecognized values yield `None`.
pub fn load_wallpaper(prefs: &dyn PrefsStore) -> Option<String> {
    match prefs.load_pref(WALLPAPER_KEY) {
        Ok(raw) => raw.as_deref().and_then(normalize_wallpaper),
        Err(err) => {
            logging::warn!("wallpaper load failed: {err}");
            None
        }
    }
}

pub fn persist_wallpaper(prefs: &dyn PrefsStore, wallpaper: &str) {
    if let Err(err) = prefs.save_pref(WALLPAPER_KEY, wallpaper) {
        logging::warn!("wallpaper persist failed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use platform_host::MemoryPrefsStore;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn wallpaper_is_stored_as_raw_string() {
        let prefs = MemoryPrefsStore::default();
        assert_eq!(load_wallpaper(&prefs), None);

        persist_wallpaper(&prefs, "gradient4");
        assert_eq!(prefs.raw(WALLPAPER_KEY), Some("gradient4".to_string()));
        assert_eq!(load_wallpaper(&prefs), Some("gradient4".to_string()));
    }

    #[test]
    fn unrecognized_saved_values_are_ignored() {
        let prefs = MemoryPrefsStore::default();
        persist_wallpaper(&prefs, "plaid");
        assert_eq!(load_wallpaper(&prefs), None);
    }
}
