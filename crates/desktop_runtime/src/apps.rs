//! App manifest catalog and per-app window contents.

mod browser;
mod finder;
mod notes;
mod settings;
mod terminal;
mod trash;

use std::sync::OnceLock;

use desktop_app_calculator::CalculatorApp;
use leptos::*;
use serde::Deserialize;

use crate::model::{AppKind, WindowFlags, WindowRecord};

include!(concat!(env!("OUT_DIR"), "/app_catalog_generated.rs"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WindowDefaults {
    pub width: i32,
    pub height: i32,
    pub resizable: bool,
    pub maximizable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppManifest {
    pub app_kind: AppKind,
    pub title: String,
    pub dock_label: String,
    pub dock_order: u32,
    pub dock_separator_before: bool,
    pub window_defaults: WindowDefaults,
}

impl AppManifest {
    pub fn flags(&self) -> WindowFlags {
        WindowFlags {
            resizable: self.window_defaults.resizable,
            maximizable: self.window_defaults.maximizable,
        }
    }
}

/// Manifests for every app, in dock order.
pub fn app_catalog() -> &'static [AppManifest] {
    static CATALOG: OnceLock<Vec<AppManifest>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        serde_json::from_str(APP_MANIFEST_CATALOG_JSON)
            .expect("generated app manifest catalog should parse")
    })
}

/// Returns the manifest for `app_kind`.
///
/// The build script rejects a catalog that is missing any [`AppKind`].
pub fn app_manifest(app_kind: AppKind) -> &'static AppManifest {
    app_catalog()
        .iter()
        .find(|entry| entry.app_kind == app_kind)
        .expect("app manifest exists")
}

pub fn render_window_contents(window: &WindowRecord) -> View {
    let window_id = window.id;
    match window.app_kind {
        AppKind::Finder => view! { <finder::FinderApp /> }.into_view(),
        AppKind::Terminal => view! { <terminal::TerminalApp window_id=window_id /> }.into_view(),
        AppKind::Notes => view! { <notes::NotesApp window_id=window_id /> }.into_view(),
        AppKind::Calculator => view! { <CalculatorApp /> }.into_view(),
        AppKind::Settings => view! { <settings::SettingsApp /> }.into_view(),
        AppKind::Browser => view! { <browser::BrowserApp window_id=window_id /> }.into_view(),
        AppKind::Trash => view! { <trash::TrashApp /> }.into_view(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn catalog_covers_every_app_in_dock_order() {
        let kinds: Vec<AppKind> = app_catalog().iter().map(|m| m.app_kind).collect();
        assert_eq!(kinds, AppKind::ALL.to_vec());
    }

    #[test]
    fn calculator_is_fixed_size() {
        let manifest = app_manifest(AppKind::Calculator);
        assert_eq!(
            manifest.flags(),
            WindowFlags {
                resizable: false,
                maximizable: false
            }
        );
        assert_eq!(manifest.window_defaults.width, 360);
    }
}
