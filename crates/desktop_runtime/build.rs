use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const APP_KINDS: [&str; 7] = [
    "finder",
    "terminal",
    "notes",
    "calculator",
    "settings",
    "browser",
    "trash",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WindowDefaults {
    width: i32,
    height: i32,
    resizable: bool,
    maximizable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AppManifest {
    schema_version: u32,
    app_kind: String,
    title: String,
    dock_label: String,
    dock_order: u32,
    dock_separator_before: bool,
    window_defaults: WindowDefaults,
}

fn app_manifest_paths(root: &Path) -> Vec<PathBuf> {
    APP_KINDS
        .iter()
        .map(|name| root.join("manifests").join(format!("{name}.toml")))
        .collect()
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let mut manifests = Vec::<AppManifest>::new();
    let mut dock_orders = BTreeSet::new();

    for (path, expected_kind) in app_manifest_paths(&crate_root).iter().zip(APP_KINDS) {
        println!("cargo:rerun-if-changed={}", path.display());
        let raw = fs::read_to_string(path)
            .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
        let manifest: AppManifest = toml::from_str(&raw)
            .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
        if manifest.schema_version != 1 {
            panic!(
                "manifest schema mismatch in {}: expected 1 found {}",
                path.display(),
                manifest.schema_version
            );
        }
        if manifest.app_kind != expected_kind {
            panic!(
                "app kind mismatch in {}: expected {expected_kind} found {}",
                path.display(),
                manifest.app_kind
            );
        }
        if manifest.window_defaults.width <= 0 || manifest.window_defaults.height <= 0 {
            panic!("window defaults in {} must be positive", path.display());
        }
        if !dock_orders.insert(manifest.dock_order) {
            panic!(
                "duplicate dock_order {} in {}",
                manifest.dock_order,
                path.display()
            );
        }
        manifests.push(manifest);
    }

    manifests.sort_by_key(|manifest| manifest.dock_order);
    let json = serde_json::to_string_pretty(&manifests).expect("serialize app manifest catalog");
    let generated = format!(
        "/// Build-time generated app manifest catalog JSON.\n\
pub const APP_MANIFEST_CATALOG_JSON: &str = r##\"{}\"##;\n",
        json
    );

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("app_catalog_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}
