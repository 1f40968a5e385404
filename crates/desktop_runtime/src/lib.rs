//! Desktop shell runtime: window registry, virtual file store, app sessions and the Leptos UI
//! that renders them.

pub mod apps;
pub mod autosave;
pub mod browser_session;
pub mod components;
mod effect_executor;
pub mod host;
pub mod model;
pub mod navigation;
pub mod persistence;
pub mod reducer;
mod runtime_context;
pub mod sessions;
pub mod settings;
pub mod shell;
pub mod vfs;
pub mod wallpaper;
pub mod window_manager;

pub use components::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext, DesktopShell};
pub use host::DesktopHostContext;
pub use model::*;
pub use navigation::{open_file_action, route_for_kind};
pub use persistence::{load_wallpaper, persist_wallpaper};
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use vfs::{FileChange, FileKind, FilePatch, FileRecord, VirtualFileStore};
