use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Height of the menu bar reserved at the top of the viewport.
pub const TOP_BAR_HEIGHT: i32 = 24;
/// Minimum `y` for a freshly opened window.
pub const MIN_OPEN_TOP_OFFSET: i32 = 50;
/// First z-index handed out by a fresh desktop.
pub const INITIAL_Z_INDEX: u32 = 100;
/// Delay between mount and the desktop becoming interactive.
pub const BOOT_DELAY_MS: u64 = 4_000;
/// Wallpaper used when nothing valid is persisted.
pub const DEFAULT_WALLPAPER: &str = "gradient1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AppKind {
    Finder,
    Terminal,
    Notes,
    Calculator,
    Settings,
    Browser,
    Trash,
}

impl AppKind {
    pub const ALL: [AppKind; 7] = [
        Self::Finder,
        Self::Terminal,
        Self::Notes,
        Self::Calculator,
        Self::Settings,
        Self::Browser,
        Self::Trash,
    ];

    /// Stable lowercase identifier used by manifests and the terminal `open` command.
    pub fn id(self) -> &'static str {
        match self {
            Self::Finder => "finder",
            Self::Terminal => "terminal",
            Self::Notes => "notes",
            Self::Calculator => "calculator",
            Self::Settings => "settings",
            Self::Browser => "browser",
            Self::Trash => "trash",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn icon_id(self) -> &'static str {
        match self {
            Self::Finder => "folder",
            Self::Terminal => "terminal",
            Self::Notes => "notes",
            Self::Calculator => "calculator",
            Self::Settings => "gear",
            Self::Browser => "compass",
            Self::Trash => "trash",
        }
    }
}

/// Size of the desktop area windows are laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub w: i32,
    pub h: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { w: 1280, h: 800 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }

    /// Keeps the title bar below the menu bar.
    pub fn below_top_bar(self) -> Self {
        Self {
            y: self.y.max(TOP_BAR_HEIGHT),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowFlags {
    pub resizable: bool,
    pub maximizable: bool,
}

impl Default for WindowFlags {
    fn default() -> Self {
        Self {
            resizable: true,
            maximizable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub app_kind: AppKind,
    pub title: String,
    pub rect: WindowRect,
    pub restore_rect: Option<WindowRect>,
    pub z_index: u32,
    pub minimized: bool,
    pub maximized: bool,
    pub flags: WindowFlags,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopState {
    pub next_window_id: u64,
    pub next_z_index: u32,
    pub windows: Vec<WindowRecord>,
    pub active_window: Option<WindowId>,
    /// File names queued for apps that have not consumed them yet.
    pub pending_resources: BTreeMap<AppKind, String>,
    pub wallpaper: String,
    pub booted: bool,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            next_window_id: 1,
            next_z_index: INITIAL_Z_INDEX,
            windows: Vec::new(),
            active_window: None,
            pending_resources: BTreeMap::new(),
            wallpaper: DEFAULT_WALLPAPER.to_string(),
            booted: false,
        }
    }
}

impl DesktopState {
    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub fn window_for_app(&self, app_kind: AppKind) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.app_kind == app_kind)
    }

    pub fn is_app_open(&self, app_kind: AppKind) -> bool {
        self.window_for_app(app_kind).is_some()
    }

    pub fn active_window_record(&self) -> Option<&WindowRecord> {
        self.active_window.and_then(|id| self.window(id))
    }

    pub fn pending_resource(&self, app_kind: AppKind) -> Option<&str> {
        self.pending_resources.get(&app_kind).map(String::as_str)
    }

    /// Highest z-index currently assigned, if any window is open.
    pub fn top_z_index(&self) -> Option<u32> {
        self.windows.iter().map(|w| w.z_index).max()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub edge: ResizeEdge,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
    pub resizing: Option<ResizeSession>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_kind_ids_round_trip() {
        for kind in AppKind::ALL {
            assert_eq!(AppKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(AppKind::from_id("paint"), None);
    }

    #[test]
    fn rect_is_kept_below_top_bar() {
        let rect = WindowRect {
            x: 10,
            y: -40,
            w: 300,
            h: 200,
        };
        assert_eq!(rect.below_top_bar().y, TOP_BAR_HEIGHT);
        assert_eq!(rect.offset(0, 100).below_top_bar().y, 60);
    }
}
