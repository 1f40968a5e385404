//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use thiserror::Error;

use crate::apps::app_manifest;
use crate::model::{
    AppKind, DesktopState, DragSession, InteractionState, PointerPosition, ResizeEdge,
    ResizeSession, Viewport, WindowId, WindowRecord, WindowRect,
};
use crate::window_manager::{
    centered_rect, focus_window_internal, maximized_rect, next_z_index, resize_rect,
    MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open an app, or focus its window when one already exists.
    OpenApp {
        /// App to open.
        app_kind: AppKind,
        /// Desktop area used to center a new window.
        viewport: Viewport,
    },
    /// Queue a file for an app and open or focus that app.
    OpenResource {
        /// App that should display the file.
        app_kind: AppKind,
        /// File name to hand over.
        name: String,
        /// Desktop area used to center a new window.
        viewport: Viewport,
    },
    /// Drop the queued file for an app once it has been loaded.
    ConsumePendingResource {
        /// App whose slot is cleared.
        app_kind: AppKind,
    },
    /// Close a window by id.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Focus (and raise) a window by id.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Minimize a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Maximize a window to the provided viewport.
    MaximizeWindow {
        /// Window to maximize.
        window_id: WindowId,
        /// Desktop area to fill.
        viewport: Viewport,
    },
    /// Restore a minimized or maximized window.
    RestoreWindow {
        /// Window to restore.
        window_id: WindowId,
    },
    /// Maximize a normal window or restore a maximized one.
    ToggleMaximize {
        /// Window to toggle.
        window_id: WindowId,
        /// Desktop area to fill when maximizing.
        viewport: Viewport,
    },
    /// Move a window to an absolute position.
    UpdatePosition {
        /// Window to move.
        window_id: WindowId,
        /// New left edge.
        x: i32,
        /// New top edge, floor-clamped to the menu bar height.
        y: i32,
    },
    /// Resize a window to an absolute size.
    UpdateSize {
        /// Window to resize.
        window_id: WindowId,
        /// New width.
        w: i32,
        /// New height.
        h: i32,
    },
    /// Begin dragging a window.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window drag.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window drag.
    EndMove,
    /// Begin resizing a window.
    BeginResize {
        /// Window being resized.
        window_id: WindowId,
        /// Edge or corner being dragged.
        edge: ResizeEdge,
        /// Pointer position at resize start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window resize.
    UpdateResize {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window resize.
    EndResize,
    /// Close the active window, if any.
    CloseActiveWindow,
    /// Minimize the active window, if any.
    MinimizeActiveWindow,
    /// Mark the desktop interactive once the boot screen has finished.
    CompleteBoot,
    /// Apply a wallpaper loaded from storage without writing it back.
    HydrateWallpaper {
        /// Preset id or `http(s)` URL.
        wallpaper: String,
    },
    /// Set the wallpaper preset id or custom image URL.
    SetWallpaper {
        /// Preset id or `http(s)` URL.
        wallpaper: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the shell runtime to execute.
pub enum RuntimeEffect {
    /// Release per-window app sessions for a closed window.
    TeardownApp {
        /// Window that was closed.
        window_id: WindowId,
        /// App the window belonged to.
        app_kind: AppKind,
    },
    /// Persist the current wallpaper selection.
    PersistWallpaper,
    /// Move focus into the newly focused window's primary input.
    FocusWindowInput(WindowId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions (for example, referencing a missing window).
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window {0:?} not found")]
    WindowNotFound(WindowId),
}

/// Applies a [`DesktopAction`] to the desktop runtime state and collects resulting side effects.
///
/// This function is the authoritative state transition engine for window management. A rejected
/// action leaves `state` untouched.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when an action references a window that is not present.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenApp { app_kind, viewport } => {
            let window_id = open_or_focus_app(state, app_kind, viewport);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::OpenResource {
            app_kind,
            name,
            viewport,
        } => {
            state.pending_resources.insert(app_kind, name);
            let window_id = open_or_focus_app(state, app_kind, viewport);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::ConsumePendingResource { app_kind } => {
            state.pending_resources.remove(&app_kind);
        }
        DesktopAction::CloseWindow { window_id } => {
            let index = window_index(state, window_id)?;
            let closed = state.windows.remove(index);
            if state.active_window == Some(window_id) {
                state.active_window = None;
            }
            state.pending_resources.remove(&closed.app_kind);
            release_sessions_for(interaction, window_id);
            effects.push(RuntimeEffect::TeardownApp {
                window_id,
                app_kind: closed.app_kind,
            });
        }
        DesktopAction::FocusWindow { window_id } => {
            if !focus_window_internal(state, window_id) {
                return Err(ReducerError::WindowNotFound(window_id));
            }
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::MinimizeWindow { window_id } => {
            find_window_mut(state, window_id)?.minimized = true;
            if state.active_window == Some(window_id) {
                state.active_window = None;
            }
        }
        DesktopAction::MaximizeWindow {
            window_id,
            viewport,
        } => {
            maximize(state, window_id, viewport)?;
        }
        DesktopAction::RestoreWindow { window_id } => {
            let window = find_window_mut(state, window_id)?;
            if window.maximized {
                if let Some(restore_rect) = window.restore_rect.take() {
                    window.rect = restore_rect;
                }
                window.maximized = false;
            }
            focus_window_internal(state, window_id);
        }
        DesktopAction::ToggleMaximize {
            window_id,
            viewport,
        } => {
            if find_window_mut(state, window_id)?.maximized {
                return reduce_desktop(
                    state,
                    interaction,
                    DesktopAction::RestoreWindow { window_id },
                );
            }
            maximize(state, window_id, viewport)?;
        }
        DesktopAction::UpdatePosition { window_id, x, y } => {
            let window = find_window_mut(state, window_id)?;
            if !window.maximized {
                window.rect = WindowRect { x, y, ..window.rect }.below_top_bar();
            }
        }
        DesktopAction::UpdateSize { window_id, w, h } => {
            let window = find_window_mut(state, window_id)?;
            if window.flags.resizable && !window.maximized {
                window.rect.w = w;
                window.rect.h = h;
                window.rect = window.rect.clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
            }
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            let rect_start = find_window_mut(state, window_id)?.rect;
            focus_window_internal(state, window_id);
            interaction.dragging = Some(DragSession {
                window_id,
                pointer_start: pointer,
                rect_start,
            });
        }
        DesktopAction::UpdateMove { pointer } => {
            if let Some(session) = interaction.dragging.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let window = find_window_mut(state, session.window_id)?;
                if !window.maximized {
                    window.rect = session.rect_start.offset(dx, dy).below_top_bar();
                }
            }
        }
        DesktopAction::EndMove => {
            interaction.dragging = None;
        }
        DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        } => {
            let window = find_window_mut(state, window_id)?;
            if !window.flags.resizable || window.maximized {
                return Ok(effects);
            }
            let rect_start = window.rect;
            focus_window_internal(state, window_id);
            interaction.resizing = Some(ResizeSession {
                window_id,
                edge,
                pointer_start: pointer,
                rect_start,
            });
        }
        DesktopAction::UpdateResize { pointer } => {
            if let Some(session) = interaction.resizing.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let window = find_window_mut(state, session.window_id)?;
                if !window.maximized && window.flags.resizable {
                    window.rect = resize_rect(session.rect_start, session.edge, dx, dy)
                        .clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT)
                        .below_top_bar();
                }
            }
        }
        DesktopAction::EndResize => {
            interaction.resizing = None;
        }
        DesktopAction::CloseActiveWindow => {
            if let Some(window_id) = state.active_window {
                return reduce_desktop(
                    state,
                    interaction,
                    DesktopAction::CloseWindow { window_id },
                );
            }
        }
        DesktopAction::MinimizeActiveWindow => {
            if let Some(window_id) = state.active_window {
                return reduce_desktop(
                    state,
                    interaction,
                    DesktopAction::MinimizeWindow { window_id },
                );
            }
        }
        DesktopAction::CompleteBoot => {
            state.booted = true;
        }
        DesktopAction::HydrateWallpaper { wallpaper } => {
            state.wallpaper = wallpaper;
        }
        DesktopAction::SetWallpaper { wallpaper } => {
            state.wallpaper = wallpaper;
            effects.push(RuntimeEffect::PersistWallpaper);
        }
    }

    Ok(effects)
}

fn open_or_focus_app(state: &mut DesktopState, app_kind: AppKind, viewport: Viewport) -> WindowId {
    if let Some(existing) = state.window_for_app(app_kind).map(|w| w.id) {
        focus_window_internal(state, existing);
        return existing;
    }

    let manifest = app_manifest(app_kind);
    let window_id = next_window_id(state);
    let z_index = next_z_index(state);
    state.windows.push(WindowRecord {
        id: window_id,
        app_kind,
        title: manifest.title.clone(),
        rect: centered_rect(
            manifest.window_defaults.width,
            manifest.window_defaults.height,
            viewport,
        ),
        restore_rect: None,
        z_index,
        minimized: false,
        maximized: false,
        flags: manifest.flags(),
    });
    state.active_window = Some(window_id);
    window_id
}

fn maximize(
    state: &mut DesktopState,
    window_id: WindowId,
    viewport: Viewport,
) -> Result<(), ReducerError> {
    let window = find_window_mut(state, window_id)?;
    if !window.flags.maximizable || window.maximized {
        return Ok(());
    }
    window.restore_rect = Some(window.rect);
    window.rect = maximized_rect(viewport);
    window.maximized = true;
    focus_window_internal(state, window_id);
    Ok(())
}

fn release_sessions_for(interaction: &mut InteractionState, window_id: WindowId) {
    if interaction
        .dragging
        .as_ref()
        .is_some_and(|session| session.window_id == window_id)
    {
        interaction.dragging = None;
    }
    if interaction
        .resizing
        .as_ref()
        .is_some_and(|session| session.window_id == window_id)
    {
        interaction.resizing = None;
    }
}

fn next_window_id(state: &mut DesktopState) -> WindowId {
    let id = WindowId(state.next_window_id);
    state.next_window_id = state.next_window_id.saturating_add(1);
    id
}

fn window_index(state: &DesktopState, window_id: WindowId) -> Result<usize, ReducerError> {
    state
        .windows
        .iter()
        .position(|w| w.id == window_id)
        .ok_or(ReducerError::WindowNotFound(window_id))
}

fn find_window_mut(
    state: &mut DesktopState,
    window_id: WindowId,
) -> Result<&mut WindowRecord, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| w.id == window_id)
        .ok_or(ReducerError::WindowNotFound(window_id))
}
