//! Desktop shell UI composition and interaction surfaces.

mod dock;
mod menu_bar;
mod window;

use leptos::*;

use self::{dock::Dock, menu_bar::MenuBar, window::DesktopWindow};

use crate::{
    model::{PointerPosition, ResizeEdge},
    reducer::DesktopAction,
    settings::Appearance,
    wallpaper::wallpaper_css,
};

pub use crate::runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};

/// Window command bound to a Cmd/Ctrl shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowShortcut {
    Close,
    Minimize,
}

impl WindowShortcut {
    fn action(self) -> DesktopAction {
        match self {
            Self::Close => DesktopAction::CloseActiveWindow,
            Self::Minimize => DesktopAction::MinimizeActiveWindow,
        }
    }
}

/// Maps a key press to a window shortcut. Only Cmd or Ctrl without Alt qualifies.
fn window_shortcut(key: &str, command: bool, alt: bool) -> Option<WindowShortcut> {
    if !command || alt {
        return None;
    }
    match key.to_ascii_lowercase().as_str() {
        "w" => Some(WindowShortcut::Close),
        "m" => Some(WindowShortcut::Minimize),
        _ => None,
    }
}

fn appearance_class(appearance: Appearance) -> &'static str {
    match appearance {
        Appearance::Light => "desktop-shell appearance-light",
        Appearance::Dark => "desktop-shell appearance-dark",
        Appearance::Auto => "desktop-shell appearance-auto",
    }
}

#[component]
fn BootScreen() -> impl IntoView {
    view! {
        <div class="boot-screen" role="status" aria-label="Starting up">
            <div class="boot-logo" aria-hidden="true"></div>
            <div class="boot-progress">
                <div class="boot-progress-bar"></div>
            </div>
        </div>
    }
}

#[component]
/// Renders the full desktop shell UI and processes queued [`crate::RuntimeEffect`] values.
pub fn DesktopShell() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;
    let booted = Signal::derive(move || state.get().booted);

    let shortcut_listener = window_event_listener(ev::keydown, move |ev| {
        if ev.default_prevented() || !state.get_untracked().booted {
            return;
        }
        let command = ev.meta_key() || ev.ctrl_key();
        if let Some(shortcut) = window_shortcut(&ev.key(), command, ev.alt_key()) {
            ev.prevent_default();
            runtime.dispatch_action(shortcut.action());
        }
    });
    on_cleanup(move || shortcut_listener.remove());

    let on_pointer_move = move |ev: web_sys::PointerEvent| {
        let pointer = pointer_from_pointer_event(&ev);
        let interaction = runtime.interaction.get_untracked();

        if interaction.dragging.is_some() {
            runtime.dispatch_action(DesktopAction::UpdateMove { pointer });
        }
        if interaction.resizing.is_some() {
            runtime.dispatch_action(DesktopAction::UpdateResize { pointer });
        }
    };
    let on_pointer_end = move |_| end_active_pointer_interaction(runtime);

    view! {
        <div
            id="desktop-shell-root"
            class=move || appearance_class(runtime.settings.get().appearance)
            tabindex="-1"
            style=move || format!("background-image:{};", wallpaper_css(&state.get().wallpaper))
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_end
            on:pointercancel=on_pointer_end
        >
            <Show when=move || booted.get() fallback=|| view! { <BootScreen /> }>
                <MenuBar />
                <div class="desktop-window-layer">
                    <For each=move || state.get().windows key=|win| win.id.0 let:win>
                        <DesktopWindow window_id=win.id />
                    </For>
                </div>
                <Dock />
            </Show>
        </div>
    }
}

fn stop_mouse_event(ev: &web_sys::MouseEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

fn pointer_from_pointer_event(ev: &web_sys::PointerEvent) -> PointerPosition {
    PointerPosition {
        x: ev.client_x(),
        y: ev.client_y(),
    }
}

fn end_active_pointer_interaction(runtime: DesktopRuntimeContext) {
    let interaction = runtime.interaction.get_untracked();
    if interaction.dragging.is_some() {
        runtime.dispatch_action(DesktopAction::EndMove);
    }
    if interaction.resizing.is_some() {
        runtime.dispatch_action(DesktopAction::EndResize);
    }
}

fn resize_edge_class(edge: ResizeEdge) -> &'static str {
    match edge {
        ResizeEdge::North => "edge-n",
        ResizeEdge::South => "edge-s",
        ResizeEdge::East => "edge-e",
        ResizeEdge::West => "edge-w",
        ResizeEdge::NorthEast => "edge-ne",
        ResizeEdge::NorthWest => "edge-nw",
        ResizeEdge::SouthEast => "edge-se",
        ResizeEdge::SouthWest => "edge-sw",
    }
}
