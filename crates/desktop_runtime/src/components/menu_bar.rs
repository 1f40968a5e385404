use std::time::Duration;

use chrono::{Local, NaiveDateTime};

use super::*;
use crate::{
    apps::app_manifest,
    model::{AppKind, DesktopState},
};

const IDLE_APP_TITLE: &str = "Finder";

/// Name shown next to the Apple menu: the focused window's app, or Finder.
fn active_app_title(state: &DesktopState) -> &'static str {
    state
        .active_window_record()
        .map_or(IDLE_APP_TITLE, |window| {
            app_manifest(window.app_kind).title.as_str()
        })
}

fn format_menu_clock(now: NaiveDateTime) -> String {
    now.format("%a %b %-d  %-I:%M %p").to_string()
}

fn local_clock_text() -> String {
    format_menu_clock(Local::now().naive_local())
}

#[component]
pub(super) fn MenuBar() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;
    let settings = runtime.settings;
    let clock_text = create_rw_signal(local_clock_text());
    let system_menu_open = create_rw_signal(false);

    if let Ok(interval) = set_interval_with_handle(
        move || clock_text.set(local_clock_text()),
        Duration::from_secs(1),
    ) {
        on_cleanup(move || interval.clear());
    }

    let outside_click_listener = window_event_listener(ev::mousedown, move |_| {
        if system_menu_open.get_untracked() {
            system_menu_open.set(false);
        }
    });
    on_cleanup(move || outside_click_listener.remove());

    let run_menu_item = move |action: Option<DesktopAction>, app: Option<AppKind>| {
        system_menu_open.set(false);
        if let Some(action) = action {
            runtime.dispatch_action(action);
        }
        if let Some(app_kind) = app {
            runtime.open_app(app_kind);
        }
    };

    view! {
        <header class="menu-bar" role="menubar">
            <div class="menu-bar-left">
                <button
                    class="menu-bar-logo"
                    aria-label="System menu"
                    aria-haspopup="menu"
                    aria-expanded=move || system_menu_open.get().to_string()
                    on:mousedown=move |ev| ev.stop_propagation()
                    on:click=move |_| system_menu_open.update(|open| *open = !*open)
                ></button>
                <span class="menu-bar-app-title">{move || active_app_title(&state.get())}</span>
                <span class="menu-bar-item">"File"</span>
                <span class="menu-bar-item">"Edit"</span>
                <span class="menu-bar-item">"View"</span>
                <span class="menu-bar-item">"Window"</span>
                <span class="menu-bar-item">"Help"</span>
            </div>
            <Show when=move || system_menu_open.get() fallback=|| ()>
                <div
                    class="menu-dropdown system-menu"
                    role="menu"
                    on:mousedown=move |ev| ev.stop_propagation()
                >
                    <button
                        role="menuitem"
                        on:click=move |_| run_menu_item(None, Some(AppKind::Settings))
                    >
                        "System Settings…"
                    </button>
                    <button
                        role="menuitem"
                        on:click=move |_| run_menu_item(None, Some(AppKind::Finder))
                    >
                        "Open Finder"
                    </button>
                    <div class="menu-divider" role="separator"></div>
                    <button
                        role="menuitem"
                        disabled=move || state.get().active_window.is_none()
                        on:click=move |_| {
                            run_menu_item(Some(DesktopAction::MinimizeActiveWindow), None)
                        }
                    >
                        "Minimize Window"
                    </button>
                    <button
                        role="menuitem"
                        disabled=move || state.get().active_window.is_none()
                        on:click=move |_| {
                            run_menu_item(Some(DesktopAction::CloseActiveWindow), None)
                        }
                    >
                        "Close Window"
                    </button>
                </div>
            </Show>
            <div class="menu-bar-right">
                <span
                    class="menu-bar-status wifi"
                    class:off=move || !settings.get().wifi_enabled
                    aria-label=move || {
                        if settings.get().wifi_enabled { "Wi-Fi on" } else { "Wi-Fi off" }
                    }
                ></span>
                <span class="menu-bar-clock">{move || clock_text.get()}</span>
            </div>
        </header>
    }
}
