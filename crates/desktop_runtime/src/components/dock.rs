use super::*;
use crate::{
    apps::{app_catalog, AppManifest},
    model::{AppKind, DesktopState},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DockItemStatus {
    running: bool,
    minimized: bool,
}

fn dock_item_status(state: &DesktopState, app_kind: AppKind) -> DockItemStatus {
    match state.window_for_app(app_kind) {
        Some(window) => DockItemStatus {
            running: true,
            minimized: window.minimized,
        },
        None => DockItemStatus {
            running: false,
            minimized: false,
        },
    }
}

fn dock_aria_label(manifest: &AppManifest, status: DockItemStatus) -> String {
    match (status.running, status.minimized) {
        (false, _) => manifest.dock_label.clone(),
        (true, false) => format!("{} (running)", manifest.dock_label),
        (true, true) => format!("{} (minimized)", manifest.dock_label),
    }
}

#[component]
pub(super) fn Dock() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;
    let auto_hide = Signal::derive(move || runtime.settings.get().auto_hide_dock);

    view! {
        <nav
            class=move || if auto_hide.get() { "dock auto-hide" } else { "dock" }
            aria-label="Dock"
        >
            {app_catalog()
                .iter()
                .map(|manifest| {
                    let app_kind = manifest.app_kind;
                    let status = Signal::derive(move || dock_item_status(&state.get(), app_kind));
                    view! {
                        {manifest
                            .dock_separator_before
                            .then(|| view! { <div class="dock-separator" aria-hidden="true"></div> })}
                        <button
                            class=format!("dock-item icon-{}", app_kind.icon_id())
                            title=manifest.dock_label.clone()
                            aria-label=move || dock_aria_label(manifest, status.get())
                            on:click=move |_| runtime.open_app(app_kind)
                        >
                            <span class="dock-icon" aria-hidden="true"></span>
                            <span
                                class="dock-indicator"
                                class:visible=move || status.get().running
                                aria-hidden="true"
                            ></span>
                        </button>
                    }
                })
                .collect_view()}
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{apps::app_manifest, model::InteractionState, reducer::reduce_desktop};

    #[test]
    fn dock_labels_reflect_window_state() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let manifest = app_manifest(AppKind::Notes);

        assert_eq!(
            dock_aria_label(manifest, dock_item_status(&state, AppKind::Notes)),
            "Notes"
        );

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::OpenApp {
                app_kind: AppKind::Notes,
                viewport: Default::default(),
            },
        )
        .expect("open notes");
        assert_eq!(
            dock_aria_label(manifest, dock_item_status(&state, AppKind::Notes)),
            "Notes (running)"
        );

        let window_id = state.windows[0].id;
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::MinimizeWindow { window_id },
        )
        .expect("minimize notes");
        assert_eq!(
            dock_aria_label(manifest, dock_item_status(&state, AppKind::Notes)),
            "Notes (minimized)"
        );
    }
}
