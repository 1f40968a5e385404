use super::*;
use crate::{apps, model::WindowId};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

#[cfg(target_arch = "wasm32")]
fn try_set_pointer_capture(ev: &web_sys::PointerEvent) {
    if let Some(target) = ev.current_target() {
        if let Ok(element) = target.dyn_into::<web_sys::Element>() {
            let _ = element.set_pointer_capture(ev.pointer_id());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn try_set_pointer_capture(_: &web_sys::PointerEvent) {}

/// Primary button for mice, primary contact for touch and pen.
fn is_primary_press(ev: &web_sys::PointerEvent) -> bool {
    if ev.pointer_type() == "mouse" {
        ev.button() == 0
    } else {
        ev.is_primary()
    }
}

#[component]
pub(super) fn DesktopWindow(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();

    let window = Signal::derive(move || runtime.state.get().window(window_id).cloned());
    let is_active = Signal::derive(move || runtime.state.get().active_window == Some(window_id));

    let focus = move |_| {
        if !is_active.get_untracked() {
            runtime.dispatch_action(DesktopAction::FocusWindow { window_id });
        }
    };
    let minimize = move || runtime.dispatch_action(DesktopAction::MinimizeWindow { window_id });
    let close = move || runtime.dispatch_action(DesktopAction::CloseWindow { window_id });
    let toggle_maximize = move || {
        runtime.dispatch_action(DesktopAction::ToggleMaximize {
            window_id,
            viewport: runtime.viewport(),
        });
    };
    let begin_move = move |ev: web_sys::PointerEvent| {
        if !is_primary_press(&ev) {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        runtime.dispatch_action(DesktopAction::BeginMove {
            window_id,
            pointer: pointer_from_pointer_event(&ev),
        });
    };
    let titlebar_double_click = move |ev: web_sys::MouseEvent| {
        stop_mouse_event(&ev);
        toggle_maximize();
    };

    let Some(initial) = window.get_untracked() else {
        return ().into_view();
    };
    let title = initial.title.clone();
    let flags = initial.flags;
    let app_id = initial.app_kind.id();

    // Only the geometry and state classes are reactive so the app view is mounted exactly once.
    let style = move || {
        window
            .get()
            .map(|win| {
                format!(
                    "left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};",
                    win.rect.x, win.rect.y, win.rect.w, win.rect.h, win.z_index
                )
            })
            .unwrap_or_default()
    };
    let class_name = move || {
        let win = window.get();
        format!(
            "desktop-window app-{app_id}{}{}{}",
            if is_active.get() { " focused" } else { "" },
            if win.as_ref().is_some_and(|w| w.maximized) { " maximized" } else { "" },
            if win.as_ref().is_some_and(|w| w.minimized) { " minimized" } else { "" }
        )
    };
    let maximized = Signal::derive(move || window.get().is_some_and(|w| w.maximized));

    view! {
        <section
            class=class_name
            style=style
            on:pointerdown=focus
            role="dialog"
            aria-label=title.clone()
            aria-hidden=move || window.get().is_some_and(|w| w.minimized).to_string()
        >
            <header
                class="titlebar"
                on:pointerdown=begin_move
                on:dblclick=titlebar_double_click
            >
                <div class="traffic-lights">
                    <TitlebarButton
                        class_name="traffic-light close"
                        label=Signal::derive(|| "Close window")
                        enabled=true
                        on_press=Callback::new(move |_| close())
                    />
                    <TitlebarButton
                        class_name="traffic-light minimize"
                        label=Signal::derive(|| "Minimize window")
                        enabled=true
                        on_press=Callback::new(move |_| minimize())
                    />
                    <TitlebarButton
                        class_name="traffic-light maximize"
                        label=Signal::derive(move || {
                            if maximized.get() { "Restore window" } else { "Maximize window" }
                        })
                        enabled=flags.maximizable
                        on_press=Callback::new(move |_| toggle_maximize())
                    />
                </div>
                <div class="titlebar-title">{title}</div>
            </header>
            <div class="window-body">
                <WindowBody window_id=window_id />
            </div>
            <Show when=move || flags.resizable && !maximized.get() fallback=|| ()>
                <WindowResizeHandle window_id=window_id edge=ResizeEdge::North />
                <WindowResizeHandle window_id=window_id edge=ResizeEdge::South />
                <WindowResizeHandle window_id=window_id edge=ResizeEdge::East />
                <WindowResizeHandle window_id=window_id edge=ResizeEdge::West />
                <WindowResizeHandle window_id=window_id edge=ResizeEdge::NorthEast />
                <WindowResizeHandle window_id=window_id edge=ResizeEdge::NorthWest />
                <WindowResizeHandle window_id=window_id edge=ResizeEdge::SouthEast />
                <WindowResizeHandle window_id=window_id edge=ResizeEdge::SouthWest />
            </Show>
        </section>
    }
    .into_view()
}

#[component]
fn TitlebarButton(
    class_name: &'static str,
    #[prop(into)] label: Signal<&'static str>,
    enabled: bool,
    on_press: Callback<()>,
) -> impl IntoView {
    view! {
        <button
            class=class_name
            disabled=!enabled
            aria-label=move || label.get()
            on:pointerdown=move |ev: web_sys::PointerEvent| {
                ev.prevent_default();
                ev.stop_propagation();
            }
            on:mousedown=move |ev| stop_mouse_event(&ev)
            on:click=move |ev| {
                stop_mouse_event(&ev);
                on_press.call(());
            }
        />
    }
}

#[component]
fn WindowResizeHandle(window_id: WindowId, edge: ResizeEdge) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let class_name = format!("window-resize-handle {}", resize_edge_class(edge));

    let on_pointerdown = move |ev: web_sys::PointerEvent| {
        if !is_primary_press(&ev) {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        ev.stop_propagation();
        runtime.dispatch_action(DesktopAction::BeginResize {
            window_id,
            edge,
            pointer: pointer_from_pointer_event(&ev),
        });
    };

    view! {
        <div
            class=class_name
            aria-hidden="true"
            on:pointerdown=on_pointerdown
        />
    }
}

#[component]
fn WindowBody(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let contents = runtime
        .state
        .get_untracked()
        .window(window_id)
        .map(apps::render_window_contents)
        .unwrap_or_else(|| view! { <p>"Closed"</p> }.into_view());

    view! {
        <div class="window-body-content">
            {contents}
        </div>
    }
}
