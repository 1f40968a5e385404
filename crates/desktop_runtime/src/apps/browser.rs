use leptos::*;

use crate::{
    browser_session::{built_in_sites, resolve_source, BrowserHistory, PageKind},
    host::window_primary_input_dom_id,
    model::{AppKind, WindowId},
    reducer::DesktopAction,
    runtime_context::use_desktop_runtime,
    vfs::FileKind,
};

fn page_status(kind: PageKind) -> &'static str {
    match kind {
        PageKind::Welcome => "",
        PageKind::StoredPage => "Local page",
        PageKind::StoredText => "Local file",
        PageKind::BuiltInSite => "Demo site",
        PageKind::Offline => "Offline",
        PageKind::NotFound => "Not found",
    }
}

#[component]
pub(super) fn BrowserApp(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let file_revision = runtime.watch_files("browser");
    let address = create_rw_signal(String::new());

    let history = Signal::derive(move || {
        runtime.sessions.with(|sessions| {
            sessions
                .browser(window_id)
                .cloned()
                .unwrap_or_default()
        })
    });
    let page = Signal::derive(move || {
        let _ = file_revision.get();
        let current = history.with(|history| history.current().unwrap_or_default().to_string());
        resolve_source(&runtime.files(), &current)
    });
    let stored_pages = Signal::derive(move || {
        let _ = file_revision.get();
        runtime
            .files()
            .list_where(|record| record.kind == FileKind::Page)
    });

    let with_history = move |update: &dyn Fn(&mut BrowserHistory)| {
        runtime
            .sessions
            .update(|sessions| update(sessions.browser_mut(window_id)));
    };
    let navigate = move |source: String| {
        with_history(&|history: &mut BrowserHistory| history.navigate(&source));
    };

    create_effect(move |_| {
        let pending = runtime.state.with(|desktop| {
            desktop
                .pending_resource(AppKind::Browser)
                .map(str::to_string)
        });
        if let Some(name) = pending {
            navigate(name);
            runtime.dispatch_action(DesktopAction::ConsumePendingResource {
                app_kind: AppKind::Browser,
            });
        }
    });

    // The address bar shows what was loaded, including after back/forward. The memo keeps
    // unrelated store writes from clobbering a half-typed address.
    let loaded_address = create_memo(move |_| page.get().address);
    create_effect(move |_| address.set(loaded_address.get()));

    let go_back = move |_| {
        with_history(&|history: &mut BrowserHistory| {
            history.back();
        })
    };
    let go_forward = move |_| {
        with_history(&|history: &mut BrowserHistory| {
            history.forward();
        })
    };
    let on_address_keydown = move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Enter" {
            ev.prevent_default();
            navigate(address.get_untracked());
        }
    };

    view! {
        <div class="browser-content">
            <div class="browser-toolbar">
                <button
                    aria-label="Back"
                    disabled=move || !history.with(BrowserHistory::can_go_back)
                    on:click=go_back
                >
                    "‹"
                </button>
                <button
                    aria-label="Forward"
                    disabled=move || !history.with(BrowserHistory::can_go_forward)
                    on:click=go_forward
                >
                    "›"
                </button>
                <input
                    id=window_primary_input_dom_id(window_id)
                    class="browser-address"
                    type="text"
                    placeholder="Search or enter website name"
                    autocomplete="off"
                    prop:value=move || address.get()
                    on:input=move |ev| address.set(event_target_value(&ev))
                    on:keydown=on_address_keydown
                />
                <span class="browser-status">{move || page_status(page.get().kind)}</span>
            </div>
            <div class="browser-bookmarks">
                {built_in_sites()
                    .map(|(domain, title)| {
                        view! {
                            <button
                                class="browser-bookmark"
                                title=domain
                                on:click=move |_| navigate(domain.to_string())
                            >
                                {title}
                            </button>
                        }
                    })
                    .collect_view()}
                <select
                    class="browser-file-picker"
                    aria-label="Open local page"
                    on:change=move |ev| {
                        let name = event_target_value(&ev);
                        if !name.is_empty() {
                            navigate(name);
                        }
                    }
                >
                    <option value="" selected=true>"Local pages…"</option>
                    <For
                        each=move || stored_pages.get()
                        key=|record| record.name.clone()
                        let:record
                    >
                        <option value=record.name.clone()>
                            {record.display_title().to_string()}
                        </option>
                    </For>
                </select>
            </div>
            <div
                class=move || format!("browser-page page-{:?}", page.get().kind).to_ascii_lowercase()
                inner_html=move || page.get().html
            ></div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn placeholder_pages_are_labelled() {
        assert_eq!(page_status(PageKind::Offline), "Offline");
        assert_eq!(page_status(PageKind::Welcome), "");
    }
}
