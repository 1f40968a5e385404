use chrono::{DateTime, Local, Utc};
use leptos::*;

use crate::{runtime_context::use_desktop_runtime, vfs::TrashedFile};

fn trashed_label(entry: &TrashedFile) -> String {
    let when = DateTime::<Utc>::from_timestamp_millis(entry.trashed_at as i64)
        .unwrap_or_default()
        .with_timezone(&Local);
    format!("Deleted {}", when.format("%Y-%m-%d %H:%M"))
}

fn item_count(count: usize) -> String {
    match count {
        1 => "1 item".to_string(),
        count => format!("{count} items"),
    }
}

#[component]
pub(super) fn TrashApp() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let file_revision = runtime.watch_files("trash");
    let entries = Signal::derive(move || {
        let _ = file_revision.get();
        runtime.files().trashed()
    });

    view! {
        <div class="trash-content">
            <div class="trash-toolbar">
                <span class="trash-count">{move || item_count(entries.with(Vec::len))}</span>
                <button
                    disabled=move || entries.with(Vec::is_empty)
                    on:click=move |_| {
                        runtime.files().empty_trash();
                    }
                >
                    "Empty Trash"
                </button>
            </div>
            <Show
                when=move || !entries.with(Vec::is_empty)
                fallback=|| view! { <div class="trash-empty">"Trash is empty"</div> }
            >
                <ul class="trash-list">
                    <For
                        each=move || entries.get()
                        key=|entry| (entry.record.name.clone(), entry.trashed_at)
                        let:entry
                    >
                        {
                            let restore_name = entry.record.name.clone();
                            let purge_name = entry.record.name.clone();
                            view! {
                                <li class="trash-item">
                                    <div class="trash-item-info">
                                        <div class="trash-item-title">
                                            {entry.record.display_title().to_string()}
                                        </div>
                                        <div class="trash-item-meta">
                                            {format!("{} · {}", entry.record.name, trashed_label(&entry))}
                                        </div>
                                    </div>
                                    <button on:click=move |_| {
                                        runtime.files().restore(&restore_name);
                                    }>"Put Back"</button>
                                    <button on:click=move |_| {
                                        runtime.files().permanently_delete(&purge_name);
                                    }>"Delete Immediately"</button>
                                </li>
                            }
                        }
                    </For>
                </ul>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn counts_are_pluralized() {
        assert_eq!(item_count(0), "0 items");
        assert_eq!(item_count(1), "1 item");
        assert_eq!(item_count(4), "4 items");
    }
}
