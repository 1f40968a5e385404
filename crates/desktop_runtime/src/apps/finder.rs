use chrono::{DateTime, Local, Utc};
use leptos::*;

use crate::{
    runtime_context::use_desktop_runtime,
    vfs::{preview, FileKind, FileRecord},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FinderFilter {
    All,
    Kind(FileKind),
}

impl FinderFilter {
    const SIDEBAR: [FinderFilter; 4] = [
        Self::All,
        Self::Kind(FileKind::Note),
        Self::Kind(FileKind::Text),
        Self::Kind(FileKind::Page),
    ];

    fn label(self) -> &'static str {
        match self {
            Self::All => "All Files",
            Self::Kind(FileKind::Note) => "Notes",
            Self::Kind(FileKind::Text) => "Documents",
            Self::Kind(FileKind::Page) => "Web Pages",
            Self::Kind(FileKind::Folder) => "Folders",
        }
    }

    fn matches(self, record: &FileRecord) -> bool {
        match self {
            Self::All => true,
            Self::Kind(kind) => record.kind == kind,
        }
    }
}

fn file_meta(record: &FileRecord) -> String {
    let modified = DateTime::<Utc>::from_timestamp_millis(record.modified_at as i64)
        .unwrap_or_default()
        .with_timezone(&Local);
    format!("{} · {}", record.name, modified.format("%Y-%m-%d %H:%M"))
}

#[component]
pub(super) fn FinderApp() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let file_revision = runtime.watch_files("finder");
    let filter = create_rw_signal(FinderFilter::All);
    let selected = create_rw_signal(None::<String>);

    let files = Signal::derive(move || {
        let _ = file_revision.get();
        let filter = filter.get();
        runtime
            .files()
            .list_sorted_by_recency(|record| filter.matches(record))
    });

    let new_note = move |_| {
        let name = runtime.files().create_note();
        selected.set(Some(name.clone()));
        runtime.open_file(&name);
    };
    let trash_selected = move |_| {
        if let Some(name) = selected.get_untracked() {
            runtime.files().delete(&name);
            selected.set(None);
        }
    };

    view! {
        <div class="finder-content">
            <aside class="finder-sidebar">
                <div class="finder-section-title">"Favorites"</div>
                {FinderFilter::SIDEBAR
                    .into_iter()
                    .map(|entry| {
                        view! {
                            <button
                                class="finder-item"
                                class:active=move || filter.get() == entry
                                on:click=move |_| filter.set(entry)
                            >
                                {entry.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </aside>
            <div class="finder-main">
                <div class="finder-toolbar">
                    <div class="finder-path">{move || filter.get().label()}</div>
                    <div class="finder-actions">
                        <button on:click=new_note>"New Note"</button>
                        <button
                            disabled=move || selected.get().is_none()
                            on:click=trash_selected
                        >
                            "Move to Trash"
                        </button>
                    </div>
                </div>
                <Show
                    when=move || !files.get().is_empty()
                    fallback=|| view! { <div class="finder-empty">"No files"</div> }
                >
                    <div class="finder-files" role="listbox">
                        <For
                            each=move || files.get()
                            key=|record| (record.name.clone(), record.modified_at)
                            let:record
                        >
                            {
                                let name = record.name.clone();
                                let click_name = name.clone();
                                let open_name = name.clone();
                                view! {
                                    <div
                                        class=format!("finder-file kind-{}", record.kind.as_str())
                                        class:selected=move || {
                                            selected.get().as_deref() == Some(name.as_str())
                                        }
                                        role="option"
                                        on:click=move |_| selected.set(Some(click_name.clone()))
                                        on:dblclick=move |_| runtime.open_file(&open_name)
                                    >
                                        <div class="finder-file-icon" aria-hidden="true"></div>
                                        <div class="finder-file-info">
                                            <div class="finder-file-name">
                                                {record.display_title().to_string()}
                                            </div>
                                            <div class="finder-file-meta">{file_meta(&record)}</div>
                                            <div class="finder-file-preview">{preview(&record)}</div>
                                        </div>
                                    </div>
                                }
                            }
                        </For>
                    </div>
                </Show>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use platform_host::{ManualClock, MemoryPrefsStore};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::vfs::VirtualFileStore;

    #[test]
    fn sidebar_filters_select_by_kind() {
        let store = VirtualFileStore::load(
            Rc::new(MemoryPrefsStore::default()),
            Rc::new(ManualClock::new(1_000)),
        );
        let pages: Vec<String> = store
            .list_where(|record| FinderFilter::Kind(FileKind::Page).matches(record))
            .into_iter()
            .map(|record| record.name)
            .collect();
        assert_eq!(pages, vec!["safari-tips.html".to_string()]);
        assert_eq!(
            store.list_where(|record| FinderFilter::All.matches(record)).len(),
            store.len()
        );
    }
}
