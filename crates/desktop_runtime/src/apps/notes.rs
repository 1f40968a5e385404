use leptos::*;

use crate::{
    host::window_primary_input_dom_id,
    model::{AppKind, WindowId},
    reducer::DesktopAction,
    runtime_context::use_desktop_runtime,
    vfs::{preview, FileKind, FilePatch},
};

const UNTITLED_NOTE: &str = "Untitled Note";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NoteStatus {
    NoSelection,
    NoNotes,
    Loaded,
    Saving,
    Saved,
}

impl NoteStatus {
    fn label(self) -> &'static str {
        match self {
            Self::NoSelection => "Select a note to start editing",
            Self::NoNotes => "No notes",
            Self::Loaded => "Loaded",
            Self::Saving => "Saving…",
            Self::Saved => "Saved",
        }
    }
}

/// Title written to the store for the editor's title field.
fn saved_title(raw: &str) -> String {
    match raw.trim() {
        "" => UNTITLED_NOTE.to_string(),
        title => title.to_string(),
    }
}

#[component]
pub(super) fn NotesApp(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let file_revision = runtime.watch_files("notes");
    let title = create_rw_signal(String::new());
    let content = create_rw_signal(String::new());
    let status = create_rw_signal(NoteStatus::NoSelection);
    // Last (title, content) handed to the auto-save queue, to tell our own writes from others.
    let last_written = store_value(None::<(String, String)>);

    let selected = Signal::derive(move || {
        runtime
            .sessions
            .with(|sessions| sessions.selected_note(window_id).map(str::to_string))
    });
    let notes = Signal::derive(move || {
        let _ = file_revision.get();
        runtime
            .files()
            .list_sorted_by_recency(|record| record.kind.is_editable_text())
    });

    let select = move |name: Option<String>| {
        runtime
            .sessions
            .update(|sessions| sessions.select_note(window_id, name));
    };
    let switch_to = move |name: String| {
        runtime.flush_autosave();
        select(Some(name));
    };

    create_effect(move |_| {
        let pending = runtime.state.with(|desktop| {
            desktop
                .pending_resource(AppKind::Notes)
                .map(str::to_string)
        });
        if let Some(name) = pending {
            switch_to(name);
            runtime.dispatch_action(DesktopAction::ConsumePendingResource {
                app_kind: AppKind::Notes,
            });
        }
    });

    // Load the editor whenever the selection changes.
    create_effect(move |_| {
        let record = selected.get().and_then(|name| runtime.files().read(&name));
        last_written.set_value(None);
        match record {
            Some(record) => {
                title.set(record.display_title().to_string());
                content.set(record.content_str().to_string());
                status.set(NoteStatus::Loaded);
            }
            None => {
                title.set(String::new());
                content.set(String::new());
                status.set(NoteStatus::NoSelection);
            }
        }
    });

    // Keep a valid selection as notes come and go.
    create_effect(move |_| {
        let notes = notes.get();
        let current = selected.get_untracked();
        let still_listed = current
            .as_deref()
            .is_some_and(|name| notes.iter().any(|record| record.name == name));
        if still_listed {
            return;
        }
        match notes.first() {
            Some(first) => select(Some(first.name.clone())),
            None => {
                select(None);
                status.set(NoteStatus::NoNotes);
            }
        }
    });

    // Reconcile with the store after writes: our own flush marks the draft saved, anything else
    // (terminal `write`, another window) reloads the editor.
    create_effect(move |_| {
        let _ = file_revision.get();
        let Some(name) = selected.get_untracked() else {
            return;
        };
        if runtime.is_autosave_pending(&name) {
            return;
        }
        let Some(record) = runtime.files().read(&name) else {
            return;
        };
        let stored = (
            record.display_title().to_string(),
            record.content_str().to_string(),
        );
        if last_written.get_value().as_ref() == Some(&stored) {
            if status.get_untracked() == NoteStatus::Saving {
                status.set(NoteStatus::Saved);
            }
            return;
        }
        if stored.1 != content.get_untracked() || stored.0 != saved_title(&title.get_untracked()) {
            title.set(stored.0);
            content.set(stored.1);
            status.set(NoteStatus::Loaded);
        }
    });

    let schedule_save = move || {
        let Some(name) = selected.get_untracked() else {
            return;
        };
        let kind = runtime
            .files()
            .read(&name)
            .map_or(FileKind::Note, |record| record.kind);
        let draft_title = saved_title(&title.get_untracked());
        let draft_content = content.get_untracked();
        last_written.set_value(Some((draft_title.clone(), draft_content.clone())));
        status.set(NoteStatus::Saving);
        runtime.schedule_autosave(
            &name,
            FilePatch::new()
                .kind(kind)
                .title(draft_title)
                .content(draft_content),
        );
    };

    let new_note = move |_| {
        runtime.flush_autosave();
        let name = runtime.files().create_note();
        select(Some(name));
    };

    let editor_disabled = move || selected.get().is_none();

    view! {
        <div class="notes-content">
            <aside class="notes-sidebar">
                <div class="notes-toolbar">
                    <button class="notes-new" on:click=new_note>"New Note"</button>
                </div>
                <Show
                    when=move || !notes.get().is_empty()
                    fallback=|| view! { <div class="notes-empty">"No notes yet"</div> }
                >
                    <div class="notes-list" role="listbox">
                        <For
                            each=move || notes.get()
                            key=|record| (record.name.clone(), record.modified_at)
                            let:record
                        >
                            {
                                let name = record.name.clone();
                                let click_name = name.clone();
                                view! {
                                    <div
                                        class="notes-list-item"
                                        class:active=move || {
                                            selected.get().as_deref() == Some(name.as_str())
                                        }
                                        role="option"
                                        on:click=move |_| switch_to(click_name.clone())
                                    >
                                        <div class="notes-item-title">
                                            {record.display_title().to_string()}
                                        </div>
                                        <div class="notes-item-preview">{preview(&record)}</div>
                                    </div>
                                }
                            }
                        </For>
                    </div>
                </Show>
            </aside>
            <div class="notes-editor">
                <input
                    class="notes-title"
                    type="text"
                    placeholder="Title"
                    disabled=editor_disabled
                    prop:value=move || title.get()
                    on:input=move |ev| {
                        title.set(event_target_value(&ev));
                        schedule_save();
                    }
                />
                <textarea
                    id=window_primary_input_dom_id(window_id)
                    class="notes-body"
                    placeholder="Start writing…"
                    disabled=editor_disabled
                    prop:value=move || content.get()
                    on:input=move |ev| {
                        content.set(event_target_value(&ev));
                        schedule_save();
                    }
                ></textarea>
                <div class="notes-status" aria-live="polite">{move || status.get().label()}</div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn blank_titles_are_saved_as_untitled() {
        assert_eq!(saved_title("   "), "Untitled Note");
        assert_eq!(saved_title("  Groceries "), "Groceries");
    }

    #[test]
    fn status_labels_cover_the_save_cycle() {
        assert_eq!(NoteStatus::Saving.label(), "Saving…");
        assert_eq!(NoteStatus::Saved.label(), "Saved");
    }
}
