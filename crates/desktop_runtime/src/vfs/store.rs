use std::{
    cell::RefCell,
    collections::BTreeMap,
    rc::{Rc, Weak},
};

use leptos::logging;
use platform_host::{load_pref_with, save_pref_with, Clock, PrefsStore, FILES_KEY, TRASH_KEY};

use super::seed::default_files;
use super::types::{FileChange, FileKind, FilePatch, FileRecord, TrashedFile};

const PREVIEW_MAX_CHARS: usize = 60;
const EMPTY_PREVIEW: &str = "(empty file)";

type ChangeCallback = Rc<dyn Fn(&FileChange)>;

struct Subscriber {
    id: u64,
    consumer: String,
    callback: ChangeCallback,
}

struct StoreInner {
    files: BTreeMap<String, FileRecord>,
    trash: BTreeMap<String, TrashedFile>,
    subscribers: Vec<Subscriber>,
    next_subscriber_id: u64,
    prefs: Rc<dyn PrefsStore>,
    clock: Rc<dyn Clock>,
}

impl StoreInner {
    fn persist_files(&self) {
        if let Err(err) = save_pref_with(self.prefs.as_ref(), FILES_KEY, &self.files) {
            logging::warn!("virtual file store persist failed: {err}");
        }
    }

    fn persist_trash(&self) {
        if let Err(err) = save_pref_with(self.prefs.as_ref(), TRASH_KEY, &self.trash) {
            logging::warn!("trash persist failed: {err}");
        }
    }

    fn callbacks(&self) -> Vec<ChangeCallback> {
        self.subscribers
            .iter()
            .map(|subscriber| Rc::clone(&subscriber.callback))
            .collect()
    }
}

/// Shared handle to the virtual file store.
///
/// Clones refer to the same store. Every mutation is persisted through the injected
/// [`PrefsStore`] and then announced to subscribers; callbacks run after the internal borrow is
/// released, so they may read the store again.
#[derive(Clone)]
pub struct VirtualFileStore {
    inner: Rc<RefCell<StoreInner>>,
}

/// Registration returned by [`VirtualFileStore::subscribe`].
pub struct FileSubscription {
    id: u64,
    store: Weak<RefCell<StoreInner>>,
}

impl FileSubscription {
    /// Removes the callback. A no-op once the store itself is gone.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.store.upgrade() {
            inner
                .borrow_mut()
                .subscribers
                .retain(|subscriber| subscriber.id != self.id);
        }
    }
}

impl VirtualFileStore {
    /// Builds a store from the built-in seed set with persisted records merged over it.
    ///
    /// Malformed persisted JSON is discarded with a warning. Seed files sitting in the trash are
    /// not regenerated.
    pub fn load(prefs: Rc<dyn PrefsStore>, clock: Rc<dyn Clock>) -> Self {
        let trash: BTreeMap<String, TrashedFile> =
            match load_pref_with(prefs.as_ref(), TRASH_KEY) {
                Ok(trash) => trash.unwrap_or_default(),
                Err(err) => {
                    logging::warn!("trash load failed, starting empty: {err}");
                    BTreeMap::new()
                }
            };

        let mut files = default_files(clock.now_ms());
        files.retain(|name, _| !trash.contains_key(name));
        match load_pref_with::<_, BTreeMap<String, FileRecord>>(prefs.as_ref(), FILES_KEY) {
            Ok(Some(persisted)) => {
                for (name, mut record) in persisted {
                    record.name = name.clone();
                    files.insert(name, record);
                }
            }
            Ok(None) => {}
            Err(err) => logging::warn!("file system load failed, using defaults: {err}"),
        }

        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                files,
                trash,
                subscribers: Vec::new(),
                next_subscriber_id: 1,
                prefs,
                clock,
            })),
        }
    }

    /// Registers `callback` to run after every successful mutation.
    pub fn subscribe(
        &self,
        consumer: impl Into<String>,
        callback: impl Fn(&FileChange) + 'static,
    ) -> FileSubscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_subscriber_id;
        inner.next_subscriber_id += 1;
        inner.subscribers.push(Subscriber {
            id,
            consumer: consumer.into(),
            callback: Rc::new(callback),
        });
        FileSubscription {
            id,
            store: Rc::downgrade(&self.inner),
        }
    }

    /// Names of the currently registered consumers, in registration order.
    pub fn subscribers(&self) -> Vec<String> {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .map(|subscriber| subscriber.consumer.clone())
            .collect()
    }

    pub fn read(&self, name: &str) -> Option<FileRecord> {
        self.inner.borrow().files.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.borrow().files.contains_key(name)
    }

    /// Whether `name` currently sits in the trash.
    pub fn is_trashed(&self, name: &str) -> bool {
        self.inner.borrow().trash.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().files.is_empty()
    }

    /// Merges `patch` into the record called `name`, creating it when absent.
    ///
    /// New records infer their type from the extension when the patch has none and default the
    /// title to the name. `modified_at` never moves backwards.
    pub fn upsert(&self, name: &str, patch: FilePatch) -> FileRecord {
        let (record, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            let now = inner.clock.now_ms();
            let record = match inner.files.get(name) {
                Some(existing) => {
                    let mut record = existing.clone();
                    if let Some(kind) = patch.kind {
                        record.kind = kind;
                    }
                    if let Some(title) = patch.title {
                        record.title = title;
                    }
                    if patch.content.is_some() {
                        record.content = patch.content;
                    }
                    record.modified_at = now.max(existing.modified_at);
                    record
                }
                None => FileRecord {
                    name: name.to_string(),
                    kind: patch
                        .kind
                        .unwrap_or_else(|| infer_type(name, FileKind::Text)),
                    title: patch.title.unwrap_or_else(|| name.to_string()),
                    content: patch.content,
                    created_at: now,
                    modified_at: now,
                },
            };
            inner.files.insert(name.to_string(), record.clone());
            inner.persist_files();
            (record, inner.callbacks())
        };
        notify(&callbacks, &FileChange::Upserted(name.to_string()));
        record
    }

    /// Moves `name` to the trash. Returns `false`, without notifying, when it does not exist.
    pub fn delete(&self, name: &str) -> bool {
        let callbacks = {
            let mut inner = self.inner.borrow_mut();
            let Some(record) = inner.files.remove(name) else {
                return false;
            };
            let trashed_at = inner.clock.now_ms();
            inner
                .trash
                .insert(name.to_string(), TrashedFile { record, trashed_at });
            inner.persist_files();
            inner.persist_trash();
            inner.callbacks()
        };
        notify(&callbacks, &FileChange::Trashed(name.to_string()));
        true
    }

    /// Moves `name` from the trash back to the live set, replacing any live record of that name.
    pub fn restore(&self, name: &str) -> bool {
        let callbacks = {
            let mut inner = self.inner.borrow_mut();
            let Some(trashed) = inner.trash.remove(name) else {
                return false;
            };
            inner.files.insert(name.to_string(), trashed.record);
            inner.persist_files();
            inner.persist_trash();
            inner.callbacks()
        };
        notify(&callbacks, &FileChange::Restored(name.to_string()));
        true
    }

    pub fn permanently_delete(&self, name: &str) -> bool {
        let callbacks = {
            let mut inner = self.inner.borrow_mut();
            if inner.trash.remove(name).is_none() {
                return false;
            }
            inner.persist_trash();
            inner.callbacks()
        };
        notify(&callbacks, &FileChange::Purged(name.to_string()));
        true
    }

    /// Purges every trashed record and returns how many were removed.
    pub fn empty_trash(&self) -> usize {
        let (removed, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            let removed = inner.trash.len();
            if removed == 0 {
                return 0;
            }
            inner.trash.clear();
            inner.persist_trash();
            (removed, inner.callbacks())
        };
        notify(&callbacks, &FileChange::TrashEmptied);
        removed
    }

    /// All live records in name order.
    pub fn list(&self) -> Vec<FileRecord> {
        self.inner.borrow().files.values().cloned().collect()
    }

    pub fn list_where(&self, predicate: impl Fn(&FileRecord) -> bool) -> Vec<FileRecord> {
        self.inner
            .borrow()
            .files
            .values()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }

    /// Matching records, most recently modified first.
    pub fn list_sorted_by_recency(
        &self,
        predicate: impl Fn(&FileRecord) -> bool,
    ) -> Vec<FileRecord> {
        let mut records = self.list_where(predicate);
        records.sort_by(|a, b| {
            b.modified_at
                .cmp(&a.modified_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        records
    }

    /// Trashed records, most recently trashed first.
    pub fn trashed(&self) -> Vec<TrashedFile> {
        let mut trashed: Vec<TrashedFile> = self.inner.borrow().trash.values().cloned().collect();
        trashed.sort_by(|a, b| {
            b.trashed_at
                .cmp(&a.trashed_at)
                .then_with(|| a.record.name.cmp(&b.record.name))
        });
        trashed
    }

    /// Creates an empty note under the first free `note-N` name and returns that name.
    pub fn create_note(&self) -> String {
        let index = {
            let inner = self.inner.borrow();
            (1..)
                .find(|idx| !inner.files.contains_key(&format!("note-{idx}")))
                .unwrap_or(1)
        };
        let name = format!("note-{index}");
        self.upsert(
            &name,
            FilePatch::new()
                .kind(FileKind::Note)
                .title(format!("New Note {index}"))
                .content(""),
        );
        name
    }
}

fn notify(callbacks: &[ChangeCallback], change: &FileChange) {
    for callback in callbacks {
        callback(change);
    }
}

/// Derives a file type from `name`'s extension, or `fallback` when it has none we know.
pub fn infer_type(name: &str, fallback: FileKind) -> FileKind {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        FileKind::Page
    } else if lower.ends_with(".md") || lower.ends_with(".txt") {
        FileKind::Text
    } else {
        fallback
    }
}

/// One-line summary of a record for listings: the first non-blank line with markup removed.
pub fn preview(record: &FileRecord) -> String {
    let Some(line) = record
        .content_str()
        .lines()
        .map(|line| strip_tags(line).trim().to_string())
        .find(|line| !line.is_empty())
    else {
        return EMPTY_PREVIEW.to_string();
    };

    if line.chars().count() <= PREVIEW_MAX_CHARS {
        line
    } else {
        let mut truncated: String = line.chars().take(PREVIEW_MAX_CHARS).collect();
        truncated.push('…');
        truncated
    }
}

fn strip_tags(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_tag = false;
    for ch in line.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use platform_host::{ManualClock, MemoryPrefsStore};
    use pretty_assertions::assert_eq;

    use super::*;

    const T0: u64 = 1_700_000_000_000;

    fn store_with(prefs: &MemoryPrefsStore, clock: &ManualClock) -> VirtualFileStore {
        VirtualFileStore::load(Rc::new(prefs.clone()), Rc::new(clock.clone()))
    }

    fn fresh() -> (VirtualFileStore, MemoryPrefsStore, ManualClock) {
        let prefs = MemoryPrefsStore::default();
        let clock = ManualClock::new(T0);
        (store_with(&prefs, &clock), prefs, clock)
    }

    fn counter(store: &VirtualFileStore) -> (Rc<Cell<usize>>, FileSubscription) {
        let hits = Rc::new(Cell::new(0));
        let seen = Rc::clone(&hits);
        let subscription = store.subscribe("test", move |_| seen.set(seen.get() + 1));
        (hits, subscription)
    }

    #[test]
    fn fresh_store_is_seeded_with_default_files() {
        let (store, _, _) = fresh();
        let names: Vec<String> = store.list().into_iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec!["readme.txt", "safari-tips.html", "todo-note", "welcome-note"]
        );
        assert_eq!(
            store.read("safari-tips.html").map(|r| r.kind),
            Some(FileKind::Page)
        );
        let recent: Vec<String> = store
            .list_sorted_by_recency(|_| true)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(recent[0], "welcome-note");
        assert_eq!(recent[3], "safari-tips.html");
    }

    #[test]
    fn upsert_merges_fields_and_advances_modified_at() {
        let (store, _, clock) = fresh();
        let before = store.read("todo-note").expect("seeded");

        clock.advance(5_000);
        let updated = store.upsert("todo-note", FilePatch::new().content("1. ship it"));

        assert_eq!(updated.title, before.title);
        assert_eq!(updated.kind, FileKind::Note);
        assert_eq!(updated.content.as_deref(), Some("1. ship it"));
        assert_eq!(updated.created_at, before.created_at);
        assert!(updated.modified_at >= before.modified_at);
        assert_eq!(store.read("todo-note"), Some(updated));
    }

    #[test]
    fn modified_at_never_moves_backwards() {
        let (store, _, clock) = fresh();
        clock.advance(10_000);
        let first = store.upsert("a.txt", FilePatch::new().content("one"));
        clock.set(T0);
        let second = store.upsert("a.txt", FilePatch::new().content("two"));
        assert_eq!(second.modified_at, first.modified_at);
    }

    #[test]
    fn new_records_infer_type_and_default_title() {
        let (store, _, _) = fresh();
        let page = store.upsert("about.htm", FilePatch::new());
        assert_eq!(page.kind, FileKind::Page);
        assert_eq!(page.title, "about.htm");

        let plain = store.upsert("scratch", FilePatch::new());
        assert_eq!(plain.kind, FileKind::Text);

        let folder = store.upsert("Projects", FilePatch::new().kind(FileKind::Folder));
        assert_eq!(folder.kind, FileKind::Folder);
    }

    #[test]
    fn infer_type_uses_fallback_for_unknown_extensions() {
        assert_eq!(infer_type("INDEX.HTML", FileKind::Note), FileKind::Page);
        assert_eq!(infer_type("notes.md", FileKind::Note), FileKind::Text);
        assert_eq!(infer_type("image.png", FileKind::Note), FileKind::Note);
    }

    #[test]
    fn deleting_missing_name_returns_false_without_notifying() {
        let (store, _, _) = fresh();
        let (hits, _subscription) = counter(&store);

        assert!(!store.delete("nope.txt"));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn delete_moves_record_to_trash_until_purged() {
        let (store, _, clock) = fresh();
        clock.advance(1_000);

        assert!(store.delete("readme.txt"));
        assert_eq!(store.read("readme.txt"), None);
        let trashed = store.trashed();
        assert_eq!(trashed.len(), 1);
        assert_eq!(trashed[0].record.name, "readme.txt");
        assert_eq!(trashed[0].trashed_at, T0 + 1_000);

        assert!(store.permanently_delete("readme.txt"));
        assert!(store.trashed().is_empty());
        assert!(!store.permanently_delete("readme.txt"));
    }

    #[test]
    fn restore_returns_record_to_live_set() {
        let (store, _, _) = fresh();
        let original = store.read("todo-note").expect("seeded");
        store.delete("todo-note");

        assert!(store.restore("todo-note"));
        assert_eq!(store.read("todo-note"), Some(original));
        assert!(store.trashed().is_empty());
        assert!(!store.restore("todo-note"));
    }

    #[test]
    fn empty_trash_purges_everything_and_reports_count() {
        let (store, _, _) = fresh();
        let (hits, _subscription) = counter(&store);
        assert_eq!(store.empty_trash(), 0);
        assert_eq!(hits.get(), 0);

        store.delete("readme.txt");
        store.delete("todo-note");
        assert_eq!(store.empty_trash(), 2);
        assert!(store.trashed().is_empty());
        assert_eq!(hits.get(), 3);
    }

    #[test]
    fn subscribers_are_notified_synchronously_and_can_reenter() {
        let (store, _, _) = fresh();
        let observed = Rc::new(RefCell::new(Vec::new()));
        let reader = store.clone();
        let log = Rc::clone(&observed);
        let subscription = store.subscribe("finder", move |change| {
            let count = reader.len();
            log.borrow_mut().push((change.clone(), count));
        });

        store.upsert("new.txt", FilePatch::new().content("x"));
        store.delete("new.txt");

        assert_eq!(
            observed.borrow().clone(),
            vec![
                (FileChange::Upserted("new.txt".to_string()), 5),
                (FileChange::Trashed("new.txt".to_string()), 4),
            ]
        );

        subscription.unsubscribe();
        store.upsert("other.txt", FilePatch::new());
        assert_eq!(observed.borrow().len(), 2);
        assert!(store.subscribers().is_empty());
    }

    #[test]
    fn persisted_state_survives_reload() {
        let (store, prefs, clock) = fresh();
        store.upsert(
            "plan.md",
            FilePatch::new().title("Plan").content("- write tests"),
        );
        store.upsert("todo-note", FilePatch::new().content("edited"));
        store.delete("welcome-note");
        let expected_live: Vec<FileRecord> = ["plan.md", "todo-note"]
            .iter()
            .filter_map(|name| store.read(name))
            .collect();

        let reloaded = store_with(&prefs, &clock);

        let actual_live: Vec<FileRecord> = ["plan.md", "todo-note"]
            .iter()
            .filter_map(|name| reloaded.read(name))
            .collect();
        assert_eq!(actual_live, expected_live);
        assert_eq!(reloaded.read("welcome-note"), None);
        assert_eq!(reloaded.trashed(), store.trashed());
    }

    #[test]
    fn persisted_records_merge_over_defaults() {
        let prefs = MemoryPrefsStore::default();
        prefs
            .save_pref(
                FILES_KEY,
                r#"{"mine.txt":{"name":"mine.txt","type":"text","title":"Mine","content":"hi","updatedAt":5}}"#,
            )
            .expect("seed prefs");
        let store = store_with(&prefs, &ManualClock::new(T0));

        assert_eq!(store.len(), 5);
        assert_eq!(store.read("mine.txt").map(|r| r.modified_at), Some(5));
        assert!(store.contains("welcome-note"));
    }

    #[test]
    fn corrupted_storage_falls_back_to_defaults() {
        let prefs = MemoryPrefsStore::default();
        prefs.save_pref(FILES_KEY, "{broken").expect("seed prefs");
        prefs.save_pref(TRASH_KEY, "[1,2]").expect("seed prefs");

        let store = store_with(&prefs, &ManualClock::new(T0));

        assert_eq!(store.len(), 4);
        assert!(store.trashed().is_empty());
    }

    #[test]
    fn create_note_allocates_first_free_index() {
        let (store, _, _) = fresh();
        assert_eq!(store.create_note(), "note-1");
        store.upsert("note-3", FilePatch::new().kind(FileKind::Note));
        assert_eq!(store.create_note(), "note-2");
        assert_eq!(store.create_note(), "note-4");

        let note = store.read("note-2").expect("created");
        assert_eq!(note.title, "New Note 2");
        assert_eq!(note.kind, FileKind::Note);
        assert_eq!(note.content.as_deref(), Some(""));
    }

    #[test]
    fn preview_strips_markup_and_truncates() {
        let (store, _, _) = fresh();
        let page = store.read("safari-tips.html").expect("seeded");
        assert_eq!(preview(&page).split(' ').next(), Some("Safari"));

        let long = store.upsert(
            "long.txt",
            FilePatch::new().content(format!("\n\n{}", "a".repeat(80))),
        );
        let text = preview(&long);
        assert_eq!(text.chars().count(), PREVIEW_MAX_CHARS + 1);

        let empty = store.upsert("empty.txt", FilePatch::new().content("   \n"));
        assert_eq!(preview(&empty), EMPTY_PREVIEW);
    }
}
