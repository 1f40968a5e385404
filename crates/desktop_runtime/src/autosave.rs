//! Debounced write-behind queue for editor content.

use std::collections::BTreeMap;

use crate::vfs::{FileChange, FilePatch, VirtualFileStore};

/// Quiet period after the last edit before a pending write is committed.
pub const AUTOSAVE_QUIET_PERIOD_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingWrite {
    patch: FilePatch,
    due_at_ms: u64,
}

/// At most one pending write per file name. Each edit merges into the pending patch and pushes
/// its deadline out to `now + quiet_period`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoSaveQueue {
    quiet_period_ms: u64,
    pending: BTreeMap<String, PendingWrite>,
}

impl Default for AutoSaveQueue {
    fn default() -> Self {
        Self::new(AUTOSAVE_QUIET_PERIOD_MS)
    }
}

impl AutoSaveQueue {
    pub fn new(quiet_period_ms: u64) -> Self {
        Self {
            quiet_period_ms,
            pending: BTreeMap::new(),
        }
    }

    pub fn quiet_period_ms(&self) -> u64 {
        self.quiet_period_ms
    }

    /// Queues `patch` for `name` and returns the new deadline.
    pub fn schedule(&mut self, name: &str, patch: FilePatch, now_ms: u64) -> u64 {
        let due_at_ms = now_ms.saturating_add(self.quiet_period_ms);
        match self.pending.get_mut(name) {
            Some(pending) => {
                pending.patch = merge_patch(std::mem::take(&mut pending.patch), patch);
                pending.due_at_ms = due_at_ms;
            }
            None => {
                self.pending
                    .insert(name.to_string(), PendingWrite { patch, due_at_ms });
            }
        }
        due_at_ms
    }

    pub fn is_pending(&self, name: &str) -> bool {
        self.pending.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest deadline among pending writes.
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.values().map(|pending| pending.due_at_ms).min()
    }

    /// Commits every write whose deadline has passed. Returns the committed names.
    pub fn flush_due(&mut self, now_ms: u64, store: &VirtualFileStore) -> Vec<String> {
        let due: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, pending)| pending.due_at_ms <= now_ms)
            .map(|(name, _)| name.clone())
            .collect();
        due.into_iter()
            .filter(|name| self.flush(name, store))
            .collect()
    }

    /// Commits the write for `name` immediately, ignoring its deadline.
    ///
    /// A draft for a file that has since moved to the trash is dropped, so it cannot bring the
    /// name back to life.
    pub fn flush(&mut self, name: &str, store: &VirtualFileStore) -> bool {
        let Some(pending) = self.pending.remove(name) else {
            return false;
        };
        if store.is_trashed(name) {
            return false;
        }
        store.upsert(name, pending.patch);
        true
    }

    pub fn flush_all(&mut self, store: &VirtualFileStore) -> usize {
        let names: Vec<String> = self.pending.keys().cloned().collect();
        names
            .iter()
            .filter(|name| self.flush(name, store))
            .count()
    }

    /// Drops the pending write for `name` without committing it.
    pub fn cancel(&mut self, name: &str) -> bool {
        self.pending.remove(name).is_some()
    }

    /// Cancels drafts for files that left the live set.
    pub fn discard_removed(&mut self, change: &FileChange) {
        if let FileChange::Trashed(name) | FileChange::Purged(name) = change {
            self.cancel(name);
        }
    }
}

fn merge_patch(earlier: FilePatch, later: FilePatch) -> FilePatch {
    FilePatch {
        kind: later.kind.or(earlier.kind),
        title: later.title.or(earlier.title),
        content: later.content.or(earlier.content),
    }
}
