//! Per-window app session state owned by the desktop runtime.
//!
//! Sessions live as long as their window. The runtime drops them on `TeardownApp` and prunes any
//! stragglers whenever the window list changes.

use std::collections::{BTreeSet, HashMap};

use platform_host::Clock;

use crate::browser_session::BrowserHistory;
use crate::model::{WindowId, WindowRecord};
use crate::shell::{OpenTarget, ShellLine, ShellSession};
use crate::vfs::VirtualFileStore;

const MAX_TRANSCRIPT_ENTRIES: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    /// Echo of a submitted command after its prompt.
    Command { prompt: String, line: String },
    Line(ShellLine),
}

/// Terminal window state: interpreter, rendered transcript and arrow-key recall cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalSession {
    pub shell: ShellSession,
    transcript: Vec<TranscriptEntry>,
    recall: Option<usize>,
}

impl TerminalSession {
    pub fn new(started_at_ms: u64) -> Self {
        Self {
            shell: ShellSession::new(started_at_ms),
            transcript: vec![
                TranscriptEntry::Line(ShellLine::output("Desktop Terminal v2.0")),
                TranscriptEntry::Line(ShellLine::output(
                    "Type \"help\" for available commands.",
                )),
            ],
            recall: None,
        }
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// Runs `line`, appends the echo and output to the transcript and returns any open request.
    pub fn submit(
        &mut self,
        line: &str,
        store: &VirtualFileStore,
        clock: &dyn Clock,
    ) -> Option<OpenTarget> {
        self.recall = None;
        let prompt = self.shell.prompt();
        let outcome = self.shell.execute(line, store, clock);
        if outcome.clear {
            self.transcript.clear();
        } else {
            self.push(TranscriptEntry::Command {
                prompt,
                line: line.trim().to_string(),
            });
        }
        for output in outcome.lines {
            self.push(TranscriptEntry::Line(output));
        }
        outcome.open
    }

    /// Steps back through history, stopping at the oldest entry.
    pub fn recall_previous(&mut self) -> Option<String> {
        let history = self.shell.history();
        if history.is_empty() {
            return None;
        }
        let idx = match self.recall {
            None => history.len() - 1,
            Some(idx) => idx.saturating_sub(1),
        };
        self.recall = Some(idx);
        history.get(idx).cloned()
    }

    /// Steps forward through history. Past the newest entry the input is cleared.
    pub fn recall_next(&mut self) -> Option<String> {
        let idx = self.recall? + 1;
        if idx >= self.shell.history().len() {
            self.recall = None;
            return Some(String::new());
        }
        self.recall = Some(idx);
        self.shell.history().get(idx).cloned()
    }

    fn push(&mut self, entry: TranscriptEntry) {
        self.transcript.push(entry);
        if self.transcript.len() > MAX_TRANSCRIPT_ENTRIES {
            let overflow = self.transcript.len() - MAX_TRANSCRIPT_ENTRIES;
            self.transcript.drain(0..overflow);
        }
    }
}

#[derive(Debug, Default)]
pub struct AppSessions {
    browsers: HashMap<WindowId, BrowserHistory>,
    note_selections: HashMap<WindowId, String>,
    terminals: HashMap<WindowId, TerminalSession>,
}

impl AppSessions {
    pub fn browser(&self, window_id: WindowId) -> Option<&BrowserHistory> {
        self.browsers.get(&window_id)
    }

    pub fn browser_mut(&mut self, window_id: WindowId) -> &mut BrowserHistory {
        self.browsers.entry(window_id).or_default()
    }

    pub fn selected_note(&self, window_id: WindowId) -> Option<&str> {
        self.note_selections.get(&window_id).map(String::as_str)
    }

    pub fn select_note(&mut self, window_id: WindowId, name: Option<String>) {
        match name {
            Some(name) => {
                self.note_selections.insert(window_id, name);
            }
            None => {
                self.note_selections.remove(&window_id);
            }
        }
    }

    pub fn terminal(&self, window_id: WindowId) -> Option<&TerminalSession> {
        self.terminals.get(&window_id)
    }

    pub fn terminal_mut(&mut self, window_id: WindowId, now_ms: u64) -> &mut TerminalSession {
        self.terminals
            .entry(window_id)
            .or_insert_with(|| TerminalSession::new(now_ms))
    }

    /// Drops every session owned by `window_id`.
    pub fn teardown(&mut self, window_id: WindowId) {
        self.browsers.remove(&window_id);
        self.note_selections.remove(&window_id);
        self.terminals.remove(&window_id);
    }

    /// Removes sessions whose window no longer exists.
    pub fn sync_windows(&mut self, windows: &[WindowRecord]) {
        let open: BTreeSet<WindowId> = windows.iter().map(|window| window.id).collect();
        self.browsers.retain(|window_id, _| open.contains(window_id));
        self.note_selections
            .retain(|window_id, _| open.contains(window_id));
        self.terminals.retain(|window_id, _| open.contains(window_id));
    }

    pub fn is_empty(&self) -> bool {
        self.browsers.is_empty() && self.note_selections.is_empty() && self.terminals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use platform_host::{ManualClock, MemoryPrefsStore};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::shell::ShellLineKind;

    fn store(clock: &ManualClock) -> VirtualFileStore {
        VirtualFileStore::load(Rc::new(MemoryPrefsStore::default()), Rc::new(clock.clone()))
    }

    #[test]
    fn teardown_releases_every_session_for_window() {
        let mut sessions = AppSessions::default();
        let window = WindowId(3);
        sessions.browser_mut(window).navigate("apple.com");
        sessions.select_note(window, Some("todo-note".to_string()));
        sessions.terminal_mut(window, 0);

        sessions.teardown(window);

        assert!(sessions.is_empty());
        assert_eq!(sessions.browser(window), None);
    }

    #[test]
    fn sync_prunes_sessions_of_closed_windows() {
        let mut sessions = AppSessions::default();
        sessions.browser_mut(WindowId(1)).navigate("a");
        sessions.browser_mut(WindowId(2)).navigate("b");
        sessions.sync_windows(&[]);
        assert!(sessions.is_empty());
    }

    #[test]
    fn browser_histories_are_independent_per_window() {
        let mut sessions = AppSessions::default();
        sessions.browser_mut(WindowId(1)).navigate("a");
        sessions.browser_mut(WindowId(2)).navigate("b");
        assert_eq!(
            sessions.browser(WindowId(1)).and_then(BrowserHistory::current),
            Some("a")
        );
    }

    #[test]
    fn terminal_submit_echoes_prompt_and_output() {
        let clock = ManualClock::new(0);
        let store = store(&clock);
        let mut terminal = TerminalSession::new(0);
        let before = terminal.transcript().len();

        assert_eq!(terminal.submit("whoami", &store, &clock), None);

        assert_eq!(
            &terminal.transcript()[before..],
            &[
                TranscriptEntry::Command {
                    prompt: "guest@macbook ~ %".to_string(),
                    line: "whoami".to_string(),
                },
                TranscriptEntry::Line(ShellLine::output("guest")),
            ]
        );

        terminal.submit("clear", &store, &clock);
        assert!(terminal.transcript().is_empty());

        terminal.submit("nope", &store, &clock);
        assert!(matches!(
            terminal.transcript().last(),
            Some(TranscriptEntry::Line(ShellLine {
                kind: ShellLineKind::Error,
                ..
            }))
        ));
    }

    #[test]
    fn arrow_recall_walks_history_and_clears_past_newest() {
        let clock = ManualClock::new(0);
        let store = store(&clock);
        let mut terminal = TerminalSession::new(0);
        assert_eq!(terminal.recall_previous(), None);
        terminal.submit("pwd", &store, &clock);
        terminal.submit("date", &store, &clock);

        assert_eq!(terminal.recall_previous().as_deref(), Some("date"));
        assert_eq!(terminal.recall_previous().as_deref(), Some("pwd"));
        assert_eq!(terminal.recall_previous().as_deref(), Some("pwd"));
        assert_eq!(terminal.recall_next().as_deref(), Some("date"));
        assert_eq!(terminal.recall_next().as_deref(), Some(""));
        assert_eq!(terminal.recall_next(), None);
    }
}
