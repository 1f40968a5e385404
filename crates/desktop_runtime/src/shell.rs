//! Terminal command interpreter backed by the virtual file store.
//!
//! A [`ShellSession`] belongs to one terminal window. It parses a command line, runs the matching
//! entry of the built-in command table and reports what the view should render. Opening files is
//! returned as an [`OpenTarget`] for the runtime to route, so the interpreter never touches the
//! window registry.

mod commands;

use platform_host::Clock;
use thiserror::Error;

use crate::model::AppKind;
use crate::vfs::VirtualFileStore;

pub use commands::{command_names, CommandSpec};

/// Logged-in user shown by `whoami` and the prompt.
pub const SHELL_USER: &str = "guest";
pub const SHELL_HOST: &str = "macbook";
/// Absolute path the `~` prefix stands for.
pub const HOME_DIR: &str = "/Users/guest";
/// Oldest lines are dropped once the history reaches this length.
pub const MAX_HISTORY_ENTRIES: usize = 500;

/// Errors reported by built-in commands. Rendered as a single error line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShellError {
    /// No built-in command has this name.
    #[error("zsh: command not found: {0}")]
    CommandNotFound(String),
    /// Missing or malformed arguments.
    #[error("usage: {0}")]
    Usage(&'static str),
    /// The named file does not exist.
    #[error("{command}: {name}: No such file or directory")]
    NotFound {
        /// Command that failed.
        command: &'static str,
        /// Name the user passed.
        name: String,
    },
    /// `mkdir` on a name that is already taken.
    #[error("mkdir: {0}: File exists")]
    AlreadyExists(String),
    /// `cat` on a web page.
    #[error("cat: {0}: is a web page; run `open {0}` to view it in Safari")]
    NotText(String),
    /// `cat` on a folder.
    #[error("cat: {0}: Is a directory")]
    IsDirectory(String),
    /// `cd` into something that is not a folder.
    #[error("cd: not a directory: {0}")]
    NotADirectory(String),
    /// `ls` with a filter that is not a file type.
    #[error("ls: unknown file type `{0}` (expected note, text, page or folder)")]
    UnknownFileType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellLineKind {
    Output,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellLine {
    pub kind: ShellLineKind,
    pub text: String,
}

impl ShellLine {
    pub fn output(text: impl Into<String>) -> Self {
        Self {
            kind: ShellLineKind::Output,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: ShellLineKind::Error,
            text: text.into(),
        }
    }
}

/// Something the terminal asked the desktop to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenTarget {
    File(String),
    App(AppKind),
}

/// Result of executing one command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellOutcome {
    pub lines: Vec<ShellLine>,
    /// The transcript should be wiped before rendering `lines`.
    pub clear: bool,
    pub open: Option<OpenTarget>,
}

impl ShellOutcome {
    /// Output lines as plain text, ignoring their kind.
    pub fn text(&self) -> Vec<&str> {
        self.lines.iter().map(|line| line.text.as_str()).collect()
    }

    fn failed(err: ShellError) -> Self {
        Self {
            lines: vec![ShellLine::error(err.to_string())],
            ..Self::default()
        }
    }
}

/// Per-window interpreter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSession {
    history: Vec<String>,
    /// Working directory relative to the home folder; empty means `~`.
    cwd: Vec<String>,
    started_at_ms: u64,
    running_apps: Vec<AppKind>,
}

impl ShellSession {
    pub fn new(started_at_ms: u64) -> Self {
        Self {
            history: Vec::new(),
            cwd: Vec::new(),
            started_at_ms,
            running_apps: Vec::new(),
        }
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Working directory in `~` notation, as shown in the prompt.
    pub fn cwd(&self) -> String {
        if self.cwd.is_empty() {
            "~".to_string()
        } else {
            format!("~/{}", self.cwd.join("/"))
        }
    }

    pub fn prompt(&self) -> String {
        format!("{SHELL_USER}@{SHELL_HOST} {} %", self.cwd())
    }

    /// Apps reported by `ps` and `top`.
    pub fn set_running_apps(&mut self, apps: Vec<AppKind>) {
        self.running_apps = apps;
    }

    /// Runs one command line.
    ///
    /// Blank lines produce no output and are not recorded. Every other line is appended to the
    /// history before it runs, so `history` lists itself.
    pub fn execute(
        &mut self,
        line: &str,
        store: &VirtualFileStore,
        clock: &dyn Clock,
    ) -> ShellOutcome {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ShellOutcome::default();
        }
        self.history.push(trimmed.to_string());
        if self.history.len() > MAX_HISTORY_ENTRIES {
            let overflow = self.history.len() - MAX_HISTORY_ENTRIES;
            self.history.drain(0..overflow);
        }

        let (name, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim_start()),
            None => (trimmed, ""),
        };
        let name = name.to_ascii_lowercase();
        let Some(spec) = commands::lookup(&name) else {
            return ShellOutcome::failed(ShellError::CommandNotFound(trimmed.to_string()));
        };

        let args: Vec<&str> = rest.split_whitespace().collect();
        let mut context = commands::CommandContext {
            session: self,
            store,
            now_ms: clock.now_ms(),
            spec,
            args: &args,
            raw_args: rest,
        };
        match (spec.run)(&mut context) {
            Ok(outcome) => outcome,
            Err(err) => ShellOutcome::failed(err),
        }
    }

    /// Completes a partially typed command name.
    pub fn complete(&self, prefix: &str) -> Option<&'static str> {
        let prefix = prefix.trim().to_ascii_lowercase();
        if prefix.is_empty() {
            return None;
        }
        command_names().find(|name| name.starts_with(&prefix))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use platform_host::{ManualClock, MemoryPrefsStore};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::vfs::{FileKind, FilePatch};

    // 2024-02-15T12:00:00Z
    const NOW: u64 = 1_707_998_400_000;

    struct Fixture {
        session: ShellSession,
        store: VirtualFileStore,
        clock: ManualClock,
    }

    impl Fixture {
        fn new() -> Self {
            let clock = ManualClock::new(NOW);
            let store = VirtualFileStore::load(
                Rc::new(MemoryPrefsStore::default()),
                Rc::new(clock.clone()),
            );
            Self {
                session: ShellSession::new(NOW),
                store,
                clock,
            }
        }

        fn run(&mut self, line: &str) -> ShellOutcome {
            self.session.execute(line, &self.store, &self.clock)
        }
    }

    #[test]
    fn blank_lines_do_nothing() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run("   "), ShellOutcome::default());
        assert!(fx.session.history().is_empty());
    }

    #[test]
    fn history_keeps_only_the_newest_lines() {
        let mut fx = Fixture::new();
        for idx in 0..(MAX_HISTORY_ENTRIES + 5) {
            fx.run(&format!("echo {idx}"));
        }
        let history = fx.session.history();
        assert_eq!(history.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(history[0], "echo 5");
        assert_eq!(
            history.last().map(String::as_str),
            Some(format!("echo {}", MAX_HISTORY_ENTRIES + 4).as_str())
        );
    }

    #[test]
    fn unknown_commands_report_error_line() {
        let mut fx = Fixture::new();
        let outcome = fx.run("frobnicate --all");
        assert_eq!(
            outcome.lines,
            vec![ShellLine::error("zsh: command not found: frobnicate --all")]
        );
    }

    #[test]
    fn echo_preserves_inner_spacing() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run("echo  hello   world").text(), vec!["hello   world"]);
        assert_eq!(fx.run("ECHO hi").text(), vec!["hi"]);
    }

    #[test]
    fn touch_creates_and_then_refreshes() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run("touch plan.md").text(), vec!["Created file: plan.md"]);
        let created = fx.store.read("plan.md").expect("created");
        assert_eq!(created.kind, FileKind::Text);
        assert_eq!(created.content.as_deref(), Some(""));

        fx.clock.advance(5_000);
        assert_eq!(
            fx.run("touch plan.md").text(),
            vec!["Updated timestamp: plan.md"]
        );
        assert_eq!(
            fx.store.read("plan.md").map(|r| r.modified_at),
            Some(NOW + 5_000)
        );
    }

    #[test]
    fn write_then_cat_round_trips_content() {
        let mut fx = Fixture::new();
        fx.run("write hello.txt Hello,   terminal!");
        assert_eq!(fx.run("cat hello.txt").text(), vec!["Hello,   terminal!"]);

        let outcome = fx.run("write");
        assert_eq!(
            outcome.lines,
            vec![ShellLine::error("usage: write <file> <text>")]
        );
    }

    #[test]
    fn cat_refuses_pages_and_reports_missing_files() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.run("cat safari-tips.html").lines[0].kind,
            ShellLineKind::Error
        );
        assert_eq!(
            fx.run("cat nope.txt").text(),
            vec!["cat: nope.txt: No such file or directory"]
        );
        fx.store.upsert("empty.txt", FilePatch::new().content(""));
        assert_eq!(fx.run("cat empty.txt").text(), vec!["(empty file)"]);
    }

    #[test]
    fn rm_moves_file_to_trash() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run("rm readme.txt").text(), vec!["Moved readme.txt to Trash"]);
        assert_eq!(fx.store.read("readme.txt"), None);
        assert_eq!(fx.store.trashed()[0].record.name, "readme.txt");
        assert_eq!(
            fx.run("rm readme.txt").text(),
            vec!["rm: readme.txt: No such file or directory"]
        );
    }

    #[test]
    fn open_requests_file_or_app() {
        let mut fx = Fixture::new();
        let outcome = fx.run("open safari-tips.html");
        assert_eq!(
            outcome.open,
            Some(OpenTarget::File("safari-tips.html".to_string()))
        );
        assert_eq!(
            fx.run("open calculator").open,
            Some(OpenTarget::App(AppKind::Calculator))
        );
        let missing = fx.run("open ghost.txt");
        assert_eq!(missing.open, None);
        assert_eq!(missing.lines[0].kind, ShellLineKind::Error);
    }

    #[test]
    fn ls_filters_by_type() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run("ls page").text(), vec!["safari-tips.html [page]"]);
        assert_eq!(
            fx.run("ls").text(),
            vec!["readme.txt [text]  safari-tips.html [page]  todo-note [note]  welcome-note [note]"]
        );
        assert_eq!(fx.run("ls folder").text(), vec!["(no files)"]);
        assert_eq!(fx.run("ls pictures").lines[0].kind, ShellLineKind::Error);
    }

    #[test]
    fn mkdir_and_cd_track_working_directory() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run("mkdir Projects").text(), vec!["Created directory: Projects"]);
        assert_eq!(
            fx.run("mkdir Projects").text(),
            vec!["mkdir: Projects: File exists"]
        );
        fx.run("cd Projects");
        assert_eq!(fx.session.cwd(), "~/Projects");
        assert_eq!(fx.run("pwd").text(), vec!["/Users/guest/Projects"]);
        assert_eq!(
            fx.run("cd readme.txt").text(),
            vec!["cd: not a directory: readme.txt"]
        );
        fx.run("cd ..");
        assert_eq!(fx.session.prompt(), "guest@macbook ~ %");
    }

    #[test]
    fn find_wc_and_grep_inspect_store() {
        let mut fx = Fixture::new();
        fx.run("write poem.txt roses are red violets are blue");
        assert_eq!(fx.run("find POEM").text(), vec!["./poem.txt"]);
        assert_eq!(
            fx.run("wc poem.txt").text(),
            vec!["       1       6      30 poem.txt"]
        );
        assert_eq!(
            fx.run("grep violets").text(),
            vec!["poem.txt: roses are red violets are blue"]
        );
        assert!(fx.run("grep zebra").lines.is_empty());
    }

    #[test]
    fn history_numbers_every_recorded_line() {
        let mut fx = Fixture::new();
        fx.run("pwd");
        fx.run("whoami");
        assert_eq!(
            fx.run("history").text(),
            vec!["    1  pwd", "    2  whoami", "    3  history"]
        );
    }

    #[test]
    fn clear_wipes_transcript() {
        let mut fx = Fixture::new();
        let outcome = fx.run("clear");
        assert!(outcome.clear);
        assert!(outcome.lines.is_empty());
    }

    #[test]
    fn uname_has_short_and_long_forms() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run("uname").text(), vec!["Darwin"]);
        assert!(fx.run("uname -a").text()[0].starts_with("Darwin macbook"));
    }

    #[test]
    fn cal_renders_current_month() {
        let mut fx = Fixture::new();
        let outcome = fx.run("cal");
        let text = outcome.text();
        assert_eq!(text[0].trim(), "February 2024");
        assert_eq!(text[1], "Su Mo Tu We Th Fr Sa");
        assert!(text.last().is_some_and(|line| line.contains("29")));
    }

    #[test]
    fn man_describes_known_commands() {
        let mut fx = Fixture::new();
        let page = fx.run("man rm");
        assert!(page.text().contains(&"     rm <file>"));
        assert_eq!(fx.run("man zork").text(), vec!["No manual entry for zork"]);
    }

    #[test]
    fn ps_lists_running_apps() {
        let mut fx = Fixture::new();
        fx.session
            .set_running_apps(vec![AppKind::Terminal, AppKind::Browser]);
        let text = fx.run("ps").text().join("\n");
        assert!(text.contains("Terminal"));
        assert!(text.contains("Safari"));
    }

    #[test]
    fn uptime_counts_from_session_start() {
        let mut fx = Fixture::new();
        fx.clock.advance(2 * 86_400_000 + 5 * 3_600_000 + 42 * 60_000);
        assert!(fx.run("uptime").text()[0].contains("up 2 days, 5:42"));
    }

    #[test]
    fn completion_matches_command_prefix() {
        let fx = Fixture::new();
        assert_eq!(fx.session.complete("hi"), Some("history"));
        assert_eq!(fx.session.complete("xyz"), None);
        assert_eq!(fx.session.complete(""), None);
    }
}
