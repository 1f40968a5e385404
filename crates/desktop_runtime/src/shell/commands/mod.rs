//! Built-in command table.

mod files;
mod system;

use crate::vfs::VirtualFileStore;

use super::{ShellError, ShellLine, ShellOutcome, ShellSession};

type CommandFn = fn(&mut CommandContext<'_>) -> Result<ShellOutcome, ShellError>;

/// Help metadata and handler for one built-in command.
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
    pub(super) run: CommandFn,
}

pub(super) struct CommandContext<'a> {
    pub session: &'a mut ShellSession,
    pub store: &'a VirtualFileStore,
    pub now_ms: u64,
    pub spec: &'static CommandSpec,
    /// Arguments split on whitespace.
    pub args: &'a [&'a str],
    /// Everything after the command name, with inner whitespace intact.
    pub raw_args: &'a str,
}

impl<'a> CommandContext<'a> {
    fn usage(&self) -> ShellError {
        ShellError::Usage(self.spec.usage)
    }

    /// First argument, or the command's usage error.
    fn required_arg(&self) -> Result<&'a str, ShellError> {
        self.args.first().copied().ok_or_else(|| self.usage())
    }
}

const fn command(
    name: &'static str,
    usage: &'static str,
    summary: &'static str,
    run: CommandFn,
) -> CommandSpec {
    CommandSpec {
        name,
        usage,
        summary,
        run,
    }
}

static COMMANDS: &[CommandSpec] = &[
    command("help", "help", "Show this help message", system::help),
    command("clear", "clear", "Clear the terminal", system::clear),
    command(
        "date",
        "date",
        "Show the current date and time",
        system::date,
    ),
    command("echo", "echo <text>", "Print a line of text", system::echo),
    command(
        "ls",
        "ls [type]",
        "List files, optionally by type (note, text, page, folder)",
        files::ls,
    ),
    command("cat", "cat <file>", "Print a file's contents", files::cat),
    command(
        "touch",
        "touch <file>",
        "Create an empty file or refresh its timestamp",
        files::touch,
    ),
    command(
        "write",
        "write <file> <text>",
        "Replace a file's contents",
        files::write,
    ),
    command(
        "rm",
        "rm <file>",
        "Remove a file (move to Trash)",
        files::rm,
    ),
    command(
        "open",
        "open <file|app>",
        "Open a file or app on the desktop",
        files::open,
    ),
    command("pwd", "pwd", "Print the working directory", files::pwd),
    command("whoami", "whoami", "Print the current user", system::whoami),
    command(
        "uname",
        "uname [-a]",
        "Print system information",
        system::uname,
    ),
    command("cd", "cd [dir]", "Change the working directory", files::cd),
    command("mkdir", "mkdir <dir>", "Create a folder", files::mkdir),
    command(
        "find",
        "find <name>",
        "Find files whose name contains <name>",
        files::find,
    ),
    command(
        "wc",
        "wc <file>",
        "Count lines, words and bytes in a file",
        files::wc,
    ),
    command(
        "grep",
        "grep <text> [file]",
        "Search file contents for <text>",
        files::grep,
    ),
    command("df", "df", "Show storage usage", files::df),
    command("top", "top", "Show a snapshot of running apps", system::top),
    command(
        "ping",
        "ping <host>",
        "Send test packets to a host",
        system::ping,
    ),
    command(
        "history",
        "history",
        "Show command history",
        system::history,
    ),
    command("cal", "cal", "Show this month's calendar", system::cal),
    command("tree", "tree", "Show the file tree", files::tree),
    command("ps", "ps", "List running processes", system::ps),
    command(
        "man",
        "man <command>",
        "Show the manual page for a command",
        system::man,
    ),
    command(
        "uptime",
        "uptime",
        "Show how long the session has been running",
        system::uptime,
    ),
];

pub(super) fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}

/// Names of every built-in command, in help order.
pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|spec| spec.name)
}

fn lines<I, S>(lines: I) -> ShellOutcome
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ShellOutcome {
        lines: lines.into_iter().map(ShellLine::output).collect(),
        ..ShellOutcome::default()
    }
}

fn line(text: impl Into<String>) -> ShellOutcome {
    lines([text])
}
