use crate::model::AppKind;
use crate::shell::{OpenTarget, ShellError, ShellOutcome, HOME_DIR};
use crate::vfs::{FileKind, FilePatch, FileRecord};

use super::{line, lines, CommandContext};

/// Browser local storage quota the store lives in.
const STORAGE_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

pub(super) fn ls(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    let filter = match ctx.args.first() {
        Some(raw) => Some(
            FileKind::parse(raw).ok_or_else(|| ShellError::UnknownFileType(raw.to_string()))?,
        ),
        None => None,
    };
    let files = ctx
        .store
        .list_where(|record| filter.map_or(true, |kind| record.kind == kind));
    if files.is_empty() {
        return Ok(line("(no files)"));
    }
    let listing = files
        .iter()
        .map(|record| format!("{} [{}]", record.name, record.kind.as_str()))
        .collect::<Vec<_>>()
        .join("  ");
    Ok(line(listing))
}

pub(super) fn cat(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    let name = ctx.required_arg()?;
    let record = read_existing(ctx, "cat", name)?;
    match record.kind {
        FileKind::Page => Err(ShellError::NotText(record.name)),
        FileKind::Folder => Err(ShellError::IsDirectory(record.name)),
        FileKind::Note | FileKind::Text => {
            let content = record.content_str();
            if content.is_empty() {
                Ok(line("(empty file)"))
            } else {
                Ok(lines(content.lines()))
            }
        }
    }
}

pub(super) fn touch(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    let name = ctx.required_arg()?;
    if ctx.store.contains(name) {
        ctx.store.upsert(name, FilePatch::new());
        Ok(line(format!("Updated timestamp: {name}")))
    } else {
        ctx.store.upsert(name, FilePatch::new().content(""));
        Ok(line(format!("Created file: {name}")))
    }
}

pub(super) fn write(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    let Some((name, content)) = ctx.raw_args.split_once(char::is_whitespace) else {
        return Err(ctx.usage());
    };
    let content = content.trim_start();
    if content.is_empty() {
        return Err(ctx.usage());
    }
    ctx.store.upsert(name, FilePatch::new().content(content));
    Ok(line(format!("Wrote {} bytes to {name}", content.len())))
}

pub(super) fn rm(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    let name = ctx.required_arg()?;
    if ctx.store.delete(name) {
        Ok(line(format!("Moved {name} to Trash")))
    } else {
        Err(not_found("rm", name))
    }
}

pub(super) fn open(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    let name = ctx.required_arg()?;
    let target = if ctx.store.contains(name) {
        OpenTarget::File(name.to_string())
    } else if let Some(app_kind) = AppKind::from_id(&name.to_ascii_lowercase()) {
        OpenTarget::App(app_kind)
    } else {
        return Err(not_found("open", name));
    };
    let mut outcome = line(format!("Opening {name}…"));
    outcome.open = Some(target);
    Ok(outcome)
}

pub(super) fn pwd(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    let mut path = HOME_DIR.to_string();
    for segment in &ctx.session.cwd {
        path.push('/');
        path.push_str(segment);
    }
    Ok(line(path))
}

pub(super) fn cd(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    match ctx.args.first().copied() {
        None | Some("~") | Some("/") => ctx.session.cwd.clear(),
        Some("..") => {
            ctx.session.cwd.pop();
        }
        Some(".") => {}
        Some(target) => {
            let record = read_existing(ctx, "cd", target)?;
            if record.kind != FileKind::Folder {
                return Err(ShellError::NotADirectory(record.name));
            }
            ctx.session.cwd.push(record.name);
        }
    }
    Ok(ShellOutcome::default())
}

pub(super) fn mkdir(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    let name = ctx.required_arg()?;
    if ctx.store.contains(name) {
        return Err(ShellError::AlreadyExists(name.to_string()));
    }
    ctx.store
        .upsert(name, FilePatch::new().kind(FileKind::Folder));
    Ok(line(format!("Created directory: {name}")))
}

pub(super) fn find(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    let needle = ctx.required_arg()?.to_lowercase();
    let matches: Vec<String> = ctx
        .store
        .list_where(|record| record.name.to_lowercase().contains(&needle))
        .into_iter()
        .map(|record| format!("./{}", record.name))
        .collect();
    if matches.is_empty() {
        return Ok(line("(no matches)"));
    }
    Ok(lines(matches))
}

pub(super) fn wc(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    let name = ctx.required_arg()?;
    let record = read_existing(ctx, "wc", name)?;
    let content = record.content_str();
    Ok(line(format!(
        "{:>8}{:>8}{:>8} {}",
        content.lines().count(),
        content.split_whitespace().count(),
        content.len(),
        record.name
    )))
}

/// Prints `name: line` for every matching line. No matches prints nothing.
pub(super) fn grep(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    let pattern = ctx.required_arg()?.to_string();
    let files: Vec<FileRecord> = match ctx.args.get(1) {
        Some(name) => vec![read_existing(ctx, "grep", name)?],
        None => ctx.store.list_where(|record| record.kind != FileKind::Folder),
    };
    let hits: Vec<String> = files
        .iter()
        .flat_map(|record| {
            record
                .content_str()
                .lines()
                .filter(|text| text.contains(pattern.as_str()))
                .map(move |text| format!("{}: {}", record.name, text.trim()))
        })
        .collect();
    Ok(lines(hits))
}

pub(super) fn df(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    let used: u64 = ctx
        .store
        .list()
        .iter()
        .map(|record| (record.name.len() + record.title.len() + record.content_str().len()) as u64)
        .sum();
    let available = STORAGE_QUOTA_BYTES.saturating_sub(used);
    let capacity = used * 100 / STORAGE_QUOTA_BYTES;
    Ok(lines([
        "Filesystem     Size    Used   Avail Capacity  Mounted on".to_string(),
        format!(
            "vfs      {:>10} {:>7} {:>7} {:>7}%  /",
            human_size(STORAGE_QUOTA_BYTES),
            human_size(used),
            human_size(available),
            capacity
        ),
    ]))
}

pub(super) fn tree(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    let files = ctx.store.list();
    let mut out = vec![".".to_string()];
    for (idx, record) in files.iter().enumerate() {
        let branch = if idx + 1 == files.len() { "└──" } else { "├──" };
        let suffix = if record.kind == FileKind::Folder { "/" } else { "" };
        out.push(format!("{branch} {}{suffix}", record.name));
    }
    let folders = files
        .iter()
        .filter(|record| record.kind == FileKind::Folder)
        .count();
    out.push(String::new());
    out.push(format!(
        "{folders} directories, {} files",
        files.len() - folders
    ));
    Ok(lines(out))
}

fn read_existing(
    ctx: &CommandContext<'_>,
    command: &'static str,
    name: &str,
) -> Result<FileRecord, ShellError> {
    ctx.store
        .read(name)
        .ok_or_else(|| not_found(command, name))
}

fn not_found(command: &'static str, name: &str) -> ShellError {
    ShellError::NotFound {
        command,
        name: name.to_string(),
    }
}

fn human_size(bytes: u64) -> String {
    match bytes {
        b if b >= 1024 * 1024 => format!("{:.1}M", b as f64 / (1024.0 * 1024.0)),
        b if b >= 1024 => format!("{:.1}K", b as f64 / 1024.0),
        b => format!("{b}B"),
    }
}
