use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};

use crate::apps::app_manifest;
use crate::shell::{ShellError, ShellOutcome, SHELL_HOST, SHELL_USER};

use super::{line, lines, lookup, CommandContext, COMMANDS};

const CALENDAR_WIDTH: usize = 20;

pub(super) fn help(_ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    let width = COMMANDS
        .iter()
        .map(|spec| spec.usage.len())
        .max()
        .unwrap_or_default();
    let mut out = vec!["Available commands:".to_string()];
    out.extend(
        COMMANDS
            .iter()
            .map(|spec| format!("  {:<width$}  {}", spec.usage, spec.summary)),
    );
    Ok(lines(out))
}

pub(super) fn clear(_ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    Ok(ShellOutcome {
        clear: true,
        ..ShellOutcome::default()
    })
}

pub(super) fn date(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    Ok(line(
        local_time(ctx.now_ms)
            .format("%a %b %e %H:%M:%S %Y")
            .to_string(),
    ))
}

pub(super) fn echo(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    Ok(line(ctx.raw_args))
}

pub(super) fn whoami(_ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    Ok(line(SHELL_USER))
}

pub(super) fn uname(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    match ctx.args.first().copied() {
        None => Ok(line("Darwin")),
        Some("-a") => Ok(line(format!(
            "Darwin {SHELL_HOST} 23.0.0 Darwin Kernel Version 23.0.0 wasm32"
        ))),
        Some(_) => Err(ctx.usage()),
    }
}

pub(super) fn history(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    Ok(lines(
        ctx.session
            .history
            .iter()
            .enumerate()
            .map(|(idx, entry)| format!("{:>5}  {entry}", idx + 1)),
    ))
}

pub(super) fn cal(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    let today = local_time(ctx.now_ms).date_naive();
    let first = today.with_day(1).unwrap_or(today);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let days_in_month = next_month
        .map(|next| next.signed_duration_since(first).num_days())
        .unwrap_or(31);

    let mut cells: Vec<String> =
        vec!["  ".to_string(); first.weekday().num_days_from_sunday() as usize];
    cells.extend((1..=days_in_month).map(|day| format!("{day:>2}")));

    let mut out = vec![
        format!(
            "{:^width$}",
            first.format("%B %Y").to_string(),
            width = CALENDAR_WIDTH
        ),
        "Su Mo Tu We Th Fr Sa".to_string(),
    ];
    out.extend(
        cells
            .chunks(7)
            .map(|week| week.join(" ").trim_end().to_string()),
    );
    Ok(lines(out))
}

pub(super) fn ps(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    let mut out = vec![
        "  PID TTY           TIME CMD".to_string(),
        "  501 ttys000    0:00.12 -zsh".to_string(),
    ];
    out.extend(
        ctx.session
            .running_apps
            .iter()
            .enumerate()
            .map(|(idx, app_kind)| {
                format!(
                    "{:>5} ttys000    0:0{}.{:02} {}",
                    1_000 + idx * 137,
                    idx % 10,
                    (idx * 17) % 100,
                    app_manifest(*app_kind).title
                )
            }),
    );
    Ok(lines(out))
}

pub(super) fn top(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    let apps = &ctx.session.running_apps;
    let mut out = vec![
        format!("Processes: {} total, 1 running", apps.len() + 1),
        format!("Load Avg: 0.{:02}", (apps.len() * 7) % 100),
        String::new(),
        "PID    COMMAND          %CPU  MEM".to_string(),
        "501    -zsh              0.1  2M".to_string(),
    ];
    out.extend(apps.iter().enumerate().map(|(idx, app_kind)| {
        format!(
            "{:<6} {:<16} {:>4.1}  {}M",
            1_000 + idx * 137,
            app_manifest(*app_kind).title,
            (idx as f64 + 1.0) * 0.7,
            24 + idx * 12
        )
    }));
    Ok(lines(out))
}

pub(super) fn ping(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    let host = ctx.required_arg()?;
    let mut out = vec![format!("PING {host} (127.0.0.1): 56 data bytes")];
    out.extend((0..4).map(|seq| {
        format!(
            "64 bytes from 127.0.0.1: icmp_seq={seq} ttl=64 time={:.3} ms",
            0.041 + seq as f64 * 0.013
        )
    }));
    out.push(String::new());
    out.push(format!("--- {host} ping statistics ---"));
    out.push("4 packets transmitted, 4 packets received, 0.0% packet loss".to_string());
    Ok(lines(out))
}

pub(super) fn man(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    let Some(topic) = ctx.args.first().copied() else {
        return Ok(lines([
            "What manual page do you want?",
            "For example, try: man ls",
        ]));
    };
    let Some(spec) = lookup(&topic.to_ascii_lowercase()) else {
        return Ok(line(format!("No manual entry for {topic}")));
    };
    Ok(lines([
        format!("{}(1)", spec.name.to_ascii_uppercase()),
        String::new(),
        "NAME".to_string(),
        format!("     {} - {}", spec.name, spec.summary),
        String::new(),
        "SYNOPSIS".to_string(),
        format!("     {}", spec.usage),
        String::new(),
        "SEE ALSO".to_string(),
        "     help(1)".to_string(),
    ]))
}

pub(super) fn uptime(ctx: &mut CommandContext<'_>) -> Result<ShellOutcome, ShellError> {
    let elapsed_minutes = ctx.now_ms.saturating_sub(ctx.session.started_at_ms) / 60_000;
    let days = elapsed_minutes / (24 * 60);
    let hours = (elapsed_minutes / 60) % 24;
    let minutes = elapsed_minutes % 60;
    let span = match days {
        0 => format!("{hours}:{minutes:02}"),
        1 => format!("1 day, {hours}:{minutes:02}"),
        _ => format!("{days} days, {hours}:{minutes:02}"),
    };
    Ok(line(format!(
        "{}  up {span}, 1 user",
        local_time(ctx.now_ms).format("%H:%M")
    )))
}

fn local_time(now_ms: u64) -> DateTime<Local> {
    DateTime::<Utc>::from_timestamp_millis(now_ms as i64)
        .unwrap_or_default()
        .with_timezone(&Local)
}
