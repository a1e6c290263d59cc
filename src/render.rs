use std::fmt::Write;

use colored::{ColoredString, Colorize};

use crate::format::{escape_display, truncate_text};
use crate::state::AppState;
use crate::view::{self, BadgeColor, EntryKind, FileRow, JobAction, JobTable, TriState};

const NAME_WIDTH: usize = 48;

fn paint(text: &str, color: BadgeColor) -> ColoredString {
    match color {
        BadgeColor::Blue => text.blue(),
        BadgeColor::Grey => text.white(),
        BadgeColor::Yellow => text.yellow(),
        BadgeColor::Red => text.red(),
        BadgeColor::Green => text.green(),
        BadgeColor::Dim => text.dimmed(),
    }
}

fn badge(label: &str, width: usize, color: BadgeColor) -> ColoredString {
    paint(&format!("{:<width$}", label, width = width), color)
}

pub fn status_bar(state: &AppState) -> String {
    let (webdav, webdav_color) = view::connection_badge(state.connection.file_store);
    let (aria2, aria2_color) = view::connection_badge(state.connection.download_daemon);
    format!(
        "WebDAV: {}  aria2: {}",
        paint(webdav, webdav_color),
        paint(aria2, aria2_color)
    )
}

fn kind_color(kind: EntryKind) -> BadgeColor {
    match kind {
        EntryKind::Directory => BadgeColor::Yellow,
        EntryKind::Video => BadgeColor::Blue,
        EntryKind::File => BadgeColor::Grey,
    }
}

pub fn breadcrumb_line(state: &AppState) -> String {
    view::breadcrumb(&state.current_path)
        .iter()
        .enumerate()
        .map(|(idx, crumb)| {
            let label = escape_display(&crumb.label);
            if crumb.is_link {
                format!("[{}]{}", idx, label.underline())
            } else {
                label.bold().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" › ")
}

pub fn file_table(state: &AppState) -> String {
    let rows = view::file_rows(state);
    let summary = view::selection_summary(state, &rows);
    let mut out = String::new();

    let _ = writeln!(out, "{}", breadcrumb_line(state));
    let select_all = match summary.select_all {
        TriState::Unchecked => "[ ]",
        TriState::Indeterminate => "[-]",
        TriState::Checked => "[x]",
    };
    let _ = writeln!(
        out,
        "{:>4} {} {:<width$} {:<6} {:>10}",
        "#",
        select_all,
        "name",
        "type",
        "size",
        width = NAME_WIDTH
    );

    for (idx, row) in rows.iter().enumerate() {
        match row {
            FileRow::Parent { .. } => {
                let _ = writeln!(out, "{:>4}     {}", idx, "..".yellow());
            }
            FileRow::Entry {
                entry,
                kind,
                checked,
                size,
                qualifies,
            } => {
                let check = if *checked { "[x]" } else { "[ ]" };
                let mut name = truncate_text(&escape_display(&entry.name), NAME_WIDTH - 2);
                if *qualifies {
                    name.push_str(" ✓");
                }
                let name = format!("{:<width$}", name, width = NAME_WIDTH);
                let name = if entry.is_directory {
                    name.yellow().bold()
                } else if *qualifies {
                    name.green()
                } else {
                    name.normal()
                };
                let _ = writeln!(
                    out,
                    "{:>4} {} {} {} {:>10}",
                    idx,
                    check,
                    name,
                    badge(kind.label(), 6, kind_color(*kind)),
                    size
                );
            }
        }
    }

    if rows.is_empty() {
        let _ = writeln!(out, "{}", "(empty directory)".dimmed());
    }

    let download_hint = if summary.download_enabled {
        "download".green().to_string()
    } else {
        "download".dimmed().to_string()
    };
    let _ = writeln!(out, "{} selected · {}", summary.count, download_hint);
    if state.filter.enabled {
        let _ = writeln!(out, "video filter: on (≥{} MB)", state.filter.min_size_mb);
    }
    out
}

pub fn job_table(state: &AppState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<18} {:<32} {:<12} {:>5} {:>12} {:>10}  {}",
        "gid", "name", "status", "%", "speed", "size", "actions"
    );

    match view::job_table(&state.jobs) {
        JobTable::Empty => {
            let _ = writeln!(out, "{}", "no download jobs".dimmed());
        }
        JobTable::Rows(rows) => {
            for row in rows {
                let actions: Vec<&str> = row
                    .actions
                    .iter()
                    .map(|a| match a {
                        JobAction::Pause => "pause",
                        JobAction::Resume => "resume",
                        JobAction::Remove => "remove",
                    })
                    .collect();
                let _ = writeln!(
                    out,
                    "{:<18} {:<32} {} {:>4}% {:>12} {:>10}  {}",
                    truncate_text(&row.gid, 16),
                    escape_display(&row.short_name),
                    badge(&row.status, 12, row.color),
                    row.percent,
                    row.speed,
                    row.size,
                    actions.join("/")
                );
            }
        }
    }
    out
}

pub fn screen(state: &AppState) -> String {
    let mut out = status_bar(state);
    out.push('\n');
    if state.browser_visible {
        out.push('\n');
        out.push_str(&file_table(state));
    }
    if state.dashboard_visible {
        out.push('\n');
        out.push_str(&job_table(state));
    }
    out
}
