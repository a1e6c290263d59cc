use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use crate::cli::{ShellCommand, ShellLine, Toggle};
use crate::feedback::ToastLevel;
use crate::panel::Panel;
use crate::render;
use crate::view::{self, FileRow};

enum Flow {
    Redraw,
    Quiet,
    Quit,
}

pub async fn run_shell(panel: &mut Panel) -> Result<()> {
    panel.check_status().await;
    println!("{}", render::screen(panel.state()));
    println!("Type `help` for commands.");

    let stdin = io::stdin();
    loop {
        print!("davaria> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        if stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read command")?
            == 0
        {
            break;
        }

        if !run_line(panel, &line).await {
            break;
        }
    }

    Ok(())
}

/// Tokenizes `line` with shell quoting and runs it. Returns `false` on `quit`.
pub async fn run_line(panel: &mut Panel, line: &str) -> bool {
    let words = match split_line(line) {
        Some(words) if words.is_empty() => return true,
        Some(words) => words,
        None => {
            panel.toast(ToastLevel::Warning, "Unbalanced quotes");
            return true;
        }
    };

    let command = match ShellLine::try_parse_from(&words) {
        Ok(parsed) => parsed.command,
        Err(e) => {
            let _ = e.print();
            return true;
        }
    };
    debug!(command = %words[0], "shell command");

    match execute(panel, command).await {
        Flow::Redraw => println!("{}", render::screen(panel.state())),
        Flow::Quiet => {}
        Flow::Quit => return false,
    }
    true
}

fn split_line(line: &str) -> Option<Vec<String>> {
    shlex::split(line.trim())
}

async fn execute(panel: &mut Panel, command: ShellCommand) -> Flow {
    match command {
        ShellCommand::Ls => {}
        ShellCommand::Refresh => {
            panel.refresh().await;
        }
        ShellCommand::Cd { target } => {
            change_directory(panel, &target).await;
        }
        ShellCommand::Crumb { index } => {
            panel.navigate_crumb(index).await;
        }
        ShellCommand::Select { rows } => {
            for row in rows {
                panel.toggle_row(row, true);
            }
        }
        ShellCommand::Unselect { rows } => {
            for row in rows {
                panel.toggle_row(row, false);
            }
        }
        ShellCommand::All => panel.select_all(true),
        ShellCommand::Clear => panel.select_all(false),
        ShellCommand::Download => {
            panel.download_selected().await;
        }
        ShellCommand::Get { row } => {
            let rows = view::file_rows(panel.state());
            match rows.get(row) {
                Some(FileRow::Entry { entry, .. }) => {
                    let entry = entry.clone();
                    panel.download_entry(&entry).await;
                }
                _ => {
                    panel.toast(ToastLevel::Warning, format!("No downloadable row {}", row));
                    return Flow::Quiet;
                }
            }
        }
        ShellCommand::Filter { state } => panel.set_video_filter(matches!(state, Toggle::On)),
        ShellCommand::MinSize { mb } => panel.set_min_size_mb(mb),
        ShellCommand::Connect(args) => {
            panel.connect(args.into()).await;
        }
        ShellCommand::Status => {
            panel.check_status().await;
        }
        ShellCommand::Jobs => {
            panel.refresh_jobs().await;
        }
        ShellCommand::Pause { gid } => {
            panel.pause_job(&gid).await;
        }
        ShellCommand::Resume { gid } => {
            panel.resume_job(&gid).await;
        }
        ShellCommand::Remove { gid } => {
            panel.remove_job(&gid).await;
        }
        ShellCommand::Quit => return Flow::Quit,
    }
    Flow::Redraw
}

/// `..`, an absolute path, a row number, or the name of a rendered directory.
async fn change_directory(panel: &mut Panel, target: &str) {
    if target == ".." {
        panel.go_up().await;
        return;
    }
    if target.starts_with('/') {
        panel.load_directory(target).await;
        return;
    }
    if let Ok(index) = target.parse::<usize>() {
        panel.open_row(index).await;
        return;
    }

    let rows = view::file_rows(panel.state());
    let found = rows
        .iter()
        .find(|row| row.is_navigable() && row.name() == target)
        .map(|row| row.path().to_string());
    match found {
        Some(path) => {
            panel.load_directory(&path).await;
        }
        None => panel.toast(ToastLevel::Warning, format!("No directory named {}", target)),
    }
}
