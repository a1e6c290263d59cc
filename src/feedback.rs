use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Releases a loading indicator when dropped, on every exit path.
pub struct LoadingGuard {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl LoadingGuard {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn noop() -> Self {
        Self { release: None }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

pub trait Feedback {
    fn toast(&self, level: ToastLevel, message: &str);

    fn loading(&self, label: &str) -> LoadingGuard;

    fn confirm(&self, question: &str) -> bool;
}

pub struct ConsoleFeedback {
    assume_yes: bool,
    spinner: bool,
}

impl ConsoleFeedback {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            spinner: io::stderr().is_terminal(),
        }
    }
}

impl Feedback for ConsoleFeedback {
    fn toast(&self, level: ToastLevel, message: &str) {
        match level {
            ToastLevel::Success => {
                info!(%message, "toast");
                println!("{} {}", "✓".green().bold(), message.green());
            }
            ToastLevel::Info => {
                info!(%message, "toast");
                println!("{} {}", "i".blue().bold(), message);
            }
            ToastLevel::Warning => {
                warn!(%message, "toast");
                println!("{} {}", "!".yellow().bold(), message.yellow());
            }
            ToastLevel::Error => {
                error!(%message, "toast");
                println!("{} {}", "✗".red().bold(), message.red());
            }
        }
    }

    fn loading(&self, label: &str) -> LoadingGuard {
        debug!(label, "loading");
        if !self.spinner {
            return LoadingGuard::noop();
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(label.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        LoadingGuard::new(move || pb.finish_and_clear())
    }

    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", question);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}
