use tracing::{debug, info, warn};

use crate::feedback::ToastLevel;
use crate::models::{DownloadRequest, FileEntry, ItemResult};
use crate::panel::{error_chain, reply_message, Panel};
use crate::video;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    NothingSelected,
    /// Download daemon not connected; no request was sent.
    NotConnected,
    /// The video filter left no candidates; no request was sent.
    NothingQualified,
    Submitted { succeeded: usize, failed: usize },
    /// Transport failure or a declared failure of the whole call.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Batch,
    Single,
}

impl Panel {
    pub async fn download_selected(&mut self) -> SubmitOutcome {
        let files = self.state.selection.entries().to_vec();
        self.submit(files, Mode::Batch).await
    }

    pub async fn download_entry(&mut self, entry: &FileEntry) -> SubmitOutcome {
        self.submit(vec![entry.snapshot()], Mode::Single).await
    }

    /// Submits entries resolved outside the browser, as one batch.
    pub async fn download_entries(&mut self, entries: Vec<FileEntry>) -> SubmitOutcome {
        let files = entries.iter().map(FileEntry::snapshot).collect();
        self.submit(files, Mode::Batch).await
    }

    async fn submit(&mut self, mut files: Vec<FileEntry>, mode: Mode) -> SubmitOutcome {
        if files.is_empty() {
            self.toast(ToastLevel::Warning, "No files selected");
            return SubmitOutcome::NothingSelected;
        }

        if !self.state.connection.download_daemon {
            self.toast(ToastLevel::Error, "Connect to aria2 first");
            return SubmitOutcome::NotConnected;
        }

        let filter = self.state.filter;
        if filter.enabled {
            let total = files.len();
            let kept = video::filter_video_files(&files, filter.min_size_mb);
            if kept.is_empty() {
                self.toast(
                    ToastLevel::Warning,
                    format!("No qualifying video files (≥{} MB)", filter.min_size_mb),
                );
                return SubmitOutcome::NothingQualified;
            }
            if kept.len() < total {
                self.toast(
                    ToastLevel::Info,
                    format!(
                        "{} of {} selected files qualified as videos (≥{} MB)",
                        kept.len(),
                        total,
                        filter.min_size_mb
                    ),
                );
            }
            files = kept;
        }

        let single = match mode {
            Mode::Single => files.first().cloned(),
            Mode::Batch => None,
        };
        let payload = DownloadRequest {
            files,
            video_filter: filter.enabled,
            min_file_size_mb: filter.min_size_mb,
        };
        info!(
            files = payload.files.len(),
            video_filter = payload.video_filter,
            min_file_size_mb = payload.min_file_size_mb,
            "submitting downloads"
        );

        let reply = {
            let _loading = self.feedback.loading("Queueing downloads");
            self.client.submit_downloads(&payload).await
        };

        let reply = match reply {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %error_chain(&e), "download submission failed");
                self.toast(ToastLevel::Error, format!("Download failed: {:#}", e));
                return SubmitOutcome::Failed;
            }
        };

        if !reply.success {
            let message = reply_message(reply.message, "Download failed");
            self.toast(ToastLevel::Error, message);
            return SubmitOutcome::Failed;
        }

        if let Ok(results) = serde_json::to_string(&reply.results) {
            debug!(%results, "download results");
        }

        let succeeded = reply.results.iter().filter(|r| r.success).count();
        let failed = reply.results.len() - succeeded;

        match single {
            Some(entry) if reply.results.is_empty() => {
                self.toast(
                    ToastLevel::Error,
                    format!("Nothing to download for {}", entry.name),
                );
            }
            Some(entry) if succeeded > 0 => {
                let message = if entry.is_directory {
                    format!("Queued folder {} ({} files)", entry.name, succeeded)
                } else {
                    format!("Queued {}", entry.name)
                };
                self.toast(ToastLevel::Success, message);
            }
            None if succeeded > 0 => {
                let mut message = format!("Queued {} download(s)", succeeded);
                if failed > 0 {
                    message.push_str(&format!(", {} failed", failed));
                }
                self.toast(ToastLevel::Success, message);
            }
            _ => {}
        }

        if failed > 0 {
            self.toast(ToastLevel::Error, first_failure(&reply.results, failed));
        }

        if succeeded > 0 {
            self.refresh_jobs().await;
        }

        if mode == Mode::Batch {
            self.state.selection.clear();
        }

        SubmitOutcome::Submitted { succeeded, failed }
    }
}

fn first_failure(results: &[ItemResult], failed: usize) -> String {
    match results
        .iter()
        .find(|r| !r.success)
        .and_then(|r| r.message.as_deref())
        .filter(|m| !m.trim().is_empty())
    {
        Some(message) => format!("Download failed: {}", message),
        None => format!("{} file(s) failed to download", failed),
    }
}
