use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, warn};

use crate::feedback::ToastLevel;
use crate::models::ActionReply;
use crate::panel::{error_chain, reply_message, Panel};
use crate::state::AppState;
use crate::view::JobAction;

impl JobAction {
    fn verb(self) -> &'static str {
        match self {
            JobAction::Pause => "pause",
            JobAction::Resume => "resume",
            JobAction::Remove => "remove",
        }
    }

    fn done(self) -> &'static str {
        match self {
            JobAction::Pause => "Download paused",
            JobAction::Resume => "Download resumed",
            JobAction::Remove => "Download removed",
        }
    }
}

impl Panel {
    /// Polls status and jobs every `period` until `stop` resolves, including
    /// while a poll is still in flight.
    pub async fn watch_jobs<S, F>(&mut self, period: Duration, stop: S, mut on_tick: F)
    where
        S: Future,
        F: FnMut(&AppState),
    {
        tokio::pin!(stop);
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = &mut stop => return,
                _ = ticker.tick() => {}
            }
            let poll = async {
                self.check_status().await;
                self.refresh_jobs().await;
            };
            tokio::select! {
                _ = &mut stop => return,
                _ = poll => {}
            }
            on_tick(&self.state);
        }
    }

    pub async fn refresh_jobs(&mut self) -> bool {
        if !self.state.connection.download_daemon {
            debug!("aria2 not connected, skipping job refresh");
            return false;
        }

        let reply = {
            let _loading = self.feedback.loading("Fetching downloads");
            self.client.list_jobs().await
        };

        match reply {
            Ok(reply) if reply.success => {
                debug!(jobs = reply.downloads.len(), "jobs refreshed");
                self.state.jobs = reply.downloads;
                true
            }
            Ok(reply) => {
                let message = reply_message(reply.message, "unknown error");
                self.toast(
                    ToastLevel::Error,
                    format!("Failed to fetch downloads: {}", message),
                );
                false
            }
            Err(e) => {
                warn!(error = %error_chain(&e), "job refresh failed");
                self.toast(ToastLevel::Error, format!("Failed to fetch downloads: {:#}", e));
                false
            }
        }
    }

    pub async fn pause_job(&mut self, gid: &str) -> bool {
        self.job_action(JobAction::Pause, gid).await
    }

    pub async fn resume_job(&mut self, gid: &str) -> bool {
        self.job_action(JobAction::Resume, gid).await
    }

    /// Asks for confirmation first; a declined prompt sends nothing.
    pub async fn remove_job(&mut self, gid: &str) -> bool {
        if !self.feedback.confirm(&format!("Remove download {}?", gid)) {
            debug!(gid, "remove declined");
            return false;
        }
        self.job_action(JobAction::Remove, gid).await
    }

    async fn job_action(&mut self, action: JobAction, gid: &str) -> bool {
        let reply = {
            let _loading = self.feedback.loading(&format!("{} {}", action.verb(), gid));
            self.send_job_action(action, gid).await
        };

        match reply {
            Ok(reply) if reply.success => {
                self.toast(ToastLevel::Success, action.done());
                self.refresh_jobs().await;
                true
            }
            Ok(reply) => {
                let message = reply_message(reply.message, "unknown error");
                self.toast(
                    ToastLevel::Error,
                    format!("Failed to {} download: {}", action.verb(), message),
                );
                false
            }
            Err(e) => {
                warn!(gid, action = action.verb(), error = %error_chain(&e), "job action failed");
                self.toast(
                    ToastLevel::Error,
                    format!("Failed to {} download: {:#}", action.verb(), e),
                );
                false
            }
        }
    }

    async fn send_job_action(&self, action: JobAction, gid: &str) -> Result<ActionReply> {
        match action {
            JobAction::Pause => self.client.pause_job(gid).await,
            JobAction::Resume => self.client.resume_job(gid).await,
            JobAction::Remove => self.client.remove_job(gid).await,
        }
    }
}
