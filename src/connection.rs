use tracing::{info, warn};

use crate::feedback::ToastLevel;
use crate::models::{BackendKind, Credentials};
use crate::panel::{error_chain, reply_message, Panel};
use crate::state::ROOT;

impl Panel {
    /// Polls the backend for both connection flags. A flag that turns on
    /// reveals its panel and triggers the initial load.
    pub async fn check_status(&mut self) {
        let reply = {
            let _loading = self.feedback.loading("Checking connections");
            self.client.status().await
        };

        let status = match reply {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %error_chain(&e), "status poll failed");
                return;
            }
        };

        let before = self.state.connection;
        self.state.connection.file_store = status.webdav_connected;
        self.state.connection.download_daemon = status.aria2_connected;
        info!(
            webdav = status.webdav_connected,
            aria2 = status.aria2_connected,
            "connection status"
        );

        for kind in [BackendKind::FileStore, BackendKind::DownloadDaemon] {
            if self.state.connection.get(kind) && !before.get(kind) {
                self.state.reveal(kind);
                self.initial_load(kind).await;
            }
        }
    }

    pub async fn connect(&mut self, credentials: Credentials) -> bool {
        let kind = credentials.kind();
        info!(backend = kind.label(), "connecting");

        let reply = {
            let _loading = self.feedback.loading(&format!("Connecting to {}", kind.label()));
            self.client.connect(&credentials).await
        };

        match reply {
            Ok(reply) if reply.success => {
                self.state.connection.set(kind, true);
                self.state.reveal(kind);
                let message = reply_message(reply.message, &format!("{} connected", kind.label()));
                self.toast(ToastLevel::Success, message);
                self.initial_load(kind).await;
                true
            }
            Ok(reply) => {
                self.state.connection.set(kind, false);
                let message =
                    reply_message(reply.message, &format!("{} connection failed", kind.label()));
                self.toast(ToastLevel::Error, message);
                false
            }
            Err(e) => {
                warn!(backend = kind.label(), error = %error_chain(&e), "connect failed");
                self.state.connection.set(kind, false);
                self.toast(
                    ToastLevel::Error,
                    format!("{} connection failed: {:#}", kind.label(), e),
                );
                false
            }
        }
    }

    async fn initial_load(&mut self, kind: BackendKind) {
        match kind {
            BackendKind::FileStore => {
                self.load_directory(ROOT).await;
            }
            BackendKind::DownloadDaemon => {
                self.refresh_jobs().await;
            }
        }
    }

    pub async fn daemon_version(&self) -> Option<String> {
        let reply = {
            let _loading = self.feedback.loading("Querying aria2");
            self.client.daemon_status().await
        };
        match reply {
            Ok(reply) if reply.connected => Some(match reply.version {
                Some(info) => match info.get("version").and_then(|v| v.as_str()) {
                    Some(version) => version.to_string(),
                    None => info.to_string(),
                },
                None => "unknown".to_string(),
            }),
            Ok(_) => {
                self.toast(ToastLevel::Warning, "aria2 is not connected");
                None
            }
            Err(e) => {
                self.toast(ToastLevel::Error, format!("Failed to query aria2: {:#}", e));
                None
            }
        }
    }
}
