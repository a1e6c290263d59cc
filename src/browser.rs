use anyhow::{anyhow, Context, Result};
use futures::future::join_all;
use tracing::{debug, warn};

use crate::feedback::ToastLevel;
use crate::models::FileEntry;
use crate::panel::{error_chain, reply_message, Panel};
use crate::state::ROOT;
use crate::view::{self, FileRow};

impl Panel {
    /// Lists `path` and makes it current. Nothing changes unless the listing
    /// succeeds. Returns whether the directory was loaded.
    pub async fn load_directory(&mut self, path: &str) -> bool {
        if !self.state.connection.file_store {
            debug!(path, "file store not connected, skipping listing");
            return false;
        }

        let reply = {
            let _loading = self.feedback.loading(&format!("Listing {}", path));
            self.client.list_files(path).await
        };

        match reply {
            Ok(reply) if reply.success => {
                debug!(path, entries = reply.files.len(), "directory loaded");
                self.state.show_directory(path, reply.files);
                true
            }
            Ok(reply) => {
                let message = reply_message(reply.message, "Failed to load files");
                self.toast(ToastLevel::Error, message);
                false
            }
            Err(e) => {
                warn!(path, error = %error_chain(&e), "listing failed");
                self.toast(ToastLevel::Error, format!("Failed to load files: {:#}", e));
                false
            }
        }
    }

    pub async fn refresh(&mut self) -> bool {
        let path = self.state.current_path.clone();
        self.load_directory(&path).await
    }

    /// Opens the rendered row at `index`: directories (and "..") navigate,
    /// files are inert.
    pub async fn open_row(&mut self, index: usize) -> bool {
        let rows = view::file_rows(&self.state);
        match rows.get(index) {
            Some(row) if row.is_navigable() => {
                let path = row.path().to_string();
                self.load_directory(&path).await
            }
            Some(_) => false,
            None => {
                self.toast(ToastLevel::Warning, format!("No row {}", index));
                false
            }
        }
    }

    pub async fn go_up(&mut self) -> bool {
        let parent = view::parent_path(&self.state.current_path);
        self.load_directory(&parent).await
    }

    /// Follows breadcrumb segment `index`. The last segment is not a link.
    pub async fn navigate_crumb(&mut self, index: usize) -> bool {
        let crumbs = view::breadcrumb(&self.state.current_path);
        match crumbs.get(index) {
            Some(crumb) if crumb.is_link => {
                let path = crumb.path.clone();
                self.load_directory(&path).await
            }
            Some(_) => false,
            None => {
                self.toast(ToastLevel::Warning, format!("No breadcrumb segment {}", index));
                false
            }
        }
    }

    /// Finds each path's entry by listing its parent directory. Lookups run
    /// concurrently and leave the browser state alone.
    pub async fn lookup_entries(&self, paths: &[String]) -> Vec<Result<FileEntry>> {
        if !self.state.connection.file_store {
            return paths
                .iter()
                .map(|p| Err(anyhow!("WebDAV is not connected, cannot look up {}", p)))
                .collect();
        }

        let _loading = self.feedback.loading("Looking up paths");
        let lookups = paths.iter().map(|path| self.lookup_entry(path));
        join_all(lookups).await
    }

    async fn lookup_entry(&self, path: &str) -> Result<FileEntry> {
        let normalized = format!("/{}", path.trim_matches('/'));
        if normalized == ROOT {
            return Err(anyhow!("The root directory cannot be queued"));
        }
        let parent = view::parent_path(&normalized);
        let reply = self
            .client
            .list_files(&parent)
            .await
            .with_context(|| format!("Failed to list {}", parent))?;
        if !reply.success {
            return Err(anyhow!(reply_message(
                reply.message,
                &format!("Failed to list {}", parent)
            )));
        }
        let name = normalized.rsplit('/').next().unwrap_or_default();
        reply
            .files
            .into_iter()
            .find(|e| e.path.trim_end_matches('/') == normalized || e.name == name)
            .ok_or_else(|| anyhow!("Not found: {}", normalized))
    }

    /// Checks or unchecks the rendered row at `index`. The ".." row has no
    /// checkbox.
    pub fn toggle_row(&mut self, index: usize, checked: bool) -> bool {
        let rows = view::file_rows(&self.state);
        match rows.get(index) {
            Some(FileRow::Entry { entry, .. }) => {
                let path = entry.path.clone();
                self.state.toggle_selection(&path, checked);
                true
            }
            Some(FileRow::Parent { .. }) => false,
            None => {
                self.toast(ToastLevel::Warning, format!("No row {}", index));
                false
            }
        }
    }
}
