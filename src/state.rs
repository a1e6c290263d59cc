use crate::models::{BackendKind, DownloadJob, FileEntry};
use crate::video::VideoFilterConfig;

pub const ROOT: &str = "/";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionState {
    pub file_store: bool,
    pub download_daemon: bool,
}

impl ConnectionState {
    pub fn get(&self, kind: BackendKind) -> bool {
        match kind {
            BackendKind::FileStore => self.file_store,
            BackendKind::DownloadDaemon => self.download_daemon,
        }
    }

    pub fn set(&mut self, kind: BackendKind, connected: bool) {
        match kind {
            BackendKind::FileStore => self.file_store = connected,
            BackendKind::DownloadDaemon => self.download_daemon = connected,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    entries: Vec<FileEntry>,
}

impl Selection {
    pub fn contains(&self, path: &str) -> bool {
        self.entries.iter().any(|e| e.path == path)
    }

    pub fn insert(&mut self, entry: &FileEntry) {
        if !self.contains(&entry.path) {
            self.entries.push(entry.snapshot());
        }
    }

    pub fn remove(&mut self, path: &str) {
        self.entries.retain(|e| e.path != path);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }
}

/// Everything the panel knows. Handlers on `Panel` are the only writers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub connection: ConnectionState,
    pub browser_visible: bool,
    pub dashboard_visible: bool,
    pub current_path: String,
    pub entries: Vec<FileEntry>,
    pub selection: Selection,
    pub jobs: Vec<DownloadJob>,
    pub filter: VideoFilterConfig,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            connection: ConnectionState::default(),
            browser_visible: false,
            dashboard_visible: false,
            current_path: ROOT.to_string(),
            entries: Vec::new(),
            selection: Selection::default(),
            jobs: Vec::new(),
            filter: VideoFilterConfig::default(),
        }
    }
}

impl AppState {
    pub fn new(filter: VideoFilterConfig) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn reveal(&mut self, kind: BackendKind) {
        match kind {
            BackendKind::FileStore => self.browser_visible = true,
            BackendKind::DownloadDaemon => self.dashboard_visible = true,
        }
    }

    pub fn show_directory(&mut self, path: &str, entries: Vec<FileEntry>) {
        self.current_path = path.to_string();
        self.entries = crate::view::sort_entries(entries);
        self.selection.clear();
    }

    pub fn entry(&self, path: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Checks or unchecks one rendered row. Unknown paths are ignored.
    pub fn toggle_selection(&mut self, path: &str, checked: bool) {
        if checked {
            if let Some(entry) = self.entry(path).cloned() {
                self.selection.insert(&entry);
            }
        } else {
            self.selection.remove(path);
        }
    }

    /// Select-all only touches the rows currently rendered.
    pub fn select_all(&mut self, checked: bool) {
        let paths: Vec<String> = self.entries.iter().map(|e| e.path.clone()).collect();
        for path in paths {
            self.toggle_selection(&path, checked);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_directory: bool, size: Option<u64>) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            path: format!("/media/{name}"),
            is_directory,
            size,
        }
    }

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.show_directory(
            "/media",
            vec![
                entry("b.mkv", false, Some(10)),
                entry("A", true, None),
                entry("c.txt", false, None),
            ],
        );
        state
    }

    #[test]
    fn initial_state() {
        let state = AppState::default();
        assert_eq!(state.current_path, "/");
        assert!(!state.connection.file_store);
        assert!(!state.connection.download_daemon);
        assert!(state.selection.is_empty());
    }

    #[test]
    fn selection_tracks_checked_paths() {
        let mut state = loaded();
        state.toggle_selection("/media/b.mkv", true);
        state.toggle_selection("/media/b.mkv", true);
        state.toggle_selection("/media/A", true);
        assert_eq!(state.selection.len(), 2);

        state.toggle_selection("/media/b.mkv", false);
        assert!(!state.selection.contains("/media/b.mkv"));
        assert!(state.selection.contains("/media/A"));

        state.toggle_selection("/elsewhere", true);
        assert!(state.entry("/elsewhere").is_none());
        assert_eq!(state.selection.len(), 1);
    }

    #[test]
    fn snapshot_keeps_check_order() {
        let mut state = loaded();
        state.toggle_selection("/media/c.txt", true);
        state.toggle_selection("/media/A", true);
        let names: Vec<&str> = state.selection.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["c.txt", "A"]);
        assert_eq!(state.selection.entries()[0].size, Some(0));
    }

    #[test]
    fn new_listing_clears_selection() {
        let mut state = loaded();
        state.select_all(true);
        assert_eq!(state.selection.len(), 3);
        state.show_directory("/media/A", vec![]);
        assert!(state.selection.is_empty());
        assert_eq!(state.current_path, "/media/A");
    }

    #[test]
    fn select_all_off_clears_rendered_rows() {
        let mut state = loaded();
        state.select_all(true);
        state.select_all(false);
        assert!(state.selection.is_empty());
    }
}
