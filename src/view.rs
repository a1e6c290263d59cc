//! View models derived from [`AppState`]. Nothing in here touches the network
//! or the terminal; `render` turns these into text.

use std::cmp::Ordering;

use percent_encoding::percent_decode_str;
use reqwest::Url;

use crate::format::{format_file_size, format_speed, truncate_text};
use crate::models::{DownloadJob, FileEntry, JobStatus};
use crate::state::{AppState, ROOT};
use crate::video;

pub const UNKNOWN_FILE: &str = "unknown file";
/// Placeholder name the backend substitutes for nameless jobs.
const BACKEND_UNKNOWN_FILE: &str = "未知文件";
const JOB_NAME_WIDTH: usize = 30;

/// Case-insensitive order with a case-sensitive tie break, close to what a
/// locale collation gives for file names.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub fn sort_entries(mut entries: Vec<FileEntry>) -> Vec<FileEntry> {
    entries.sort_by(|a, b| {
        b.is_directory
            .cmp(&a.is_directory)
            .then_with(|| compare_names(&a.name, &b.name))
    });
    entries
}

pub fn parent_path(path: &str) -> String {
    let mut parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    parts.pop();
    if parts.is_empty() {
        ROOT.to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    Video,
    File,
}

impl EntryKind {
    pub fn of(entry: &FileEntry) -> Self {
        if entry.is_directory {
            EntryKind::Directory
        } else if video::is_video_like(&entry.name) {
            EntryKind::Video
        } else {
            EntryKind::File
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntryKind::Directory => "dir",
            EntryKind::Video => "video",
            EntryKind::File => "file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRow {
    Parent {
        path: String,
    },
    Entry {
        entry: FileEntry,
        kind: EntryKind,
        checked: bool,
        size: String,
        qualifies: bool,
    },
}

impl FileRow {
    pub fn name(&self) -> &str {
        match self {
            FileRow::Parent { .. } => "..",
            FileRow::Entry { entry, .. } => &entry.name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            FileRow::Parent { path } => path,
            FileRow::Entry { entry, .. } => &entry.path,
        }
    }

    pub fn is_navigable(&self) -> bool {
        match self {
            FileRow::Parent { .. } => true,
            FileRow::Entry { entry, .. } => entry.is_directory,
        }
    }
}

pub fn file_rows(state: &AppState) -> Vec<FileRow> {
    let mut rows = Vec::with_capacity(state.entries.len() + 1);
    if state.current_path != ROOT {
        rows.push(FileRow::Parent {
            path: parent_path(&state.current_path),
        });
    }
    for entry in sort_entries(state.entries.clone()) {
        let kind = EntryKind::of(&entry);
        let size = if entry.is_directory {
            "-".to_string()
        } else {
            format_file_size(entry.size_or_zero())
        };
        let qualifies = state.filter.enabled
            && kind == EntryKind::Video
            && video::qualifies(&entry, state.filter.min_size_mb);
        rows.push(FileRow::Entry {
            checked: state.selection.contains(&entry.path),
            entry,
            kind,
            size,
            qualifies,
        });
    }
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriState {
    Unchecked,
    Indeterminate,
    Checked,
}

pub fn select_all_state(rows: &[FileRow]) -> TriState {
    let mut total = 0;
    let mut checked = 0;
    for row in rows {
        if let FileRow::Entry { checked: c, .. } = row {
            total += 1;
            if *c {
                checked += 1;
            }
        }
    }
    if total == 0 || checked == 0 {
        TriState::Unchecked
    } else if checked == total {
        TriState::Checked
    } else {
        TriState::Indeterminate
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSummary {
    pub count: usize,
    pub download_enabled: bool,
    pub select_all: TriState,
}

pub fn selection_summary(state: &AppState, rows: &[FileRow]) -> SelectionSummary {
    let count = state.selection.len();
    SelectionSummary {
        count,
        download_enabled: count > 0,
        select_all: select_all_state(rows),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub path: String,
    pub is_link: bool,
}

pub fn breadcrumb(path: &str) -> Vec<Crumb> {
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    let mut crumbs = vec![Crumb {
        label: "root".to_string(),
        path: ROOT.to_string(),
        is_link: !parts.is_empty(),
    }];
    let mut prefix = String::new();
    for (idx, part) in parts.iter().enumerate() {
        prefix.push('/');
        prefix.push_str(part);
        crumbs.push(Crumb {
            label: part.to_string(),
            path: prefix.clone(),
            is_link: idx + 1 < parts.len(),
        });
    }
    crumbs
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeColor {
    Blue,
    Grey,
    Yellow,
    Red,
    Green,
    Dim,
}

pub fn status_badge(status: &JobStatus) -> (String, BadgeColor) {
    match status {
        JobStatus::Active => ("downloading".to_string(), BadgeColor::Blue),
        JobStatus::Waiting => ("waiting".to_string(), BadgeColor::Grey),
        JobStatus::Paused => ("paused".to_string(), BadgeColor::Yellow),
        JobStatus::Error => ("error".to_string(), BadgeColor::Red),
        JobStatus::Complete => ("complete".to_string(), BadgeColor::Green),
        JobStatus::Removed => ("removed".to_string(), BadgeColor::Dim),
        JobStatus::Other(raw) => (raw.clone(), BadgeColor::Grey),
    }
}

pub fn connection_badge(connected: bool) -> (&'static str, BadgeColor) {
    if connected {
        ("connected", BadgeColor::Green)
    } else {
        ("disconnected", BadgeColor::Red)
    }
}

pub fn percent_complete(completed: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * 100.0).round() as u64
}

pub fn file_name_from_url(raw: &str) -> String {
    let Ok(url) = Url::parse(raw) else {
        return UNKNOWN_FILE.to_string();
    };
    let last = url.path().rsplit('/').next().unwrap_or_default();
    if last.is_empty() {
        return UNKNOWN_FILE.to_string();
    }
    percent_decode_str(last).decode_utf8_lossy().into_owned()
}

pub fn job_display_name(job: &DownloadJob) -> String {
    match job.name.as_deref() {
        Some(name) if !name.is_empty() && name != BACKEND_UNKNOWN_FILE => name.to_string(),
        _ => job
            .first_uri()
            .map(file_name_from_url)
            .unwrap_or_else(|| UNKNOWN_FILE.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAction {
    Pause,
    Resume,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRow {
    pub gid: String,
    pub name: String,
    pub short_name: String,
    pub status: String,
    pub color: BadgeColor,
    pub percent: u64,
    pub speed: String,
    pub size: String,
    pub actions: Vec<JobAction>,
}

pub fn job_row(job: &DownloadJob) -> JobRow {
    let name = job_display_name(job);
    let (status, color) = status_badge(&job.status);
    let mut actions = Vec::with_capacity(2);
    match job.status {
        JobStatus::Active => actions.push(JobAction::Pause),
        JobStatus::Paused => actions.push(JobAction::Resume),
        _ => {}
    }
    actions.push(JobAction::Remove);
    JobRow {
        gid: job.gid.clone(),
        short_name: truncate_text(&name, JOB_NAME_WIDTH),
        name,
        status,
        color,
        percent: percent_complete(job.completed_length, job.total_length),
        speed: format_speed(job.download_speed),
        size: format_file_size(job.total_length),
        actions,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobTable {
    Empty,
    Rows(Vec<JobRow>),
}

pub fn job_table(jobs: &[DownloadJob]) -> JobTable {
    if jobs.is_empty() {
        JobTable::Empty
    } else {
        JobTable::Rows(jobs.iter().map(job_row).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobFile, JobUri};

    fn entry(name: &str, is_directory: bool, size: Option<u64>) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            path: format!("/{}", name),
            is_directory,
            size,
        }
    }

    fn names(rows: &[FileRow]) -> Vec<&str> {
        rows.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn directories_sort_before_files() {
        let mut state = AppState::default();
        state.show_directory(
            "/",
            vec![entry("b.txt", false, Some(100)), entry("A", true, Some(0))],
        );
        assert_eq!(names(&file_rows(&state)), vec!["A", "b.txt"]);
    }

    #[test]
    fn names_sort_case_insensitively() {
        let sorted = sort_entries(vec![
            entry("zeta.mp4", false, None),
            entry("Beta", true, None),
            entry("alpha.mkv", false, None),
            entry("alpha", true, None),
            entry("Alpha.mkv", false, None),
        ]);
        let got: Vec<&str> = sorted.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(got, vec!["alpha", "Beta", "Alpha.mkv", "alpha.mkv", "zeta.mp4"]);
    }

    #[test]
    fn parent_row_only_below_root() {
        let mut state = AppState::default();
        state.show_directory("/", vec![entry("x", true, None)]);
        assert!(!matches!(file_rows(&state)[0], FileRow::Parent { .. }));

        state.show_directory("/movies/2024/", vec![]);
        assert_eq!(
            file_rows(&state),
            vec![FileRow::Parent { path: "/movies".to_string() }]
        );
    }

    #[test]
    fn parent_of_paths() {
        assert_eq!(parent_path("/"), "/");
        assert_eq!(parent_path("/a"), "/");
        assert_eq!(parent_path("/a/b"), "/a");
        assert_eq!(parent_path("//a//b//"), "/a");
    }

    #[test]
    fn row_badges_and_sizes() {
        let mut state = AppState::default();
        state.filter.enabled = true;
        state.filter.min_size_mb = 1;
        state.show_directory(
            "/",
            vec![
                entry("show", true, None),
                entry("big.mkv", false, Some(2 * 1024 * 1024)),
                entry("small.mp4", false, Some(10)),
                entry("notes.txt", false, Some(1536)),
            ],
        );
        let rows = file_rows(&state);
        let summary: Vec<(EntryKind, String, bool)> = rows
            .iter()
            .map(|r| match r {
                FileRow::Entry { kind, size, qualifies, .. } => (*kind, size.clone(), *qualifies),
                FileRow::Parent { .. } => unreachable!(),
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                (EntryKind::Directory, "-".to_string(), false),
                (EntryKind::Video, "2 MB".to_string(), true),
                (EntryKind::File, "1.5 KB".to_string(), false),
                (EntryKind::Video, "10 B".to_string(), false),
            ]
        );
    }

    #[test]
    fn select_all_tri_state() {
        let mut state = AppState::default();
        state.show_directory(
            "/sub",
            vec![entry("a.mp4", false, Some(1)), entry("b.mp4", false, Some(1))],
        );
        assert_eq!(select_all_state(&file_rows(&state)), TriState::Unchecked);

        state.toggle_selection("/a.mp4", true);
        assert_eq!(select_all_state(&file_rows(&state)), TriState::Indeterminate);

        state.toggle_selection("/b.mp4", true);
        assert_eq!(select_all_state(&file_rows(&state)), TriState::Checked);

        state.show_directory("/empty", vec![]);
        assert_eq!(select_all_state(&file_rows(&state)), TriState::Unchecked);
    }

    #[test]
    fn summary_disables_download_when_empty() {
        let mut state = AppState::default();
        state.show_directory("/", vec![entry("a.mp4", false, Some(1))]);
        let rows = file_rows(&state);
        let summary = selection_summary(&state, &rows);
        assert_eq!(summary.count, 0);
        assert!(!summary.download_enabled);

        state.select_all(true);
        let rows = file_rows(&state);
        assert!(selection_summary(&state, &rows).download_enabled);
    }

    #[test]
    fn breadcrumb_links_all_but_last() {
        let crumbs = breadcrumb("/movies/2024/june");
        let got: Vec<(&str, &str, bool)> = crumbs
            .iter()
            .map(|c| (c.label.as_str(), c.path.as_str(), c.is_link))
            .collect();
        assert_eq!(
            got,
            vec![
                ("root", "/", true),
                ("movies", "/movies", true),
                ("2024", "/movies/2024", true),
                ("june", "/movies/2024/june", false),
            ]
        );
        assert_eq!(breadcrumb("/").len(), 1);
        assert!(!breadcrumb("/")[0].is_link);
    }

    #[test]
    fn zero_length_job_is_zero_percent() {
        let job = DownloadJob {
            gid: "g1".into(),
            name: Some("x".into()),
            status: JobStatus::Waiting,
            ..Default::default()
        };
        let row = job_row(&job);
        assert_eq!(row.percent, 0);
        assert_eq!(row.size, "0 B");
        assert_eq!(row.speed, "0 B/s");
    }

    #[test]
    fn percent_rounds() {
        assert_eq!(percent_complete(1, 3), 33);
        assert_eq!(percent_complete(2, 3), 67);
        assert_eq!(percent_complete(10, 10), 100);
    }

    #[test]
    fn name_falls_back_to_decoded_url() {
        let mut job = DownloadJob {
            gid: "g2".into(),
            files: vec![JobFile {
                uris: vec![JobUri {
                    uri: "http://nas/dav/My%20Movie%20%E8%A7%86%E9%A2%91.mkv".into(),
                }],
            }],
            ..Default::default()
        };
        assert_eq!(job_display_name(&job), "My Movie 视频.mkv");

        job.name = Some(BACKEND_UNKNOWN_FILE.into());
        assert_eq!(job_display_name(&job), "My Movie 视频.mkv");

        job.files[0].uris[0].uri = "not a url".into();
        assert_eq!(job_display_name(&job), UNKNOWN_FILE);

        job.files.clear();
        assert_eq!(job_display_name(&job), UNKNOWN_FILE);
    }

    #[test]
    fn status_table_and_actions() {
        let statuses = [
            ("active", "downloading", vec![JobAction::Pause, JobAction::Remove]),
            ("waiting", "waiting", vec![JobAction::Remove]),
            ("paused", "paused", vec![JobAction::Resume, JobAction::Remove]),
            ("error", "error", vec![JobAction::Remove]),
            ("complete", "complete", vec![JobAction::Remove]),
            ("removed", "removed", vec![JobAction::Remove]),
            ("seeding", "seeding", vec![JobAction::Remove]),
        ];
        for (raw, label, actions) in statuses {
            let job = DownloadJob {
                gid: raw.into(),
                name: Some("n".into()),
                status: JobStatus::from(raw.to_string()),
                ..Default::default()
            };
            let row = job_row(&job);
            assert_eq!(row.status, label);
            assert_eq!(row.actions, actions);
        }
    }

    #[test]
    fn long_job_names_are_truncated() {
        let job = DownloadJob {
            gid: "g".into(),
            name: Some("a".repeat(40)),
            ..Default::default()
        };
        let row = job_row(&job);
        assert_eq!(row.short_name, format!("{}...", "a".repeat(30)));
        assert_eq!(row.name.len(), 40);
    }

    #[test]
    fn empty_queue_is_placeholder() {
        assert_eq!(job_table(&[]), JobTable::Empty);
    }
}
