use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub is_directory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl FileEntry {
    pub fn size_or_zero(&self) -> u64 {
        self.size.unwrap_or(0)
    }

    /// Copy taken when a row is selected. Size is pinned to a number so the
    /// backend's size comparison never sees a null.
    pub fn snapshot(&self) -> Self {
        Self {
            name: self.name.clone(),
            path: self.path.clone(),
            is_directory: self.is_directory,
            size: Some(self.size_or_zero()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    FileStore,
    DownloadDaemon,
}

impl BackendKind {
    pub fn label(self) -> &'static str {
        match self {
            BackendKind::FileStore => "WebDAV",
            BackendKind::DownloadDaemon => "aria2",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Credentials {
    WebDav {
        url: String,
        username: String,
        password: String,
    },
    Aria2 {
        url: String,
        secret: String,
    },
}

impl Credentials {
    pub fn kind(&self) -> BackendKind {
        match self {
            Credentials::WebDav { .. } => BackendKind::FileStore,
            Credentials::Aria2 { .. } => BackendKind::DownloadDaemon,
        }
    }
}

/// Daemon job status. Statuses the panel does not know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum JobStatus {
    Active,
    Waiting,
    Paused,
    Error,
    Complete,
    Removed,
    Other(String),
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "active" => JobStatus::Active,
            "waiting" => JobStatus::Waiting,
            "paused" => JobStatus::Paused,
            "error" => JobStatus::Error,
            "complete" => JobStatus::Complete,
            "removed" => JobStatus::Removed,
            _ => JobStatus::Other(raw),
        }
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        JobStatus::Other(String::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JobUri {
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JobFile {
    #[serde(default)]
    pub uris: Vec<JobUri>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadJob {
    pub gid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_length: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub completed_length: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub download_speed: u64,
    #[serde(default)]
    pub files: Vec<JobFile>,
}

impl DownloadJob {
    pub fn first_uri(&self) -> Option<&str> {
        self.files
            .first()
            .and_then(|f| f.uris.first())
            .map(|u| u.uri.as_str())
    }
}

// aria2 reports lengths as decimal strings; some bridges convert them to numbers.
fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Float(f64),
        Text(String),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Int(n) => n,
        Raw::Float(f) if f.is_finite() && f > 0.0 => f as u64,
        Raw::Float(_) => 0,
        Raw::Text(s) => s.trim().parse().unwrap_or(0),
        Raw::Null(()) => 0,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct StatusReply {
    #[serde(default)]
    pub webdav_connected: bool,
    #[serde(default)]
    pub aria2_connected: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadRequest {
    pub files: Vec<FileEntry>,
    pub video_filter: bool,
    pub min_file_size_mb: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub results: Vec<ItemResult>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobsReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub downloads: Vec<DownloadJob>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DaemonStatusReply {
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub version: Option<serde_json::Value>,
}
