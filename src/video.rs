use crate::models::FileEntry;

pub const VIDEO_EXTENSIONS: [&str; 31] = [
    ".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm", ".m4v", ".3gp", ".3g2", ".asf",
    ".rm", ".rmvb", ".vob", ".ts", ".mts", ".m2ts", ".divx", ".xvid", ".ogv", ".f4v", ".mpg",
    ".mpeg", ".m1v", ".m2v", ".mpe", ".mpv", ".mp2", ".mpa", ".mpu", ".mpg2",
];

pub const MIN_SIZE_MB_FLOOR: u32 = 1;
pub const MIN_SIZE_MB_CEIL: u32 = 10240;
pub const DEFAULT_MIN_SIZE_MB: u32 = 300;

const MB: u64 = 1024 * 1024;

pub fn is_video_like(name: &str) -> bool {
    let lower = name.to_lowercase();
    match lower.rfind('.') {
        Some(dot) => VIDEO_EXTENSIONS.contains(&&lower[dot..]),
        None => false,
    }
}

/// True when a plain file passes the filter. Directories are never judged here.
pub fn qualifies(entry: &FileEntry, min_size_mb: u32) -> bool {
    is_video_like(&entry.name) && entry.size_or_zero() >= u64::from(min_size_mb) * MB
}

/// Keeps every directory (the backend filters inside them) and every file
/// that is video-like and at least `min_size_mb` large.
pub fn filter_video_files(files: &[FileEntry], min_size_mb: u32) -> Vec<FileEntry> {
    files
        .iter()
        .filter(|f| f.is_directory || qualifies(f, min_size_mb))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clamp {
    Within,
    RaisedToFloor,
    LoweredToCeil,
}

impl Clamp {
    pub fn warning(self) -> Option<String> {
        match self {
            Clamp::Within => None,
            Clamp::RaisedToFloor => Some(format!(
                "Minimum file size cannot be below {} MB",
                MIN_SIZE_MB_FLOOR
            )),
            Clamp::LoweredToCeil => Some(format!(
                "Minimum file size cannot exceed {} MB",
                MIN_SIZE_MB_CEIL
            )),
        }
    }
}

pub fn clamp_min_size_mb(requested: i64) -> (u32, Clamp) {
    if requested < i64::from(MIN_SIZE_MB_FLOOR) {
        (MIN_SIZE_MB_FLOOR, Clamp::RaisedToFloor)
    } else if requested > i64::from(MIN_SIZE_MB_CEIL) {
        (MIN_SIZE_MB_CEIL, Clamp::LoweredToCeil)
    } else {
        (requested as u32, Clamp::Within)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoFilterConfig {
    pub enabled: bool,
    pub min_size_mb: u32,
}

impl Default for VideoFilterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_size_mb: DEFAULT_MIN_SIZE_MB,
        }
    }
}

impl VideoFilterConfig {
    pub fn set_min_size_mb(&mut self, requested: i64) -> Clamp {
        let (value, clamp) = clamp_min_size_mb(requested);
        self.min_size_mb = value;
        clamp
    }
}
