use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

use crate::models::Credentials;
use crate::video::DEFAULT_MIN_SIZE_MB;

#[derive(Parser, Debug)]
#[command(name = "davaria")]
#[command(author, version, about = "Browse a WebDAV store and queue downloads on aria2", long_about = None)]
pub struct Args {
    /// Panel backend base URL
    #[arg(short, long, env = "DAVARIA_SERVER", default_value = "http://127.0.0.1:8000")]
    pub server: String,

    /// HTTP proxy (e.g., http://127.0.0.1:7890)
    #[arg(long, env = "DAVARIA_PROXY")]
    pub proxy: Option<String>,

    /// Request timeout in seconds (no timeout when unset)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Only queue video files of at least --min-size-mb
    #[arg(long, global = true)]
    pub video_filter: bool,

    /// Minimum video size in MB, clamped to 1..=10240
    #[arg(long, global = true, default_value_t = i64::from(DEFAULT_MIN_SIZE_MB), allow_negative_numbers = true)]
    pub min_size_mb: i64,

    /// Answer yes to confirmation prompts
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Log filter (e.g., debug, davaria=trace); RUST_LOG wins when set
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive panel (default)
    Shell,
    /// Show backend connection status
    Status,
    /// Connect a backend
    Connect(ConnectArgs),
    /// List a directory
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Queue files or folders by path
    Get {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Show download jobs
    Jobs {
        /// Keep polling every N seconds
        #[arg(short, long)]
        watch: Option<u64>,
    },
    /// Pause a job
    Pause { gid: String },
    /// Resume a job
    Resume { gid: String },
    /// Remove a job
    Remove { gid: String },
    /// Show the aria2 version reported by the backend
    Version,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Backend {
    Webdav,
    Aria2,
}

#[derive(ClapArgs, Debug)]
pub struct ConnectArgs {
    /// Which backend to connect
    #[arg(value_enum)]
    pub backend: Backend,

    /// WebDAV URL or aria2 RPC URL
    pub url: String,

    /// WebDAV user name
    #[arg(short, long, default_value = "")]
    pub username: String,

    /// WebDAV password
    #[arg(short, long, env = "DAVARIA_WEBDAV_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// aria2 RPC secret
    #[arg(long, env = "DAVARIA_ARIA2_SECRET", default_value = "", hide_env_values = true)]
    pub secret: String,
}

impl From<ConnectArgs> for Credentials {
    fn from(args: ConnectArgs) -> Self {
        match args.backend {
            Backend::Webdav => Credentials::WebDav {
                url: args.url,
                username: args.username,
                password: args.password,
            },
            Backend::Aria2 => Credentials::Aria2 {
                url: args.url,
                secret: args.secret,
            },
        }
    }
}

/// One line typed into the interactive shell.
#[derive(Parser, Debug)]
#[command(multicall = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug)]
pub enum ShellCommand {
    /// Redraw the panel
    #[command(alias = "show")]
    Ls,
    /// Reload the current directory
    Refresh,
    /// Open a row by number, "..", or an absolute path
    Cd { target: String },
    /// Follow a breadcrumb segment by number
    Crumb { index: usize },
    /// Check rows by number
    Select {
        #[arg(required = true)]
        rows: Vec<usize>,
    },
    /// Uncheck rows by number
    Unselect {
        #[arg(required = true)]
        rows: Vec<usize>,
    },
    /// Check every rendered row
    All,
    /// Uncheck every rendered row
    #[command(alias = "none")]
    Clear,
    /// Queue all checked rows
    Download,
    /// Queue one row by number
    Get { row: usize },
    /// Turn the video filter on or off
    Filter {
        #[arg(value_enum)]
        state: Toggle,
    },
    /// Set the minimum video size in MB
    MinSize {
        #[arg(allow_negative_numbers = true)]
        mb: i64,
    },
    /// Connect a backend
    Connect(ConnectArgs),
    /// Poll connection status
    Status,
    /// Refresh the download jobs
    Jobs,
    Pause { gid: String },
    Resume { gid: String },
    Remove { gid: String },
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}
