use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "iptv",
    about = "IPTV - browse, search and probe public IPTV playlists from the terminal",
    version
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the configuration)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Passthrough used when a playlist cannot be fetched directly
    #[arg(long, global = true, env = "IPTV_PASSTHROUGH")]
    pub passthrough: Option<String>,

    /// Proxy URL (supports http, https, socks5)
    #[arg(long, global = true)]
    pub proxy: Option<String>,

    /// Proxy username (if proxy requires authentication)
    #[arg(long, global = true)]
    pub proxy_username: Option<String>,

    /// Proxy password (if proxy requires authentication)
    #[arg(long, global = true)]
    pub proxy_password: Option<String>,
}

/// Which playlist(s) to load. Defaults to the configured source.
#[derive(ClapArgs, Debug, Clone, Default)]
#[group(multiple = false)]
pub struct SourceArgs {
    /// Built-in preset, by key or name (see `iptv presets`)
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Built-in pack of merged playlists
    #[arg(long)]
    pub pack: Option<String>,

    /// Playlist URL
    #[arg(short, long)]
    pub url: Option<String>,

    /// Saved source, by index (see `iptv saved list`)
    #[arg(short, long)]
    pub saved: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List channels of a source, filtered and paged
    Browse {
        #[command(flatten)]
        source: SourceArgs,

        /// Case-insensitive text the channel name must contain
        #[arg(long)]
        search: Option<String>,

        /// Only channels of this group ("All" for every group)
        #[arg(short, long, default_value = "All")]
        group: String,

        /// Page to show, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// List the groups of a source
    Groups {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// List built-in presets and packs
    Presets {
        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// Manage saved sources
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },

    /// Check whether a channel's stream can be played
    Probe {
        #[command(flatten)]
        source: SourceArgs,

        /// Channel position within the source (the `#N` shown by `iptv browse`)
        #[arg(long, conflicts_with = "stream")]
        channel: Option<usize>,

        /// Probe a stream URL directly, without loading a playlist
        #[arg(long)]
        stream: Option<String>,

        /// Give up after this many seconds
        #[arg(long)]
        wait: Option<u64>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Show configuration information
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum SavedAction {
    /// List saved sources
    List {
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// Save a playlist URL and load it
    Add {
        url: String,

        /// Display name (defaults to "Playlist <n>")
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Remove a saved source by index
    Remove { index: usize },
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed human-readable output
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// Compact JSON output
    JsonCompact,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Pretty => write!(f, "pretty"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::JsonCompact => write!(f, "json-compact"),
        }
    }
}
