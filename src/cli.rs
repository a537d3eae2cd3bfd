use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "immich-album-sync",
    about = "Keep an Immich album in sync with the photos of selected people"
)]
pub struct Cli {
    /// Base URL of the Immich server, e.g. https://immich.example.com
    #[arg(long, env = "IMMICH_BASE_URL")]
    pub base_url: String,

    /// Immich API key.
    /// WARNING: passing via --api-key is visible in process listings.
    /// Prefer the IMMICH_API_KEY environment variable instead.
    #[arg(long, env = "IMMICH_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Album to keep in sync (UUID)
    #[arg(long, env = "IMMICH_ALBUM_ID")]
    pub album_id: Option<String>,

    /// Person name(s) whose photos belong in the album
    #[arg(long = "person", env = "IMMICH_PERSONS", value_delimiter = ',')]
    pub persons: Vec<String>,

    /// Only keep assets whose filename matches a wildcard pattern (* ? [...])
    #[arg(long = "name-filter", env = "IMMICH_NAME_FILTERS", value_delimiter = ',')]
    pub name_filters: Vec<String>,

    /// Seconds to wait between sync cycles
    #[arg(
        long,
        env = "SYNC_INTERVAL_SECONDS",
        default_value_t = 3600,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: u64,

    /// Run a single sync cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Do not modify the album, only report what would be added
    #[arg(long)]
    pub dry_run: bool,

    /// Print the id of the album with this name and exit
    #[arg(long, value_name = "NAME")]
    pub find_album: Option<String>,

    /// List people known to the server and exit
    #[arg(long)]
    pub list_people: bool,

    /// Send readiness and watchdog notifications to systemd
    #[arg(long)]
    pub notify_systemd: bool,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}
