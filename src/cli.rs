use clap::Parser;
use std::path::PathBuf;

use crate::pan::models::{SessionConfig, DEFAULT_LIST_LIMIT, DEFAULT_USER_AGENT};

/// Browse a 115 cloud drive by path and resolve playable stream URLs.
///
/// Always prints exactly one JSON object on stdout.
#[derive(Debug, Clone, Parser)]
#[command(version)]
pub struct Cli {
    /// list, play or get-streams
    #[arg(long)]
    pub action: Option<String>,

    /// Directory (list) or file (play, get-streams) path
    #[arg(long)]
    pub path: Option<String>,

    /// Listing order for `list`: name, time, size or type
    #[arg(long)]
    pub sort: Option<String>,

    /// Cookie file (UID=...; CID=...; SEID=...)
    #[arg(long, env = "PAN115_COOKIES")]
    pub cookies: Option<PathBuf>,

    /// User agent bound to download links
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// SOCKS5/HTTP proxy, e.g. socks5h://127.0.0.1:1080
    #[arg(long, env = "PAN115_PROXY")]
    pub proxy: Option<String>,

    /// Request timeout in seconds (at least 1)
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Listing page size; larger directories are truncated
    #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
    pub limit: u32,

    #[arg(long, default_value = "WARN")]
    pub log_level: tracing::Level,
}

impl Cli {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::default()
            .with_cookies_path(self.cookies.clone())
            .with_proxy(self.proxy.clone())
            .with_timeout(self.timeout)
            .with_user_agent(self.user_agent.clone())
            .with_list_limit(self.limit)
    }
}
