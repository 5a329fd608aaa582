// Common data models for the 115 path and stream core

use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// Desktop Chrome UA sent with download-link and manifest requests.
/// 115 binds issued links to the UA that requested them.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

/// Default listing page size
pub const DEFAULT_LIST_LIMIT: u32 = 1000;

/// Largest page size the backend accepts
pub const MAX_LIST_LIMIT: u32 = 10_000;

/// Backend-internal directory identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryId(String);

impl DirectoryId {
    /// Well-known id of the drive root
    pub const ROOT: &'static str = "0";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn root() -> Self {
        Self(Self::ROOT.to_string())
    }

    pub fn is_root(&self) -> bool {
        self.0 == Self::ROOT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DirectoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backend-internal file token used to request a download link
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PickCode(String);

impl PickCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PickCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an entry is, carrying the one token that is meaningful for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Directory { id: DirectoryId },
    File { pick_code: PickCode, size: u64 },
}

/// One remote filesystem node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Name as returned by the backend, may contain path-unsafe characters
    pub name: String,
    pub kind: EntryKind,
}

impl Entry {
    pub fn directory(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory {
                id: DirectoryId::new(id),
            },
        }
    }

    pub fn file(name: impl Into<String>, pick_code: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File {
                pick_code: PickCode::new(pick_code),
                size,
            },
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory { .. })
    }

    /// The entry's own id, if it is a directory
    pub fn directory_id(&self) -> Option<&DirectoryId> {
        match &self.kind {
            EntryKind::Directory { id } => Some(id),
            EntryKind::File { .. } => None,
        }
    }

    /// The download token, if it is a file
    pub fn pick_code(&self) -> Option<&PickCode> {
        match &self.kind {
            EntryKind::File { pick_code, .. } => Some(pick_code),
            EntryKind::Directory { .. } => None,
        }
    }
}

/// Listing order hint passed to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ListOrder {
    Name,
    #[default]
    Time,
    Size,
    Type,
}

impl ListOrder {
    /// Backend order key
    pub fn api_key(&self) -> &'static str {
        match self {
            Self::Name => "file_name",
            Self::Time => "user_ptime",
            Self::Size => "file_size",
            Self::Type => "file_type",
        }
    }

    /// Name and type read naturally A→Z, time and size newest/largest first
    pub fn ascending(&self) -> bool {
        matches!(self, Self::Name | Self::Type)
    }
}

impl fmt::Display for ListOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Time => write!(f, "time"),
            Self::Size => write!(f, "size"),
            Self::Type => write!(f, "type"),
        }
    }
}

/// Options for one listing call
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub order: ListOrder,
    /// Ask for natural ordering (numerals by value); only meaningful for `Name`
    pub natural: bool,
    /// Page size; entries beyond it are truncated
    pub limit: u32,
}

impl ListOptions {
    /// Natural name order, the order used for path resolution
    pub fn by_name(limit: u32) -> Self {
        Self {
            order: ListOrder::Name,
            natural: true,
            limit: clamp_limit(limit),
        }
    }

    pub fn with_order(order: ListOrder, limit: u32) -> Self {
        Self {
            order,
            natural: order == ListOrder::Name,
            limit: clamp_limit(limit),
        }
    }
}

impl Default for ListOptions {
    fn default() -> Self {
        Self::by_name(DEFAULT_LIST_LIMIT)
    }
}

fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_LIST_LIMIT)
}

/// One page of a directory listing
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub entries: Vec<Entry>,
    /// Total number of children reported by the backend, if it said
    pub total: Option<u64>,
}

/// Quality label of a stream candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Quality {
    /// The unmodified original file
    Source,
    /// Vertical resolution, rendered as "<height>p"
    Height(u32),
    /// Label that is not "<number>p"
    Unknown(String),
}

impl Quality {
    pub const SOURCE_LABEL: &'static str = "Source";
    pub const UNKNOWN_LABEL: &'static str = "Unknown";

    pub fn unknown() -> Self {
        Self::Unknown(Self::UNKNOWN_LABEL.to_string())
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str(Self::SOURCE_LABEL),
            Self::Height(h) => write!(f, "{}p", h),
            Self::Unknown(label) => f.write_str(label),
        }
    }
}

impl Serialize for Quality {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One playable URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamCandidate {
    pub quality: Quality,
    pub url: String,
    /// True for adaptive playlist variants, false for the direct source link
    #[serde(rename = "is_m3u8")]
    pub is_adaptive: bool,
}

impl StreamCandidate {
    pub fn source(url: impl Into<String>) -> Self {
        Self {
            quality: Quality::Source,
            url: url.into(),
            is_adaptive: false,
        }
    }

    pub fn adaptive(quality: Quality, url: impl Into<String>) -> Self {
        Self {
            quality,
            url: url.into(),
            is_adaptive: true,
        }
    }
}

/// Backend URLs; overridable so tests can target a mock server
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Generic listing endpoint (any order)
    pub files: String,
    /// Listing endpoint supporting natural name sort
    pub natsort_files: String,
    /// Download link issuance
    pub download: String,
    /// Adaptive manifest URL; `{pick_code}` is substituted
    pub manifest_template: String,
    /// User info endpoint used as a login check
    pub user_info: String,
}

impl Endpoints {
    /// Point every endpoint at one base URL, keeping the production paths
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            files: format!("{}/files", base),
            natsort_files: format!("{}/natsort/files.php", base),
            download: format!("{}/files/download", base),
            manifest_template: format!("{}/api/video/m3u8/{{pick_code}}.m3u8", base),
            user_info: format!("{}/user/info", base),
        }
    }

    pub fn manifest_url(&self, pick_code: &PickCode) -> String {
        self.manifest_template
            .replace("{pick_code}", pick_code.as_str())
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            files: "https://webapi.115.com/files".to_string(),
            natsort_files: "https://aps.115.com/natsort/files.php".to_string(),
            download: "https://webapi.115.com/files/download".to_string(),
            manifest_template: "https://115.com/api/video/m3u8/{pick_code}.m3u8".to_string(),
            user_info: "https://my.115.com/?ct=ajax&ac=nav".to_string(),
        }
    }
}

/// Configuration for one authenticated session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Explicit cookie file; discovered when absent
    pub cookies_path: Option<PathBuf>,
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// UA for download links and manifests
    pub user_agent: String,
    /// Listing page size
    pub list_limit: u32,
    pub endpoints: Endpoints,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookies_path: None,
            proxy: None,
            timeout_seconds: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            list_limit: DEFAULT_LIST_LIMIT,
            endpoints: Endpoints::default(),
        }
    }
}

impl SessionConfig {
    pub fn with_cookies_path(mut self, path: Option<PathBuf>) -> Self {
        self.cookies_path = path;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    /// Clamped to at least one second
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds.max(1);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_list_limit(mut self, limit: u32) -> Self {
        self.list_limit = clamp_limit(limit);
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}
