// Cookie credentials for the 115 web API
//
// The cookie file holds one header line copied from a logged-in browser:
//   UID=...; CID=...; SEID=...; KID=...
// Lookup order when no file is given:
// 1. <exe_dir>/../data/115
// 2. <config_dir>/pan115/cookies

use std::path::{Path, PathBuf};
use tracing::debug;

use super::errors::PanError;

const REQUIRED_KEYS: [&str; 3] = ["UID", "CID", "SEID"];

#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub uid: String,
    pub cid: String,
    pub seid: String,
    pub kid: Option<String>,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("uid", &self.uid)
            .finish_non_exhaustive()
    }
}

impl Credential {
    /// Parse a `Cookie` header value
    pub fn from_cookie(raw: &str) -> Result<Self, PanError> {
        let mut uid = None;
        let mut cid = None;
        let mut seid = None;
        let mut kid = None;

        for pair in raw.trim().split(';') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.trim().to_ascii_uppercase().as_str() {
                "UID" => uid = Some(value.to_string()),
                "CID" => cid = Some(value.to_string()),
                "SEID" => seid = Some(value.to_string()),
                "KID" => kid = Some(value.to_string()),
                _ => {}
            }
        }

        match (uid, cid, seid) {
            (Some(uid), Some(cid), Some(seid)) => Ok(Self {
                uid,
                cid,
                seid,
                kid,
            }),
            _ => Err(PanError::Credentials(format!(
                "cookie must contain {}",
                REQUIRED_KEYS.join(", ")
            ))),
        }
    }

    /// Canonical `Cookie` header
    pub fn cookie_header(&self) -> String {
        let mut header = format!("UID={}; CID={}; SEID={}", self.uid, self.cid, self.seid);
        if let Some(kid) = &self.kid {
            header.push_str(&format!("; KID={}", kid));
        }
        header
    }

    /// Load from `explicit`, or from the first default location that exists
    pub fn load(explicit: Option<&Path>) -> Result<Self, PanError> {
        let path = locate_cookie_file(explicit)?;
        debug!("[Credentials] reading {}", path.display());
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            PanError::Credentials(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_cookie(&raw)
    }
}

/// Default cookie file locations, most specific first
pub fn default_cookie_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(exe) = std::env::current_exe() {
        if let Some(root) = exe.parent().and_then(Path::parent) {
            paths.push(root.join("data").join("115"));
        }
    }
    if let Some(config) = dirs::config_dir() {
        paths.push(config.join("pan115").join("cookies"));
    }

    paths
}

fn locate_cookie_file(explicit: Option<&Path>) -> Result<PathBuf, PanError> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(PanError::Credentials(format!(
            "cookie file does not exist: {}",
            path.display()
        )));
    }

    let candidates = default_cookie_paths();
    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| {
            let tried: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
            PanError::Credentials(format!(
                "cookie file does not exist (tried {})",
                tried.join(", ")
            ))
        })
}
