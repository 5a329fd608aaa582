// Adaptive (HLS) variants from 115's transcoded master playlist
//
// Master playlist shape:
//   #EXTM3U
//   #EXT-X-STREAM-INF:BANDWIDTH=4000000,RESOLUTION=1920x1080
//   https://cdn.115.com/.../1080.m3u8
//   #EXT-X-STREAM-INF:BANDWIDTH=1500000,RESOLUTION=1280x720
//   https://cdn.115.com/.../720.m3u8

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use crate::pan::errors::SessionError;
use crate::pan::models::{PickCode, Quality, StreamCandidate};
use crate::pan::traits::{StorageSession, StreamSource};

const PLAYLIST_MAGIC: &str = "#EXTM3U";
const STREAM_INF_TAG: &str = "#EXT-X-STREAM-INF";

lazy_static::lazy_static! {
    static ref RESOLUTION_RE: Regex = Regex::new(r"RESOLUTION=\d+x(\d+)").unwrap();
}

/// Variant URLs listed by a master playlist, in document order.
/// Returns nothing if `body` is not an extended M3U document.
pub fn parse_master_playlist(body: &str) -> Vec<StreamCandidate> {
    if !body.starts_with(PLAYLIST_MAGIC) {
        return Vec::new();
    }

    let lines: Vec<&str> = body.lines().map(str::trim).collect();
    let mut streams = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if !line.starts_with(STREAM_INF_TAG) {
            continue;
        }
        let Some(url) = lines[i + 1..].iter().find(|l| !l.is_empty()) else {
            break;
        };
        if url.starts_with("http") {
            streams.push(StreamCandidate::adaptive(quality_of(line), *url));
        } else {
            debug!("[hls] skipping non-http variant uri: {}", url);
        }
    }

    streams
}

/// "<height>p" from a RESOLUTION attribute, else Unknown
fn quality_of(tag_line: &str) -> Quality {
    RESOLUTION_RE
        .captures(tag_line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .map(Quality::Height)
        .unwrap_or_else(Quality::unknown)
}

/// Transcoded variants from the manifest endpoint
pub struct AdaptiveManifest;

#[async_trait]
impl StreamSource for AdaptiveManifest {
    fn name(&self) -> &'static str {
        "m3u8"
    }

    async fn collect(
        &self,
        session: &dyn StorageSession,
        pick_code: &PickCode,
        user_agent: &str,
    ) -> Result<Vec<StreamCandidate>, SessionError> {
        let url = session.manifest_url(pick_code);
        let body = session
            .raw_get(&url, &[("User-Agent", user_agent)])
            .await?;
        Ok(parse_master_playlist(&body))
    }
}
