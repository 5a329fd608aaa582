// Stream Collector - runs every stream source, keeps whatever succeeds
//
// Sources are tried in order and independently: a failing source is logged
// and skipped. Only an empty overall result is an error.

use tracing::{info, warn};

use super::errors::PanError;
use super::models::{PickCode, StreamCandidate};
use super::sources::{AdaptiveManifest, SourceLink};
use super::traits::{StorageSession, StreamSource};

pub struct StreamCollector {
    sources: Vec<Box<dyn StreamSource>>,
}

impl StreamCollector {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Direct source link first, then the adaptive manifest
    pub fn with_default_sources() -> Self {
        let mut collector = Self::new();
        collector.add_source(Box::new(SourceLink));
        collector.add_source(Box::new(AdaptiveManifest));
        collector
    }

    pub fn add_source(&mut self, source: Box<dyn StreamSource>) {
        self.sources.push(source);
    }

    /// All candidates in insertion order (unranked)
    pub async fn collect_streams(
        &self,
        session: &dyn StorageSession,
        pick_code: &PickCode,
        user_agent: &str,
    ) -> Result<Vec<StreamCandidate>, PanError> {
        let mut streams = Vec::new();

        for source in &self.sources {
            match source.collect(session, pick_code, user_agent).await {
                Ok(found) => {
                    info!("[Collector] {} gave {} stream(s)", source.name(), found.len());
                    streams.extend(found.into_iter().filter(|s| !s.url.is_empty()));
                }
                Err(e) => {
                    warn!("[Collector] {} failed: {}", source.name(), e);
                }
            }
        }

        if streams.is_empty() {
            return Err(PanError::NoStreamsFound);
        }
        Ok(streams)
    }
}

impl Default for StreamCollector {
    fn default() -> Self {
        Self::with_default_sources()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pan::mock::MockSession;
    use crate::pan::models::Quality;

    const MASTER: &str =
        "#EXTM3U\n#EXT-X-STREAM-INF:RESOLUTION=1280x720\nhttps://cdn/720.m3u8\n";

    async fn collect(session: &MockSession) -> Result<Vec<StreamCandidate>, PanError> {
        StreamCollector::default()
            .collect_streams(session, &PickCode::new("pc"), "UA/3")
            .await
    }

    #[tokio::test]
    async fn test_both_sources() {
        let session = MockSession::new()
            .with_link("pc", "https://cdn/source.mkv")
            .with_manifest("pc", MASTER);
        let streams = collect(&session).await.unwrap();
        assert_eq!(streams.len(), 2);
        assert_eq!(streams[0].quality, Quality::Source);
        assert_eq!(streams[1].quality, Quality::Height(720));
        assert_eq!(
            session.seen_user_agents.lock().unwrap().as_slice(),
            ["UA/3", "UA/3"]
        );
    }

    #[tokio::test]
    async fn test_manifest_failure_keeps_source() {
        let session = MockSession::new().with_link("pc", "https://cdn/source.mkv");
        let streams = collect(&session).await.unwrap();
        assert_eq!(streams, vec![StreamCandidate::source("https://cdn/source.mkv")]);
    }

    #[tokio::test]
    async fn test_link_failure_keeps_manifest() {
        let session = MockSession::new().with_manifest("pc", MASTER);
        let streams = collect(&session).await.unwrap();
        assert_eq!(streams.len(), 1);
        assert!(streams[0].is_adaptive);
    }

    #[tokio::test]
    async fn test_no_streams() {
        let session = MockSession::new();
        assert!(matches!(collect(&session).await, Err(PanError::NoStreamsFound)));
    }

    #[tokio::test]
    async fn test_unusable_results_count_as_none() {
        let session = MockSession::new()
            .with_link("pc", "")
            .with_manifest("pc", "<html>expired</html>");
        assert!(matches!(collect(&session).await, Err(PanError::NoStreamsFound)));
    }
}
