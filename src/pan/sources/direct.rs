use async_trait::async_trait;

use crate::pan::errors::SessionError;
use crate::pan::models::{PickCode, StreamCandidate};
use crate::pan::traits::{StorageSession, StreamSource};

/// The original file, via a UA-bound download link
pub struct SourceLink;

#[async_trait]
impl StreamSource for SourceLink {
    fn name(&self) -> &'static str {
        "source"
    }

    async fn collect(
        &self,
        session: &dyn StorageSession,
        pick_code: &PickCode,
        user_agent: &str,
    ) -> Result<Vec<StreamCandidate>, SessionError> {
        let url = session.download_link(pick_code, user_agent).await?;
        if url.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![StreamCandidate::source(url)])
    }
}
