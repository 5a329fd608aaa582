// Storage session and stream source trait definitions

use async_trait::async_trait;

use super::errors::SessionError;
use super::models::{DirectoryId, ListOptions, ListPage, PickCode, StreamCandidate};

/// An authenticated 115 account.
///
/// The core only ever talks to the backend through this trait, so every
/// component can be driven by an in-memory implementation in tests.
#[async_trait]
pub trait StorageSession: Send + Sync {
    /// List one page of the children of `directory`
    async fn list_children(
        &self,
        directory: &DirectoryId,
        options: &ListOptions,
    ) -> Result<ListPage, SessionError>;

    /// Issue a direct download URL bound to `user_agent`
    async fn download_link(
        &self,
        pick_code: &PickCode,
        user_agent: &str,
    ) -> Result<String, SessionError>;

    /// Authenticated GET returning the body text
    async fn raw_get(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, SessionError>;

    /// Fill a manifest URL template for `pick_code`
    fn manifest_url(&self, pick_code: &PickCode) -> String;
}

/// One way of turning a pick code into playable URLs
#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Name of the source (for logging)
    fn name(&self) -> &'static str;

    /// Collect candidates; an empty vec means the source had nothing usable
    async fn collect(
        &self,
        session: &dyn StorageSession,
        pick_code: &PickCode,
        user_agent: &str,
    ) -> Result<Vec<StreamCandidate>, SessionError>;
}
