// Sorted Lister - one bounded page of a directory, in a defined order
//
// Name order is natural order (case-insensitive, numerals by value). The
// backend's natsort endpoint is asked for it, and the page is re-sorted
// locally with a stable sort so the order holds even if the backend
// degrades to plain lexicographic sorting.

use tracing::{debug, warn};

use super::errors::PanError;
use super::models::{DirectoryId, Entry, ListOptions, ListOrder};
use super::natsort::natural_cmp;
use super::traits::StorageSession;

/// A sorted page plus whether the backend holds more than it returned
#[derive(Debug, Clone, Default)]
pub struct SortedPage {
    pub entries: Vec<Entry>,
    pub truncated: bool,
}

pub struct SortedLister<'a> {
    session: &'a dyn StorageSession,
    limit: u32,
}

impl<'a> SortedLister<'a> {
    pub fn new(session: &'a dyn StorageSession, limit: u32) -> Self {
        Self { session, limit }
    }

    /// Children of `directory` in natural name order
    pub async fn list_sorted(&self, directory: &DirectoryId) -> Result<Vec<Entry>, PanError> {
        self.list(directory, &ListOptions::by_name(self.limit)).await
    }

    /// Children of `directory` in the order `options` asks for
    pub async fn list(
        &self,
        directory: &DirectoryId,
        options: &ListOptions,
    ) -> Result<Vec<Entry>, PanError> {
        Ok(self.list_page(directory, options).await?.entries)
    }

    /// Like `list`, also reporting truncation at the page limit
    pub async fn list_page(
        &self,
        directory: &DirectoryId,
        options: &ListOptions,
    ) -> Result<SortedPage, PanError> {
        debug!(
            "[Lister] cid={} order={} natural={} limit={}",
            directory, options.order, options.natural, options.limit
        );

        let page = self
            .session
            .list_children(directory, options)
            .await
            .map_err(|source| PanError::List {
                directory: directory.to_string(),
                source,
            })?;

        let truncated = page
            .total
            .is_some_and(|total| total > page.entries.len() as u64);
        if let Some(total) = page.total.filter(|_| truncated) {
            warn!(
                "[Lister] cid={} truncated: {} of {} entries returned (limit {})",
                directory,
                page.entries.len(),
                total,
                options.limit
            );
        }

        let mut entries = page.entries;
        if options.order == ListOrder::Name {
            // Folders first, as requested with fc_mix=0
            entries.sort_by(|a, b| {
                b.is_directory()
                    .cmp(&a.is_directory())
                    .then_with(|| natural_cmp(&a.name, &b.name))
            });
        }
        Ok(SortedPage { entries, truncated })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pan::mock::MockSession;

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_natural_order() {
        let session = MockSession::new().with_dir(
            "5",
            vec![
                Entry::file("b", "1", 0),
                Entry::file("a", "2", 0),
                Entry::file("c10", "3", 0),
                Entry::file("c2", "4", 0),
            ],
        );
        let lister = SortedLister::new(&session, 1000);
        let entries = lister.list_sorted(&DirectoryId::new("5")).await.unwrap();
        assert_eq!(names(&entries), vec!["a", "b", "c2", "c10"]);
    }

    #[tokio::test]
    async fn test_requests_natural_name_order() {
        let session = MockSession::sample();
        let lister = SortedLister::new(&session, 250);
        lister.list_sorted(&DirectoryId::root()).await.unwrap();

        let seen = session.seen_options.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].order, ListOrder::Name);
        assert!(seen[0].natural);
        assert_eq!(seen[0].limit, 250);
    }

    #[tokio::test]
    async fn test_other_orders_keep_backend_order() {
        let session = MockSession::new().with_dir(
            "5",
            vec![Entry::file("z", "1", 0), Entry::file("a", "2", 0)],
        );
        let lister = SortedLister::new(&session, 1000);
        let options = ListOptions::with_order(ListOrder::Time, 1000);
        let entries = lister.list(&DirectoryId::new("5"), &options).await.unwrap();
        assert_eq!(names(&entries), vec!["z", "a"]);
    }

    #[tokio::test]
    async fn test_directories_before_files() {
        let session = MockSession::new().with_dir(
            "5",
            vec![
                Entry::file("alpha.mkv", "1", 0),
                Entry::directory("zeta", "6"),
                Entry::file("Beta.mkv", "2", 0),
                Entry::directory("Alpha", "7"),
            ],
        );
        let lister = SortedLister::new(&session, 1000);
        let entries = lister.list_sorted(&DirectoryId::new("5")).await.unwrap();
        assert_eq!(names(&entries), vec!["Alpha", "zeta", "alpha.mkv", "Beta.mkv"]);
    }

    #[tokio::test]
    async fn test_truncated_page_is_flagged() {
        let entries = (0..5).map(|i| Entry::file(format!("f{}", i), "x", 0)).collect();
        let session = MockSession::new().with_dir("5", entries);
        let lister = SortedLister::new(&session, 3);

        let page = lister
            .list_page(&DirectoryId::new("5"), &ListOptions::by_name(3))
            .await
            .unwrap();
        assert!(page.truncated);
        assert_eq!(names(&page.entries), vec!["f0", "f1", "f2"]);

        let page = lister
            .list_page(&DirectoryId::new("5"), &ListOptions::by_name(5))
            .await
            .unwrap();
        assert!(!page.truncated);
        assert_eq!(page.entries.len(), 5);
    }

    #[tokio::test]
    async fn test_session_failure_is_list_error() {
        let session = MockSession::new();
        let lister = SortedLister::new(&session, 1000);
        let err = lister.list_sorted(&DirectoryId::new("404")).await.unwrap_err();
        assert!(matches!(err, PanError::List { ref directory, .. } if directory == "404"));
        assert_eq!(session.list_calls(), 1);
    }
}
