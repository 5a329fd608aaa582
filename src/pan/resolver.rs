// Path Resolver - walks "/a/b/c" to a directory id one level at a time
//
// The backend can only list a directory by id, so each segment costs one
// listing round trip followed by a linear scan for an exact-name directory.

use tracing::{debug, info};

use super::errors::PanError;
use super::lister::SortedLister;
use super::models::DirectoryId;

/// Split a path into its non-empty segments
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    let rest = path.strip_prefix('/').unwrap_or(path);
    rest.split('/').filter(|s| !s.is_empty())
}

pub struct PathResolver<'a> {
    lister: &'a SortedLister<'a>,
}

impl<'a> PathResolver<'a> {
    pub fn new(lister: &'a SortedLister<'a>) -> Self {
        Self { lister }
    }

    /// Resolve `path` (leading '/' optional, empty segments ignored)
    pub async fn resolve(&self, path: &str) -> Result<DirectoryId, PanError> {
        let mut current = DirectoryId::root();

        for segment in segments(path) {
            let children = self.lister.list_sorted(&current).await?;
            let next = children
                .iter()
                .filter(|entry| entry.name == segment)
                .find_map(|entry| entry.directory_id().cloned());

            match next {
                Some(id) => {
                    debug!("[Resolver] '{}' -> cid={}", segment, id);
                    current = id;
                }
                None => {
                    info!("[Resolver] no directory '{}' under cid={}", segment, current);
                    return Err(PanError::PathNotFound {
                        segment: segment.to_string(),
                    });
                }
            }
        }

        Ok(current)
    }
}
