// File Locator - "/dir/sub/file.mkv" to the file's Entry

use tracing::debug;

use super::errors::PanError;
use super::lister::SortedLister;
use super::models::Entry;
use super::resolver::PathResolver;

/// Split a file path at its last '/' into (directory path, file name).
/// An empty directory part means the root.
pub fn split_file_path(file_path: &str) -> Result<(&str, &str), PanError> {
    let (dir, name) = file_path
        .rsplit_once('/')
        .ok_or_else(|| PanError::InvalidPath(file_path.to_string()))?;
    Ok((if dir.is_empty() { "/" } else { dir }, name))
}

pub struct FileLocator<'a> {
    lister: &'a SortedLister<'a>,
}

impl<'a> FileLocator<'a> {
    pub fn new(lister: &'a SortedLister<'a>) -> Self {
        Self { lister }
    }

    pub async fn locate(&self, file_path: &str) -> Result<Entry, PanError> {
        let (dir_path, file_name) = split_file_path(file_path)?;

        let dir_id = PathResolver::new(self.lister).resolve(dir_path).await?;
        let children = self.lister.list_sorted(&dir_id).await?;

        let entry = children
            .into_iter()
            .find(|entry| !entry.is_directory() && entry.name == file_name)
            .ok_or_else(|| PanError::FileNotFound(file_name.to_string()))?;

        debug!("[Locator] {} -> {:?}", file_path, entry.pick_code());
        Ok(entry)
    }
}
