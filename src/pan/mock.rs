// In-memory StorageSession for unit tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::errors::SessionError;
use super::models::{DirectoryId, Entry, ListOptions, ListPage, PickCode};
use super::traits::StorageSession;

#[derive(Default)]
pub struct MockSession {
    children: HashMap<String, Vec<Entry>>,
    links: HashMap<String, String>,
    manifests: HashMap<String, String>,
    pub list_calls: AtomicUsize,
    pub seen_options: Mutex<Vec<ListOptions>>,
    pub seen_user_agents: Mutex<Vec<String>>,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Children of `dir`, in the order the "backend" returns them
    pub fn with_dir(mut self, dir: &str, entries: Vec<Entry>) -> Self {
        self.children.insert(dir.to_string(), entries);
        self
    }

    pub fn with_link(mut self, pick_code: &str, url: &str) -> Self {
        self.links.insert(pick_code.to_string(), url.to_string());
        self
    }

    pub fn with_manifest(mut self, pick_code: &str, body: &str) -> Self {
        let url = self.manifest_url(&PickCode::new(pick_code));
        self.manifests.insert(url, body.to_string());
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Sample drive:
    ///
    /// ```text
    /// /
    /// ├── Movies/            (10)
    /// │   ├── Action/        (11)
    /// │   │   └── Heat.mkv
    /// │   ├── movie.mp4
    /// │   └── Movies/        (12)
    /// ├── a/                 (20)
    /// │   └── b/             (21)
    /// └── readme.txt
    /// ```
    pub fn sample() -> Self {
        Self::new()
            .with_dir(
                "0",
                vec![
                    Entry::file("readme.txt", "pc_readme", 12),
                    Entry::directory("a", "20"),
                    Entry::directory("Movies", "10"),
                ],
            )
            .with_dir(
                "10",
                vec![
                    Entry::file("movie.mp4", "pc_movie", 1_000),
                    Entry::directory("Action", "11"),
                    Entry::directory("Movies", "12"),
                ],
            )
            .with_dir("11", vec![Entry::file("Heat.mkv", "pc_heat", 2_000)])
            .with_dir("12", vec![])
            .with_dir("20", vec![Entry::directory("b", "21")])
            .with_dir("21", vec![])
    }
}

#[async_trait]
impl StorageSession for MockSession {
    async fn list_children(
        &self,
        directory: &DirectoryId,
        options: &ListOptions,
    ) -> Result<ListPage, SessionError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen_options.lock() {
            seen.push(options.clone());
        }
        let all = self
            .children
            .get(directory.as_str())
            .ok_or_else(|| SessionError::api(20130827, "no such directory"))?;
        Ok(ListPage {
            entries: all.iter().take(options.limit as usize).cloned().collect(),
            total: Some(all.len() as u64),
        })
    }

    async fn download_link(
        &self,
        pick_code: &PickCode,
        user_agent: &str,
    ) -> Result<String, SessionError> {
        if let Ok(mut seen) = self.seen_user_agents.lock() {
            seen.push(user_agent.to_string());
        }
        self.links
            .get(pick_code.as_str())
            .cloned()
            .ok_or_else(|| SessionError::api(50003, "file not available"))
    }

    async fn raw_get(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, SessionError> {
        if let Some((_, ua)) = headers.iter().find(|(k, _)| k.eq_ignore_ascii_case("user-agent")) {
            if let Ok(mut seen) = self.seen_user_agents.lock() {
                seen.push(ua.to_string());
            }
        }
        self.manifests
            .get(url)
            .cloned()
            .ok_or_else(|| SessionError::api(404, "not found"))
    }

    fn manifest_url(&self, pick_code: &PickCode) -> String {
        format!("mock://m3u8/{}.m3u8", pick_code)
    }
}
