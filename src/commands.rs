// Action handlers: list, play, get-streams
//
// Each handler borrows the session, does its round trips sequentially and
// returns a serializable response. Errors bubble up as PanError and are
// rendered by the binary.

use serde::Serialize;
use tracing::info;

use crate::pan::utils::{file_stem, parent_dir, split_extension};
use crate::pan::{
    Entry, EntryKind, FileLocator, ListOptions, ListOrder, PanError, PathResolver, QualityRanker,
    SortedLister, StorageSession, StreamCandidate, StreamCollector,
};

/// A validated action, ready to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List { path: String, order: ListOrder },
    Play { path: String },
    GetStreams { path: String },
}

impl Command {
    /// Validate raw CLI input. Runs before any session is created.
    pub fn parse(
        action: Option<&str>,
        path: Option<&str>,
        sort: Option<&str>,
    ) -> Result<Self, PanError> {
        let path = path.filter(|p| !p.is_empty());
        let action = action
            .filter(|a| !a.is_empty())
            .ok_or_else(|| PanError::Usage("the --action argument is required".to_string()))?;

        match action {
            "list" => {
                let order = match sort.filter(|s| !s.is_empty()) {
                    None => ListOrder::default(),
                    Some(s) => <ListOrder as clap::ValueEnum>::from_str(s, true).map_err(|_| {
                        PanError::Usage(format!(
                            "unknown sort '{}', expected name, time, size or type",
                            s
                        ))
                    })?,
                };
                Ok(Self::List {
                    path: path.unwrap_or("/").to_string(),
                    order,
                })
            }
            "play" => Ok(Self::Play {
                path: require_path(action, path)?,
            }),
            "get-streams" => Ok(Self::GetStreams {
                path: require_path(action, path)?,
            }),
            other => Err(PanError::Usage(format!("unknown action: {}", other))),
        }
    }
}

fn require_path(action: &str, path: Option<&str>) -> Result<String, PanError> {
    path.map(str::to_string)
        .ok_or_else(|| PanError::Usage(format!("the {} action requires --path", action)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    File,
    Dir,
}

/// One row of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_no_ext: Option<String>,
    /// Bytes; files only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl From<&Entry> for ListItem {
    fn from(entry: &Entry) -> Self {
        match entry.kind {
            EntryKind::Directory { .. } => Self {
                name: format!("{}/", entry.name),
                item_type: ItemType::Dir,
                extension: None,
                name_no_ext: None,
                size: None,
            },
            EntryKind::File { size, .. } => {
                let (stem, extension) = split_extension(&entry.name);
                Self {
                    name: entry.name.clone(),
                    item_type: ItemType::File,
                    extension: extension.filter(|e| !e.is_empty()),
                    name_no_ext: Some(stem.to_string()).filter(|s| !s.is_empty()),
                    size: Some(size),
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Serialize)]
pub struct PlayResponse {
    pub success: bool,
    pub url: String,
    pub user_agent: String,
    pub dir_path: String,
    pub filename_no_ext: String,
}

#[derive(Debug, Serialize)]
pub struct StreamsResponse {
    pub success: bool,
    pub streams: Vec<StreamCandidate>,
    pub user_agent: String,
    pub dir_path: String,
    pub filename_no_ext: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl From<&PanError> for ErrorResponse {
    fn from(err: &PanError) -> Self {
        Self {
            success: false,
            error: err.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Response {
    List(ListResponse),
    Play(PlayResponse),
    Streams(StreamsResponse),
}

/// Per-invocation settings the handlers need
#[derive(Debug, Clone)]
pub struct Context {
    pub user_agent: String,
    pub list_limit: u32,
}

pub async fn execute(
    session: &dyn StorageSession,
    command: &Command,
    ctx: &Context,
) -> Result<Response, PanError> {
    match command {
        Command::List { path, order } => handle_list(session, path, *order, ctx)
            .await
            .map(Response::List),
        Command::Play { path } => handle_play(session, path, ctx).await.map(Response::Play),
        Command::GetStreams { path } => handle_get_streams(session, path, ctx)
            .await
            .map(Response::Streams),
    }
}

pub async fn handle_list(
    session: &dyn StorageSession,
    path: &str,
    order: ListOrder,
    ctx: &Context,
) -> Result<ListResponse, PanError> {
    let lister = SortedLister::new(session, ctx.list_limit);
    let dir_id = PathResolver::new(&lister).resolve(path).await?;
    let options = ListOptions::with_order(order, ctx.list_limit);
    let entries = lister.list(&dir_id, &options).await?;

    info!("[list] {} -> cid={} ({} entries)", path, dir_id, entries.len());
    Ok(ListResponse {
        success: true,
        items: entries.iter().map(ListItem::from).collect(),
    })
}

pub async fn handle_play(
    session: &dyn StorageSession,
    path: &str,
    ctx: &Context,
) -> Result<PlayResponse, PanError> {
    let lister = SortedLister::new(session, ctx.list_limit);
    let entry = FileLocator::new(&lister).locate(path).await?;
    let pick_code = entry
        .pick_code()
        .ok_or_else(|| PanError::FileNotFound(entry.name.clone()))?;

    let url = session
        .download_link(pick_code, &ctx.user_agent)
        .await
        .map_err(PanError::DownloadLink)?;

    Ok(PlayResponse {
        success: true,
        url,
        user_agent: ctx.user_agent.clone(),
        dir_path: parent_dir(path),
        filename_no_ext: file_stem(path).to_string(),
    })
}

pub async fn handle_get_streams(
    session: &dyn StorageSession,
    path: &str,
    ctx: &Context,
) -> Result<StreamsResponse, PanError> {
    let lister = SortedLister::new(session, ctx.list_limit);
    let entry = FileLocator::new(&lister).locate(path).await?;
    let pick_code = entry
        .pick_code()
        .ok_or_else(|| PanError::FileNotFound(entry.name.clone()))?;

    let streams = StreamCollector::with_default_sources()
        .collect_streams(session, pick_code, &ctx.user_agent)
        .await?;
    let streams = QualityRanker::rank(streams);

    info!("[get-streams] {} -> {} stream(s)", path, streams.len());
    Ok(StreamsResponse {
        success: true,
        streams,
        user_agent: ctx.user_agent.clone(),
        dir_path: parent_dir(path),
        filename_no_ext: file_stem(path).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pan::mock::MockSession;
    use serde_json::json;

    fn ctx() -> Context {
        Context {
            user_agent: "UA/test".to_string(),
            list_limit: 1000,
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse(Some("list"), None, None).unwrap(),
            Command::List {
                path: "/".to_string(),
                order: ListOrder::Time
            }
        );
        assert_eq!(
            Command::parse(Some("list"), Some("/a"), Some("NAME")).unwrap(),
            Command::List {
                path: "/a".to_string(),
                order: ListOrder::Name
            }
        );
        assert_eq!(
            Command::parse(Some("get-streams"), Some("/a/b.mkv"), None).unwrap(),
            Command::GetStreams {
                path: "/a/b.mkv".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            Command::parse(None, None, None),
            Err(PanError::Usage(_))
        ));
        assert!(matches!(
            Command::parse(Some("delete"), Some("/x"), None),
            Err(PanError::Usage(ref m)) if m.contains("delete")
        ));
        assert!(matches!(
            Command::parse(Some("play"), Some(""), None),
            Err(PanError::Usage(_))
        ));
        assert!(matches!(
            Command::parse(Some("list"), None, Some("color")),
            Err(PanError::Usage(_))
        ));
    }

    #[test]
    fn test_list_item_json() {
        let dir = serde_json::to_value(ListItem::from(&Entry::directory("Movies", "1"))).unwrap();
        assert_eq!(dir, json!({"name": "Movies/", "type": "dir"}));

        let file = serde_json::to_value(ListItem::from(&Entry::file("Heat.MKV", "p", 1))).unwrap();
        assert_eq!(
            file,
            json!({
                "name": "Heat.MKV",
                "type": "file",
                "extension": "mkv",
                "name_no_ext": "Heat",
                "size": 1
            })
        );

        let bare = serde_json::to_value(ListItem::from(&Entry::file("README", "p", 0))).unwrap();
        assert_eq!(
            bare,
            json!({"name": "README", "type": "file", "name_no_ext": "README", "size": 0})
        );
    }

    #[tokio::test]
    async fn test_list_by_name() {
        let session = MockSession::sample();
        let resp = handle_list(&session, "/", ListOrder::Name, &ctx()).await.unwrap();
        let names: Vec<&str> = resp.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a/", "Movies/", "readme.txt"]);
    }

    #[tokio::test]
    async fn test_list_missing_path() {
        let session = MockSession::sample();
        let err = handle_list(&session, "/nope", ListOrder::Time, &ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, PanError::PathNotFound { .. }));
    }

    #[tokio::test]
    async fn test_play() {
        let session = MockSession::sample().with_link("pc_heat", "https://cdn/heat.mkv");
        let resp = handle_play(&session, "/Movies/Action/Heat.mkv", &ctx())
            .await
            .unwrap();
        assert_eq!(resp.url, "https://cdn/heat.mkv");
        assert_eq!(resp.user_agent, "UA/test");
        assert_eq!(resp.dir_path, "/Movies/Action");
        assert_eq!(resp.filename_no_ext, "Heat");
    }

    #[tokio::test]
    async fn test_play_link_failure() {
        let session = MockSession::sample();
        let err = handle_play(&session, "/readme.txt", &ctx()).await.unwrap_err();
        assert!(matches!(err, PanError::DownloadLink(_)));
    }

    #[tokio::test]
    async fn test_get_streams_ranked() {
        let master = "#EXTM3U\n\
            #EXT-X-STREAM-INF:RESOLUTION=1280x720\nhttps://cdn/720.m3u8\n\
            #EXT-X-STREAM-INF:BANDWIDTH=1\nhttps://cdn/x.m3u8\n\
            #EXT-X-STREAM-INF:RESOLUTION=1920x1080\nhttps://cdn/1080.m3u8\n";
        let session = MockSession::sample()
            .with_link("pc_movie", "https://cdn/movie.mp4")
            .with_manifest("pc_movie", master);

        let resp = handle_get_streams(&session, "/Movies/movie.mp4", &ctx())
            .await
            .unwrap();
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            json,
            json!({
                "success": true,
                "streams": [
                    {"quality": "Source", "url": "https://cdn/movie.mp4", "is_m3u8": false},
                    {"quality": "1080p", "url": "https://cdn/1080.m3u8", "is_m3u8": true},
                    {"quality": "720p", "url": "https://cdn/720.m3u8", "is_m3u8": true},
                    {"quality": "Unknown", "url": "https://cdn/x.m3u8", "is_m3u8": true}
                ],
                "user_agent": "UA/test",
                "dir_path": "/Movies",
                "filename_no_ext": "movie"
            })
        );
    }

    #[tokio::test]
    async fn test_get_streams_none() {
        let session = MockSession::sample();
        let err = handle_get_streams(&session, "/Movies/movie.mp4", &ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, PanError::NoStreamsFound));
    }

    #[test]
    fn test_error_response() {
        let resp = ErrorResponse::from(&PanError::InvalidPath("movie.mp4".to_string()));
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({"success": false, "error": "invalid file path: movie.mp4"})
        );
    }
}
