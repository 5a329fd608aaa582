// HTTP-backed StorageSession for the 115 web API

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::credentials::Credential;
use super::errors::{PanError, SessionError};
use super::models::{DirectoryId, Entry, ListOptions, ListPage, PickCode, SessionConfig};
use super::traits::StorageSession;
use super::utils::build_http_client;

#[derive(Debug, Deserialize)]
struct FileListResponse {
    #[serde(default)]
    state: bool,
    #[serde(default, rename = "errNo")]
    err_no: Option<Value>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    count: Option<Value>,
    #[serde(default)]
    data: Vec<FileRecord>,
}

/// One record of a listing. Directories carry no `fid`; their own id is `cid`.
#[derive(Debug, Deserialize)]
struct FileRecord {
    #[serde(default)]
    fid: Option<Value>,
    #[serde(default)]
    cid: Option<Value>,
    #[serde(default)]
    n: String,
    #[serde(default)]
    pc: Option<String>,
    #[serde(default)]
    s: Option<Value>,
}

impl FileRecord {
    fn into_entry(self) -> Option<Entry> {
        let fid = self.fid.as_ref().and_then(value_to_string);
        match fid {
            None => {
                let cid = self.cid.as_ref().and_then(value_to_string)?;
                Some(Entry::directory(self.n, cid))
            }
            Some(_) => {
                let size = self.s.as_ref().and_then(value_to_u64).unwrap_or(0);
                Some(Entry::file(self.n, self.pc.unwrap_or_default(), size))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct DownloadResponse {
    #[serde(default)]
    state: bool,
    #[serde(default)]
    file_url: String,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    msg_code: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    #[serde(default)]
    state: bool,
    #[serde(default)]
    data: Option<UserInfo>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    #[serde(default)]
    user_id: Option<Value>,
    #[serde(default)]
    user_name: Option<String>,
}

/// Non-empty string form of a JSON string or number
fn value_to_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

fn value_to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn value_to_code(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

/// An authenticated 115 account over HTTPS
pub struct Pan115Session {
    client: reqwest::Client,
    config: SessionConfig,
}

impl Pan115Session {
    /// Load cookies, build the client and verify the login
    pub async fn connect(config: SessionConfig) -> Result<Self, PanError> {
        let credential = Credential::load(config.cookies_path.as_deref())?;
        let session = Self::with_credential(config, &credential)?;
        session.login_check().await.map_err(PanError::SessionInit)?;
        Ok(session)
    }

    /// Build a session without touching the network
    pub fn with_credential(config: SessionConfig, credential: &Credential) -> Result<Self, PanError> {
        let client =
            build_http_client(&config, &credential.cookie_header()).map_err(PanError::SessionInit)?;
        Ok(Self { client, config })
    }

    /// Fetch the account's user info; fails if the cookies are no longer valid
    pub async fn login_check(&self) -> Result<(), SessionError> {
        let body = self
            .client
            .get(&self.config.endpoints.user_info)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let resp: UserInfoResponse = serde_json::from_str(&body)?;

        match resp.data {
            Some(user) if resp.state => {
                info!(
                    "[Session] logged in as {} ({})",
                    user.user_name.as_deref().unwrap_or("?"),
                    user.user_id.as_ref().and_then(value_to_string).unwrap_or_default()
                );
                Ok(())
            }
            _ => Err(SessionError::api(
                0,
                resp.error.unwrap_or_else(|| "not logged in".to_string()),
            )),
        }
    }
}

#[async_trait]
impl StorageSession for Pan115Session {
    async fn list_children(
        &self,
        directory: &DirectoryId,
        options: &ListOptions,
    ) -> Result<ListPage, SessionError> {
        let endpoints = &self.config.endpoints;
        let url = if options.natural {
            &endpoints.natsort_files
        } else {
            &endpoints.files
        };

        let mut query: Vec<(&str, String)> = vec![
            ("aid", "1".to_string()),
            ("cid", directory.to_string()),
            ("o", options.order.api_key().to_string()),
            ("asc", if options.order.ascending() { "1" } else { "0" }.to_string()),
            ("offset", "0".to_string()),
            ("show_dir", "1".to_string()),
            ("limit", options.limit.to_string()),
            ("snap", "0".to_string()),
            ("record_open_time", "1".to_string()),
            ("format", "json".to_string()),
            ("fc_mix", "0".to_string()),
        ];
        if options.natural {
            query.push(("natsort", "1".to_string()));
        }

        debug!("[Session] GET {} cid={}", url, directory);
        let body = self
            .client
            .get(url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let resp: FileListResponse = serde_json::from_str(&body)?;

        if !resp.state {
            return Err(SessionError::api(
                value_to_code(resp.err_no.as_ref()),
                resp.error.unwrap_or_default(),
            ));
        }

        let total = resp.count.as_ref().and_then(value_to_u64);
        let entries = resp
            .data
            .into_iter()
            .filter_map(FileRecord::into_entry)
            .collect();

        Ok(ListPage { entries, total })
    }

    async fn download_link(
        &self,
        pick_code: &PickCode,
        user_agent: &str,
    ) -> Result<String, SessionError> {
        debug!("[Session] download link for {}", pick_code);
        let body = self
            .client
            .get(&self.config.endpoints.download)
            .query(&[("pickcode", pick_code.as_str())])
            .header(USER_AGENT, user_agent)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let resp: DownloadResponse = serde_json::from_str(&body)?;

        if !resp.state {
            return Err(SessionError::api(
                value_to_code(resp.msg_code.as_ref()),
                resp.msg.unwrap_or_default(),
            ));
        }
        Ok(resp.file_url)
    }

    async fn raw_get(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, SessionError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let body = request
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }

    fn manifest_url(&self, pick_code: &PickCode) -> String {
        self.config.endpoints.manifest_url(pick_code)
    }
}
