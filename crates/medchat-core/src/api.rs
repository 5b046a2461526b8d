use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ClientResult;
use crate::source::Source;
use crate::status::ServerStatus;

pub const STATUS_PATH: &str = "/api/status";
pub const HISTORY_PATH: &str = "/api/history";
pub const CHAT_PATH: &str = "/api/chat";

#[derive(Deserialize)]
struct StatusResponse {
    #[serde(default)]
    model_loaded: bool,
    #[serde(default)]
    model_type: String,
}

#[derive(Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

/// One stored question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub source: Option<Source>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Body of a chat response. The backend sets either `response` or `error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub source: Option<Source>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The three remote calls a chat session makes.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn status(&self) -> ClientResult<ServerStatus>;

    async fn history(&self) -> ClientResult<Vec<HistoryEntry>>;

    async fn chat(&self, message: &str) -> ClientResult<ChatReply>;
}

/// Backend reached over HTTP. No timeout is configured, so a request to an
/// unresponsive server waits until the connection itself fails.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.get(self.url(path)).send().await?;
        read_json(response).await
    }
}

/// Parse the body as JSON whatever the status code: error responses from the
/// backend still carry a JSON `error` field.
async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if !status.is_success() {
        log::debug!("{} answered with status {}", response.url().path(), status);
    }
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn status(&self) -> ClientResult<ServerStatus> {
        let status: StatusResponse = self.get_json(STATUS_PATH).await?;
        Ok(ServerStatus {
            model_loaded: status.model_loaded,
            model_type: status.model_type,
        })
    }

    async fn history(&self) -> ClientResult<Vec<HistoryEntry>> {
        let history: HistoryResponse = self.get_json(HISTORY_PATH).await?;
        Ok(history.history)
    }

    async fn chat(&self, message: &str) -> ClientResult<ChatReply> {
        let response = self
            .client
            .post(self.url(CHAT_PATH))
            .json(&ChatRequest { message })
            .send()
            .await?;
        read_json(response).await
    }
}
