use docqa_logging::{docqa_debug, docqa_info, docqa_warn};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::stream::settle;
use crate::types::map_reqwest_error;
use crate::{
    is_event_stream, BackendError, BackendSettings, EngineEvent, ProcessRequest, ProcessResult,
    ProcessingStream, QueryRequest, QueryResponse, StatsResponse,
};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// The three calls the client makes against the question-answering backend.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn stats(&self) -> Result<StatsResponse, BackendError>;

    /// Sends document text for chunking; progress goes to `sink` as it streams in.
    async fn process(
        &self,
        text: &str,
        sink: &dyn ProgressSink,
    ) -> Result<ProcessResult, BackendError>;

    async fn query(&self, query: &str) -> Result<QueryResponse, BackendError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| BackendError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }

    async fn post_json(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<reqwest::Response, BackendError> {
        let url = self.settings.endpoint(path);
        let payload =
            serde_json::to_vec(body).map_err(|err| BackendError::InvalidResponse(err.to_string()))?;
        docqa_debug!("POST {} ({} bytes)", url, payload.len());
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "text/event-stream, application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        docqa_info!("POST {} -> {}", url, response.status());
        Ok(response)
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn stats(&self) -> Result<StatsResponse, BackendError> {
        let url = self.settings.endpoint("stats");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        docqa_info!("GET {} -> {}", url, status);
        if !status.is_success() {
            return Err(BackendError::HttpStatus(status.as_u16()));
        }
        read_json(response).await
    }

    async fn process(
        &self,
        text: &str,
        sink: &dyn ProgressSink,
    ) -> Result<ProcessResult, BackendError> {
        let request = ProcessRequest {
            text,
            strategy: &self.settings.strategy,
        };
        let response = self.post_json("process", &request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::HttpStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if !is_event_stream(content_type.as_deref()) && self.settings.stream_fallback {
            docqa_info!(
                "process answered with {:?}; reading a single JSON result",
                content_type
            );
            let result: ProcessResult = read_json(response).await?;
            return settle(Some(result));
        }

        let mut stream = ProcessingStream::new();
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            stream.feed(&chunk, sink)?;
        }
        stream.finish(sink)
    }

    async fn query(&self, query: &str) -> Result<QueryResponse, BackendError> {
        let response = self.post_json("query", &QueryRequest { query }).await?;
        let status = response.status();
        // Failed answers still carry a JSON body worth showing.
        match read_json::<QueryResponse>(response).await {
            Ok(answer) => Ok(answer),
            Err(err) if status.is_success() => Err(err),
            Err(err) => {
                docqa_warn!("query failed with {} and unreadable body: {}", status, err);
                Err(BackendError::HttpStatus(status.as_u16()))
            }
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&bytes).map_err(|err| BackendError::InvalidResponse(err.to_string()))
}
