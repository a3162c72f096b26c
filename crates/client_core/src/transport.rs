//! HTTP client for the agent backend.

use std::fmt;

use async_trait::async_trait;
use futures::{
    stream::{self, BoxStream},
    StreamExt,
};
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use shared::{
    domain::{AgentKind, InputState},
    error::ApiError,
    protocol::{AgentRequest, HealthResponse, OrchestrateRequest, OrchestrateStreamQuery},
};
use tracing::{debug, warn};
use url::Url;

use crate::{config::ClientSettings, error::InvokeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Agent(AgentKind),
    Orchestrate,
}

impl Endpoint {
    fn route(self) -> &'static str {
        match self {
            Endpoint::Agent(kind) => kind.route(),
            Endpoint::Orchestrate => "orchestrate",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}

/// Network seam used by the session controller.
#[async_trait]
pub trait AgentTransport: Send + Sync {
    async fn call_agent(&self, request: &AgentRequest) -> Result<Value, InvokeError>;
    async fn orchestrate(&self, request: &OrchestrateRequest) -> Result<Value, InvokeError>;
    async fn health(&self) -> Result<String, InvokeError>;
}

pub struct HttpAgentClient {
    http: Client,
    server_url: String,
    api_prefix: String,
}

impl HttpAgentClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, InvokeError> {
        let parsed = Url::parse(settings.server_url.trim())
            .map_err(|err| InvokeError::InvalidEndpoint(format!("{}: {err}", settings.server_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(InvokeError::InvalidEndpoint(format!(
                "{}: unsupported scheme '{}'",
                settings.server_url,
                parsed.scheme()
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| InvokeError::Network(format!("failed to build http client: {err}")))?;

        Ok(Self {
            http,
            server_url: settings.server_url.trim().trim_end_matches('/').to_string(),
            api_prefix: normalize_prefix(&settings.api_prefix),
        })
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}/{}", self.server_url, self.api_prefix, endpoint.route())
    }

    /// POSTs `body` as JSON and returns the decoded response payload unchanged.
    pub async fn call<B>(&self, endpoint: Endpoint, body: &B) -> Result<Value, InvokeError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.endpoint_url(endpoint);
        debug!(%endpoint, %url, "posting agent request");
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(InvokeError::from_reqwest)?;
        let response = ensure_success(endpoint, response).await?;
        let bytes = response.bytes().await.map_err(InvokeError::from_reqwest)?;
        serde_json::from_slice(&bytes).map_err(|err| {
            warn!(%endpoint, "agent response is not valid json: {err}");
            InvokeError::Decode(err.to_string())
        })
    }

    /// Line-by-line progress of a streamed orchestration run.
    pub async fn stream_orchestration(
        &self,
        input: &InputState,
    ) -> Result<BoxStream<'static, Result<String, InvokeError>>, InvokeError> {
        let url = format!("{}{}/orchestrate-stream", self.server_url, self.api_prefix);
        debug!(%url, input_type = %input.input_type, "opening orchestration stream");
        let response = self
            .http
            .get(&url)
            .query(&OrchestrateStreamQuery {
                input_type: input.input_type,
                input_data: input.input_data.clone(),
            })
            .send()
            .await
            .map_err(InvokeError::from_reqwest)?;
        let response = ensure_success(Endpoint::Orchestrate, response).await?;

        let chunks = response.bytes_stream().boxed();
        let lines = stream::unfold(
            (chunks, LineBuffer::default(), false),
            |(mut chunks, mut buffer, mut finished)| async move {
                loop {
                    if let Some(line) = buffer.next_line() {
                        return Some((Ok(line), (chunks, buffer, finished)));
                    }
                    if finished {
                        return buffer.finish().map(|rest| (Ok(rest), (chunks, buffer, true)));
                    }
                    match chunks.next().await {
                        Some(Ok(bytes)) => buffer.push(&bytes),
                        Some(Err(err)) => {
                            return Some((
                                Err(InvokeError::from_reqwest(err)),
                                (chunks, buffer, true),
                            ));
                        }
                        None => finished = true,
                    }
                }
            },
        );
        Ok(lines.boxed())
    }
}

#[async_trait]
impl AgentTransport for HttpAgentClient {
    async fn call_agent(&self, request: &AgentRequest) -> Result<Value, InvokeError> {
        self.call(Endpoint::Agent(request.agent()), request).await
    }

    async fn orchestrate(&self, request: &OrchestrateRequest) -> Result<Value, InvokeError> {
        self.call(Endpoint::Orchestrate, request).await
    }

    async fn health(&self) -> Result<String, InvokeError> {
        let url = format!("{}/", self.server_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(InvokeError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(InvokeError::Transport {
                status: response.status().as_u16(),
                detail: None,
            });
        }
        let body: HealthResponse = response.json().await.map_err(InvokeError::from_reqwest)?;
        Ok(body.message)
    }
}

async fn ensure_success(endpoint: Endpoint, response: Response) -> Result<Response, InvokeError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let api_error = ApiError::from_response(status.as_u16(), &body);
    warn!(
        %endpoint,
        status = status.as_u16(),
        code = ?api_error.code,
        "agent endpoint returned an error"
    );
    Err(InvokeError::Transport {
        status: status.as_u16(),
        detail: (!api_error.message.is_empty()).then_some(api_error.message),
    })
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    fn next_line(&mut self) -> Option<String> {
        let newline = self.pending.iter().position(|b| *b == b'\n')?;
        let mut line: Vec<u8> = self.pending.drain(..=newline).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}
