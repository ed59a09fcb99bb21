//! HTTP request/response types and the transport that executes them.
//!
//! # Design
//! Requests and responses are plain owned data. The client builds an
//! `HttpRequest`, hands it to a [`Transport`], and parses the `HttpResponse`
//! it gets back. A transport only reports failures to complete the exchange;
//! any status code, including 4xx/5xx, comes back as data so the client
//! does the status interpretation.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;

/// Overall bound on a request made by `UreqTransport::new()`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP method for a request. The logkeeper API is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Executes a single HTTP exchange.
///
/// Implementations carry their own configuration (timeouts, TLS, proxies);
/// the client never reaches into it.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Default transport backed by a `ureq::Agent`.
///
/// ureq is blocking, so each call runs on tokio's blocking pool. If the
/// caller drops the future (for example on cancellation) the blocking call
/// keeps its thread and connection until the agent's timeout fires, then its
/// result is discarded. `new()` uses [`DEFAULT_TIMEOUT`] so abandoned calls
/// are always released; an agent passed to `from_agent` without a global
/// timeout can hold them for as long as the server stalls.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    timeout: Option<Duration>,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self {
            agent,
            timeout: Some(timeout),
        }
    }

    /// Wrap a caller-configured agent. The agent must have
    /// `http_status_as_error(false)` set, otherwise non-2xx responses surface
    /// as transport failures instead of `ApiError::HttpStatus`.
    pub fn from_agent(agent: ureq::Agent) -> Self {
        Self {
            agent,
            timeout: None,
        }
    }

    /// Global timeout this transport configured, `None` for `from_agent`.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(TransportError::failed)?
    }
}

fn execute_blocking(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    let mut builder = match request.method {
        HttpMethod::Get => agent.get(&request.url),
    };
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let mut response = builder.call().map_err(TransportError::failed)?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(TransportError::failed)?;

    Ok(HttpResponse { status, headers, body })
}
