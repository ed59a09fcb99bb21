//! Request builder, response parser and fetch operations for the logkeeper API.
//!
//! # Design
//! `LogkeeperClient` holds a `base_url` and a shared transport handle and
//! carries no mutable state between calls, so one client can serve
//! concurrent fetches. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`; `fetch_*` runs the request through the transport in
//! between, racing it against the caller's cancellation token.

use std::fmt;
use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{ApiError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::types::{Build, Test};

/// Characters left untouched in a path segment: RFC 3986 unreserved.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Configuration for [`LogkeeperClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogkeeperClientOptions {
    /// Root URL every request path is joined against.
    pub base_url: String,
}

/// Client for the logkeeper build and test metadata endpoints.
#[derive(Clone)]
pub struct LogkeeperClient {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for LogkeeperClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogkeeperClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl LogkeeperClient {
    /// Create a client that sends requests through a default `UreqTransport`.
    pub fn new(options: LogkeeperClientOptions) -> Self {
        Self::with_transport(options, Arc::new(UreqTransport::new()))
    }

    pub fn with_transport(options: LogkeeperClientOptions, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: options.base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_get_build_metadata(&self, build_id: &str) -> HttpRequest {
        get(format!("{}/build/{}", self.base_url, segment(build_id)))
    }

    pub fn build_get_test_metadata(&self, build_id: &str, test_id: &str) -> HttpRequest {
        get(format!(
            "{}/build/{}/test/{}",
            self.base_url,
            segment(build_id),
            segment(test_id)
        ))
    }

    pub fn parse_get_build_metadata(&self, response: HttpResponse) -> Result<Build, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_test_metadata(&self, response: HttpResponse) -> Result<Test, ApiError> {
        parse_json(response)
    }

    /// Fetch the metadata of build `build_id`, including its tests.
    pub async fn fetch_build_metadata(
        &self,
        cancel: &CancellationToken,
        build_id: &str,
    ) -> Result<Build, ApiError> {
        let response = self.send(cancel, self.build_get_build_metadata(build_id)).await?;
        self.parse_get_build_metadata(response)
    }

    /// Fetch the metadata of test `test_id` within build `build_id`.
    pub async fn fetch_test_metadata(
        &self,
        cancel: &CancellationToken,
        build_id: &str,
        test_id: &str,
    ) -> Result<Test, ApiError> {
        let response = self
            .send(cancel, self.build_get_test_metadata(build_id, test_id))
            .await?;
        self.parse_get_test_metadata(response)
    }

    async fn send(
        &self,
        cancel: &CancellationToken,
        request: HttpRequest,
    ) -> Result<HttpResponse, ApiError> {
        let url = request.url.clone();
        if cancel.is_cancelled() {
            debug!(url = %url, "cancelled before sending request");
            return Err(TransportError::Cancelled.into());
        }

        debug!(url = %url, "sending GET request");
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(url = %url, "request cancelled in flight");
                return Err(TransportError::Cancelled.into());
            }
            result = self.transport.execute(request) => result?,
        };
        debug!(url = %url, status = response.status, "received response");
        Ok(response)
    }
}

fn get(url: String) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        url,
        headers: Vec::new(),
    }
}

fn segment(id: &str) -> String {
    utf8_percent_encode(id, PATH_SEGMENT).to_string()
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response, 200)?;
    Ok(serde_json::from_str(&response.body)?)
}

/// Anything other than `expected` is a failure; redirects and errors are not
/// told apart.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    warn!(status = response.status, "unexpected response status");
    Err(ApiError::HttpStatus {
        status: response.status,
        body: response.body.clone(),
    })
}
