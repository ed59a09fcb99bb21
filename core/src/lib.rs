//! Async client for the logkeeper build/test metadata API.
//!
//! # Overview
//! `LogkeeperClient` turns two read queries (build metadata, test metadata)
//! into HTTP GET requests against a base URL and turns the responses back
//! into typed records. The network round-trip goes through an injectable
//! [`Transport`], so tests can substitute a fake one.
//!
//! # Design
//! - Each operation is split into `build_*` (produces an `HttpRequest`) and
//!   `parse_*` (consumes an `HttpResponse`); `fetch_*` composes the two with
//!   the transport in between.
//! - Every fetch takes a `CancellationToken`. Cancelling it before or during
//!   the call makes the call fail with `TransportError::Cancelled`.
//! - No retries, caching, or state between calls.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::{LogkeeperClient, LogkeeperClientOptions};
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport, DEFAULT_TIMEOUT};
pub use tokio_util::sync::CancellationToken;
pub use types::{Build, Test};
