//! Error types for the logkeeper client.
//!
//! # Design
//! Three kinds, matching where a fetch can go wrong: the request never
//! completed (`Transport`), the server answered with something other than
//! 200 (`HttpStatus`), or the body did not decode (`Decode`). None of them
//! are retried; the caller decides what to do.

use thiserror::Error;

/// Errors returned by `LogkeeperClient` parse and fetch methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or completed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server responded with a status other than 200.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The response body could not be decoded into the expected record.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Status code of an `HttpStatus` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Transport(TransportError::Cancelled))
    }
}

/// Failures raised by a [`Transport`](crate::http::Transport) or by
/// cancellation of the caller's token.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request cancelled")]
    Cancelled,

    #[error(transparent)]
    Failed(Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    pub fn failed<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        TransportError::Failed(err.into())
    }
}
