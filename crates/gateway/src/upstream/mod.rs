//! Source of raw lens records.
//!
//! Handlers depend on [`LensSource`] rather than on the HTTP client so that
//! routing and decoding can be exercised against an in-memory list.

pub mod client;
#[cfg(test)]
pub(crate) mod memory;

pub use client::HttpUpstream;

use std::{future::Future, pin::Pin, time::Duration};

use common::ServiceError;
use thiserror::Error;

use crate::lens::RawLens;

/// Path of the backend endpoint that lists every lens.
pub const LIST_PATH: &str = "/api/dashboard/getAllData";

/// Errors produced while fetching the lens list.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The configured base URL does not form a valid request URI.
    #[error("invalid upstream url: {0}")]
    InvalidUrl(String),

    /// The TLS connector could not be built.
    #[error("tls setup failed: {0}")]
    Tls(String),

    /// Connecting, sending, or reading the body failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend did not answer within the configured timeout.
    #[error("upstream timed out after {0:?}")]
    Timeout(Duration),

    /// The backend answered with a non-2xx status.
    #[error("upstream returned HTTP {0}")]
    Status(u16),

    /// The body was not a `{ "data": [...] }` list payload.
    #[error("unexpected response format: {0}")]
    Format(String),
}

impl From<UpstreamError> for ServiceError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::InvalidUrl(_) | UpstreamError::Tls(_) => {
                ServiceError::Internal(err.to_string())
            }
            _ => ServiceError::Upstream(err.to_string()),
        }
    }
}

/// Boxed future returned by [`LensSource::fetch_all`].
pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<RawLens>, UpstreamError>> + Send + 'a>>;

/// Anything that can produce the current raw lens list.
pub trait LensSource: Send + Sync {
    /// Fetch every raw lens record.
    fn fetch_all(&self) -> FetchFuture<'_>;
}
