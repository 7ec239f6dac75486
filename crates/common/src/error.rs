//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::Timeout`] → 408
/// - [`ServiceError::Upstream`] → 502
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: invalid JSON, wrong payload shape, or a bad query parameter.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The request did not complete within the configured time budget.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The lens backend could not be reached or returned an unusable response.
    #[error("upstream failure: {0}")]
    Upstream(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::Timeout(_) => 408,
            ServiceError::Upstream(_) => 502,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code used in [`crate::protocol::ErrorResponse`].
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::Timeout(_) => "request_timeout",
            ServiceError::Upstream(_) => "bad_gateway",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::BadRequest("x".into()).http_status(), 400);
        assert_eq!(ServiceError::Timeout("x".into()).http_status(), 408);
        assert_eq!(ServiceError::Upstream("x".into()).http_status(), 502);
        assert_eq!(ServiceError::Internal("x".into()).http_status(), 500);
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(ServiceError::BadRequest("x".into()).code(), "bad_request");
        assert_eq!(ServiceError::Timeout("x".into()).code(), "request_timeout");
        assert_eq!(ServiceError::Upstream("x".into()).code(), "bad_gateway");
        assert_eq!(ServiceError::Internal("x".into()).code(), "internal_error");
    }

    #[test]
    fn display_includes_message() {
        let e = ServiceError::Upstream("status 503".into());
        assert!(e.to_string().contains("status 503"));
    }
}
