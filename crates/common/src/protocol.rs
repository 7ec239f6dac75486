//! Request and response types exchanged over the public HTTP API.
//!
//! Lens records themselves are defined next to the decoding logic in the
//! gateway crate; this module only carries the envelope-level and
//! bookkeeping bodies.

use serde::{Deserialize, Serialize};

use crate::ServiceError;

// ---------------------------------------------------------------------------
// Decrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /decrypt`.
///
/// `value` is either a JSON-encoded envelope string or any other string,
/// which is passed through unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptRequest {
    /// Field value as received from the lens backend.
    pub value: String,
}

/// Successful response body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    /// Recovered plaintext, or the original value when it was not a decryptable envelope.
    pub value: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&ServiceError> for ErrorResponse {
    fn from(err: &ServiceError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status, always `"ok"` while the process is serving.
    pub status: String,
    /// Crate version of the running binary.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrypt_request_uses_value_field() {
        let req: DecryptRequest = serde_json::from_str(r#"{"value":"plain"}"#).unwrap();
        assert_eq!(req.value, "plain");
    }

    #[test]
    fn error_response_from_service_error() {
        let e = ErrorResponse::from(&ServiceError::BadRequest("missing data array".into()));
        assert_eq!(e.code, "bad_request");
        assert!(e.message.contains("missing data array"));
    }

    #[test]
    fn health_response_serde() {
        let h = HealthResponse {
            status: "ok".into(),
            version: "0.1.0".into(),
        };
        let json = serde_json::to_string(&h).unwrap();
        let decoded: HealthResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.status, "ok");
    }
}
