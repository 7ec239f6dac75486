//! Axum middleware layers applied to the router.
//!
//! Includes request tracing, timeout enforcement, response compression, and
//! a request body cap.

use std::time::Duration;

/// Default per-request timeout applied to all routes.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest request body accepted, sized for a full lens list on `POST /lenses/decode`.
pub const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024 * 1024;
