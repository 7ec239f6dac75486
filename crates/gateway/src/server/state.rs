//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::crypto::FieldDecryptor;
use crate::upstream::LensSource;

/// Application state shared across all request handlers.
///
/// Everything here is immutable and `Arc`-wrapped, so Axum can clone the
/// state per request without copying anything expensive.
#[derive(Clone)]
pub struct AppState {
    /// Stateless envelope decryptor.
    pub decryptor: Arc<FieldDecryptor>,
    /// Where `GET /lenses` reads raw records from.
    pub source: Arc<dyn LensSource>,
}

impl AppState {
    /// Create a new [`AppState`] reading lenses from `source`.
    pub fn new(source: Arc<dyn LensSource>) -> Self {
        Self {
            decryptor: Arc::new(FieldDecryptor::new()),
            source,
        }
    }
}
