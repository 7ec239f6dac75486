//! In-memory [`LensSource`] for handler and router tests.

use std::time::Duration;

use super::{FetchFuture, LensSource, UpstreamError};
use crate::lens::RawLens;

/// Serves a fixed list, or fails every fetch with a fixed HTTP status.
pub(crate) struct MemorySource {
    records: Vec<RawLens>,
    fail_status: Option<u16>,
    delay: Option<Duration>,
}

impl MemorySource {
    pub(crate) fn new(records: Vec<RawLens>) -> Self {
        Self {
            records,
            fail_status: None,
            delay: None,
        }
    }

    /// Serves `records` after sleeping for `delay`.
    pub(crate) fn slow(records: Vec<RawLens>, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(records)
        }
    }

    pub(crate) fn failing(status: u16) -> Self {
        Self {
            records: Vec::new(),
            fail_status: Some(status),
            delay: None,
        }
    }
}

impl LensSource for MemorySource {
    fn fetch_all(&self) -> FetchFuture<'_> {
        let result = match self.fail_status {
            Some(status) => Err(UpstreamError::Status(status)),
            None => Ok(self.records.clone()),
        };
        let delay = self.delay;
        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            result
        })
    }
}
