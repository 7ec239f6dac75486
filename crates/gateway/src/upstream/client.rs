//! HTTPS client for the lens backend's list endpoint.

use std::{sync::Arc, time::Duration};

use axum::body::Body;
use hyper::{header, Request, Uri};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tracing::{debug, instrument};

use super::{FetchFuture, LensSource, UpstreamError, LIST_PATH};
use crate::lens::{parse_list, RawLens};

/// Largest list body accepted from the backend.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// [`LensSource`] that `GET`s `{base_url}/api/dashboard/getAllData`.
///
/// TLS uses rustls with the webpki root set; plain `http://` is accepted for
/// local backends.
#[derive(Clone)]
pub struct HttpUpstream {
    client: Client<HttpsConnector<HttpConnector>, Body>,
    list_uri: Uri,
    timeout: Duration,
}

impl std::fmt::Debug for HttpUpstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpUpstream")
            .field("list_uri", &self.list_uri)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpUpstream {
    /// Build a client for `base_url` with a whole-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::InvalidUrl`] if `base_url` does not form a
    /// valid URI, or [`UpstreamError::Tls`] if the connector cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let list_uri = list_uri(base_url)?;

        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(provider)
            .map_err(|e| UpstreamError::Tls(e.to_string()))?
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(https);

        Ok(Self {
            client,
            list_uri,
            timeout,
        })
    }

    /// The fully-resolved list endpoint.
    pub fn list_uri(&self) -> &Uri {
        &self.list_uri
    }

    #[instrument(skip(self), fields(uri = %self.list_uri))]
    async fn get_list(&self) -> Result<Vec<RawLens>, UpstreamError> {
        tokio::time::timeout(self.timeout, self.send())
            .await
            .map_err(|_| UpstreamError::Timeout(self.timeout))?
    }

    async fn send(&self) -> Result<Vec<RawLens>, UpstreamError> {
        let req = Request::get(self.list_uri.clone())
            .header(header::ACCEPT, "application/json")
            .body(Body::empty())
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let resp = self
            .client
            .request(req)
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body = axum::body::to_bytes(Body::new(resp.into_body()), MAX_BODY_BYTES)
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;
        debug!(bytes = body.len(), "lens list received");

        let payload: serde_json::Value =
            serde_json::from_slice(&body).map_err(|e| UpstreamError::Format(e.to_string()))?;
        parse_list(payload).map_err(|e| UpstreamError::Format(e.to_string()))
    }
}

impl LensSource for HttpUpstream {
    fn fetch_all(&self) -> FetchFuture<'_> {
        Box::pin(self.get_list())
    }
}

fn list_uri(base_url: &str) -> Result<Uri, UpstreamError> {
    let base = base_url.trim().trim_end_matches('/');
    let uri: Uri = format!("{base}{LIST_PATH}")
        .parse()
        .map_err(|e: hyper::http::uri::InvalidUri| UpstreamError::InvalidUrl(e.to_string()))?;
    match uri.scheme_str() {
        Some("http" | "https") if uri.host().is_some() => Ok(uri),
        _ => Err(UpstreamError::InvalidUrl(format!(
            "{base_url} must be an absolute http(s) url"
        ))),
    }
}
