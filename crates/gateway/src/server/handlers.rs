//! Axum request handlers for all service endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    BoxError, Json,
};
use common::{
    protocol::{DecryptRequest, DecryptResponse, ErrorResponse, HealthResponse},
    ServiceError,
};
use serde_json::Value;
use tracing::{info, warn};

use super::state::AppState;
use crate::lens::{
    self,
    query::{LensQuery, ListParams},
    LensList,
};

/// `POST /decrypt` — decrypt a single field value.
///
/// Never fails on the value itself: anything that is not a decryptable
/// envelope is echoed back unchanged.
pub async fn decrypt(
    State(state): State<AppState>,
    body: Result<Json<DecryptRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(b) => b,
        Err(rej) => return error_response(ServiceError::BadRequest(rej.body_text())),
    };
    let value = state.decryptor.decrypt(&req.value);
    (StatusCode::OK, Json(DecryptResponse { value })).into_response()
}

/// `POST /lenses/decode` — decode a backend list payload supplied by the caller.
pub async fn decode_lenses(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(payload) = match body {
        Ok(b) => b,
        Err(rej) => return error_response(ServiceError::BadRequest(rej.body_text())),
    };
    let decryptor = state.decryptor.clone();
    let decoded =
        tokio::task::spawn_blocking(move || lens::decode_payload(&*decryptor, payload)).await;

    match decoded {
        Ok(Ok(data)) => (StatusCode::OK, Json(LensList { data })).into_response(),
        Ok(Err(e)) => error_response(ServiceError::BadRequest(e.to_string())),
        Err(e) => error_response(ServiceError::Internal(format!("decode task failed: {e}"))),
    }
}

/// `GET /lenses` — fetch, decode, search and paginate the backend lens list.
pub async fn list_lenses(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(p) => p,
        Err(rej) => return error_response(ServiceError::BadRequest(rej.body_text())),
    };
    let query = match LensQuery::try_from(params) {
        Ok(q) => q,
        Err(e) => return error_response(ServiceError::BadRequest(e.to_string())),
    };

    let raws = match state.source.fetch_all().await {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "failed to fetch lens list");
            return error_response(e.into());
        }
    };

    let decryptor = state.decryptor.clone();
    let decoded = tokio::task::spawn_blocking(move || {
        let lenses = lens::decode_all(&*decryptor, raws);
        query.apply(lenses)
    })
    .await;

    match decoded {
        Ok(page) => {
            info!(total = page.total, page = page.page, "lens list served");
            (StatusCode::OK, Json(page)).into_response()
        }
        Err(e) => error_response(ServiceError::Internal(format!("decode task failed: {e}"))),
    }
}

/// `GET /health` — liveness check.
pub async fn health() -> Response {
    let body = HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

/// Error handler for the router's timeout layer.
pub async fn handle_layer_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        warn!("request timed out");
        return error_response(ServiceError::Timeout(err.to_string()));
    }
    error_response(ServiceError::Internal(format!("unhandled middleware error: {err}")))
}

fn error_response(err: ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(&err))).into_response()
}
