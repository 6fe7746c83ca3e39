use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::error::GatewayError;
use super::state::HandlerState;
use super::{VERITY_STATUS_HEADER, VERITY_VERDICT_HEADER};
use crate::engine::{SyncSummary, Verification};
use crate::sync::RecordSource;
use crate::vectordb::VectorIndex;

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub claim: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SyncRequest {
    #[serde(default)]
    pub window: Option<usize>,
}

#[instrument(skip(state, request))]
pub async fn verify_handler<I, S>(
    State(state): State<HandlerState<I, S>>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, GatewayError>
where
    I: VectorIndex + 'static,
    S: RecordSource + 'static,
{
    let request: VerifyRequest = serde_json::from_value(request)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))?;

    match state.checker.verify(&request.claim).await? {
        Verification::NeedsInput { prompt } => Err(GatewayError::NeedsInput(prompt)),
        Verification::Completed(result) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                VERITY_VERDICT_HEADER,
                HeaderValue::from_static(result.verdict.as_str()),
            );
            Ok((StatusCode::OK, headers, Json(result)).into_response())
        }
    }
}

/// Runs a sync. The body is optional; `{"window": n}` overrides the window.
#[instrument(skip(state, body))]
pub async fn sync_handler<I, S>(
    State(state): State<HandlerState<I, S>>,
    body: Bytes,
) -> Result<Response, GatewayError>
where
    I: VectorIndex + 'static,
    S: RecordSource + 'static,
{
    let request: SyncRequest = if body.iter().all(u8::is_ascii_whitespace) {
        SyncRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))?
    };

    let window = request
        .window
        .unwrap_or_else(|| state.checker.default_window());
    if i64::try_from(window).is_err() {
        return Err(GatewayError::InvalidRequest(format!(
            "window must be at most {}",
            i64::MAX
        )));
    }
    debug!(window, "Sync requested");

    let report = state.checker.sync_window(window).await?;
    let status = if report.is_partial() {
        "partial"
    } else {
        "synced"
    };

    let mut headers = HeaderMap::new();
    headers.insert(VERITY_STATUS_HEADER, HeaderValue::from_static(status));

    Ok((StatusCode::OK, headers, Json(SyncSummary::from(&report))).into_response())
}
