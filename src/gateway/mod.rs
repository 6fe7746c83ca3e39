//! HTTP gateway (Axum) for claim verification and index sync.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{sync_handler, verify_handler};
pub use state::HandlerState;

use crate::sync::RecordSource;
use crate::vectordb::VectorIndex;

pub const VERITY_STATUS_HEADER: &str = "X-Verity-Status";
pub const VERITY_VERDICT_HEADER: &str = "X-Verity-Verdict";

pub const VERITY_STATUS_HEALTHY: &str = "healthy";
pub const VERITY_STATUS_READY: &str = "ready";
pub const VERITY_STATUS_NOT_READY: &str = "not_ready";

pub fn create_router_with_state<I, S>(state: HandlerState<I, S>) -> Router
where
    I: VectorIndex + 'static,
    S: RecordSource + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<I, S>))
        .route("/v1/verify", post(verify_handler::<I, S>))
        .route("/v1/sync", post(sync_handler::<I, S>))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub collection: String,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub vectordb: &'static str,
    pub embedder_mode: &'static str,
    pub nli_mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        VERITY_STATUS_HEADER,
        HeaderValue::from_static(VERITY_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<I, S>(State(state): State<HandlerState<I, S>>) -> Response
where
    I: VectorIndex + 'static,
    S: RecordSource + 'static,
{
    let status = state.checker.status().await;

    let components = ComponentStatus {
        http: VERITY_STATUS_READY,
        vectordb: if status.index_ready {
            VERITY_STATUS_READY
        } else {
            VERITY_STATUS_NOT_READY
        },
        embedder_mode: status.embedder_mode,
        nli_mode: if status.nli_model_loaded {
            "model"
        } else {
            "stub"
        },
    };

    let (status_code, status_msg) = if status.index_ready {
        (StatusCode::OK, VERITY_STATUS_READY)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, VERITY_STATUS_NOT_READY)
    };

    let mut headers = HeaderMap::new();
    headers.insert(VERITY_STATUS_HEADER, HeaderValue::from_static(status_msg));

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            collection: status.collection,
            components,
        }),
    )
        .into_response()
}
