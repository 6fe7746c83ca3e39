use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::VERITY_STATUS_HEADER;
use crate::engine::EngineError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The claim was empty; the message is the prompt shown to the user.
    #[error("{0}")]
    NeedsInput(String),

    #[error("verification failed: {0}")]
    Engine(#[from] EngineError),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, verity_status) = match &self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::NeedsInput(_) => (StatusCode::UNPROCESSABLE_ENTITY, "needs_input"),
            GatewayError::Engine(EngineError::Scoring(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "scoring_error")
            }
            GatewayError::Engine(_) => (StatusCode::SERVICE_UNAVAILABLE, "index_error"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let mut headers = HeaderMap::new();
        headers.insert(VERITY_STATUS_HEADER, HeaderValue::from_static(verity_status));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
