//! Error types for the selfsign server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::pipeline::PipelineError;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

fn error_body(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => error_body(StatusCode::BAD_REQUEST, msg),
            AppError::Pipeline(PipelineError::MalformedDocument(e)) => {
                error_body(StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::Pipeline(PipelineError::Collaborator(e)) => match e.payload() {
                // The authority's own error detail is passed through untouched
                Some(payload) => (StatusCode::BAD_REQUEST, Json(payload)).into_response(),
                None => {
                    tracing::error!("Collaborator error: {}", e);
                    let status = if e.is_timeout() {
                        StatusCode::GATEWAY_TIMEOUT
                    } else {
                        StatusCode::BAD_GATEWAY
                    };
                    error_body(status, e.to_string())
                }
            },
            AppError::Pipeline(e @ PipelineError::Signing(_))
            | AppError::Pipeline(e @ PipelineError::LocalVerification(_)) => {
                tracing::error!("Internal error: {}", e);
                error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}
