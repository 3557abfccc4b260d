//! Self-description signing endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::models::SignedResult;
use crate::pipeline::Pipeline;

/// Request body for signing a self-description.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    /// The self-description to sign; validated by the pipeline.
    pub self_description: Value,
}

/// Creates the signing router.
pub fn router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/sign", post(sign_self_description))
        .with_state(pipeline)
}

/// POST /sign
///
/// Signs the self-description, obtains a compliance credential for it and
/// returns the signed bundle with the authority's verdict. A non-conforming
/// verdict is still a 200 response.
async fn sign_self_description(
    State(pipeline): State<Arc<Pipeline>>,
    payload: Result<Json<SignRequest>, JsonRejection>,
) -> Result<Json<SignedResult>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let result = pipeline
        .sign_self_description(request.self_description)
        .await?;

    Ok(Json(result))
}
