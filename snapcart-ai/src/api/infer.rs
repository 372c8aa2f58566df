//! Photo → search term inference endpoint
//!
//! `POST /api/infer?variant=quick|catalog` with the raw image bytes as body.
//! The image is decoded off the async runtime, then handed to the shared
//! pipeline for the requested variant. A dropped request drops the pipeline
//! future, which aborts the in-flight recognizers.

use axum::{
    body::Bytes,
    extract::{Query, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::services::StoreLink;
use crate::types::{InferenceOutcome, ProductCategory};
use crate::utils::decode_image_blocking;
use crate::AppState;

/// Pipeline variant selected by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Search phrase only (cutoff 3)
    #[default]
    Quick,
    /// Search phrase plus category guess (cutoff 5)
    Catalog,
}

#[derive(Debug, Default, Deserialize)]
pub struct InferParams {
    #[serde(default)]
    pub variant: Variant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InferStatus {
    Detected,
    NoTermDetected,
}

/// Inference response
#[derive(Debug, Serialize)]
pub struct InferResponse {
    pub status: InferStatus,
    pub variant: Variant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ProductCategory>,
    /// Store search links (empty when nothing was detected)
    pub links: Vec<StoreLink>,
}

/// POST /api/infer
pub async fn infer(
    State(state): State<AppState>,
    Query(params): Query<InferParams>,
    body: Bytes,
) -> ApiResult<Json<InferResponse>> {
    let image = decode_image_blocking(body.to_vec()).await.map_err(|e| {
        warn!(error = %e, "Rejected upload");
        ApiError::BadRequest(format!("Could not decode image: {:#}", e))
    })?;

    let pipeline = match params.variant {
        Variant::Quick => &state.quick,
        Variant::Catalog => &state.catalog,
    };

    let response = match pipeline.infer(Arc::new(image)).await {
        InferenceOutcome::Detected(result) => {
            let links = state.links.links_for(&result.search_term);
            InferResponse {
                status: InferStatus::Detected,
                variant: params.variant,
                search_term: Some(result.search_term),
                category: result.category_guess,
                links,
            }
        }
        InferenceOutcome::NoTermDetected => InferResponse {
            status: InferStatus::NoTermDetected,
            variant: params.variant,
            search_term: None,
            category: None,
            links: Vec::new(),
        },
        InferenceOutcome::Cancelled => {
            let message = "Inference cancelled before completion".to_string();
            state.record_error(&message).await;
            return Err(ApiError::Internal(message));
        }
    };

    info!(variant = ?params.variant, status = ?response.status, "Inference request complete");
    Ok(Json(response))
}

/// Build inference routes
pub fn infer_routes() -> Router<AppState> {
    Router::new().route("/api/infer", post(infer))
}
