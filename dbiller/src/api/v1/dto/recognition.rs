//! Recognition request/response DTOs for the v1 API.

use serde::{Deserialize, Serialize};

use crate::models::RecognitionTrace;

use super::products::ProductResponse;

/// Query parameters for `POST /v1/recognize`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct RecognizeQuery {
    /// When true, the response carries a diagnostic trace of the pipeline.
    #[serde(default)]
    pub debug: bool,
}

/// Response body for `POST /v1/recognize`: candidate catalog entries in
/// ranked, deduplicated order. Final selection is left to the caller.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecognizeResponse {
    pub products: Vec<ProductResponse>,
    /// Present only when `debug` was requested. Has no effect on matching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<RecognitionTrace>,
}
