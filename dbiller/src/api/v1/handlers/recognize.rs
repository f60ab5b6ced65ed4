//! v1 Recognition handler.
//!
//! Accepts a multipart photo upload, runs the OCR → token → fuzzy pipeline,
//! and returns candidate products. The caller identity has already been
//! checked by the route middleware; it is not consumed here beyond that.

use axum::extract::{Multipart, Query, State};

use crate::api::state::AppState;
use crate::api::v1::dto::{ProductResponse, RecognizeQuery, RecognizeResponse};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};

fn parse_form_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// `POST /api/v1/recognize`
///
/// Multipart form with a `file` field holding the photo; `debug` may be
/// passed as a query parameter or a form field.
#[utoipa::path(
    post,
    path = "/api/v1/recognize",
    tag = "recognition",
    operation_id = "recognize",
    params(
        ("debug" = Option<bool>, Query, description = "Attach a diagnostic trace"),
    ),
    responses(
        (status = 200, description = "Candidate products, deduplicated", body = RecognizeResponse),
        (status = 400, description = "Missing, empty, or undecodable image", body = ApiError),
        (status = 503, description = "OCR engine unavailable", body = ApiError),
    )
)]
pub async fn recognize(
    State(state): State<AppState>,
    Query(query): Query<RecognizeQuery>,
    mut multipart: Multipart,
) -> ApiResponse<RecognizeResponse> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut debug = query.debug;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => match field.bytes().await {
                Ok(bytes) => file_bytes = Some(bytes.to_vec()),
                Err(e) => {
                    return ApiResponse::error(
                        ErrorCode::InvalidRequest,
                        format!("Failed to read uploaded file: {e}"),
                    );
                }
            },
            "debug" => {
                if let Ok(value) = field.text().await {
                    if let Some(parsed) = parse_form_bool(&value) {
                        debug = parsed;
                    }
                }
            }
            _ => {}
        }
    }

    let Some(bytes) = file_bytes else {
        return ApiResponse::error(ErrorCode::InvalidRequest, "Missing 'file' field");
    };
    if bytes.is_empty() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "Uploaded file is empty");
    }

    match state.recognition.recognize(bytes, debug).await {
        Ok(outcome) => ApiResponse::success(RecognizeResponse {
            products: outcome
                .products
                .into_iter()
                .map(ProductResponse::from)
                .collect(),
            debug: outcome.trace,
        }),
        Err(e) => e.into(),
    }
}
