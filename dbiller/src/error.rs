use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillerError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("OCR engine unavailable: {0}")]
    OcrUnavailable(String),

    #[error("API authentication error: {0}")]
    ApiAuth(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for BillerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            BillerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            BillerError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            BillerError::InvalidImage(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            BillerError::OcrUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            BillerError::ApiAuth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            BillerError::Database(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            BillerError::Ocr(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            BillerError::Json(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            BillerError::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            BillerError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, BillerError>;
