//! dbiller: self-hostable retail catalog backend with photo product
//! recognition.
//!
//! A client uploads a photograph of a product; the service preprocesses the
//! image, extracts text with a multi-pass OCR strategy, derives search
//! tokens, and matches them against the product catalog, falling back to
//! sequence-similarity ranking when no token matches. See the `recognition`
//! module for the pipeline and `api` for the HTTP surface.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod ocr;
pub mod recognition;

pub use config::Config;
pub use error::{BillerError, Result};
