//! OCR (Optical Character Recognition) Module
//!
//! Image preparation and text extraction for product recognition.
//!
//! - `preprocessing` decodes an upload into an orientation-corrected,
//!   size-capped bitmap and applies per-pass profiles (binarized primary,
//!   soft upscaled fallback).
//! - `engine` defines the [`OcrEngine`] interface and the Tesseract
//!   implementation via leptess, with a typed availability probe consulted
//!   once per process.

mod engine;
mod preprocessing;

pub use engine::{EngineAvailability, OcrEngine, TesseractEngine};
pub use preprocessing::{apply_profile, decode_image, DecodedImage, OcrProfile};
