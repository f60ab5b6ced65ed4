use serde::Serialize;

use super::Product;

/// A single word returned by the OCR engine with its confidence score
/// (tesseract scale, 0–100).
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedWord {
    pub text: String,
    pub confidence: f32,
}

/// The outcome of one OCR pass after confidence filtering.
///
/// `text` is the kept words joined by single spaces, or the engine's plain
/// full-text extraction when filtering removed every word. `avg_confidence`
/// is absent when no words were kept.
#[derive(Debug, Clone)]
pub struct OcrObservation {
    pub text: String,
    pub words: Vec<RecognizedWord>,
    pub word_count: usize,
    pub avg_confidence: Option<f32>,
}

impl OcrObservation {
    pub fn trimmed_len(&self) -> usize {
        self.text.trim().chars().count()
    }
}

/// A fuzzy-path candidate: similarity score in [0, 1] plus the entry.
#[derive(Debug, Clone)]
pub struct ScoredProduct {
    pub score: f32,
    pub product: Product,
}

/// One row of the diagnostic fuzzy-score preview.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FuzzyScoreEntry {
    pub score: f32,
    pub product_id: i64,
    pub name: String,
}

/// Diagnostic trace of one recognition request. Logic-inert: returned only
/// when the caller asked for debug output, never consulted by matching.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionTrace {
    pub input_bytes: usize,
    pub decoded_width: u32,
    pub decoded_height: u32,
    pub processed_width: u32,
    pub processed_height: u32,
    pub language: String,
    pub primary_config: String,
    pub fallback_config: String,
    pub fallback_pass_ran: bool,
    pub fallback_pass_selected: bool,
    pub word_count: usize,
    pub avg_confidence: Option<f32>,
    pub text_preview: String,
    pub tokens: Vec<String>,
    pub fuzzy_scores: Vec<FuzzyScoreEntry>,
    pub matched_ids: Vec<i64>,
}
