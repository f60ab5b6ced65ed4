//! Product recognition pipeline.
//!
//! One request flows strictly sequentially: decode/cap → OCR pass 1 →
//! conditional OCR pass 2 → text selection → tokenize → token match →
//! fuzzy fallback (only when the token match is empty) → dedup. The OCR
//! stage runs under `spawn_blocking`; there is no internal fan-out, no
//! cross-request caching, and no state that outlives the request.

mod fuzzy;
mod pass;
mod tokenizer;

pub use fuzzy::sequence_ratio;
pub use tokenizer::Tokenizer;

use std::collections::HashSet;
use std::sync::Arc;

use image::GenericImageView;
use tracing::{debug, info};

use crate::config::{MatchingConfig, OcrConfig};
use crate::db::CatalogReader;
use crate::error::{BillerError, Result};
use crate::models::{FuzzyScoreEntry, OcrObservation, Product, RecognitionTrace};
use crate::ocr::{apply_profile, decode_image, EngineAvailability, OcrEngine, OcrProfile};

const TEXT_PREVIEW_CHARS: usize = 400;

/// Result of one recognition request: deduplicated entries in
/// first-encountered order, plus the diagnostic trace when requested.
pub struct RecognitionOutcome {
    pub products: Vec<Product>,
    pub trace: Option<RecognitionTrace>,
}

/// Everything produced by the blocking OCR stage.
struct OcrStage {
    decoded_width: u32,
    decoded_height: u32,
    processed_width: u32,
    processed_height: u32,
    observation: OcrObservation,
    fallback_ran: bool,
    fallback_selected: bool,
}

pub struct RecognitionService {
    engine: Arc<dyn OcrEngine>,
    catalog: Arc<dyn CatalogReader>,
    ocr: OcrConfig,
    matching: MatchingConfig,
    tokenizer: Tokenizer,
}

impl RecognitionService {
    pub fn new(
        engine: Arc<dyn OcrEngine>,
        catalog: Arc<dyn CatalogReader>,
        ocr: OcrConfig,
        matching: MatchingConfig,
    ) -> Self {
        Self {
            engine,
            catalog,
            ocr,
            matching,
            tokenizer: Tokenizer::new(),
        }
    }

    /// Recognize a catalog product from a photograph.
    ///
    /// Engine availability is consulted once, before any pass. An empty
    /// final list is a valid outcome, never an error; engine faults during a
    /// pass abort the whole request.
    pub async fn recognize(&self, bytes: Vec<u8>, debug: bool) -> Result<RecognitionOutcome> {
        if bytes.is_empty() {
            return Err(BillerError::InvalidImage("empty image upload".to_string()));
        }

        if let EngineAvailability::Unavailable { reason } = self.engine.availability() {
            return Err(BillerError::OcrUnavailable(format!(
                "{reason}. Install tesseract with its language data, \
                 or point OCR_TESSDATA_PATH at the data directory."
            )));
        }

        let input_bytes = bytes.len();
        let engine = Arc::clone(&self.engine);
        let ocr_config = self.ocr.clone();
        let stage = tokio::task::spawn_blocking(move || run_ocr_stage(&*engine, &bytes, &ocr_config))
            .await
            .map_err(|e| BillerError::Internal(format!("OCR task panicked: {e}")))??;

        debug!(
            word_count = stage.observation.word_count,
            avg_confidence = ?stage.observation.avg_confidence,
            fallback_ran = stage.fallback_ran,
            fallback_selected = stage.fallback_selected,
            "OCR stage complete"
        );

        let tokens: Vec<String> = self
            .tokenizer
            .tokenize(&stage.observation.text)
            .into_iter()
            .collect();

        let token_matches = if tokens.is_empty() {
            Vec::new()
        } else {
            self.catalog
                .find_by_tokens(&tokens, self.matching.token_match_cap)
                .await?
        };

        let mut fuzzy_preview: Vec<FuzzyScoreEntry> = Vec::new();
        let matched = if token_matches.is_empty() {
            let snapshot = self.catalog.list_all().await?;
            let ranked = fuzzy::rank_catalog(
                &stage.observation.text,
                &snapshot,
                self.matching.fuzzy_min_score,
            );
            fuzzy_preview = ranked
                .iter()
                .take(self.matching.fuzzy_preview_cap)
                .map(|s| FuzzyScoreEntry {
                    score: s.score,
                    product_id: s.product.id,
                    name: s.product.name.clone(),
                })
                .collect();
            ranked
                .into_iter()
                .take(self.matching.fuzzy_match_cap)
                .map(|s| s.product)
                .collect()
        } else {
            token_matches
        };

        let products = dedup_by_id(matched);

        info!(
            tokens = tokens.len(),
            matched = products.len(),
            fuzzy = !fuzzy_preview.is_empty(),
            "recognition complete"
        );

        let trace = debug.then(|| RecognitionTrace {
            input_bytes,
            decoded_width: stage.decoded_width,
            decoded_height: stage.decoded_height,
            processed_width: stage.processed_width,
            processed_height: stage.processed_height,
            language: self.ocr.language.clone(),
            primary_config: self.ocr.primary_config.clone(),
            fallback_config: self.ocr.fallback_config.clone(),
            fallback_pass_ran: stage.fallback_ran,
            fallback_pass_selected: stage.fallback_selected,
            word_count: stage.observation.word_count,
            avg_confidence: stage.observation.avg_confidence,
            text_preview: stage.observation.text.chars().take(TEXT_PREVIEW_CHARS).collect(),
            tokens,
            fuzzy_scores: fuzzy_preview,
            matched_ids: products.iter().map(|p| p.id).collect(),
        });

        Ok(RecognitionOutcome { products, trace })
    }
}

/// Decode once, then run the adaptive one-or-two pass OCR strategy. Pass 2
/// preprocesses from the original decoded bitmap, never pass 1's output.
fn run_ocr_stage(engine: &dyn OcrEngine, bytes: &[u8], config: &OcrConfig) -> Result<OcrStage> {
    let decoded = decode_image(bytes, config.max_input_dimension)?;
    let (processed_width, processed_height) = decoded.image.dimensions();

    let primary_image = apply_profile(
        &decoded.image,
        &OcrProfile::primary(config),
        config.max_resize_dimension,
    );
    let primary = pass::run_pass(
        engine,
        &primary_image,
        &config.primary_config,
        &config.language,
        config.primary_min_confidence,
    )?;

    let (observation, fallback_ran, fallback_selected) = if pass::needs_fallback_pass(&primary) {
        let fallback_image = apply_profile(
            &decoded.image,
            &OcrProfile::fallback(config),
            config.max_resize_dimension,
        );
        let fallback = pass::run_pass(
            engine,
            &fallback_image,
            &config.fallback_config,
            &config.language,
            config.fallback_min_confidence,
        )?;
        let (chosen, selected) = pass::select_observation(primary, fallback);
        (chosen, true, selected)
    } else {
        (primary, false, false)
    };

    Ok(OcrStage {
        decoded_width: decoded.decoded_width,
        decoded_height: decoded.decoded_height,
        processed_width,
        processed_height,
        observation,
        fallback_ran,
        fallback_selected,
    })
}

/// Keep each id's first occurrence, preserving relative order.
fn dedup_by_id(products: Vec<Product>) -> Vec<Product> {
    let mut seen = HashSet::new();
    products.into_iter().filter(|p| seen.insert(p.id)).collect()
}
