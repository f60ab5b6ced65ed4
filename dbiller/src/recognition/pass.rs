use image::GrayImage;

use crate::error::Result;
use crate::models::{OcrObservation, RecognizedWord};
use crate::ocr::OcrEngine;

/// Run one OCR pass over a preprocessed bitmap.
///
/// A word is kept iff its confidence is at least `min_confidence` and its
/// trimmed text is non-empty. When filtering removes every word the engine's
/// plain-text extraction stands in for the joined text, guarding against
/// engines that return no word boxes yet still detect text.
pub fn run_pass(
    engine: &dyn OcrEngine,
    image: &GrayImage,
    config: &str,
    language: &str,
    min_confidence: f32,
) -> Result<OcrObservation> {
    let words: Vec<RecognizedWord> = engine
        .recognize_words(image, config, language)?
        .into_iter()
        .filter(|w| w.confidence >= min_confidence && !w.text.trim().is_empty())
        .collect();

    let word_count = words.len();
    let text = if words.is_empty() {
        engine.recognize_text(image, config, language)?
    } else {
        words
            .iter()
            .map(|w| w.text.trim())
            .collect::<Vec<_>>()
            .join(" ")
    };

    let avg_confidence = if words.is_empty() {
        None
    } else {
        Some(words.iter().map(|w| w.confidence).sum::<f32>() / word_count as f32)
    };

    Ok(OcrObservation {
        text,
        words,
        word_count,
        avg_confidence,
    })
}

/// A fallback pass is warranted when the primary pass found no words or
/// produced fewer than 3 characters of trimmed text.
pub fn needs_fallback_pass(observation: &OcrObservation) -> bool {
    observation.word_count == 0 || observation.trimmed_len() < 3
}

/// Pick between the two observations. The fallback wins only when it is
/// strictly better: more kept words, or longer trimmed text. Returns the
/// chosen observation and whether the fallback was selected.
pub fn select_observation(
    primary: OcrObservation,
    fallback: OcrObservation,
) -> (OcrObservation, bool) {
    if fallback.word_count > primary.word_count || fallback.trimmed_len() > primary.trimmed_len() {
        (fallback, true)
    } else {
        (primary, false)
    }
}
