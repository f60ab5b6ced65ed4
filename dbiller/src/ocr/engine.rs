use image::{GrayImage, ImageFormat};
use leptess::{LepTess, Variable};
use tracing::{info, warn};

use crate::config::OcrConfig;
use crate::error::{BillerError, Result};
use crate::models::RecognizedWord;

const SOURCE_DPI: i32 = 300;

/// Typed capability query for the OCR engine, probed once at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineAvailability {
    Available,
    Unavailable { reason: String },
}

/// Text extraction interface consumed by the recognition pipeline.
///
/// `recognize_words` yields per-word confidence data; `recognize_text` is
/// the plain full-text extraction used when confidence filtering removes
/// every word. Implementations are assumed deterministic for a fixed
/// (image, config, language) triple.
pub trait OcrEngine: Send + Sync + 'static {
    fn availability(&self) -> EngineAvailability;

    fn recognize_words(
        &self,
        image: &GrayImage,
        config: &str,
        language: &str,
    ) -> Result<Vec<RecognizedWord>>;

    fn recognize_text(&self, image: &GrayImage, config: &str, language: &str) -> Result<String>;
}

/// Tesseract-backed engine via leptess.
///
/// A fresh `LepTess` is created per invocation so each pass gets its own
/// config-string variables; the language data path comes from configuration,
/// never from process-global state.
pub struct TesseractEngine {
    tessdata_path: Option<String>,
    availability: EngineAvailability,
}

/// Variables recognized in an engine config string (`--psm N`, `--oem N`).
#[derive(Debug, Clone, PartialEq)]
enum ConfigVar {
    PageSegMode(String),
    EngineMode(String),
}

impl TesseractEngine {
    pub fn new(config: &OcrConfig) -> Self {
        let availability = match LepTess::new(config.tessdata_path.as_deref(), &config.language) {
            Ok(_) => {
                info!(language = %config.language, "Tesseract OCR initialized");
                EngineAvailability::Available
            }
            Err(e) => {
                let reason = format!("Tesseract not available: {e}");
                warn!("{}", reason);
                EngineAvailability::Unavailable { reason }
            }
        };

        Self {
            tessdata_path: config.tessdata_path.clone(),
            availability,
        }
    }

    fn instance(&self, config: &str, language: &str) -> Result<LepTess> {
        if let EngineAvailability::Unavailable { reason } = &self.availability {
            return Err(BillerError::OcrUnavailable(reason.clone()));
        }

        let mut lt = LepTess::new(self.tessdata_path.as_deref(), language)
            .map_err(|e| BillerError::Ocr(format!("Failed to initialize tesseract: {e}")))?;

        for var in parse_config_string(config) {
            let result = match &var {
                ConfigVar::PageSegMode(v) => lt.set_variable(Variable::TesseditPagesegMode, v),
                ConfigVar::EngineMode(v) => lt.set_variable(Variable::TesseditOcrEngineMode, v),
            };
            if let Err(e) = result {
                warn!(variable = ?var, error = %e, "Failed to set tesseract variable");
            }
        }

        Ok(lt)
    }
}

impl OcrEngine for TesseractEngine {
    fn availability(&self) -> EngineAvailability {
        self.availability.clone()
    }

    fn recognize_words(
        &self,
        image: &GrayImage,
        config: &str,
        language: &str,
    ) -> Result<Vec<RecognizedWord>> {
        let mut lt = self.instance(config, language)?;
        let bytes = encode_png(image)?;
        lt.set_image_from_mem(&bytes)
            .map_err(|e| BillerError::Ocr(format!("Failed to set image: {e}")))?;
        // In-memory images carry no DPI; must be set after set_image.
        lt.set_source_resolution(SOURCE_DPI);

        let tsv = lt
            .get_tsv_text(0)
            .map_err(|e| BillerError::Ocr(format!("Failed to extract word data: {e}")))?;

        Ok(parse_tsv(&tsv))
    }

    fn recognize_text(&self, image: &GrayImage, config: &str, language: &str) -> Result<String> {
        let mut lt = self.instance(config, language)?;
        let bytes = encode_png(image)?;
        lt.set_image_from_mem(&bytes)
            .map_err(|e| BillerError::Ocr(format!("Failed to set image: {e}")))?;
        lt.set_source_resolution(SOURCE_DPI);

        let text = lt
            .get_utf8_text()
            .map_err(|e| BillerError::Ocr(format!("Failed to extract text: {e}")))?;

        Ok(text.trim().to_string())
    }
}

fn encode_png(image: &GrayImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| BillerError::Ocr(format!("Failed to encode image for OCR: {e}")))?;
    Ok(bytes)
}

fn parse_config_string(config: &str) -> Vec<ConfigVar> {
    let mut vars = Vec::new();
    let mut tokens = config.split_whitespace();
    while let Some(token) = tokens.next() {
        match token {
            "--psm" => {
                if let Some(value) = tokens.next() {
                    vars.push(ConfigVar::PageSegMode(value.to_string()));
                }
            }
            "--oem" => {
                if let Some(value) = tokens.next() {
                    vars.push(ConfigVar::EngineMode(value.to_string()));
                }
            }
            other => {
                warn!(token = other, "Ignoring unrecognized OCR config token");
            }
        }
    }
    vars
}

/// Parse tesseract TSV output into word/confidence pairs.
///
/// Word rows have level 5 and a non-negative confidence; all other rows
/// (page/block/paragraph/line structure) are skipped.
fn parse_tsv(tsv: &str) -> Vec<RecognizedWord> {
    let mut words = Vec::new();
    for line in tsv.lines() {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() != 12 || cols[0] != "5" {
            continue;
        }
        let confidence = match cols[10].parse::<f32>() {
            Ok(c) if c >= 0.0 => c,
            _ => continue,
        };
        words.push(RecognizedWord {
            text: cols[11].to_string(),
            confidence,
        });
    }
    words
}
