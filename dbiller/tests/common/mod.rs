//! Shared fixtures and test doubles for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use image::{DynamicImage, GrayImage, ImageFormat};

use dbiller::config::{MatchingConfig, OcrConfig};
use dbiller::db::CatalogReader;
use dbiller::error::Result;
use dbiller::models::{Product, RecognizedWord};
use dbiller::ocr::{EngineAvailability, OcrEngine};

/// A small valid PNG to feed through the pipeline.
pub fn png_fixture() -> Vec<u8> {
    let img = DynamicImage::new_rgb8(64, 64);
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

pub fn product(id: i64, name: &str, category: Option<&str>) -> Product {
    Product {
        id,
        name: name.to_string(),
        price: 9.99,
        stock: 5,
        image_url: None,
        category: category.map(String::from),
        created_at: Utc::now(),
    }
}

pub fn ocr_config() -> OcrConfig {
    OcrConfig {
        language: "eng".to_string(),
        primary_config: "--psm 6".to_string(),
        fallback_config: "--psm 11".to_string(),
        primary_min_confidence: 40.0,
        fallback_min_confidence: 30.0,
        binarize_threshold: 160,
        max_input_dimension: 1800,
        max_resize_dimension: 2000,
        fallback_enlarge_factor: 1.3,
        tessdata_path: None,
    }
}

pub fn matching_config() -> MatchingConfig {
    MatchingConfig {
        fuzzy_min_score: 0.1,
        token_match_cap: 10,
        fuzzy_match_cap: 5,
        fuzzy_preview_cap: 5,
    }
}

/// Deterministic OCR engine double. Word and plain-text output are keyed by
/// the config string, so primary and fallback passes can be scripted
/// independently.
pub struct StubEngine {
    words: HashMap<String, Vec<RecognizedWord>>,
    texts: HashMap<String, String>,
    available: bool,
}

impl StubEngine {
    pub fn new() -> Self {
        Self {
            words: HashMap::new(),
            texts: HashMap::new(),
            available: true,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            words: HashMap::new(),
            texts: HashMap::new(),
            available: false,
        }
    }

    pub fn with_words(mut self, config: &str, words: &[(&str, f32)]) -> Self {
        self.words.insert(
            config.to_string(),
            words
                .iter()
                .map(|(t, c)| RecognizedWord {
                    text: t.to_string(),
                    confidence: *c,
                })
                .collect(),
        );
        self
    }

    pub fn with_text(mut self, config: &str, text: &str) -> Self {
        self.texts.insert(config.to_string(), text.to_string());
        self
    }
}

impl OcrEngine for StubEngine {
    fn availability(&self) -> EngineAvailability {
        if self.available {
            EngineAvailability::Available
        } else {
            EngineAvailability::Unavailable {
                reason: "stubbed out".to_string(),
            }
        }
    }

    fn recognize_words(
        &self,
        _image: &GrayImage,
        config: &str,
        _language: &str,
    ) -> Result<Vec<RecognizedWord>> {
        Ok(self.words.get(config).cloned().unwrap_or_default())
    }

    fn recognize_text(&self, _image: &GrayImage, config: &str, _language: &str) -> Result<String> {
        Ok(self.texts.get(config).cloned().unwrap_or_default())
    }
}

/// In-memory catalog with the same substring/cap/ordering semantics as the
/// libsql backend.
pub struct MemoryCatalog {
    products: Vec<Product>,
}

impl MemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl CatalogReader for MemoryCatalog {
    async fn find_by_tokens(&self, tokens: &[String], cap: usize) -> Result<Vec<Product>> {
        let matches = self
            .products
            .iter()
            .filter(|p| {
                tokens.iter().any(|token| {
                    let token = token.to_lowercase();
                    p.name.to_lowercase().contains(&token)
                        || p.category
                            .as_deref()
                            .map(|c| c.to_lowercase().contains(&token))
                            .unwrap_or(false)
                })
            })
            .take(cap)
            .cloned()
            .collect();
        Ok(matches)
    }

    async fn list_all(&self) -> Result<Vec<Product>> {
        Ok(self.products.clone())
    }
}
