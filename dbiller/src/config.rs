use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub ocr: OcrConfig,
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_keys: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
}

/// OCR pipeline configuration.
///
/// The two config strings are passed verbatim to the engine per pass
/// (`--psm N` / `--oem N` tokens). `tessdata_path` points the engine at a
/// non-default language data directory; it is injected here rather than set
/// on any process-global.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub language: String,
    pub primary_config: String,
    pub fallback_config: String,
    pub primary_min_confidence: f32,
    pub fallback_min_confidence: f32,
    pub binarize_threshold: u8,
    pub max_input_dimension: u32,
    pub max_resize_dimension: u32,
    pub fallback_enlarge_factor: f32,
    pub tessdata_path: Option<String>,
}

/// Catalog matching configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    pub fuzzy_min_score: f32,
    pub token_match_cap: usize,
    pub fuzzy_match_cap: usize,
    pub fuzzy_preview_cap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("BILLER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("BILLER_PORT", 8000),
                api_keys: env::var("BILLER_API_KEYS")
                    .map(|keys| keys.split(',').map(|s| s.trim().to_string()).collect())
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:dbiller.db".to_string()),
                auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
                local_path: env::var("DATABASE_LOCAL_PATH").ok(),
            },
            ocr: OcrConfig {
                language: env::var("OCR_LANGUAGE").unwrap_or_else(|_| "eng".to_string()),
                primary_config: env::var("OCR_PRIMARY_CONFIG")
                    .unwrap_or_else(|_| "--psm 6".to_string()),
                fallback_config: env::var("OCR_FALLBACK_CONFIG")
                    .unwrap_or_else(|_| "--psm 11".to_string()),
                primary_min_confidence: parse_env_or("OCR_PRIMARY_MIN_CONFIDENCE", 40.0),
                fallback_min_confidence: parse_env_or("OCR_FALLBACK_MIN_CONFIDENCE", 30.0),
                binarize_threshold: parse_env_or("OCR_BINARIZE_THRESHOLD", 160),
                max_input_dimension: parse_env_or("OCR_MAX_INPUT_DIMENSION", 1800),
                max_resize_dimension: parse_env_or("OCR_MAX_RESIZE_DIMENSION", 2000),
                fallback_enlarge_factor: parse_env_or("OCR_FALLBACK_ENLARGE", 1.3),
                tessdata_path: env::var("OCR_TESSDATA_PATH").ok(),
            },
            matching: MatchingConfig {
                fuzzy_min_score: parse_env_or("MATCH_FUZZY_MIN_SCORE", 0.1),
                token_match_cap: parse_env_or("MATCH_TOKEN_CAP", 10),
                fuzzy_match_cap: parse_env_or("MATCH_FUZZY_CAP", 5),
                fuzzy_preview_cap: parse_env_or("MATCH_FUZZY_PREVIEW_CAP", 5),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
