//! End-to-end tests of the recognition pipeline against a scripted OCR
//! engine and an in-memory catalog.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use common::{matching_config, ocr_config, png_fixture, product, MemoryCatalog, StubEngine};
use dbiller::db::CatalogReader;
use dbiller::error::{BillerError, Result};
use dbiller::models::Product;
use dbiller::recognition::RecognitionService;

const PRIMARY: &str = "--psm 6";
const FALLBACK: &str = "--psm 11";

fn service(engine: StubEngine, catalog: Vec<Product>) -> RecognitionService {
    RecognitionService::new(
        Arc::new(engine),
        Arc::new(MemoryCatalog::new(catalog)),
        ocr_config(),
        matching_config(),
    )
}

fn dairy_catalog() -> Vec<Product> {
    vec![
        product(1, "Amul Milk 2L", Some("Dairy")),
        product(2, "Bread", Some("Bakery")),
    ]
}

#[tokio::test]
async fn token_match_finds_product_from_label_text() {
    let engine = StubEngine::new().with_words(PRIMARY, &[("MILK", 90.0), ("2L", 85.0), ("Amul", 88.0)]);
    let svc = service(engine, dairy_catalog());

    let outcome = svc.recognize(png_fixture(), true).await.unwrap();

    let ids: Vec<i64> = outcome.products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1], "only the milk product matches");

    let trace = outcome.trace.unwrap();
    assert!(trace.tokens.contains(&"milk".to_string()));
    assert!(trace.tokens.contains(&"2l".to_string()));
    assert!(trace.tokens.contains(&"amul".to_string()));
    assert!(!trace.fallback_pass_ran);
    assert!(
        trace.fuzzy_scores.is_empty(),
        "fuzzy path must not run when the token match succeeds"
    );
    assert_eq!(trace.matched_ids, vec![1]);
}

#[tokio::test]
async fn identical_inputs_produce_identical_outputs() {
    let make = || {
        let engine =
            StubEngine::new().with_words(PRIMARY, &[("MILK", 90.0), ("Amul", 88.0)]);
        service(engine, dairy_catalog())
    };

    let first = make().recognize(png_fixture(), true).await.unwrap();
    let second = make().recognize(png_fixture(), true).await.unwrap();

    let first_ids: Vec<i64> = first.products.iter().map(|p| p.id).collect();
    let second_ids: Vec<i64> = second.products.iter().map(|p| p.id).collect();
    assert_eq!(first_ids, second_ids);

    let first_trace = serde_json::to_value(first.trace.unwrap()).unwrap();
    let second_trace = serde_json::to_value(second.trace.unwrap()).unwrap();
    assert_eq!(first_trace, second_trace);
}

#[tokio::test]
async fn empty_primary_pass_triggers_fallback() {
    // Fallback confidences sit between the two thresholds: kept by the
    // fallback floor (30) though the primary floor (40) would drop them.
    let engine = StubEngine::new()
        .with_words(FALLBACK, &[("Amul", 35.0), ("Milk", 32.0)]);
    let svc = service(engine, dairy_catalog());

    let outcome = svc.recognize(png_fixture(), true).await.unwrap();

    let trace = outcome.trace.as_ref().unwrap();
    assert!(trace.fallback_pass_ran);
    assert!(trace.fallback_pass_selected);
    assert_eq!(trace.word_count, 2);

    let ids: Vec<i64> = outcome.products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1]);
}

#[tokio::test]
async fn fallback_pass_is_discarded_when_not_strictly_better() {
    // Primary: no words survive, but plain text stands in. Fallback runs
    // (word_count == 0) yet produces nothing, so the primary text is kept.
    let engine = StubEngine::new().with_text(PRIMARY, "Amul Milk");
    let svc = service(engine, dairy_catalog());

    let outcome = svc.recognize(png_fixture(), true).await.unwrap();

    let trace = outcome.trace.as_ref().unwrap();
    assert!(trace.fallback_pass_ran);
    assert!(!trace.fallback_pass_selected);
    assert_eq!(trace.text_preview, "Amul Milk");

    let ids: Vec<i64> = outcome.products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1]);
}

#[tokio::test]
async fn fuzzy_fallback_runs_only_when_token_match_is_empty() {
    // Garbled OCR: no token is a substring of any name/category, but the
    // text is still close to the milk product.
    let engine = StubEngine::new().with_words(PRIMARY, &[("Amu1", 90.0), ("Mi1k", 85.0)]);
    let svc = service(engine, dairy_catalog());

    let outcome = svc.recognize(png_fixture(), true).await.unwrap();

    let trace = outcome.trace.as_ref().unwrap();
    assert!(
        !trace.fuzzy_scores.is_empty(),
        "fuzzy path must run when the token match is empty"
    );
    assert_eq!(outcome.products[0].id, 1, "milk product ranks first");
    assert_eq!(trace.fuzzy_scores[0].product_id, 1);
}

#[tokio::test]
async fn token_match_is_capped_in_catalog_order() {
    let catalog: Vec<Product> = (1..=15)
        .map(|i| product(i, &format!("Milk {i}"), Some("Dairy")))
        .collect();
    let engine = StubEngine::new().with_words(PRIMARY, &[("milk", 95.0)]);
    let svc = service(engine, catalog);

    let outcome = svc.recognize(png_fixture(), false).await.unwrap();

    let ids: Vec<i64> = outcome.products.iter().map(|p| p.id).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<i64>>());
}

/// Reader that returns the same entry twice, as when several tokens each
/// qualify it independently.
struct DuplicatingCatalog;

#[async_trait]
impl CatalogReader for DuplicatingCatalog {
    async fn find_by_tokens(&self, _tokens: &[String], _cap: usize) -> Result<Vec<Product>> {
        Ok(vec![
            product(1, "Amul Milk 2L", Some("Dairy")),
            product(2, "Bread", Some("Bakery")),
            product(1, "Amul Milk 2L", Some("Dairy")),
        ])
    }

    async fn list_all(&self) -> Result<Vec<Product>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn duplicate_matches_are_deduplicated_by_id() {
    let engine = StubEngine::new().with_words(PRIMARY, &[("milk", 90.0)]);
    let svc = RecognitionService::new(
        Arc::new(engine),
        Arc::new(DuplicatingCatalog),
        ocr_config(),
        matching_config(),
    );

    let outcome = svc.recognize(png_fixture(), false).await.unwrap();

    let ids: Vec<i64> = outcome.products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2], "first occurrence kept, order preserved");
}

#[tokio::test]
async fn empty_catalog_yields_empty_result_not_error() {
    let engine = StubEngine::new().with_words(PRIMARY, &[("milk", 90.0)]);
    let svc = service(engine, Vec::new());

    let outcome = svc.recognize(png_fixture(), false).await.unwrap();
    assert!(outcome.products.is_empty());
}

#[tokio::test]
async fn empty_recognized_text_yields_empty_result() {
    // Both passes come back blank against a non-empty catalog: the empty
    // text scores ~0 against every entry, so even the fuzzy path is empty.
    let engine = StubEngine::new();
    let svc = service(engine, dairy_catalog());

    let outcome = svc.recognize(png_fixture(), true).await.unwrap();

    assert!(outcome.products.is_empty());
    let trace = outcome.trace.unwrap();
    assert!(trace.fallback_pass_ran);
    assert!(trace.tokens.is_empty());
    assert!(trace.fuzzy_scores.is_empty());
}

#[tokio::test]
async fn unavailable_engine_rejects_request_before_any_pass() {
    let svc = service(StubEngine::unavailable(), dairy_catalog());

    let result = svc.recognize(png_fixture(), false).await;
    assert!(matches!(result, Err(BillerError::OcrUnavailable(_))));
}

#[tokio::test]
async fn empty_upload_is_rejected() {
    let svc = service(StubEngine::new(), dairy_catalog());

    let result = svc.recognize(Vec::new(), false).await;
    assert!(matches!(result, Err(BillerError::InvalidImage(_))));
}

#[tokio::test]
async fn undecodable_upload_is_rejected() {
    let svc = service(StubEngine::new(), dairy_catalog());

    let result = svc.recognize(vec![0, 1, 2, 3, 4, 5], false).await;
    assert!(matches!(result, Err(BillerError::InvalidImage(_))));
}

#[tokio::test]
async fn trace_preview_is_capped_at_400_chars() {
    let long_text = "milkshake ".repeat(100);
    let engine = StubEngine::new().with_text(PRIMARY, &long_text);
    let svc = service(engine, Vec::new());

    let outcome = svc.recognize(png_fixture(), true).await.unwrap();
    let trace = outcome.trace.unwrap();
    assert_eq!(trace.text_preview.chars().count(), 400);
}
