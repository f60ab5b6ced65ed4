use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "dbiller API",
        version = "1.0.0",
        description = "Self-hostable retail catalog backend with photo product recognition.",
    ),
    paths(
        handlers::health::health_check,
        handlers::products::create_product,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::recognize::recognize,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        response::ResponseMeta,
        // Products
        dto::products::CreateProductRequest,
        dto::products::ListProductsQuery,
        dto::products::ProductResponse,
        // Recognition
        dto::recognition::RecognizeQuery,
        dto::recognition::RecognizeResponse,
        crate::models::RecognitionTrace,
        crate::models::FuzzyScoreEntry,
        // Health
        handlers::health::HealthData,
        handlers::health::DatabaseStatus,
        handlers::health::OcrStatus,
    )),
    tags(
        (name = "health", description = "Service health"),
        (name = "products", description = "Catalog management (auth required)"),
        (name = "recognition", description = "Photo product recognition (auth required)"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
