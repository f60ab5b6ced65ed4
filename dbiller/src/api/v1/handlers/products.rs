//! v1 Product handlers.
//!
//! Catalog CRUD. All responses are wrapped in [`ApiResponse`] envelopes;
//! update uses full replacement semantics.

use axum::extract::{Path, Query, State};
use validator::Validate;

use crate::api::state::AppState;
use crate::api::v1::dto::{
    CreateProductRequest, ListProductsQuery, ProductResponse, UpdateProductRequest,
};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode, ResponseMeta};
use crate::db::ProductStore;
use crate::models::NewProduct;

/// `POST /api/v1/products`
#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "products",
    operation_id = "products.create",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid request", body = ApiError),
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<CreateProductRequest>,
) -> ApiResponse<ProductResponse> {
    if let Err(e) = req.validate() {
        return ApiResponse::error(ErrorCode::InvalidRequest, e.to_string());
    }

    let fields: NewProduct = req.into();
    match state.db.create_product(&fields).await {
        Ok(product) => ApiResponse::created(product.into()),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/products`
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "products",
    operation_id = "products.list",
    params(
        ("limit" = Option<u32>, Query, description = "Page size (1-100, default 50)"),
        ("offset" = Option<u32>, Query, description = "Items to skip"),
    ),
    responses(
        (status = 200, description = "Product page", body = [ProductResponse]),
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> ApiResponse<Vec<ProductResponse>> {
    let query = query.validate_params();

    let total = match state.db.count_products().await {
        Ok(total) => total,
        Err(e) => return e.into(),
    };

    match state.db.list_products(query.limit, query.offset).await {
        Ok(products) => ApiResponse::success_with_meta(
            products.into_iter().map(ProductResponse::from).collect(),
            ResponseMeta { total: Some(total) },
        ),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/products/{id}`
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "products",
    operation_id = "products.get",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product", body = ProductResponse),
        (status = 404, description = "Product not found", body = ApiError),
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResponse<ProductResponse> {
    match state.db.get_product(id).await {
        Ok(Some(product)) => ApiResponse::success(product.into()),
        Ok(None) => ApiResponse::error(ErrorCode::NotFound, format!("Product {id} not found")),
        Err(e) => e.into(),
    }
}

/// `PUT /api/v1/products/{id}`
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    tag = "products",
    operation_id = "products.update",
    params(("id" = i64, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ProductResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Product not found", body = ApiError),
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    axum::Json(req): axum::Json<UpdateProductRequest>,
) -> ApiResponse<ProductResponse> {
    if let Err(e) = req.validate() {
        return ApiResponse::error(ErrorCode::InvalidRequest, e.to_string());
    }

    let fields: NewProduct = req.into();
    match state.db.update_product(id, &fields).await {
        Ok(Some(product)) => ApiResponse::success(product.into()),
        Ok(None) => ApiResponse::error(ErrorCode::NotFound, format!("Product {id} not found")),
        Err(e) => e.into(),
    }
}

/// `DELETE /api/v1/products/{id}`
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    tag = "products",
    operation_id = "products.delete",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Product not found", body = ApiError),
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResponse<()> {
    match state.db.delete_product(id).await {
        Ok(true) => ApiResponse::success(()),
        Ok(false) => ApiResponse::error(ErrorCode::NotFound, format!("Product {id} not found")),
        Err(e) => e.into(),
    }
}
