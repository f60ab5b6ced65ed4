//! Product request/response DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{NewProduct, Product};

/// Request body for `POST /v1/products` and `PUT /v1/products/{id}`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    /// Display name; also the primary field recognition matches against.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Unit price.
    #[validate(range(min = 0.0))]
    pub price: f64,
    /// Units on hand.
    #[serde(default)]
    pub stock: i64,
    /// Reference to an externally stored product image.
    pub image_url: Option<String>,
    /// Optional category; recognition matches against it alongside the name.
    #[validate(length(max = 255))]
    pub category: Option<String>,
}

/// Update uses the same field set as create; all fields are replaced.
pub type UpdateProductRequest = CreateProductRequest;

impl From<CreateProductRequest> for NewProduct {
    fn from(req: CreateProductRequest) -> Self {
        Self {
            name: req.name,
            price: req.price,
            stock: req.stock,
            image_url: req.image_url,
            category: req.category,
        }
    }
}

/// Query parameters for `GET /v1/products`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ListProductsQuery {
    /// Maximum number of items to return. Clamped to `1..=100`, defaults
    /// to 50.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Number of items to skip.
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    50
}

impl Default for ListProductsQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl ListProductsQuery {
    pub fn validate_params(mut self) -> Self {
        self.limit = self.limit.clamp(1, 100);
        self
    }
}

/// A product as returned on the wire.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub image_url: Option<String>,
    pub category: Option<String>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            price: p.price,
            stock: p.stock,
            image_url: p.image_url,
            category: p.category,
            created_at: p.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let valid = CreateProductRequest {
            name: "Amul Milk 2L".to_string(),
            price: 2.5,
            stock: 10,
            image_url: None,
            category: Some("Dairy".to_string()),
        };
        assert!(valid.validate().is_ok());

        let empty_name = CreateProductRequest {
            name: String::new(),
            ..valid.clone()
        };
        assert!(empty_name.validate().is_err());

        let negative_price = CreateProductRequest {
            price: -1.0,
            ..valid
        };
        assert!(negative_price.validate().is_err());
    }

    #[test]
    fn test_list_query_clamps_limit() {
        let q = ListProductsQuery {
            limit: 10_000,
            offset: 0,
        }
        .validate_params();
        assert_eq!(q.limit, 100);

        let q = ListProductsQuery {
            limit: 0,
            offset: 0,
        }
        .validate_params();
        assert_eq!(q.limit, 1);
    }
}
