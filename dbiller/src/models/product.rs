use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog product. Identity is `id`, assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub image_url: Option<String>,
    pub category: Option<String>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

/// Field set for creating or replacing a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

impl Product {
    pub fn new(id: i64, fields: NewProduct) -> Self {
        Self {
            id,
            name: fields.name,
            price: fields.price,
            stock: fields.stock,
            image_url: fields.image_url,
            category: fields.category,
            created_at: Utc::now(),
        }
    }
}
