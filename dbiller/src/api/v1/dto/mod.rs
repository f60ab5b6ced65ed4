pub mod products;
pub mod recognition;

pub use products::{
    CreateProductRequest, ListProductsQuery, ProductResponse, UpdateProductRequest,
};
pub use recognition::{RecognizeQuery, RecognizeResponse};
