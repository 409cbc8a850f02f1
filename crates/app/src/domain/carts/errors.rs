//! Carts service errors.

use thiserror::Error;

use storefront::{cart::CartError, products::ProductId};

use crate::domain::products::CatalogError;

/// Failure of the storage behind the cart documents.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("cart storage i/o failed")]
    Io(#[from] std::io::Error),

    #[error("failed to encode cart document")]
    Encode(#[from] serde_json::Error),

    #[error("cart storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart persistence failed")]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("only {available} units of {product_id} available, {requested} requested")]
    ExceedsStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    #[error("catalog lookup failed")]
    Catalog(#[from] CatalogError),
}
