//! Product catalog errors.

use thiserror::Error;

use storefront::fixtures::FixtureError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product catalog unavailable: {0}")]
    Unavailable(String),

    #[error("failed to load catalog fixture")]
    Fixture(#[from] FixtureError),
}
