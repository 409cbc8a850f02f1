//! Fixtures
//!
//! Product catalogs described in YAML, used to seed in-memory catalogs for
//! the CLI and tests.

use std::{fs, path::Path};

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::products::{CatalogSnapshot, Product};

pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),
}

/// A product catalog loaded from YAML.
#[derive(Debug, Clone, Default)]
pub struct CatalogFixture {
    products: Vec<Product<'static>>,
    currency: Option<&'static Currency>,
}

impl CatalogFixture {
    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if products
    /// are priced in more than one currency.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::parse(&contents)
    }

    /// Parse a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, a price cannot be parsed, or
    /// products are priced in more than one currency.
    pub fn parse(yaml: &str) -> Result<Self, FixtureError> {
        let fixture: products::ProductsFixture = serde_norway::from_str(yaml)?;

        let mut entries: Vec<_> = fixture.products.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut catalog = Self::default();

        for (id, product_fixture) in entries {
            let product = product_fixture.into_product(id)?;
            let currency = product.price.currency();

            match catalog.currency {
                Some(existing) if existing != currency => {
                    return Err(FixtureError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
                Some(_) => {}
                None => catalog.currency = Some(currency),
            }

            catalog.products.push(product);
        }

        Ok(catalog)
    }

    /// Products ordered by id.
    pub fn products(&self) -> &[Product<'static>] {
        &self.products
    }

    /// Consume the fixture, returning its products.
    pub fn into_products(self) -> Vec<Product<'static>> {
        self.products
    }

    /// Currency the catalog is priced in, if it has any products.
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }

    /// Snapshot of every product in the fixture.
    pub fn snapshot(&self) -> CatalogSnapshot<'static> {
        self.products.iter().cloned().collect()
    }
}
