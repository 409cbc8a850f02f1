//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// File locations.
#[derive(Debug, Args)]
pub struct StorageConfig {
    /// Directory holding cart and order documents
    #[arg(long, env = "STOREFRONT_DATA_DIR", default_value = ".storefront")]
    pub data_dir: PathBuf,

    /// YAML product catalog
    #[arg(
        long,
        env = "STOREFRONT_CATALOG",
        default_value = "fixtures/products/storefront.yml"
    )]
    pub catalog: PathBuf,
}

impl StorageConfig {
    /// Directory of per-user cart documents.
    #[must_use]
    pub fn carts_dir(&self) -> PathBuf {
        self.data_dir.join("carts")
    }

    /// Directory of per-order documents.
    #[must_use]
    pub fn orders_dir(&self) -> PathBuf {
        self.data_dir.join("orders")
    }
}
