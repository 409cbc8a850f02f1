//! Storefront configuration.

use clap::Args;

pub mod logging;
pub mod pricing;
pub mod storage;

pub use logging::{LogFormat, LoggingConfig};
pub use pricing::{PricingConfig, PricingConfigError};
pub use storage::StorageConfig;

/// Settings shared by every storefront command.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Where carts, orders and the catalog live.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Tax, shipping and currency.
    #[command(flatten)]
    pub pricing: PricingConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
