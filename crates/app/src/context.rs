//! App Context

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use storefront::{
    fixtures::{CatalogFixture, FixtureError},
    pricing::PricingPolicy,
};

use crate::{
    config::{AppConfig, PricingConfigError},
    domain::{
        carts::{CartStore, CartsService, repository::FileCartRepository},
        checkout::CheckoutOrchestrator,
        orders::{FileOrderStore, OrderStore},
        payments::PaymentGateway,
        products::{InMemoryCatalog, ProductCatalog},
        users::UserId,
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to load product catalog")]
    Catalog(#[source] FixtureError),

    #[error("invalid pricing configuration")]
    Pricing(#[from] PricingConfigError),
}

/// Wired storefront services.
#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn ProductCatalog>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrderStore>,
    pub payments: Arc<dyn PaymentGateway>,
    pub pricing: PricingPolicy<'static>,
}

impl AppContext {
    /// Build file-backed services from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog cannot be loaded or the pricing
    /// settings are invalid.
    pub fn from_config(
        config: &AppConfig,
        payments: Arc<dyn PaymentGateway>,
    ) -> Result<Self, AppInitError> {
        let pricing = config.pricing.policy()?;
        let fixture =
            CatalogFixture::load(&config.storage.catalog).map_err(AppInitError::Catalog)?;

        info!(
            catalog = %config.storage.catalog.display(),
            products = fixture.products().len(),
            data_dir = %config.storage.data_dir.display(),
            "storefront initialised"
        );

        Ok(Self {
            catalog: Arc::new(InMemoryCatalog::from_fixture(fixture)),
            carts: Arc::new(CartStore::new(Arc::new(FileCartRepository::new(
                config.storage.carts_dir(),
            )))),
            orders: Arc::new(FileOrderStore::new(config.storage.orders_dir())),
            payments,
            pricing,
        })
    }

    /// A checkout session for `user` over these services.
    #[must_use]
    pub fn checkout_for(&self, user: UserId) -> CheckoutOrchestrator {
        CheckoutOrchestrator::new(
            user,
            Arc::clone(&self.carts),
            Arc::clone(&self.catalog),
            Arc::clone(&self.orders),
            Arc::clone(&self.payments),
            self.pricing.clone(),
        )
    }
}
