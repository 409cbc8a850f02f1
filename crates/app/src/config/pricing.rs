//! Pricing Config

use clap::Args;
use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::Money;
use thiserror::Error;

use storefront::{
    fixtures::{FixtureError, products::parse_currency},
    pricing::PricingPolicy,
};

#[derive(Debug, Error)]
pub enum PricingConfigError {
    #[error("tax rate must be between 0% and 100%, got {0}")]
    TaxRate(Decimal),

    #[error("shipping charge must not be negative, got {0}")]
    Shipping(Decimal),

    #[error(transparent)]
    Currency(#[from] FixtureError),
}

/// Tax, shipping and currency settings.
#[derive(Debug, Args)]
pub struct PricingConfig {
    /// Tax rate in percent, e.g. `7.5` or `7.5%`
    #[arg(
        long,
        env = "STOREFRONT_TAX_RATE",
        default_value = "7.5",
        value_parser = parse_percent
    )]
    pub tax_rate: Decimal,

    /// Flat shipping charge in major units for non-empty orders
    #[arg(long, env = "STOREFRONT_SHIPPING", default_value = "500")]
    pub shipping: Decimal,

    /// ISO currency code carts are priced in
    #[arg(long, env = "STOREFRONT_CURRENCY", default_value = "NGN")]
    pub currency: String,
}

impl PricingConfig {
    /// Build the pricing policy these settings describe.
    ///
    /// # Errors
    ///
    /// Returns an error for an out-of-range tax rate, a negative shipping
    /// charge, or an unsupported currency.
    pub fn policy(&self) -> Result<PricingPolicy<'static>, PricingConfigError> {
        if self.tax_rate.is_sign_negative() || self.tax_rate > Decimal::ONE_HUNDRED {
            return Err(PricingConfigError::TaxRate(self.tax_rate));
        }

        if self.shipping.is_sign_negative() {
            return Err(PricingConfigError::Shipping(self.shipping));
        }

        let currency = parse_currency(&self.currency)?;

        Ok(PricingPolicy::new(
            Percentage::from(self.tax_rate / Decimal::ONE_HUNDRED),
            Money::from_decimal(self.shipping, currency),
        ))
    }
}

fn parse_percent(value: &str) -> Result<Decimal, String> {
    value
        .trim()
        .trim_end_matches('%')
        .trim()
        .parse::<Decimal>()
        .map_err(|err| format!("invalid percentage {value:?}: {err}"))
}
