//! Product Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::Deserialize;

use crate::{fixtures::FixtureError, products::Product};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product id -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Product price (e.g., "1000 NGN")
    pub price: String,

    /// Units in stock
    pub stock: u32,

    /// Image reference
    #[serde(default)]
    pub image: String,
}

impl ProductFixture {
    /// Build the catalog record for this fixture under the given id.
    ///
    /// # Errors
    ///
    /// Returns an error when the price cannot be parsed.
    pub fn into_product(self, id: String) -> Result<Product<'static>, FixtureError> {
        let (minor_units, currency) = parse_price(&self.price)?;

        Ok(Product {
            id: id.into(),
            name: self.name,
            price: Money::from_minor(minor_units, currency),
            stock: self.stock,
            image_ref: self.image,
        })
    }
}

/// Parse price string (e.g., "1000 NGN" or "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = parse_currency(currency_code)?;

    let minor_units = amount
        .checked_mul(Decimal::from(10_i64.pow(currency.exponent)))
        .and_then(|value| value.round_dp(0).to_i64())
        .filter(|value| *value >= 0)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

/// Resolve a supported ISO currency code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for codes the storefront does not sell in.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code {
        "NGN" => Ok(iso::NGN),
        "GBP" => Ok(iso::GBP),
        "USD" => Ok(iso::USD),
        "EUR" => Ok(iso::EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_whole_amounts() -> TestResult {
        assert_eq!(parse_price("1000 NGN")?, (100_000, iso::NGN));

        Ok(())
    }

    #[test]
    fn parses_fractional_amounts() -> TestResult {
        assert_eq!(parse_price("2.99 GBP")?, (299, iso::GBP));

        Ok(())
    }

    #[test]
    fn rejects_missing_currency() {
        assert!(matches!(
            parse_price("1000"),
            Err(FixtureError::InvalidPrice(_))
        ));
    }

    #[test]
    fn rejects_negative_amounts() {
        assert!(matches!(
            parse_price("-5 NGN"),
            Err(FixtureError::InvalidPrice(_))
        ));
    }

    #[test]
    fn rejects_unknown_currency() {
        assert!(matches!(
            parse_price("10 XYZ"),
            Err(FixtureError::UnknownCurrency(code)) if code == "XYZ"
        ));
    }
}
