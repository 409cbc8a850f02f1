//! Pricing
//!
//! Order totals are always computed from the reconciled cart handed in, never
//! from a cached figure, so the catalog prices at read time are what gets charged.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::reconcile::{CartLine, ReconciledCart};

/// Flat shipping charge in major units.
pub const STANDARD_SHIPPING: i64 = 500;

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// An amount did not fit in minor units.
    #[error("amount overflowed while pricing the cart")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Tax and shipping rules applied on top of the cart subtotal.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingPolicy<'a> {
    tax_rate: Decimal,
    flat_shipping: Money<'a, Currency>,
}

impl<'a> PricingPolicy<'a> {
    /// Create a policy from a tax rate and a flat shipping charge.
    ///
    /// The shipping charge also fixes the currency carts are priced in.
    pub fn new(tax_rate: Percentage, flat_shipping: Money<'a, Currency>) -> Self {
        Self {
            tax_rate: tax_rate * Decimal::ONE,
            flat_shipping,
        }
    }

    /// 7.5% tax and a flat shipping charge of 500 in the given currency.
    pub fn standard(currency: &'a Currency) -> Self {
        Self::new(
            Percentage::from(Decimal::new(75, 3)),
            Money::from_major(STANDARD_SHIPPING, currency),
        )
    }

    /// Tax rate as a fraction (0.075 for 7.5%).
    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Flat shipping charge for non-empty orders.
    pub fn flat_shipping(&self) -> Money<'a, Currency> {
        self.flat_shipping
    }

    /// Currency carts are priced in.
    pub fn currency(&self) -> &'a Currency {
        self.flat_shipping.currency()
    }

    /// Price a reconciled cart.
    ///
    /// # Errors
    ///
    /// - [`PricingError::Money`]: a product is priced in another currency.
    /// - [`PricingError::Overflow`]: a line or tax amount does not fit.
    pub fn price(&self, cart: &ReconciledCart<'a>) -> Result<PriceBreakdown<'a>, PricingError> {
        let subtotal = cart.lines().iter().try_fold(
            Money::from_minor(0, self.currency()),
            |acc, line| -> Result<_, PricingError> { Ok(acc.add(line_total(line)?)?) },
        )?;

        self.breakdown(subtotal)
    }

    /// Derive tax, shipping and total from a subtotal.
    ///
    /// # Errors
    ///
    /// - [`PricingError::Money`]: `subtotal` is in another currency.
    /// - [`PricingError::Overflow`]: the tax amount does not fit.
    pub fn breakdown(
        &self,
        subtotal: Money<'a, Currency>,
    ) -> Result<PriceBreakdown<'a>, PricingError> {
        let subtotal_minor = subtotal.to_minor_units();

        let tax = Money::from_minor(
            rate_of_minor(self.tax_rate, subtotal_minor)?,
            subtotal.currency(),
        );

        let shipping = if subtotal_minor > 0 {
            self.flat_shipping
        } else {
            Money::from_minor(0, self.currency())
        };

        let total = subtotal.add(tax)?.add(shipping)?;

        Ok(PriceBreakdown {
            subtotal,
            tax,
            shipping,
            total,
        })
    }
}

/// Derived order amounts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBreakdown<'a> {
    /// Sum of line totals
    pub subtotal: Money<'a, Currency>,

    /// Tax on the subtotal
    pub tax: Money<'a, Currency>,

    /// Shipping charge
    pub shipping: Money<'a, Currency>,

    /// Amount to charge
    pub total: Money<'a, Currency>,
}

/// Price of a cart line: unit price times quantity.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] when the product does not fit in minor units.
pub fn line_total<'a>(line: &CartLine<'a>) -> Result<Money<'a, Currency>, PricingError> {
    let minor = line
        .product
        .price
        .to_minor_units()
        .checked_mul(i64::from(line.quantity()))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, line.product.price.currency()))
}

/// Apply a fractional rate to a minor unit amount, rounding half away from zero.
fn rate_of_minor(rate: Decimal, minor: i64) -> Result<i64, PricingError> {
    let Some(minor) = Decimal::from_i64(minor) else {
        unreachable!("always returns `Some` for every `i64`")
    };

    rate.checked_mul(minor)
        .map(|applied| applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_i64())
        .ok_or(PricingError::Overflow)
}
