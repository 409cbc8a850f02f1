//! Integration tests for checkout arithmetic.
//!
//! Totals use a flat 7.5% tax and 500 NGN shipping on any non-empty order:
//!
//! - 3 x p1 (1000 NGN) = 3000 subtotal, 225 tax, 500 shipping, 3725 total
//! - 10000 subtotal = 750 tax, 500 shipping, 11250 total

use rusty_money::{Money, iso::NGN};
use testresult::TestResult;

use storefront::prelude::*;

#[test]
fn totals_for_reconciled_fixture_cart() -> TestResult {
    let catalog = CatalogFixture::load("fixtures/products/storefront.yml")?.snapshot();

    let mut cart = Cart::new();
    cart.add("p1".into(), 3)?;

    let reconciled = reconcile(&cart, &catalog);
    let breakdown = PricingPolicy::standard(NGN).price(&reconciled.cart)?;

    assert_eq!(breakdown.subtotal, Money::from_major(3_000, NGN));
    assert_eq!(breakdown.tax, Money::from_major(225, NGN));
    assert_eq!(breakdown.shipping, Money::from_major(500, NGN));
    assert_eq!(breakdown.total, Money::from_major(3_725, NGN));

    Ok(())
}

#[test]
fn totals_follow_flat_rate_rules() -> TestResult {
    let policy = PricingPolicy::standard(NGN);

    // (subtotal, tax, shipping, total) in kobo
    for (subtotal, tax, shipping, total) in [
        (0, 0, 0, 0),
        (1_000_000, 75_000, 50_000, 1_125_000),
        (300_000, 22_500, 50_000, 372_500),
        (100, 8, 50_000, 50_108),
    ] {
        let breakdown = policy.breakdown(Money::from_minor(subtotal, NGN))?;

        assert_eq!(breakdown.tax, Money::from_minor(tax, NGN), "tax on {subtotal}");
        assert_eq!(breakdown.shipping, Money::from_minor(shipping, NGN), "shipping on {subtotal}");
        assert_eq!(breakdown.total, Money::from_minor(total, NGN), "total on {subtotal}");
    }

    Ok(())
}

#[test]
fn fractional_prices_round_tax_to_minor_units() -> TestResult {
    let catalog = CatalogFixture::load("fixtures/products/storefront.yml")?.snapshot();

    let mut cart = Cart::new();
    cart.add("p3".into(), 1)?;

    let breakdown = PricingPolicy::standard(NGN).price(&reconcile(&cart, &catalog).cart)?;

    // 7.5% of 4750.50 is 356.2875, which rounds to 356.29.
    assert_eq!(breakdown.tax, Money::from_minor(35_629, NGN));
    assert_eq!(breakdown.total, Money::from_minor(475_050 + 35_629 + 50_000, NGN));

    Ok(())
}
