//! Integration tests for cart reconciliation against the storefront fixture catalog.
//!
//! Catalog (`fixtures/products/storefront.yml`):
//!
//! - p1: Ankara Tote Bag, 1000 NGN, 5 in stock
//! - p2: Coral Bead Necklace, 2500 NGN, out of stock
//! - p3: Adire Silk Scarf, 4750.50 NGN, 12 in stock
//! - p4: Leather Sandals, 8200 NGN, 2 in stock

use testresult::TestResult;

use storefront::prelude::*;

fn catalog() -> Result<CatalogSnapshot<'static>, FixtureError> {
    Ok(CatalogFixture::load("fixtures/products/storefront.yml")?.snapshot())
}

fn cart(entries: &[(&str, u32)]) -> Result<Cart, CartError> {
    let mut cart = Cart::new();

    for (id, quantity) in entries {
        cart.add((*id).into(), *quantity)?;
    }

    Ok(cart)
}

#[test]
fn reconciliation_is_idempotent() -> TestResult {
    let catalog = catalog()?;

    let carts = [
        cart(&[])?,
        cart(&[("p1", 3)])?,
        cart(&[("p1", 9), ("p2", 1), ("p3", 12), ("p4", 3), ("unknown", 1)])?,
        cart(&[("p4", 2), ("p2", 4)])?,
    ];

    for original in &carts {
        let once = reconcile(original, &catalog);
        let twice = reconcile(&once.cart.to_cart(), &catalog);

        assert_eq!(twice.cart, once.cart, "second pass must not change the cart");
        assert!(twice.is_clean(), "second pass must not report changes");
    }

    Ok(())
}

#[test]
fn no_entry_survives_above_stock() -> TestResult {
    let catalog = catalog()?;

    let result = reconcile(
        &cart(&[("p1", 6), ("p3", 13), ("p4", 100), ("p2", 1)])?,
        &catalog,
    );

    for line in result.cart.lines() {
        let stock = catalog.product(&line.product.id).map_or(0, |p| p.stock);

        assert!(
            line.quantity() <= stock,
            "{} has {} units but only {stock} in stock",
            line.product.id,
            line.quantity()
        );
    }

    assert_eq!(result.cart.to_cart(), cart(&[("p1", 5), ("p3", 12), ("p4", 2)])?);

    Ok(())
}

#[test]
fn merging_adds_is_commutative_on_quantity() -> TestResult {
    let catalog = catalog()?;

    let mut split = Cart::new();
    split.add("p3".into(), 4)?;
    split.add("p3".into(), 7)?;

    let joined = cart(&[("p3", 11)])?;

    assert_eq!(split, joined);
    assert_eq!(
        reconcile(&split, &catalog).cart,
        reconcile(&joined, &catalog).cart
    );

    Ok(())
}

#[test]
fn out_of_stock_product_is_dropped_with_note() -> TestResult {
    let catalog = catalog()?;

    let result = reconcile(&cart(&[("p2", 2)])?, &catalog);

    assert!(result.cart.is_empty());
    assert_eq!(
        result.notes,
        [ReconciliationNote {
            kind: NoteKind::OutOfStock,
            product_id: "p2".into(),
            requested: 2,
            available: 0,
        }]
    );

    Ok(())
}

#[test]
fn entry_within_stock_is_unchanged() -> TestResult {
    let catalog = catalog()?;
    let original = cart(&[("p1", 3)])?;

    let result = reconcile(&original, &catalog);

    assert!(result.is_clean());
    assert_eq!(result.cart.to_cart(), original);
    assert_eq!(
        result.cart.lines().first().map(|l| l.product.name.as_str()),
        Some("Ankara Tote Bag")
    );

    Ok(())
}
