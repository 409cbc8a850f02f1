//! Test Helpers

use rusty_money::{Money, iso::NGN};
use storefront::{
    cart::Cart,
    pricing::PricingPolicy,
    products::{CatalogSnapshot, Product},
    reconcile::reconcile,
    shipping::ShippingDetails,
};

use crate::domain::orders::OrderRecord;

/// A product named `Product <id>` priced in whole naira.
pub(crate) fn product(id: &str, naira: i64, stock: u32) -> Product<'static> {
    Product {
        id: id.into(),
        name: format!("Product {id}"),
        price: Money::from_major(naira, NGN),
        stock,
        image_ref: String::new(),
    }
}

/// A shipping form that passes validation.
pub(crate) fn shipping_details() -> ShippingDetails {
    ShippingDetails {
        name: "Ada Obi".to_string(),
        email: "ada@example.com".to_string(),
        address: "12 Marina Road".to_string(),
        city: "Lagos".to_string(),
        postal_code: "101001".to_string(),
        phone: None,
    }
}

/// A completed order of one `p1` for the given user, under a fresh id.
pub(crate) fn order_for(user: &str) -> OrderRecord {
    let snapshot: CatalogSnapshot<'static> = [product("p1", 1_000, 5)].into_iter().collect();

    let mut cart = Cart::new();
    cart.add("p1".into(), 1).expect("adding to an empty cart should succeed");

    let reconciled = reconcile(&cart, &snapshot).cart;
    let breakdown = PricingPolicy::standard(NGN)
        .price(&reconciled)
        .expect("pricing a single naira line should succeed");

    OrderRecord::completed(
        user.into(),
        &reconciled,
        &breakdown,
        shipping_details(),
        format!("SIM-{user}"),
    )
}
