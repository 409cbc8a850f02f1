//! Terminal tables for catalog, cart and order output.

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use storefront::{
    fixtures::products::parse_currency,
    pricing::{PriceBreakdown, line_total},
    products::Product,
    reconcile::Reconciliation,
};
use storefront_app::domain::{checkout::CheckoutSummary, orders::OrderRecord};

pub(crate) fn write_catalog(out: &mut impl io::Write, products: &[Product<'_>]) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "The catalog is empty.");
    }

    let mut builder = Builder::default();
    builder.push_record(["Id", "Name", "Price", "Stock"]);

    for product in products {
        let stock = if product.is_in_stock() {
            product.stock.to_string()
        } else {
            "sold out".to_string()
        };

        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.price.to_string(),
            stock,
        ]);
    }

    write_table(out, builder, 2..4)
}

pub(crate) fn write_cart(
    out: &mut impl io::Write,
    reconciliation: &Reconciliation<'_>,
    breakdown: &PriceBreakdown<'_>,
) -> io::Result<()> {
    for note in &reconciliation.notes {
        writeln!(out, "! {note}")?;
    }

    if reconciliation.cart.is_empty() {
        return writeln!(out, "Your cart is empty.");
    }

    let mut builder = Builder::default();
    builder.push_record(["Product", "Unit Price", "Qty", "Total"]);

    for line in reconciliation.cart.lines() {
        let total = line_total(line).map_or_else(|_err| "-".to_string(), |m| m.to_string());

        builder.push_record([
            line.product.name.clone(),
            line.product.price.to_string(),
            line.quantity().to_string(),
            total,
        ]);
    }

    write_table(out, builder, 1..4)?;
    write_breakdown(out, breakdown)
}

pub(crate) fn write_summary(out: &mut impl io::Write, summary: &CheckoutSummary) -> io::Result<()> {
    write_cart(
        out,
        &Reconciliation {
            cart: summary.cart.clone(),
            notes: summary.notes.clone(),
        },
        &summary.breakdown,
    )?;

    writeln!(out, "Checkout: {}", summary.state)
}

pub(crate) fn write_order(out: &mut impl io::Write, order: &OrderRecord) -> io::Result<()> {
    let currency = parse_currency(&order.currency).ok();

    writeln!(out, "Order {}", order.uuid)?;
    writeln!(out, "Payment reference: {}", order.payment_reference)?;
    writeln!(
        out,
        "Ship to: {}, {}, {} {}",
        order.shipping_details.name,
        order.shipping_details.address,
        order.shipping_details.city,
        order.shipping_details.postal_code
    )?;

    let mut builder = Builder::default();
    builder.push_record(["Product", "Unit Price", "Qty"]);

    for line in &order.lines {
        builder.push_record([
            line.name.clone(),
            amount(line.unit_price, currency),
            line.quantity.to_string(),
        ]);
    }

    write_table(out, builder, 1..3)?;

    for (label, minor) in [
        ("Subtotal", order.amounts.subtotal),
        ("Tax", order.amounts.tax),
        ("Shipping", order.amounts.shipping),
        ("Total", order.amounts.total),
    ] {
        writeln!(out, "{label:>9}: {}", amount(minor, currency))?;
    }

    Ok(())
}

pub(crate) fn write_orders(out: &mut impl io::Write, orders: &[OrderRecord]) -> io::Result<()> {
    if orders.is_empty() {
        return writeln!(out, "No orders yet.");
    }

    let mut builder = Builder::default();
    builder.push_record(["Order", "Placed", "Units", "Total", "Status"]);

    for order in orders {
        let currency = parse_currency(&order.currency).ok();

        builder.push_record([
            order.uuid.to_string(),
            order.created_at.to_string(),
            order.units().to_string(),
            amount(order.amounts.total, currency),
            format!("{:?}", order.status).to_lowercase(),
        ]);
    }

    write_table(out, builder, 2..4)
}

fn write_breakdown(out: &mut impl io::Write, breakdown: &PriceBreakdown<'_>) -> io::Result<()> {
    for (label, money) in [
        ("Subtotal", breakdown.subtotal),
        ("Tax", breakdown.tax),
        ("Shipping", breakdown.shipping),
        ("Total", breakdown.total),
    ] {
        writeln!(out, "{label:>9}: {money}")?;
    }

    Ok(())
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    right_aligned: std::ops::Range<usize>,
) -> io::Result<()> {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(right_aligned), Alignment::right());

    writeln!(out, "{table}")
}

/// Minor units shown as money when the currency is known.
fn amount(minor: i64, currency: Option<&'static Currency>) -> String {
    match currency {
        Some(currency) => Money::from_minor(minor, currency).to_string(),
        None => minor.to_string(),
    }
}
