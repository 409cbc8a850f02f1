//! Order Records

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use storefront::{
    pricing::PriceBreakdown, products::ProductId, reconcile::ReconciledCart,
    shipping::ShippingDetails,
};

use crate::{domain::users::UserId, uuids::TypedUuid};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Lifecycle status of a stored order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Paid for and committed.
    Completed,
}

/// A purchased product, frozen at the price charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price in minor units
    pub unit_price: i64,
    pub quantity: u32,
}

/// Amounts charged, in minor units of the order currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAmounts {
    pub subtotal: i64,
    pub tax: i64,
    pub shipping: i64,
    pub total: i64,
}

impl From<&PriceBreakdown<'_>> for OrderAmounts {
    fn from(breakdown: &PriceBreakdown<'_>) -> Self {
        Self {
            subtotal: breakdown.subtotal.to_minor_units(),
            tax: breakdown.tax.to_minor_units(),
            shipping: breakdown.shipping.to_minor_units(),
            total: breakdown.total.to_minor_units(),
        }
    }
}

/// An immutable record of a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub user_id: UserId,
    pub lines: Vec<OrderLine>,
    /// ISO 4217 code of the amounts
    pub currency: String,
    pub amounts: OrderAmounts,
    pub shipping_details: ShippingDetails,
    /// Reference the payment gateway issued for the charge
    pub payment_reference: String,
    pub status: OrderStatus,
    pub created_at: Timestamp,
}

impl OrderRecord {
    /// Build a completed order from a priced cart, under a fresh id.
    pub fn completed(
        user_id: UserId,
        cart: &ReconciledCart<'_>,
        breakdown: &PriceBreakdown<'_>,
        shipping_details: ShippingDetails,
        payment_reference: String,
    ) -> Self {
        let lines = cart
            .lines()
            .iter()
            .map(|line| OrderLine {
                product_id: line.product.id.clone(),
                name: line.product.name.clone(),
                unit_price: line.product.price.to_minor_units(),
                quantity: line.quantity(),
            })
            .collect();

        Self {
            uuid: OrderUuid::new(),
            user_id,
            lines,
            currency: breakdown.total.currency().iso_alpha_code.to_string(),
            amounts: breakdown.into(),
            shipping_details,
            payment_reference,
            status: OrderStatus::Completed,
            created_at: Timestamp::now(),
        }
    }

    /// Total units across all lines.
    pub fn units(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}
