//! Checkout errors.

use thiserror::Error;

use storefront::{pricing::PricingError, reconcile::StockShortfall, shipping::ShippingFormErrors};

use crate::domain::{
    carts::CartsServiceError,
    orders::{OrderRecord, OrdersServiceError},
    payments::PaymentError,
    products::CatalogError,
};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error(transparent)]
    InvalidShippingForm(#[from] ShippingFormErrors),

    /// Stock no longer covers the cart. Nothing was written.
    #[error("{}", describe(.shortfalls))]
    StockInsufficient { shortfalls: Vec<StockShortfall> },

    /// Paid, but the order could not be stored. The cart was left untouched.
    #[error("order could not be saved")]
    OrderWriteFailed(#[source] OrdersServiceError),

    #[error("payment could not be started: {0}")]
    PaymentNotInitialized(String),

    #[error("payment was cancelled")]
    PaymentCancelled,

    #[error("payment failed")]
    Payment(#[source] PaymentError),

    #[error("a payment is already in progress")]
    CheckoutInProgress,

    /// The order is durable but the cart still holds its items.
    #[error("order {} placed but the cart could not be cleared", .order.uuid)]
    CartNotCleared {
        order: Box<OrderRecord>,
        #[source]
        source: CartsServiceError,
    },

    #[error(transparent)]
    Cart(#[from] CartsServiceError),

    #[error("catalog lookup failed")]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

impl From<PaymentError> for CheckoutError {
    fn from(error: PaymentError) -> Self {
        match error {
            PaymentError::NotInitialized(reason) => Self::PaymentNotInitialized(reason),
            other => Self::Payment(other),
        }
    }
}

fn describe(shortfalls: &[StockShortfall]) -> String {
    shortfalls
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
