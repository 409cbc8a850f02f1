//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartEntry, CartError},
    fixtures::{CatalogFixture, FixtureError},
    pricing::{PriceBreakdown, PricingError, PricingPolicy, line_total},
    products::{CatalogSnapshot, Product, ProductId, ProductLookup},
    reconcile::{
        CartLine, NoteKind, ReconciledCart, Reconciliation, ReconciliationNote, StockShortfall,
        check_stock, reconcile,
    },
    shipping::{FieldError, FieldProblem, ShippingDetails, ShippingField, ShippingFormErrors},
};
