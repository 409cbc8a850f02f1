//! Cart Reconciliation
//!
//! Corrects a possibly stale cart against catalog truth before anything is
//! priced or charged. Products that disappeared are dropped, quantities above
//! stock are clamped (or dropped when nothing is left) and every change is
//! reported as a [`ReconciliationNote`] so the caller can tell the shopper.

use std::{fmt, num::NonZeroU32};

use crate::{
    cart::{Cart, CartEntry},
    products::{Product, ProductId, ProductLookup},
};

/// What reconciliation did to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    /// The product no longer exists; the entry was dropped.
    ProductRemoved,

    /// Stock fell below the requested quantity; the entry was clamped.
    StockReduced,

    /// The product has no stock left; the entry was dropped.
    OutOfStock,
}

/// A change made to the cart during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationNote {
    /// Kind of change
    pub kind: NoteKind,

    /// Product the change applies to
    pub product_id: ProductId,

    /// Quantity the cart asked for
    pub requested: u32,

    /// Quantity the catalog can supply
    pub available: u32,
}

impl fmt::Display for ReconciliationNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NoteKind::ProductRemoved => {
                write!(f, "{} is no longer available", self.product_id)
            }
            NoteKind::StockReduced => write!(
                f,
                "Only {} units of {} available; quantity reduced from {}",
                self.available, self.product_id, self.requested
            ),
            NoteKind::OutOfStock => write!(f, "{} is out of stock", self.product_id),
        }
    }
}

/// A cart entry joined with the product record it was checked against.
///
/// The product is a display snapshot: it is rebuilt on every reconciliation
/// and carries no authority between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    /// The (possibly clamped) entry
    pub entry: CartEntry,

    /// Catalog record at reconciliation time
    pub product: Product<'a>,
}

impl CartLine<'_> {
    /// Units selected on this line.
    pub fn quantity(&self) -> u32 {
        self.entry.quantity()
    }
}

/// A cart whose every entry resolved against the catalog within stock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciledCart<'a> {
    lines: Vec<CartLine<'a>>,
}

impl<'a> ReconciledCart<'a> {
    /// Lines in the original cart order.
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no entries survived.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The plain cart to persist.
    pub fn to_cart(&self) -> Cart {
        let entries: Vec<CartEntry> = self.lines.iter().map(|l| l.entry.clone()).collect();

        // Lines come from a cart, so products are already unique.
        Cart::try_from(entries).unwrap_or_default()
    }
}

/// Output of [`reconcile`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation<'a> {
    /// The cleaned cart
    pub cart: ReconciledCart<'a>,

    /// Changes made, in cart order
    pub notes: Vec<ReconciliationNote>,
}

impl Reconciliation<'_> {
    /// Whether the input cart needed no changes.
    pub fn is_clean(&self) -> bool {
        self.notes.is_empty()
    }
}

/// Reconcile a cart against a catalog.
///
/// Pure and idempotent: reconciling the resulting cart again against the same
/// catalog yields the same cart and no notes.
pub fn reconcile<'a, L>(cart: &Cart, catalog: &L) -> Reconciliation<'a>
where
    L: ProductLookup<'a> + ?Sized,
{
    let mut lines = Vec::with_capacity(cart.len());
    let mut notes = Vec::new();

    for entry in cart {
        let requested = entry.quantity();

        let Some(product) = catalog.product(entry.product_id()) else {
            notes.push(ReconciliationNote {
                kind: NoteKind::ProductRemoved,
                product_id: entry.product_id().clone(),
                requested,
                available: 0,
            });

            continue;
        };

        if requested <= product.stock {
            lines.push(CartLine {
                entry: entry.clone(),
                product: product.clone(),
            });

            continue;
        }

        let Some(available) = NonZeroU32::new(product.stock) else {
            notes.push(ReconciliationNote {
                kind: NoteKind::OutOfStock,
                product_id: entry.product_id().clone(),
                requested,
                available: 0,
            });

            continue;
        };

        notes.push(ReconciliationNote {
            kind: NoteKind::StockReduced,
            product_id: entry.product_id().clone(),
            requested,
            available: available.get(),
        });

        lines.push(CartLine {
            entry: CartEntry::new(entry.product_id().clone(), available),
            product: product.clone(),
        });
    }

    Reconciliation {
        cart: ReconciledCart { lines },
        notes,
    }
}

/// A cart entry that the catalog can no longer satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockShortfall {
    /// Product that is short
    pub product_id: ProductId,

    /// Product name, when the product still exists
    pub name: Option<String>,

    /// Quantity in the cart
    pub requested: u32,

    /// Quantity the catalog can supply
    pub available: u32,
}

impl fmt::Display for StockShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or(self.product_id.as_str());

        write!(f, "Only {} units of {name} available", self.available)
    }
}

/// Check every entry of a cart against the catalog without altering it.
///
/// Unlike [`reconcile`], nothing is clamped: any entry above stock (or whose
/// product vanished) is reported.
pub fn check_stock<'a, L>(cart: &Cart, catalog: &L) -> Vec<StockShortfall>
where
    L: ProductLookup<'a> + ?Sized,
{
    cart.iter()
        .filter_map(|entry| {
            let requested = entry.quantity();

            match catalog.product(entry.product_id()) {
                Some(product) if requested <= product.stock => None,
                Some(product) => Some(StockShortfall {
                    product_id: entry.product_id().clone(),
                    name: Some(product.name.clone()),
                    requested,
                    available: product.stock,
                }),
                None => Some(StockShortfall {
                    product_id: entry.product_id().clone(),
                    name: None,
                    requested,
                    available: 0,
                }),
            }
        })
        .collect()
}
