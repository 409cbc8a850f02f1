//! Products

use std::{borrow::Borrow, fmt};

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Product identifier, opaque to the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap a catalog identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Catalog identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Unit price
    pub price: Money<'a, Currency>,

    /// Purchasable units currently in stock
    pub stock: u32,

    /// Reference to the product image held by the media service
    pub image_ref: String,
}

impl Product<'_> {
    /// Whether at least one unit can be bought.
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Read access to product records by id.
pub trait ProductLookup<'a> {
    /// Returns the product with the given id, if the catalog still has it.
    fn product(&self, id: &ProductId) -> Option<&Product<'a>>;
}

/// Point-in-time copy of the catalog records a cart refers to.
///
/// Reconciliation runs against a snapshot so that the same inputs always
/// produce the same cart, whatever the live catalog does in the meantime.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot<'a> {
    products: FxHashMap<ProductId, Product<'a>>,
}

impl<'a> CatalogSnapshot<'a> {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a product, returning the previous record.
    pub fn insert(&mut self, product: Product<'a>) -> Option<Product<'a>> {
        self.products.insert(product.id.clone(), product)
    }

    /// Number of products in the snapshot.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the snapshot holds no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Iterate over the products in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Product<'a>> {
        self.products.values()
    }
}

impl<'a> ProductLookup<'a> for CatalogSnapshot<'a> {
    fn product(&self, id: &ProductId) -> Option<&Product<'a>> {
        self.products.get(id)
    }
}

impl<'a> FromIterator<Product<'a>> for CatalogSnapshot<'a> {
    fn from_iter<I: IntoIterator<Item = Product<'a>>>(iter: I) -> Self {
        let mut snapshot = Self::new();

        for product in iter {
            snapshot.insert(product);
        }

        snapshot
    }
}
