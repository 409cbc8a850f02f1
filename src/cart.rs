//! Cart

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::products::ProductId;

/// Errors raised while building or mutating a cart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Quantities must be at least one.
    #[error("quantity for product {0} must be at least 1")]
    InvalidQuantity(ProductId),

    /// The same product appears twice in a persisted cart.
    #[error("product {0} appears more than once")]
    DuplicateProduct(ProductId),

    /// Merging quantities would overflow.
    #[error("quantity for product {0} is too large")]
    QuantityOverflow(ProductId),

    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),
}

/// A single cart selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    product_id: ProductId,
    quantity: NonZeroU32,
}

impl CartEntry {
    /// Create an entry for the given product.
    pub fn new(product_id: ProductId, quantity: NonZeroU32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }

    /// Create an entry from a raw quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] when `quantity` is zero.
    pub fn try_new(product_id: ProductId, quantity: u32) -> Result<Self, CartError> {
        match NonZeroU32::new(quantity) {
            Some(quantity) => Ok(Self::new(product_id, quantity)),
            None => Err(CartError::InvalidQuantity(product_id)),
        }
    }

    /// The product this entry selects.
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Number of units selected.
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }
}

/// Cart
///
/// Entries are unique by product and keep the order they were first added in.
/// Adding a product that is already present increments its quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartEntry>", into = "Vec<CartEntry>")]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Iterate over the entries.
    pub fn iter(&self) -> impl Iterator<Item = &CartEntry> {
        self.entries.iter()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cart has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entry quantities.
    pub fn total_quantity(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity())).sum()
    }

    /// Quantity selected for a product, if present.
    pub fn quantity_of(&self, product_id: &ProductId) -> Option<u32> {
        self.entry(product_id).map(CartEntry::quantity)
    }

    /// Entry for a product, if present.
    pub fn entry(&self, product_id: &ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.product_id == *product_id)
    }

    /// Add units of a product, merging with an existing entry.
    ///
    /// Returns the product's quantity after the merge.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero.
    /// - [`CartError::QuantityOverflow`]: the merged quantity does not fit.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) -> Result<u32, CartError> {
        let Some(quantity) = NonZeroU32::new(quantity) else {
            return Err(CartError::InvalidQuantity(product_id));
        };

        if let Some(entry) = self.entries.iter_mut().find(|e| e.product_id == product_id) {
            entry.quantity = entry
                .quantity
                .checked_add(quantity.get())
                .ok_or(CartError::QuantityOverflow(product_id))?;

            return Ok(entry.quantity());
        }

        self.entries.push(CartEntry::new(product_id, quantity));

        Ok(quantity.get())
    }

    /// Set the quantity of a product already in the cart; zero removes it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] when the product has no entry.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> Result<(), CartError> {
        let Some(position) = self.entries.iter().position(|e| e.product_id == *product_id) else {
            return Err(CartError::NotInCart(product_id.clone()));
        };

        match NonZeroU32::new(quantity) {
            Some(quantity) => {
                if let Some(entry) = self.entries.get_mut(position) {
                    entry.quantity = quantity;
                }
            }
            None => {
                self.entries.remove(position);
            }
        }

        Ok(())
    }

    /// Remove a product's entry, returning it.
    pub fn remove(&mut self, product_id: &ProductId) -> Option<CartEntry> {
        let position = self.entries.iter().position(|e| e.product_id == *product_id)?;

        Some(self.entries.remove(position))
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl TryFrom<Vec<CartEntry>> for Cart {
    type Error = CartError;

    fn try_from(entries: Vec<CartEntry>) -> Result<Self, Self::Error> {
        for (i, entry) in entries.iter().enumerate() {
            let seen_before = entries
                .iter()
                .take(i)
                .any(|earlier| earlier.product_id == entry.product_id);

            if seen_before {
                return Err(CartError::DuplicateProduct(entry.product_id.clone()));
            }
        }

        Ok(Self { entries })
    }
}

impl From<Cart> for Vec<CartEntry> {
    fn from(cart: Cart) -> Self {
        cart.entries
    }
}

impl<'c> IntoIterator for &'c Cart {
    type Item = &'c CartEntry;
    type IntoIter = std::slice::Iter<'c, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
