//! Cart Documents
//!
//! A cart is persisted as a JSON array of `{productId, quantity}` objects.
//! Documents are parsed and validated on read; anything that does not describe
//! a valid cart (bad encoding, zero quantities, duplicate products, wrong
//! shape) is rejected.

use storefront::cart::Cart;

pub(super) fn decode(document: &[u8]) -> Result<Cart, serde_json::Error> {
    serde_json::from_slice(document)
}

pub(super) fn encode(cart: &Cart) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(cart)
}
