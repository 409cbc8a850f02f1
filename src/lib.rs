//! Storefront
//!
//! Cart, reconciliation and checkout arithmetic for the storefront. The crate
//! is pure: it never touches storage, the catalog service or the payment
//! gateway, it only decides what a cart means given a catalog snapshot.

pub mod cart;
pub mod fixtures;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod reconcile;
pub mod shipping;
