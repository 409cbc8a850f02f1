//! Storefront services: catalog, carts, orders, payments and checkout, wired
//! over in-memory or file-backed storage.

pub mod config;
pub mod context;
pub mod domain;
pub mod observability;
pub mod uuids;

#[cfg(test)]
mod test;
