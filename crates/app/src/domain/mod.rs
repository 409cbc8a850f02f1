//! Storefront Domain Concerns

pub mod carts;
pub mod checkout;
pub mod orders;
pub mod payments;
pub mod products;
pub mod users;
