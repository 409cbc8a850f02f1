//! Checkout

pub mod errors;
pub mod service;
pub mod state;

pub use errors::CheckoutError;
pub use service::*;
pub use state::CheckoutState;
