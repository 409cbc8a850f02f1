//! Carts

mod documents;
pub mod errors;
pub mod events;
pub mod mutations;
pub mod repository;
pub mod service;

pub use errors::{CartsServiceError, PersistenceError};
pub use events::CartChanged;
pub use service::*;
