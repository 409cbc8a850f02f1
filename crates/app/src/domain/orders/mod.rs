//! Orders

pub mod errors;
pub mod records;
pub mod service;

pub use errors::OrdersServiceError;
pub use records::{OrderAmounts, OrderLine, OrderRecord, OrderStatus, OrderUuid};
pub use service::*;
