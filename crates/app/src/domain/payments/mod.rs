//! Payments

pub mod errors;
pub mod gateway;
pub mod simulated;

pub use errors::PaymentError;
pub use gateway::*;
pub use simulated::{SimulatedGateway, SimulatedOutcome};
