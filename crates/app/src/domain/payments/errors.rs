//! Payment errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// The gateway refused to start a payment.
    #[error("payment could not be initialized: {0}")]
    NotInitialized(String),

    #[error("payment gateway unreachable: {0}")]
    Unreachable(String),

    /// The gateway went away without reporting an outcome.
    #[error("payment was interrupted before an outcome was reported")]
    Interrupted,
}
