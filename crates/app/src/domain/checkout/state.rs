//! Checkout State

use std::fmt;

/// Where a user's checkout session stands.
///
/// `Idle` leads to `FormIncomplete` or `ReadyToPay`. Only `ReadyToPay` leads to
/// `PaymentInFlight`, which ends in `OrderCommitted`, `PaymentCancelled` or
/// `CommitFailed`. Every terminal state may start over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutState {
    #[default]
    Idle,
    FormIncomplete,
    ReadyToPay,
    PaymentInFlight,
    OrderCommitted,
    PaymentCancelled,
    CommitFailed,
}

impl CheckoutState {
    /// Whether a payment is being collected right now.
    pub fn is_in_flight(self) -> bool {
        self == Self::PaymentInFlight
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FormIncomplete => "form_incomplete",
            Self::ReadyToPay => "ready_to_pay",
            Self::PaymentInFlight => "payment_in_flight",
            Self::OrderCommitted => "order_committed",
            Self::PaymentCancelled => "payment_cancelled",
            Self::CommitFailed => "commit_failed",
        }
    }
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
