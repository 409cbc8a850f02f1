//! Payment Gateway
//!
//! The storefront never sees card details. It hands the gateway an amount and
//! a payer, and later learns exactly one [`PaymentOutcome`] through the
//! [`PaymentHandle`] it got back.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use tokio::sync::oneshot;

use crate::domain::{payments::errors::PaymentError, users::UserId};

/// A charge the gateway is asked to collect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Amount in minor units of `currency`
    pub amount: i64,

    /// ISO 4217 currency code
    pub currency: String,

    /// Payer e-mail, for the gateway's receipt
    pub email: String,

    /// Shopper the charge is for
    pub user_id: UserId,

    /// Free-form details echoed back on the gateway's records
    pub metadata: FxHashMap<String, String>,
}

/// How a payment ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Funds collected; `reference` identifies the charge at the gateway.
    Succeeded { reference: String },

    /// The payer closed or abandoned the payment.
    Cancelled,
}

/// Pending result of an initiated payment.
#[derive(Debug)]
pub struct PaymentHandle {
    outcome: oneshot::Receiver<PaymentOutcome>,
}

impl PaymentHandle {
    /// A handle together with the resolver that will settle it.
    #[must_use]
    pub fn pending() -> (PaymentResolver, Self) {
        let (sender, outcome) = oneshot::channel();

        (PaymentResolver { sender }, Self { outcome })
    }

    /// A handle that is already settled.
    #[must_use]
    pub fn resolved(outcome: PaymentOutcome) -> Self {
        let (resolver, handle) = Self::pending();
        resolver.resolve(outcome);

        handle
    }

    /// Wait for the payment to settle.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Interrupted`] when the resolver was dropped
    /// without settling the payment.
    pub async fn outcome(self) -> Result<PaymentOutcome, PaymentError> {
        self.outcome.await.map_err(|_closed| PaymentError::Interrupted)
    }
}

/// Settles a [`PaymentHandle`]. Consumed on use, so a payment settles once.
#[derive(Debug)]
pub struct PaymentResolver {
    sender: oneshot::Sender<PaymentOutcome>,
}

impl PaymentResolver {
    /// Report the outcome. Silently ignored if the handle was dropped.
    pub fn resolve(self, outcome: PaymentOutcome) {
        // A dropped handle means nobody is waiting for this payment any more.
        if self.sender.send(outcome).is_err() {
            tracing::debug!("payment outcome reported after handle was dropped");
        }
    }

    pub fn succeed(self, reference: impl Into<String>) {
        self.resolve(PaymentOutcome::Succeeded {
            reference: reference.into(),
        });
    }

    pub fn cancel(self) {
        self.resolve(PaymentOutcome::Cancelled);
    }
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Start collecting a payment.
    ///
    /// Returning `Ok` means the payment UI is up; the outcome arrives later
    /// through the handle.
    async fn initiate(&self, request: PaymentRequest) -> Result<PaymentHandle, PaymentError>;
}
