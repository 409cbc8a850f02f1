//! Simulated payment gateway for local runs.

use async_trait::async_trait;
use rand::{Rng, distributions::Alphanumeric};
use tracing::info;

use crate::domain::payments::{
    errors::PaymentError,
    gateway::{PaymentGateway, PaymentHandle, PaymentOutcome, PaymentRequest},
};

/// How the simulated payer behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimulatedOutcome {
    #[default]
    Succeed,
    Cancel,
}

/// Settles every payment immediately, without moving money.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedGateway {
    outcome: SimulatedOutcome,
}

impl SimulatedGateway {
    #[must_use]
    pub fn new(outcome: SimulatedOutcome) -> Self {
        Self { outcome }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn initiate(&self, request: PaymentRequest) -> Result<PaymentHandle, PaymentError> {
        if request.amount <= 0 {
            return Err(PaymentError::NotInitialized(format!(
                "amount must be positive, got {}",
                request.amount
            )));
        }

        let outcome = match self.outcome {
            SimulatedOutcome::Succeed => PaymentOutcome::Succeeded {
                reference: reference(),
            },
            SimulatedOutcome::Cancel => PaymentOutcome::Cancelled,
        };

        info!(
            user_id = %request.user_id,
            amount = request.amount,
            currency = %request.currency,
            ?outcome,
            "simulated payment settled"
        );

        Ok(PaymentHandle::resolved(outcome))
    }
}

fn reference() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    format!("SIM-{suffix}")
}
