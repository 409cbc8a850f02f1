//! Checkout orchestration.
//!
//! Drives one user's checkout: reconcile and price the cart, validate the
//! shipping form, collect payment, then commit. Committing re-checks stock,
//! writes the order and only then clears the cart.
//!
//! Cart corrections and the start of a payment are serialized, so no
//! correction lands once a payment is in flight.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use rustc_hash::FxHashMap;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, error, info, instrument, warn};

use storefront::{
    pricing::{PriceBreakdown, PricingPolicy},
    reconcile::{
        ReconciledCart, Reconciliation, ReconciliationNote, StockShortfall, check_stock,
    },
    shipping::ShippingDetails,
};

use crate::domain::{
    carts::{
        CartsService,
        mutations::{reconcile_stored, store_corrections},
    },
    checkout::{errors::CheckoutError, state::CheckoutState},
    orders::{OrderRecord, OrderStore},
    payments::{PaymentGateway, PaymentOutcome, PaymentRequest},
    products::{ProductCatalog, fetch_snapshot},
    users::UserId,
};

/// A priced, reconciled cart ready to show before payment.
#[derive(Debug, Clone)]
pub struct CheckoutSummary {
    /// Cart after reconciliation
    pub cart: ReconciledCart<'static>,

    /// Corrections reconciliation made
    pub notes: Vec<ReconciliationNote>,

    /// Amounts the shopper will be charged
    pub breakdown: PriceBreakdown<'static>,

    /// Session state after preparing
    pub state: CheckoutState,
}

/// Checkout session for a single user.
pub struct CheckoutOrchestrator {
    user: UserId,
    carts: Arc<dyn CartsService>,
    catalog: Arc<dyn ProductCatalog>,
    orders: Arc<dyn OrderStore>,
    payments: Arc<dyn PaymentGateway>,
    pricing: PricingPolicy<'static>,
    state: Mutex<CheckoutState>,
    cart_writes: AsyncMutex<()>,
}

impl fmt::Debug for CheckoutOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutOrchestrator")
            .field("user", &self.user)
            .field("pricing", &self.pricing)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl CheckoutOrchestrator {
    #[must_use]
    pub fn new(
        user: UserId,
        carts: Arc<dyn CartsService>,
        catalog: Arc<dyn ProductCatalog>,
        orders: Arc<dyn OrderStore>,
        payments: Arc<dyn PaymentGateway>,
        pricing: PricingPolicy<'static>,
    ) -> Self {
        Self {
            user,
            carts,
            catalog,
            orders,
            payments,
            pricing,
            state: Mutex::new(CheckoutState::Idle),
            cart_writes: AsyncMutex::new(()),
        }
    }

    /// User this session belongs to.
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Current session state.
    pub fn state(&self) -> CheckoutState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reconcile and price the cart, and check the shipping form.
    ///
    /// The reconciled cart is written back when it changed. An incomplete
    /// form is not an error here; it shows as [`CheckoutState::FormIncomplete`].
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::CheckoutInProgress`]: a payment is being collected.
    /// - [`CheckoutError::EmptyCart`]: nothing survived reconciliation.
    /// - [`CheckoutError::Cart`], [`CheckoutError::Pricing`]: the cart could
    ///   not be read, written or priced.
    #[instrument(skip_all, fields(user_id = %self.user))]
    pub async fn prepare(
        &self,
        shipping: &ShippingDetails,
    ) -> Result<CheckoutSummary, CheckoutError> {
        if self.state().is_in_flight() {
            return Err(CheckoutError::CheckoutInProgress);
        }

        let reconciliation =
            reconcile_stored(self.carts.as_ref(), self.catalog.as_ref(), &self.user).await?;

        self.write_back_corrections(&reconciliation).await?;

        let Reconciliation { cart, notes } = reconciliation;

        if cart.is_empty() {
            self.transition(CheckoutState::Idle)?;

            return Err(CheckoutError::EmptyCart);
        }

        let breakdown = self.pricing.price(&cart)?;

        let state = if shipping.is_complete() {
            CheckoutState::ReadyToPay
        } else {
            CheckoutState::FormIncomplete
        };

        self.transition(state)?;

        Ok(CheckoutSummary {
            cart,
            notes,
            breakdown,
            state,
        })
    }

    /// Run a full checkout attempt and return the committed order.
    ///
    /// The amount charged is the total priced when the payment starts. After a
    /// successful payment stock is checked again; if it no longer covers the
    /// cart nothing is written. The order is written before the cart is
    /// cleared, so a failed write leaves the cart as it was.
    ///
    /// # Errors
    ///
    /// Everything [`Self::prepare`] returns, and:
    ///
    /// - [`CheckoutError::InvalidShippingForm`]: a field is missing or invalid.
    /// - [`CheckoutError::PaymentNotInitialized`], [`CheckoutError::Payment`]:
    ///   the gateway could not start or lost the payment.
    /// - [`CheckoutError::PaymentCancelled`]: the payer cancelled.
    /// - [`CheckoutError::StockInsufficient`]: stock dropped after the cart was
    ///   reconciled, either before or during payment.
    /// - [`CheckoutError::OrderWriteFailed`]: the order could not be stored.
    /// - [`CheckoutError::CartNotCleared`]: the order is stored, the cart was
    ///   not cleared.
    #[instrument(skip_all, fields(user_id = %self.user))]
    pub async fn checkout(&self, shipping: ShippingDetails) -> Result<OrderRecord, CheckoutError> {
        let CheckoutSummary {
            cart, breakdown, ..
        } = self.prepare(&shipping).await?;

        shipping.validate()?;

        let shortfalls = self.stock_shortfalls(&cart).await?;

        if !shortfalls.is_empty() {
            warn!(shortfalls = shortfalls.len(), "stock dropped before payment");
            self.transition(CheckoutState::FormIncomplete)?;

            return Err(CheckoutError::StockInsufficient { shortfalls });
        }

        let payment = self.begin_payment().await?;

        let request = self.payment_request(&cart, &breakdown, &shipping);

        let handle = match self.payments.initiate(request).await {
            Ok(handle) => handle,
            Err(err) => {
                warn!(error = %err, "payment could not be started");
                payment.settle(CheckoutState::ReadyToPay);

                return Err(err.into());
            }
        };

        let reference = match handle.outcome().await {
            Ok(PaymentOutcome::Succeeded { reference }) => reference,
            Ok(PaymentOutcome::Cancelled) => {
                info!("payment cancelled");
                payment.settle(CheckoutState::PaymentCancelled);

                return Err(CheckoutError::PaymentCancelled);
            }
            Err(err) => {
                warn!(error = %err, "payment ended without an outcome");
                payment.settle(CheckoutState::PaymentCancelled);

                return Err(err.into());
            }
        };

        match self.commit(&cart, &breakdown, shipping, reference).await {
            Ok(order) => {
                payment.settle(CheckoutState::OrderCommitted);

                Ok(order)
            }
            Err(err @ CheckoutError::CartNotCleared { .. }) => {
                payment.settle(CheckoutState::OrderCommitted);

                Err(err)
            }
            Err(err) => {
                payment.settle(CheckoutState::CommitFailed);

                Err(err)
            }
        }
    }

    async fn commit(
        &self,
        cart: &ReconciledCart<'static>,
        breakdown: &PriceBreakdown<'static>,
        shipping: ShippingDetails,
        reference: String,
    ) -> Result<OrderRecord, CheckoutError> {
        let shortfalls = self.stock_shortfalls(cart).await?;

        if !shortfalls.is_empty() {
            error!(
                payment_reference = %reference,
                shortfalls = shortfalls.len(),
                "stock changed during payment, order not written"
            );

            return Err(CheckoutError::StockInsufficient { shortfalls });
        }

        let order = OrderRecord::completed(self.user.clone(), cart, breakdown, shipping, reference);

        self.orders
            .create_order(order.clone())
            .await
            .map_err(CheckoutError::OrderWriteFailed)?;

        info!(order_uuid = %order.uuid, total = order.amounts.total, "order committed");

        if let Err(source) = self.carts.clear_cart(&self.user).await {
            error!(order_uuid = %order.uuid, error = %source, "order committed but cart not cleared");

            return Err(CheckoutError::CartNotCleared {
                order: Box::new(order),
                source,
            });
        }

        Ok(order)
    }

    /// Lines of `cart` the live catalog can no longer cover.
    async fn stock_shortfalls(
        &self,
        cart: &ReconciledCart<'static>,
    ) -> Result<Vec<StockShortfall>, CheckoutError> {
        let current = cart.to_cart();
        let snapshot = fetch_snapshot(self.catalog.as_ref(), &current).await?;

        Ok(check_stock(&current, &snapshot))
    }

    fn payment_request(
        &self,
        cart: &ReconciledCart<'static>,
        breakdown: &PriceBreakdown<'static>,
        shipping: &ShippingDetails,
    ) -> PaymentRequest {
        let items = cart
            .lines()
            .iter()
            .map(|line| format!("{}:{}", line.product.id, line.quantity()))
            .collect::<Vec<_>>()
            .join(",");

        let metadata: FxHashMap<String, String> = [
            ("user_id", self.user.to_string()),
            ("items", items),
            ("ship_to_city", shipping.city.clone()),
            ("ship_to_postal_code", shipping.postal_code.clone()),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();

        PaymentRequest {
            amount: breakdown.total.to_minor_units(),
            currency: breakdown.total.currency().iso_alpha_code.to_string(),
            email: shipping.email.clone(),
            user_id: self.user.clone(),
            metadata,
        }
    }

    /// Persist reconciliation corrections unless a payment has started.
    async fn write_back_corrections(
        &self,
        reconciliation: &Reconciliation<'_>,
    ) -> Result<(), CheckoutError> {
        if reconciliation.is_clean() {
            return Ok(());
        }

        let _writes = self.cart_writes.lock().await;

        if self.state().is_in_flight() {
            return Err(CheckoutError::CheckoutInProgress);
        }

        store_corrections(self.carts.as_ref(), &self.user, reconciliation).await?;

        Ok(())
    }

    /// Move to `next` unless a payment is in flight.
    fn transition(&self, next: CheckoutState) -> Result<(), CheckoutError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if state.is_in_flight() {
            return Err(CheckoutError::CheckoutInProgress);
        }

        debug!(from = %*state, to = %next, "checkout state");
        *state = next;

        Ok(())
    }

    async fn begin_payment(&self) -> Result<InFlightPayment<'_>, CheckoutError> {
        let _writes = self.cart_writes.lock().await;

        self.transition(CheckoutState::PaymentInFlight)?;

        Ok(InFlightPayment {
            orchestrator: self,
        })
    }
}

/// Marks the session as collecting a payment until settled.
///
/// If the checkout future is dropped mid-payment the session falls back to
/// [`CheckoutState::PaymentCancelled`] instead of staying in flight forever.
struct InFlightPayment<'o> {
    orchestrator: &'o CheckoutOrchestrator,
}

impl InFlightPayment<'_> {
    fn settle(self, next: CheckoutState) {
        self.set(next);
    }

    fn set(&self, next: CheckoutState) {
        let mut state = self
            .orchestrator
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        debug!(from = %*state, to = %next, "checkout state");
        *state = next;
    }
}

impl Drop for InFlightPayment<'_> {
    fn drop(&mut self) {
        if self.orchestrator.state().is_in_flight() {
            self.set(CheckoutState::PaymentCancelled);
        }
    }
}
