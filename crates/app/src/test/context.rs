//! Test context for service-level tests.

use std::sync::Arc;

use rusty_money::iso::NGN;
use storefront::{cart::Cart, pricing::PricingPolicy};
use testresult::TestResult;

use crate::{
    domain::{
        carts::{CartStore, CartsService, repository::InMemoryCartRepository},
        checkout::CheckoutOrchestrator,
        orders::{InMemoryOrderStore, OrderStore},
        payments::{PaymentGateway, SimulatedGateway},
        products::InMemoryCatalog,
        users::UserId,
    },
    test::{gateway::ManualGateway, helpers::product},
};

/// In-memory services around a small naira catalog:
/// `p1` (1000, stock 5), `p2` (2500, sold out), `p4` (8200, stock 2).
pub(crate) struct TestContext {
    pub user: UserId,
    pub catalog: Arc<InMemoryCatalog>,
    pub carts: Arc<CartStore>,
    pub orders: Arc<InMemoryOrderStore>,
    pub payments: Arc<ManualGateway>,
}

impl TestContext {
    pub(crate) fn new() -> Self {
        Self {
            user: UserId::from("alice"),
            catalog: Arc::new(InMemoryCatalog::from_products([
                product("p1", 1_000, 5),
                product("p2", 2_500, 0),
                product("p4", 8_200, 2),
            ])),
            carts: Arc::new(CartStore::new(Arc::new(InMemoryCartRepository::new()))),
            orders: Arc::new(InMemoryOrderStore::new()),
            payments: Arc::new(ManualGateway::new()),
        }
    }

    pub(crate) fn pricing(&self) -> PricingPolicy<'static> {
        PricingPolicy::standard(NGN)
    }

    pub(crate) fn simulated(&self) -> SimulatedGateway {
        SimulatedGateway::default()
    }

    /// Orchestrator over the context's services and manual gateway.
    pub(crate) fn orchestrator(&self) -> CheckoutOrchestrator {
        self.orchestrator_with(self.orders.clone(), self.payments.clone())
    }

    pub(crate) fn orchestrator_with(
        &self,
        orders: Arc<dyn OrderStore>,
        payments: Arc<dyn PaymentGateway>,
    ) -> CheckoutOrchestrator {
        CheckoutOrchestrator::new(
            self.user.clone(),
            self.carts.clone(),
            self.catalog.clone(),
            orders,
            payments,
            self.pricing(),
        )
    }

    /// Store a cart for the context user, bypassing stock checks.
    pub(crate) async fn fill_cart(
        &self,
        entries: &[(&str, u32)],
    ) -> TestResult<Cart> {
        let mut cart = Cart::new();

        for (id, quantity) in entries {
            cart.add((*id).into(), *quantity)?;
        }

        self.carts.replace_cart(&self.user, cart.clone()).await?;

        Ok(cart)
    }
}
