//! End-to-end checkout against file-backed carts and orders.
//!
//! Uses the storefront fixture catalog, where `p1` is the Ankara Tote Bag at
//! 1000 NGN with 5 in stock.

use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use rusty_money::iso::NGN;
use tempfile::TempDir;
use testresult::TestResult;

use storefront::{fixtures::CatalogFixture, pricing::PricingPolicy, shipping::ShippingDetails};
use storefront_app::domain::{
    carts::{CartStore, CartsService, repository::FileCartRepository},
    checkout::{CheckoutError, CheckoutOrchestrator, CheckoutState},
    orders::{FileOrderStore, OrderStore},
    payments::{
        PaymentError, PaymentGateway, PaymentHandle, PaymentOutcome, PaymentRequest,
        SimulatedGateway,
    },
    products::InMemoryCatalog,
    users::UserId,
};

struct Storefront {
    _data: TempDir,
    user: UserId,
    catalog: Arc<InMemoryCatalog>,
    carts: Arc<CartStore>,
    orders: Arc<FileOrderStore>,
}

impl Storefront {
    fn open() -> TestResult<Self> {
        let data = TempDir::new()?;
        let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../fixtures/products/storefront.yml");

        Ok(Self {
            user: UserId::from("alice"),
            catalog: Arc::new(InMemoryCatalog::from_fixture(CatalogFixture::load(fixture)?)),
            carts: Arc::new(CartStore::new(Arc::new(FileCartRepository::new(
                data.path().join("carts"),
            )))),
            orders: Arc::new(FileOrderStore::new(data.path().join("orders"))),
            _data: data,
        })
    }

    fn checkout(&self, payments: Arc<dyn PaymentGateway>) -> CheckoutOrchestrator {
        CheckoutOrchestrator::new(
            self.user.clone(),
            self.carts.clone(),
            self.catalog.clone(),
            self.orders.clone(),
            payments,
            PricingPolicy::standard(NGN),
        )
    }
}

/// Approves every payment, but stock of one product drops while the payer is
/// on the payment page.
struct StockDropsDuringPayment {
    catalog: Arc<InMemoryCatalog>,
    product: &'static str,
    remaining: u32,
}

#[async_trait]
impl PaymentGateway for StockDropsDuringPayment {
    async fn initiate(&self, _request: PaymentRequest) -> Result<PaymentHandle, PaymentError> {
        self.catalog
            .set_stock(&self.product.into(), self.remaining)
            .await;

        Ok(PaymentHandle::resolved(PaymentOutcome::Succeeded {
            reference: "REF-DROP".to_string(),
        }))
    }
}

fn shipping() -> ShippingDetails {
    ShippingDetails {
        name: "Ada Obi".to_string(),
        email: "ada@example.com".to_string(),
        address: "12 Marina Road".to_string(),
        city: "Lagos".to_string(),
        postal_code: "101001".to_string(),
        phone: Some("+234 800 000 0000".to_string()),
    }
}

async fn three_totes(store: &Storefront) -> TestResult<storefront::cart::Cart> {
    let mut cart = storefront::cart::Cart::new();
    cart.add("p1".into(), 3)?;

    store.carts.replace_cart(&store.user, cart.clone()).await?;

    Ok(cart)
}

#[tokio::test]
async fn paid_cart_becomes_order_and_cart_empties() -> TestResult {
    let store = Storefront::open()?;
    three_totes(&store).await?;

    let checkout = store.checkout(Arc::new(SimulatedGateway::default()));

    let summary = checkout.prepare(&shipping()).await?;

    assert!(summary.notes.is_empty(), "p1 has enough stock");
    assert_eq!(summary.breakdown.total.to_minor_units(), 372_500);

    let order = checkout.checkout(shipping()).await?;

    assert_eq!(order.amounts.subtotal, 300_000);
    assert_eq!(order.amounts.tax, 22_500);
    assert_eq!(order.amounts.shipping, 50_000);
    assert_eq!(order.amounts.total, 372_500);
    assert!(order.payment_reference.starts_with("SIM-"));

    assert_eq!(store.orders.get_order(order.uuid).await?, Some(order));
    assert!(store.carts.get_cart(&store.user).await?.is_empty());
    assert_eq!(checkout.state(), CheckoutState::OrderCommitted);

    Ok(())
}

#[tokio::test]
async fn stock_drop_during_payment_keeps_cart_and_writes_nothing() -> TestResult {
    let store = Storefront::open()?;
    let cart = three_totes(&store).await?;

    let checkout = store.checkout(Arc::new(StockDropsDuringPayment {
        catalog: store.catalog.clone(),
        product: "p1",
        remaining: 1,
    }));

    let result = checkout.checkout(shipping()).await;

    let Err(CheckoutError::StockInsufficient { shortfalls }) = result else {
        return Err(format!("expected StockInsufficient, got {result:?}").into());
    };

    assert_eq!(
        shortfalls
            .iter()
            .map(|s| (s.product_id.as_str(), s.requested, s.available))
            .collect::<Vec<_>>(),
        [("p1", 3, 1)]
    );
    assert_eq!(
        shortfalls.first().map(ToString::to_string).as_deref(),
        Some("Only 1 units of Ankara Tote Bag available")
    );
    assert_eq!(store.carts.get_cart(&store.user).await?, cart);
    assert!(store.orders.orders_for_user(&store.user).await?.is_empty());
    assert_eq!(checkout.state(), CheckoutState::CommitFailed);

    Ok(())
}

#[tokio::test]
async fn cancelled_payment_keeps_cart() -> TestResult {
    let store = Storefront::open()?;
    let cart = three_totes(&store).await?;

    let checkout = store.checkout(Arc::new(SimulatedGateway::new(
        storefront_app::domain::payments::SimulatedOutcome::Cancel,
    )));

    let result = checkout.checkout(shipping()).await;

    assert!(matches!(result, Err(CheckoutError::PaymentCancelled)), "{result:?}");
    assert_eq!(store.carts.get_cart(&store.user).await?, cart);
    assert!(store.orders.orders_for_user(&store.user).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn carts_survive_reopening_the_store() -> TestResult {
    let data = TempDir::new()?;
    let user = UserId::from("alice");

    let mut cart = storefront::cart::Cart::new();
    cart.add("p3".into(), 2)?;

    CartStore::new(Arc::new(FileCartRepository::new(data.path())))
        .replace_cart(&user, cart.clone())
        .await?;

    let reopened = CartStore::new(Arc::new(FileCartRepository::new(data.path())));

    assert_eq!(reopened.get_cart(&user).await?, cart);

    Ok(())
}
