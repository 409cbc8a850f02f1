//! Product catalog service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;
use tracing::debug;

use storefront::{
    cart::Cart,
    fixtures::CatalogFixture,
    products::{CatalogSnapshot, Product, ProductId},
};

use crate::domain::products::errors::CatalogError;

/// Catalog held in process memory, seeded from a fixture or by hand.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<FxHashMap<ProductId, Product<'static>>>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_products(products: impl IntoIterator<Item = Product<'static>>) -> Self {
        Self {
            products: RwLock::new(
                products
                    .into_iter()
                    .map(|product| (product.id.clone(), product))
                    .collect(),
            ),
        }
    }

    #[must_use]
    pub fn from_fixture(fixture: CatalogFixture) -> Self {
        Self::from_products(fixture.into_products())
    }

    /// Change a product's stock. Returns `false` when the product is unknown.
    pub async fn set_stock(&self, id: &ProductId, stock: u32) -> bool {
        let mut products = self.products.write().await;

        let Some(product) = products.get_mut(id) else {
            return false;
        };

        debug!(product_id = %id, from = product.stock, to = stock, "stock changed");

        product.stock = stock;

        true
    }

    /// Remove a product from the catalog.
    pub async fn remove(&self, id: &ProductId) -> Option<Product<'static>> {
        self.products.write().await.remove(id)
    }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product<'static>>, CatalogError> {
        Ok(self.products.read().await.get(id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product<'static>>, CatalogError> {
        let mut products: Vec<_> = self.products.read().await.values().cloned().collect();

        products.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(products)
    }
}

#[automock]
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Retrieve a single product; `None` when the catalog no longer has it.
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product<'static>>, CatalogError>;

    /// Retrieve every product, ordered by id.
    async fn list_products(&self) -> Result<Vec<Product<'static>>, CatalogError>;
}

/// Fetch the current record of every product a cart refers to.
///
/// # Errors
///
/// Returns the first lookup error; products the catalog no longer has are
/// simply absent from the snapshot.
pub async fn fetch_snapshot(
    catalog: &dyn ProductCatalog,
    cart: &Cart,
) -> Result<CatalogSnapshot<'static>, CatalogError> {
    let mut snapshot = CatalogSnapshot::new();

    for entry in cart {
        if let Some(product) = catalog.get_product(entry.product_id()).await? {
            snapshot.insert(product);
        }
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use storefront::products::ProductLookup;
    use testresult::TestResult;

    use crate::test::helpers::product;

    use super::*;

    #[tokio::test]
    async fn get_product_returns_seeded_product() -> TestResult {
        let catalog = InMemoryCatalog::from_products([product("p1", 1_000, 5)]);

        let found = catalog.get_product(&"p1".into()).await?;

        assert_eq!(found.map(|p| p.stock), Some(5));

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_id_returns_none() -> TestResult {
        let catalog = InMemoryCatalog::new();

        assert!(catalog.get_product(&"nope".into()).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn set_stock_updates_record() -> TestResult {
        let catalog = InMemoryCatalog::from_products([product("p1", 1_000, 5)]);

        assert!(catalog.set_stock(&"p1".into(), 1).await);
        assert!(!catalog.set_stock(&"p9".into(), 1).await);

        let found = catalog.get_product(&"p1".into()).await?;

        assert_eq!(found.map(|p| p.stock), Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn list_products_is_ordered_by_id() -> TestResult {
        let catalog = InMemoryCatalog::from_products([
            product("p3", 100, 1),
            product("p1", 100, 1),
            product("p2", 100, 1),
        ]);

        catalog.remove(&"p2".into()).await;

        let ids: Vec<String> = catalog
            .list_products()
            .await?
            .into_iter()
            .map(|p| p.id.to_string())
            .collect();

        assert_eq!(ids, ["p1", "p3"]);

        Ok(())
    }

    #[tokio::test]
    async fn snapshot_contains_only_resolvable_cart_products() -> TestResult {
        let catalog = InMemoryCatalog::from_products([product("p1", 1_000, 5)]);

        let mut cart = Cart::new();
        cart.add("p1".into(), 1)?;
        cart.add("gone".into(), 1)?;

        let snapshot = fetch_snapshot(&catalog, &cart).await?;

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.product(&"gone".into()).is_none());

        Ok(())
    }

    #[tokio::test]
    async fn snapshot_propagates_lookup_failures() -> TestResult {
        let mut catalog = MockProductCatalog::new();

        catalog
            .expect_get_product()
            .once()
            .returning(|_| Err(CatalogError::Unavailable("timeout".to_string())));

        let mut cart = Cart::new();
        cart.add("p1".into(), 1)?;

        let result = fetch_snapshot(&catalog, &cart).await;

        assert!(
            matches!(result, Err(CatalogError::Unavailable(_))),
            "expected Unavailable, got {result:?}"
        );

        Ok(())
    }
}
