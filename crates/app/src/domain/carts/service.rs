//! Carts service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use storefront::cart::Cart;

use crate::domain::{
    carts::{
        documents,
        errors::{CartsServiceError, PersistenceError},
        events::CartChanged,
        repository::CartRepository,
    },
    users::UserId,
};

/// Buffered change notifications per subscriber before it starts lagging.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// The single source of truth for each user's cart.
///
/// Every write replaces the whole document and is followed by a
/// [`CartChanged`] broadcast.
#[derive(Clone)]
pub struct CartStore {
    repository: Arc<dyn CartRepository>,
    changes: broadcast::Sender<CartChanged>,
}

impl CartStore {
    #[must_use]
    pub fn new(repository: Arc<dyn CartRepository>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

        Self {
            repository,
            changes,
        }
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("subscribers", &self.changes.receiver_count())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CartsService for CartStore {
    async fn get_cart(&self, user: &UserId) -> Result<Cart, CartsServiceError> {
        let Some(document) = self.repository.load(user).await? else {
            return Ok(Cart::new());
        };

        match documents::decode(&document) {
            Ok(cart) => Ok(cart),
            Err(error) => {
                warn!(user_id = %user, %error, "discarding unreadable cart document");

                Ok(Cart::new())
            }
        }
    }

    async fn replace_cart(&self, user: &UserId, cart: Cart) -> Result<(), CartsServiceError> {
        let document = documents::encode(&cart).map_err(PersistenceError::from)?;

        self.repository.store(user, document).await?;

        let change = CartChanged::new(user.clone(), &cart);

        debug!(user_id = %user, lines = change.lines, units = change.units, "cart replaced");

        // No subscribers is fine; the write itself already succeeded.
        if self.changes.send(change).is_err() {
            debug!(user_id = %user, "no cart change subscribers");
        }

        Ok(())
    }

    async fn clear_cart(&self, user: &UserId) -> Result<(), CartsServiceError> {
        self.replace_cart(user, Cart::new()).await
    }

    fn subscribe(&self) -> broadcast::Receiver<CartChanged> {
        self.changes.subscribe()
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve a user's cart.
    ///
    /// A user with no stored cart, or whose stored document cannot be parsed,
    /// gets an empty cart. Only storage failures are errors.
    async fn get_cart(&self, user: &UserId) -> Result<Cart, CartsServiceError>;

    /// Persist `cart` as the user's entire cart.
    async fn replace_cart(&self, user: &UserId, cart: Cart) -> Result<(), CartsServiceError>;

    /// Replace the user's cart with an empty one.
    async fn clear_cart(&self, user: &UserId) -> Result<(), CartsServiceError>;

    /// Receive a [`CartChanged`] for every later successful write.
    fn subscribe(&self) -> broadcast::Receiver<CartChanged>;
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use testresult::TestResult;

    use crate::domain::carts::repository::{
        FileCartRepository, InMemoryCartRepository, MockCartRepository,
    };

    use super::*;

    fn store() -> CartStore {
        CartStore::new(Arc::new(InMemoryCartRepository::new()))
    }

    #[tokio::test]
    async fn unknown_user_gets_empty_cart() -> TestResult {
        let cart = store().get_cart(&"alice".into()).await?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn replace_then_get_returns_same_cart() -> TestResult {
        let carts = store();
        let user = UserId::from("alice");

        let mut cart = Cart::new();
        cart.add("p1".into(), 3)?;
        cart.add("p4".into(), 1)?;

        carts.replace_cart(&user, cart.clone()).await?;

        assert_eq!(carts.get_cart(&user).await?, cart);

        Ok(())
    }

    #[tokio::test]
    async fn carts_are_isolated_per_user() -> TestResult {
        let carts = store();

        let mut cart = Cart::new();
        cart.add("p1".into(), 2)?;

        carts.replace_cart(&"alice".into(), cart).await?;

        assert!(carts.get_cart(&"bob".into()).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn clear_empties_cart() -> TestResult {
        let carts = store();
        let user = UserId::from("alice");

        let mut cart = Cart::new();
        cart.add("p1".into(), 2)?;

        carts.replace_cart(&user, cart).await?;
        carts.clear_cart(&user).await?;

        assert!(carts.get_cart(&user).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn malformed_document_reads_as_empty_cart() -> TestResult {
        let repository = Arc::new(InMemoryCartRepository::new());
        let user = UserId::from("alice");

        repository
            .store(&user, br#"[{"productId":"p1","quantity":0}]"#.to_vec())
            .await?;

        let carts = CartStore::new(repository);

        assert!(carts.get_cart(&user).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn undecodable_file_reads_as_empty_cart() -> TestResult {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join("alice.json"), [0xff, 0xfe, b'['])?;

        let carts = CartStore::new(Arc::new(FileCartRepository::new(dir.path())));

        assert!(carts.get_cart(&"alice".into()).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn storage_failure_is_reported() -> TestResult {
        let mut repository = MockCartRepository::new();

        repository
            .expect_load()
            .once()
            .returning(|_| Err(PersistenceError::Unavailable("disk offline".to_string())));

        let result = CartStore::new(Arc::new(repository))
            .get_cart(&"alice".into())
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::Persistence(_))),
            "expected persistence error, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn writes_notify_subscribers() -> TestResult {
        let carts = store();
        let mut changes = carts.subscribe();
        let user = UserId::from("alice");

        let mut cart = Cart::new();
        cart.add("p1".into(), 3)?;
        cart.add("p3".into(), 2)?;

        carts.replace_cart(&user, cart).await?;
        carts.clear_cart(&user).await?;

        assert_eq!(
            changes.recv().await?,
            CartChanged {
                user_id: user.clone(),
                lines: 2,
                units: 5,
            }
        );
        assert_eq!(
            changes.recv().await?,
            CartChanged {
                user_id: user,
                lines: 0,
                units: 0,
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_write_does_not_notify() -> TestResult {
        let mut repository = MockCartRepository::new();

        repository
            .expect_store()
            .once()
            .returning(|_, _| Err(PersistenceError::Unavailable("disk full".to_string())));

        let carts = CartStore::new(Arc::new(repository));
        let mut changes = carts.subscribe();

        let result = carts.clear_cart(&"alice".into()).await;

        assert!(result.is_err(), "write should fail");
        assert!(changes.try_recv().is_err(), "no change should be broadcast");

        Ok(())
    }
}
