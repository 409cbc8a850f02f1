//! Orders service.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use tokio::{fs, sync::RwLock};
use tracing::{info, warn};

use crate::domain::{
    orders::{
        errors::OrdersServiceError,
        records::{OrderRecord, OrderUuid},
    },
    users::UserId,
};

/// Orders held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<FxHashMap<OrderUuid, OrderRecord>>,
}

impl InMemoryOrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create_order(&self, order: OrderRecord) -> Result<OrderUuid, OrdersServiceError> {
        let mut orders = self.orders.write().await;

        if orders.contains_key(&order.uuid) {
            return Err(OrdersServiceError::AlreadyExists(order.uuid));
        }

        let uuid = order.uuid;
        orders.insert(uuid, order);

        info!(order_uuid = %uuid, "order created");

        Ok(uuid)
    }

    async fn get_order(&self, uuid: OrderUuid) -> Result<Option<OrderRecord>, OrdersServiceError> {
        Ok(self.orders.read().await.get(&uuid).cloned())
    }

    async fn orders_for_user(&self, user: &UserId) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut orders: Vec<_> = self
            .orders
            .read()
            .await
            .values()
            .filter(|order| order.user_id == *user)
            .cloned()
            .collect();

        orders.sort_by_key(|order| (order.created_at, order.uuid));

        Ok(orders)
    }
}

/// One `<uuid>.json` document per order under a data directory.
///
/// A document is fully written to a staging file first and then hard linked
/// into place. Linking fails when the target exists, so an existing order is
/// never overwritten and readers never see a partial document.
#[derive(Debug, Clone)]
pub struct FileOrderStore {
    dir: PathBuf,
}

impl FileOrderStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the documents are stored in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, uuid: OrderUuid) -> PathBuf {
        self.dir.join(format!("{uuid}.json"))
    }

    async fn read_order(path: &Path) -> Result<Option<OrderRecord>, OrdersServiceError> {
        let document = match fs::read_to_string(path).await {
            Ok(document) => document,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        Ok(Some(serde_json::from_str(&document)?))
    }
}

#[async_trait]
impl OrderStore for FileOrderStore {
    async fn create_order(&self, order: OrderRecord) -> Result<OrderUuid, OrdersServiceError> {
        let document = serde_json::to_vec_pretty(&order)?;

        fs::create_dir_all(&self.dir).await?;

        let target = self.path_for(order.uuid);
        let staging = self.dir.join(format!(".{}.json.tmp", order.uuid));

        fs::write(&staging, document).await?;

        let linked = fs::hard_link(&staging, &target).await;

        // The order is durable once linked; a leftover staging file is harmless.
        if let Err(error) = fs::remove_file(&staging).await {
            warn!(path = %staging.display(), %error, "failed to remove staging file");
        }

        match linked {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(OrdersServiceError::AlreadyExists(order.uuid));
            }
            Err(err) => return Err(err.into()),
        }

        info!(order_uuid = %order.uuid, user_id = %order.user_id, "order written");

        Ok(order.uuid)
    }

    async fn get_order(&self, uuid: OrderUuid) -> Result<Option<OrderRecord>, OrdersServiceError> {
        Self::read_order(&self.path_for(uuid)).await
    }

    async fn orders_for_user(&self, user: &UserId) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut orders = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();

            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }

            match Self::read_order(&path).await {
                Ok(Some(order)) if order.user_id == *user => orders.push(order),
                Ok(_) => {}
                Err(OrdersServiceError::Document(error)) => {
                    warn!(path = %path.display(), %error, "skipping unreadable order document");
                }
                Err(err) => return Err(err),
            }
        }

        orders.sort_by_key(|order| (order.created_at, order.uuid));

        Ok(orders)
    }
}

#[automock]
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Durably write a new order under its pre-assigned id.
    ///
    /// Fails without a partial write; an existing id is never overwritten.
    async fn create_order(&self, order: OrderRecord) -> Result<OrderUuid, OrdersServiceError>;

    /// Retrieve a single order.
    async fn get_order(&self, uuid: OrderUuid) -> Result<Option<OrderRecord>, OrdersServiceError>;

    /// A user's order history, oldest first.
    async fn orders_for_user(&self, user: &UserId) -> Result<Vec<OrderRecord>, OrdersServiceError>;
}
