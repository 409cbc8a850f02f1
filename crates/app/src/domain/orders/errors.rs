//! Orders service errors.

use thiserror::Error;

use crate::domain::orders::records::OrderUuid;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order {0} already exists")]
    AlreadyExists(OrderUuid),

    #[error("order storage i/o failed")]
    Io(#[from] std::io::Error),

    #[error("malformed order document")]
    Document(#[from] serde_json::Error),

    #[error("order storage unavailable: {0}")]
    Unavailable(String),
}
