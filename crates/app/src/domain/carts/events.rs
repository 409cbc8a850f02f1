//! Cart Events

use storefront::cart::Cart;

use crate::domain::users::UserId;

/// Broadcast after every successful cart write.
///
/// Lets independent views (header badge, cart page) stay consistent without
/// sharing an in-memory cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartChanged {
    /// Owner of the cart
    pub user_id: UserId,

    /// Distinct products in the cart
    pub lines: usize,

    /// Total units across all products
    pub units: u64,
}

impl CartChanged {
    pub(crate) fn new(user_id: UserId, cart: &Cart) -> Self {
        Self {
            user_id,
            lines: cart.len(),
            units: cart.total_quantity(),
        }
    }
}
