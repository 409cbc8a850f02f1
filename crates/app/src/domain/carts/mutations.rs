//! Cart Mutations
//!
//! Shopper-facing cart edits. Each one reads the stored cart, applies a single
//! change checked against the live catalog, and writes the whole cart back.

use storefront::{
    cart::Cart,
    products::ProductId,
    reconcile::{Reconciliation, reconcile},
};
use tracing::{info, instrument};

use crate::domain::{
    carts::{errors::CartsServiceError, service::CartsService},
    products::{ProductCatalog, fetch_snapshot},
    users::UserId,
};

/// Add units of a product, merging with any existing entry.
///
/// # Errors
///
/// - [`CartsServiceError::ProductNotFound`]: the catalog has no such product.
/// - [`CartsServiceError::ExceedsStock`]: the merged quantity exceeds stock.
/// - [`CartsServiceError::Cart`]: `quantity` is zero.
#[instrument(skip_all, fields(user_id = %user))]
pub async fn add_item(
    carts: &dyn CartsService,
    catalog: &dyn ProductCatalog,
    user: &UserId,
    product_id: ProductId,
    quantity: u32,
) -> Result<Cart, CartsServiceError> {
    let product = catalog
        .get_product(&product_id)
        .await?
        .ok_or_else(|| CartsServiceError::ProductNotFound(product_id.clone()))?;

    let mut cart = carts.get_cart(user).await?;
    let requested = cart.add(product_id.clone(), quantity)?;

    if requested > product.stock {
        return Err(CartsServiceError::ExceedsStock {
            product_id,
            requested,
            available: product.stock,
        });
    }

    carts.replace_cart(user, cart.clone()).await?;

    Ok(cart)
}

/// Set a product's quantity; zero removes the entry.
///
/// # Errors
///
/// - [`CartsServiceError::Cart`]: the product is not in the cart.
/// - [`CartsServiceError::ExceedsStock`]: `quantity` exceeds stock.
#[instrument(skip_all, fields(user_id = %user))]
pub async fn set_quantity(
    carts: &dyn CartsService,
    catalog: &dyn ProductCatalog,
    user: &UserId,
    product_id: &ProductId,
    quantity: u32,
) -> Result<Cart, CartsServiceError> {
    let mut cart = carts.get_cart(user).await?;

    cart.set_quantity(product_id, quantity)?;

    if quantity > 0 {
        let available = catalog
            .get_product(product_id)
            .await?
            .map_or(0, |product| product.stock);

        if quantity > available {
            return Err(CartsServiceError::ExceedsStock {
                product_id: product_id.clone(),
                requested: quantity,
                available,
            });
        }
    }

    carts.replace_cart(user, cart.clone()).await?;

    Ok(cart)
}

/// Remove a product from the cart. Removing an absent product is a no-op.
///
/// # Errors
///
/// Returns an error when the cart cannot be read or written.
#[instrument(skip_all, fields(user_id = %user))]
pub async fn remove_item(
    carts: &dyn CartsService,
    user: &UserId,
    product_id: &ProductId,
) -> Result<Cart, CartsServiceError> {
    let mut cart = carts.get_cart(user).await?;

    if cart.remove(product_id).is_some() {
        carts.replace_cart(user, cart.clone()).await?;
    }

    Ok(cart)
}

/// Reconcile the stored cart against the live catalog.
///
/// When reconciliation changed anything the cleaned cart is written back, so
/// the next read already reflects it.
///
/// # Errors
///
/// Returns an error when the catalog cannot be queried or the cart cannot be
/// read or written.
#[instrument(skip_all, fields(user_id = %user))]
pub async fn reconciled_cart(
    carts: &dyn CartsService,
    catalog: &dyn ProductCatalog,
    user: &UserId,
) -> Result<Reconciliation<'static>, CartsServiceError> {
    let reconciliation = reconcile_stored(carts, catalog, user).await?;

    store_corrections(carts, user, &reconciliation).await?;

    Ok(reconciliation)
}

/// Reconcile the stored cart without writing anything.
///
/// # Errors
///
/// Returns an error when the catalog cannot be queried or the cart cannot be
/// read.
pub async fn reconcile_stored(
    carts: &dyn CartsService,
    catalog: &dyn ProductCatalog,
    user: &UserId,
) -> Result<Reconciliation<'static>, CartsServiceError> {
    let cart = carts.get_cart(user).await?;
    let snapshot = fetch_snapshot(catalog, &cart).await?;

    Ok(reconcile(&cart, &snapshot))
}

/// Write back the cleaned cart when reconciliation changed anything.
///
/// # Errors
///
/// Returns an error when the cart cannot be written.
pub async fn store_corrections(
    carts: &dyn CartsService,
    user: &UserId,
    reconciliation: &Reconciliation<'_>,
) -> Result<(), CartsServiceError> {
    if reconciliation.is_clean() {
        return Ok(());
    }

    for note in &reconciliation.notes {
        info!(user_id = %user, product_id = %note.product_id, kind = ?note.kind, "{note}");
    }

    carts
        .replace_cart(user, reconciliation.cart.to_cart())
        .await
}
