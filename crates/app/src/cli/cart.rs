use std::io;

use clap::{Args, Subcommand};

use storefront_app::{
    context::AppContext,
    domain::{
        carts::{
            CartsService,
            mutations::{add_item, reconciled_cart, remove_item, set_quantity},
        },
        users::UserId,
    },
};

use super::{render, report, write_failed};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart, corrected against current stock
    Show,
    /// Add units of a product
    Add {
        product: String,
        #[arg(default_value_t = 1)]
        quantity: u32,
    },
    /// Set a product's quantity; 0 removes it
    Set { product: String, quantity: u32 },
    /// Remove a product
    Remove { product: String },
    /// Empty the cart
    Clear,
}

pub(crate) async fn run(
    ctx: &AppContext,
    user: &UserId,
    command: CartCommand,
    out: &mut impl io::Write,
) -> Result<(), String> {
    let carts = ctx.carts.as_ref();
    let catalog = ctx.catalog.as_ref();

    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add { product, quantity } => {
            add_item(carts, catalog, user, product.into(), quantity)
                .await
                .map_err(|error| report(&error))?;
        }
        CartSubcommand::Set { product, quantity } => {
            set_quantity(carts, catalog, user, &product.into(), quantity)
                .await
                .map_err(|error| report(&error))?;
        }
        CartSubcommand::Remove { product } => {
            remove_item(carts, user, &product.into())
                .await
                .map_err(|error| report(&error))?;
        }
        CartSubcommand::Clear => {
            carts
                .clear_cart(user)
                .await
                .map_err(|error| report(&error))?;
        }
    }

    let reconciliation = reconciled_cart(carts, catalog, user)
        .await
        .map_err(|error| report(&error))?;

    let breakdown = ctx
        .pricing
        .price(&reconciliation.cart)
        .map_err(|error| report(&error))?;

    render::write_cart(out, &reconciliation, &breakdown).map_err(|error| write_failed(&error))
}
