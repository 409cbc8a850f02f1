use std::io;

use clap::{Args, Subcommand};

use storefront_app::{
    context::AppContext,
    domain::{orders::OrderStore, users::UserId},
};

use super::{render, report, write_failed};

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List your past orders, oldest first
    List,
}

pub(crate) async fn run(
    ctx: &AppContext,
    user: &UserId,
    command: OrdersCommand,
    out: &mut impl io::Write,
) -> Result<(), String> {
    match command.command {
        OrdersSubcommand::List => {
            let orders = ctx
                .orders
                .orders_for_user(user)
                .await
                .map_err(|error| report(&error))?;

            render::write_orders(out, &orders).map_err(|error| write_failed(&error))
        }
    }
}
