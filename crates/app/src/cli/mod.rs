use std::{error::Error, io, sync::Arc};

use clap::{Parser, Subcommand};

use storefront_app::{
    config::AppConfig,
    context::AppContext,
    domain::{
        payments::{SimulatedGateway, SimulatedOutcome},
        users::UserId,
    },
};

mod cart;
mod catalog;
mod checkout;
mod orders;
mod render;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront cart and checkout CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: AppConfig,

    /// Signed-in user the command acts for; carts need one
    #[arg(long, short, env = "STOREFRONT_USER", global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog(catalog::CatalogCommand),
    /// View and edit your cart
    Cart(cart::CartCommand),
    /// Pay for your cart and place an order
    Checkout(checkout::CheckoutArgs),
    /// Your order history
    Orders(orders::OrdersCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let outcome = match &self.command {
            Commands::Checkout(args) if args.cancel => SimulatedOutcome::Cancel,
            _ => SimulatedOutcome::Succeed,
        };

        let ctx = AppContext::from_config(&self.config, Arc::new(SimulatedGateway::new(outcome)))
            .map_err(|error| report(&error))?;

        let mut out = io::stdout().lock();

        match self.command {
            Commands::Catalog(command) => catalog::run(&ctx, command, &mut out).await,
            Commands::Cart(command) => {
                cart::run(&ctx, &signed_in(self.user)?, command, &mut out).await
            }
            Commands::Checkout(args) => {
                checkout::run(&ctx, signed_in(self.user)?, args, &mut out).await
            }
            Commands::Orders(command) => {
                orders::run(&ctx, &signed_in(self.user)?, command, &mut out).await
            }
        }
    }
}

/// Anonymous shoppers have no durable cart, so cart commands need a user.
fn signed_in(user: Option<String>) -> Result<UserId, String> {
    match user {
        Some(user) if !user.trim().is_empty() => Ok(UserId::new(user.trim())),
        _ => Err("sign in first: pass --user or set STOREFRONT_USER".to_string()),
    }
}

/// Render an error and its sources as one line.
pub(crate) fn report(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}

pub(crate) fn write_failed(error: &io::Error) -> String {
    format!("failed to write output: {error}")
}
