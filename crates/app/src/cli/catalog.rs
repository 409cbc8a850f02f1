use std::io;

use clap::{Args, Subcommand};

use storefront_app::{context::AppContext, domain::products::ProductCatalog};

use super::{render, report, write_failed};

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
enum CatalogSubcommand {
    /// List every product with its price and stock
    List,
}

pub(crate) async fn run(
    ctx: &AppContext,
    command: CatalogCommand,
    out: &mut impl io::Write,
) -> Result<(), String> {
    match command.command {
        CatalogSubcommand::List => {
            let products = ctx
                .catalog
                .list_products()
                .await
                .map_err(|error| report(&error))?;

            render::write_catalog(out, &products).map_err(|error| write_failed(&error))
        }
    }
}
