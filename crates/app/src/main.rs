//! Storefront CLI

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use storefront_app::observability;

use crate::cli::Cli;

mod cli;

#[tokio::main]
pub async fn main() -> ExitCode {
    // Load .env file if present (ignore if missing)
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = observability::init(&cli.config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, stderr is all that is left"
        )]
        {
            eprintln!("{}", cli::report(&error));
        }

        return ExitCode::FAILURE;
    }

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!(%message, "command failed");

            #[expect(
                clippy::print_stderr,
                reason = "command errors are shown to the user, not just logged"
            )]
            {
                eprintln!("{message}");
            }

            ExitCode::FAILURE
        }
    }
}
