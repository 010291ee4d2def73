//! bunpro-export
//!
//! Exports Bunpro vocabulary progress to CSV.

#![forbid(unsafe_code)]

use std::process::ExitCode;

use bunpro_export_cli::{Cli, logging};
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match bunpro_export_cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            if bunpro_export_cli::commands::is_user_actionable(&e) {
                eprintln!("Check the token or configuration and run again.");
            }
            ExitCode::FAILURE
        }
    }
}
