//! # Userstore
//!
//! Runs one repository operation and prints the result as JSON.
//!
//! Any startup failure, including failing to create the database handle,
//! ends the process with exit status 1.

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use tracing::{error, info};
use userstore_cli::startup::{init_logging, log_loaded};
use userstore_cli::{App, Cli};
use userstore_config::ConfigLoader;
use userstore_core::telemetry::shutdown_telemetry;
use userstore_core::{ErrorResponse, StoreError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("Application error: {:#}", e);
        match e.downcast_ref::<StoreError>() {
            Some(store_err) => match serde_json::to_string(&ErrorResponse::from(store_err)) {
                Ok(body) => eprintln!("{body}"),
                Err(_) => eprintln!("{store_err}"),
            },
            None => eprintln!("{e:#}"),
        }
        shutdown_telemetry();
        std::process::exit(1);
    }

    shutdown_telemetry();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let env_file = ConfigLoader::load_dotenv();
    let loaded = ConfigLoader::from_env();
    init_logging(&loaded)?;
    let config = loaded?;
    log_loaded(&config, env_file.as_deref());

    info!("Starting userstore {}", env!("CARGO_PKG_VERSION"));

    let app = App::bootstrap(&config).await?;
    let result = app.execute(&cli.command).await;
    app.shutdown().await;
    let output = result?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output).context("failed to write output")?;
    writeln!(stdout).context("failed to write output")?;
    Ok(())
}
