mod args;
mod output;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use thumbq_core::{load_config_or_default, validate_config, DbusConnector, SessionCoordinator};

use args::Cli;
use output::{print_progress, print_summary, render_json};

/// Buffer size for the progress channel
const PROGRESS_BUFFER_SIZE: usize = 64;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    // Initialize logging; stdout is reserved for progress and results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("Fatal error: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether every requested thumbnail was generated.
async fn run(cli: Cli) -> Result<bool> {
    let mut config = load_config_or_default(cli.config.as_deref()).with_context(|| {
        format!(
            "Failed to load config from {:?}",
            cli.config.as_deref().unwrap_or_else(|| "<defaults>".as_ref())
        )
    })?;
    cli.apply_overrides(&mut config);
    validate_config(&config).context("Configuration validation failed")?;

    info!(
        bus = ?config.bus.bus,
        topology = ?config.session.topology,
        timeout_secs = config.session.timeout_secs,
        "Configuration loaded"
    );

    let targets = cli.targets();
    let connector = Arc::new(DbusConnector::new(config.bus.clone()));
    let mut coordinator = SessionCoordinator::new(connector, &config);

    let printer = if cli.json {
        None
    } else {
        let (tx, rx) = mpsc::channel(PROGRESS_BUFFER_SIZE);
        coordinator = coordinator.with_progress(tx);
        Some(tokio::spawn(print_progress(rx)))
    };

    let batch = coordinator.run(targets).await;
    // Close the progress channel so the printer drains and exits
    drop(coordinator);
    if let Some(printer) = printer {
        let _ = printer.await;
    }
    let batch = batch.context("Could not connect to the thumbnailer service")?;

    if cli.json {
        println!("{}", render_json(&batch).context("Failed to render report")?);
    } else {
        print_summary(&batch);
    }

    Ok(batch.is_success())
}
