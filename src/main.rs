// Main entry point - Dependency injection and console session
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::application::panel_controller::PanelController;
use crate::application::poll_scheduler::PollScheduler;
use crate::application::state_store::{KeyValueStore, PersistenceStore};
use crate::infrastructure::config::load_monitor_config;
use crate::infrastructure::file_store::JsonFileStore;
use crate::infrastructure::http_metrics_client::HttpMetricsClient;
use crate::infrastructure::memory_store::MemoryStore;
use crate::presentation::console::{command_stream, run_console};
use crate::presentation::terminal_surface::TerminalSurface;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr, so the panel owns stdout)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = load_monitor_config()?;

    // Create adapters (infrastructure layer)
    let client = HttpMetricsClient::new(
        config.monitor.endpoint.clone(),
        config.monitor.request_timeout(),
    )?;
    tracing::info!("Polling {}", client.endpoint());

    let backend: Box<dyn KeyValueStore> = match &config.panel.state_file {
        Some(path) => {
            let store = JsonFileStore::new(path);
            tracing::info!("Panel state stored in {}", store.path().display());
            Box::new(store)
        }
        None => Box::new(MemoryStore::new()),
    };

    // The panel appears once the host has settled
    tokio::time::sleep(config.monitor.startup_delay()).await;

    // Wire the panel (application layer)
    let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
    let scheduler = PollScheduler::new(Arc::new(client), outcome_tx);
    let controller = PanelController::new(
        scheduler,
        PersistenceStore::new(backend),
        Box::new(TerminalSurface::new(std::io::stdout())),
        config.layout(),
    );

    println!("GPU Monitor ready: g or Ctrl+G toggles, m minimizes, r refreshes, f <ms>, move <x> <y>, q quits");

    // Run the console (presentation layer)
    let commands = command_stream(BufReader::new(tokio::io::stdin()));
    run_console(controller, outcome_rx, commands).await;

    Ok(())
}
