// Main entry point - Dependency injection and session setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::io::BufReader;
use tokio::sync::mpsc;

use crate::application::ui_controller::{ControllerPorts, ControllerSettings, UiStateController};
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::file_store::TomlFileStore;
use crate::infrastructure::http_client::ReqwestChartClient;
use crate::infrastructure::memory_controls::MemoryControls;
use crate::infrastructure::snapshot_surface::SnapshotSurface;
use crate::infrastructure::terminal_host::TerminalHost;
use crate::presentation::commands::USAGE;
use crate::presentation::session::{Session, command_stream};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let started = Instant::now();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dashboard_controller=info".into()),
        )
        .init();

    // Errors that escape a task are logged, interaction continues
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("Global error: {}", info);
    }));

    // Load configuration
    let config = load_dashboard_config()?;
    let registry = Arc::new(config.build_registry()?);

    // Create adapters (infrastructure layer)
    let controls = Arc::new(MemoryControls::from_config(&config.controls));
    let client = Arc::new(ReqwestChartClient::new(
        &config.client.base_url,
        Duration::from_secs(config.client.request_timeout_secs),
    )?);
    let surface = Arc::new(
        SnapshotSurface::new(&config.client.snapshot_dir)
            .with_context(|| format!("Cannot create {}", config.client.snapshot_dir.display()))?,
    );
    let host = Arc::new(TerminalHost::new(
        &config.tables,
        config.client.snapshot_dir.clone(),
    ));
    let store = Arc::new(TomlFileStore::open(&config.client.preferences_path)?);

    // Create controller (application layer)
    let ports = ControllerPorts {
        controls: controls.clone(),
        client,
        surface,
        host,
        store,
    };
    let settings = ControllerSettings {
        locale: config.client.locale,
        resize_debounce: Duration::from_millis(config.client.resize_debounce_ms),
        ..ControllerSettings::default()
    };
    let mut controller = UiStateController::new(registry, ports, settings);
    controller.select_tab(&config.client.initial_view);

    tracing::info!(
        "Dashboard ready in {}ms, fetching from {}",
        started.elapsed().as_millis(),
        config.client.base_url
    );
    println!("{}", USAGE);

    // Drive the controller from stdin (presentation layer)
    let (tx, rx) = mpsc::channel(64);
    let controller_task = tokio::spawn(controller.run(rx));
    Session::new(controls, tx)
        .run(command_stream(BufReader::new(tokio::io::stdin())))
        .await;

    if let Err(e) = controller_task.await {
        tracing::error!("Controller stopped unexpectedly: {}", e);
    }

    Ok(())
}
