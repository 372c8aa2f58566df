//! snapcart-ai - Photo to Shopping Search Term Service
//!
//! Accepts product photos, runs text, object and scene recognition in
//! parallel, expands the merged terms against the product taxonomy and
//! returns a search phrase (plus category guess and store links).

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

use snapcart_ai::config::{AiConfig, CONFIG_ENV_VAR, CONFIG_FILE_NAME};
use snapcart_ai::db::{init_database_pool, DATABASE_FILE};
use snapcart_ai::fusion::Taxonomy;
use snapcart_ai::services::StoreLinks;
use snapcart_ai::workflow::InferencePipeline;
use snapcart_ai::AppState;
use snapcart_common::config::{resolve_config_file, resolve_root_folder};
use snapcart_common::logging::init_tracing;

/// Command-line arguments for snapcart-ai
#[derive(Parser, Debug)]
#[command(name = "snapcart-ai")]
#[command(about = "Photo to shopping search term service")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "SNAPCART_PORT")]
    port: Option<u16>,

    /// Folder holding the product database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Path to snapcart-ai.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to PATH and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Step 1: Configuration (needed before logging for the level)
    let config_path = resolve_config_file(args.config.as_deref(), CONFIG_ENV_VAR, CONFIG_FILE_NAME);
    let config = AiConfig::load(config_path.as_deref()).context("Failed to load configuration")?;

    init_tracing("snapcart_ai", &config.logging);

    info!("Starting snapcart-ai");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("Config file: none (built-in defaults)"),
    }

    if let Some(path) = &args.write_config {
        config
            .save(path)
            .with_context(|| format!("Failed to write configuration to {}", path.display()))?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }

    // Step 2: Root folder and database
    let root_folder = resolve_root_folder(
        args.root_folder.as_deref(),
        "SNAPCART_ROOT_FOLDER",
        config.root_folder.as_deref(),
    );
    std::fs::create_dir_all(&root_folder).with_context(|| {
        format!("Failed to create root folder {}", root_folder.display())
    })?;

    let db_path = root_folder.join(DATABASE_FILE);
    info!("Database: {}", db_path.display());
    let db_pool = init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Step 3: Shared read-only inference collaborators
    let taxonomy = Taxonomy::load_or_degrade(config.pipeline.taxonomy_path.as_deref());
    let recognizers = config.build_recognizers();
    if let Some(timeout) = config.signal_timeout() {
        info!(timeout_ms = timeout.as_millis() as u64, "Per-signal timeout enabled");
    } else {
        info!("Per-signal timeout disabled");
    }

    let quick = InferencePipeline::new(recognizers.clone(), taxonomy.clone(), config.quick_pipeline());
    let catalog = InferencePipeline::new(recognizers, taxonomy, config.catalog_pipeline());
    let links = StoreLinks::new(config.stores.clone());

    let state = AppState::new(db_pool, quick, catalog, links);
    let app = snapcart_ai::build_router(state);

    // Step 4: Serve
    let port = args.port.unwrap_or(config.port);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
