use anyhow::{Context, Result};
use clap::Parser;
use discovery_server::metrics::init_metrics;
use discovery_server::store::open_store;
use discovery_server::{
    AppState, DefaultManager, ServerConfig, StoreBackend, VersionInfo, create_router,
    start_ttl_sweeper,
};
use std::future::IntoFuture;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Cluster bootstrap discovery service
#[derive(Parser, Debug)]
#[command(name = "discovery", version, about)]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen host
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Database file (overrides DATABASE_PATH)
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Keep clusters in memory only
    #[arg(long)]
    memory: bool,

    /// Log level (overridden by RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

fn load_config(args: &Args) -> Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    config.apply_env()?;

    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(path) = &args.db_path {
        config.store.path = path.clone();
    }
    if args.memory {
        config.store.backend = StoreBackend::Memory;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    Ok(config)
}

fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    if config.logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    init_tracing(&config);
    info!("Starting {}", VersionInfo::current());

    init_metrics();

    let store = open_store(config.store.backend, &config.store.path)
        .with_context(|| format!("failed to init database {}", config.store.path.display()))?;
    let sweeper = start_ttl_sweeper(store.clone(), config.ttl_sweep_interval());

    let manager = Arc::new(DefaultManager::new(
        store,
        config.cluster.serializer.build(),
    ));
    let app = create_router(AppState::new(manager, config.server.docs_url.as_str()));

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on http://{}", addr);

    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .into_future();

    // In-flight requests get a bounded grace period; store calls already
    // running on the blocking pool still complete.
    let timeout = config.shutdown_timeout();
    tokio::select! {
        result = server => result?,
        _ = async {
            let _ = shutdown_rx.wait_for(|stopping| *stopping).await;
            tokio::time::sleep(timeout).await;
        } => {
            warn!("Shutdown grace period of {}s elapsed", timeout.as_secs());
        }
    }

    sweeper.abort();
    info!("Server stopped");
    Ok(())
}
