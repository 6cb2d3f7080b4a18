use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use inventory_api::auth::Credentials;
use inventory_api::config::{self, AppConfig};
use inventory_api::database::{
    DatabaseManager, InMemoryProductRepository, PgProductRepository, ProductRepository,
};
use inventory_api::{app, is_production, AppState};

#[derive(Parser)]
#[command(name = "inventory-api", version, about = "Inventory management REST backend")]
struct Args {
    /// Address to bind (overrides SERVER_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides INVENTORY_API_PORT / PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Do not apply database migrations at startup
    #[arg(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH_*, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("inventory_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let config = apply_args(config::config().clone(), &args);
    tracing::info!("Starting inventory API in {:?} mode", config.environment);

    if config.uses_default_credentials() {
        if is_production!() {
            tracing::warn!("Running in production with the built-in demo credential; set AUTH_USERNAME and AUTH_PASSWORD");
        } else {
            tracing::info!("Using demo credential '{}'", config.security.username);
        }
    }

    let pool = match config.database.url {
        Some(_) => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            if config.database.run_migrations {
                DatabaseManager::run_migrations(&pool)
                    .await
                    .context("failed to run migrations")?;
            }
            Some(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; products are kept in memory and lost on exit");
            None
        }
    };

    let repo: Arc<dyn ProductRepository> = match &pool {
        Some(pool) => Arc::new(PgProductRepository::new(pool.clone())),
        None => Arc::new(InMemoryProductRepository::new()),
    };
    let state = AppState::new(repo, Credentials::from_config(&config.security));
    let router = app(state, &config);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Inventory API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(pool) = pool {
        DatabaseManager::close(pool).await;
    }
    tracing::info!("Shutdown complete");
    Ok(())
}

fn apply_args(mut config: AppConfig, args: &Args) -> AppConfig {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.skip_migrations {
        config.database.run_migrations = false;
    }
    config
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("failed to install SIGTERM handler: {}", e);
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
    tracing::info!("Shutdown signal received");
}
