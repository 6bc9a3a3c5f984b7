//! `b2b-rfq` server binary.

use anyhow::{Context, Result};
use b2b_rfq::api::rest::create_router;
use b2b_rfq::bootstrap::{self, Services};
use b2b_rfq::config::{AppConfig, LogFormat};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Request-for-quote negotiation server.
#[derive(Debug, Parser)]
#[command(name = "b2b-rfq", version, about)]
struct Cli {
    /// Configuration file; defaults to `config/b2b-rfq.toml` if present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed demo users and catalog, logging a token per user.
    #[arg(long)]
    seed_demo: bool,
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match config.logging.format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_logging(&config);
    if config.uses_development_secret() {
        warn!("auth.jwt_secret is the development default; set B2B_RFQ__AUTH__JWT_SECRET");
    }

    let services = Services::new(&config);
    if cli.seed_demo || config.seed_demo_data {
        for seeded in bootstrap::seed_demo(&services)
            .await
            .context("seeding demo data")?
        {
            info!(
                email = seeded.user.email(),
                role = %seeded.user.role(),
                token = %seeded.token,
                "demo user"
            );
        }
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = tokio::spawn(services.sweeper(&config).run(shutdown_rx));

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "b2b-rfq listening");

    axum::serve(listener, create_router(services.app_state()))
        .with_graceful_shutdown(wait_for_shutdown())
        .await
        .context("serving HTTP")?;

    info!("b2b-rfq stopping");
    shutdown_tx.send(true).ok();
    sweeper.await.context("joining expiry sweeper")?;
    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
