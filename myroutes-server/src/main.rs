use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use myroutes_core::cameras::CameraRoster;
use myroutes_server::{AppState, ServerConfig, build_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about = "Route planning with live traffic and CCTV cameras")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Address to listen on, overrides the config file
    #[arg(short, long)]
    bind: Option<std::net::SocketAddr>,
    /// Camera roster JSON, overrides the config file
    #[arg(long)]
    cameras: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    }
    .with_env_credentials();
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(cameras) = cli.cameras {
        config.cameras_path = cameras;
    }
    config.validate()?;

    let roster = Arc::new(CameraRoster::load(&config.cameras_path)?);
    info!("Camera roster ready with {} cameras", roster.len());

    let bind = config.bind;
    let state = Arc::new(AppState::new(config, roster)?);
    if !state.planner.has_traffic() {
        info!("No traffic access token configured, traffic routes will carry no congestion");
    }
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on http://{bind}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
