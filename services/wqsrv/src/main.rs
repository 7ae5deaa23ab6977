//! wqsrv entry point

use anyhow::Context;
use clap::Parser;
use common::service_bootstrap::{
    get_service_port, init_logging, print_startup_banner, ServiceInfo,
};
use common::shutdown::wait_for_shutdown;
use std::path::PathBuf;
use tracing::info;
use wqsrv::config::DEFAULT_CONFIG_PATH;
use wqsrv::{create_router, AppState, Config, DEFAULT_PORT, SERVICE_NAME, SERVICE_VERSION};

#[derive(Parser, Debug)]
#[command(author, version, about = "ClearFlow water-quality service")]
struct Args {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Listen host
    #[arg(long)]
    host: Option<String>,

    /// Listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Log filter, e.g. "debug" or "info,wqsrv=trace"
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let service = ServiceInfo::new(
        SERVICE_NAME,
        "Water-quality ingestion and classification",
        DEFAULT_PORT,
    )
    .with_version(SERVICE_VERSION);

    let mut config = Config::load(&args.config).context("Failed to load configuration")?;
    // Legacy PORT variable only fills in when nothing more specific is set
    config.api.port = get_service_port(config.api.port, &service);
    config.apply_overrides(args.host, args.port, args.log_level);
    config.validate().context("Invalid configuration")?;

    init_logging(
        &service,
        Some(&config.logging.dir),
        config.logging.enable_file,
        config.logging.level.clone(),
    )?;
    print_startup_banner(&service);

    let state = AppState::new(&config.service.name).with_static_dir(config.api.static_dir.clone());
    let app = create_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints: POST/GET /api/ph, POST/GET /api/turbidity, GET /api/water-quality, POST/GET /api/data");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            wait_for_shutdown().await;
            info!("Shutdown signal received, stopping server");
        })
        .await
        .context("Server error")?;

    info!("{} stopped", SERVICE_NAME);
    Ok(())
}
