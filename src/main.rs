//! Window-cleaning site backend.
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace ─▶ metrics ─▶ security gate ─▶ timeout
//!                                                                      │
//!              ┌──────────────────┬──────────────────┬─────────────────┤
//!              ▼                  ▼                  ▼                 ▼
//!         /robots.txt        /api/site         /api/booking      /api/assistant
//!         /sitemap.xml   /api/booking/options  (rate limited)    (knowledge store)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use brightpane::config::{config_from_env, load_config};
use brightpane::observability::{logging, metrics};
use brightpane::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "brightpane")]
#[command(about = "Backend for the window-cleaning business site", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => config_from_env(|name| std::env::var(name).ok())?,
    };

    logging::init_logging(&config.observability);
    tracing::info!("brightpane v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        site = %config.site.name,
        knowledge_store_configured = config.knowledge.store_url.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
