use std::{net::SocketAddr, sync::Arc};

use clap::Parser;
use showcase::{ShowcaseConfig, config};

#[derive(Parser, Debug)]
#[command(
    name = "showcase-server",
    version,
    author,
    about = "Showcase gRPC server"
)]
struct Args {
    /// Bind address (IP or hostname)
    #[arg(long, default_value = "0.0.0.0")]
    addr: String,

    /// Port to listen on
    #[arg(long, default_value_t = 7469)]
    port: u16,

    /// Page size used when a Pagination request sets none
    #[arg(long, default_value_t = config::DEFAULT_PAGE_SIZE)]
    default_page_size: i32,

    /// Items in flight per streaming direction
    #[arg(long, default_value_t = config::DEFAULT_STREAM_BUFFER)]
    stream_buffer: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    showcase::telemetry::init();

    let args = Args::parse();
    let addr: SocketAddr = format!("{}:{}", args.addr, args.port).parse()?;

    let config = ShowcaseConfig::new(args.default_page_size, args.stream_buffer);
    tracing::info!(?config, "Starting Showcase gRPC server");
    let core = Arc::new(showcase::Showcase::with_config(config));

    showcase_grpc::serve_with_shutdown(addr, core, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {e}");
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown signal received");
    })
    .await?;
    Ok(())
}
