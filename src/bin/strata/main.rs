//! Demo server: two routes, the same three middlewares in different orders.
//!
//! Run with:
//!   RUST_LOG=info cargo run
//!
//! Try:
//!   curl http://localhost:8080/
//!   curl http://localhost:8080/users
//!
//! and compare the order of the `request received` and `request count` log
//! lines between the two.

mod routes;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use strata::{RequestMetrics, Server, ServerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about = "strata middleware-chain demo server")]
struct Args {
    /// Address to listen on (`host:port`).
    #[arg(long, env = "STRATA_ADDR", default_value = "localhost:8080")]
    addr: String,

    /// Header read and handler deadline, in seconds.
    #[arg(long, env = "STRATA_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), strata::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let timeout = Duration::from_secs(args.timeout_secs);
    let config = ServerConfig::new(args.addr)
        .header_read_timeout(timeout)
        .handler_timeout(timeout);

    let metrics = Arc::new(RequestMetrics::new());
    let app = routes::app(&metrics);

    Server::with_config(config).serve(app).await?;

    tracing::info!(requests = metrics.requests(), "requests served");
    Ok(())
}
