//! Room-based WebSocket chat coordination server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server -- --host 127.0.0.1 --port 5000
//! ```

use std::net::SocketAddr;

use clap::Parser;

use tamariba::logger::setup_logger;

#[derive(Debug, Parser)]
#[command(name = "server", about = "Room-based realtime chat coordination server")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let addr: SocketAddr = match format!("{}:{}", args.host, args.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("Invalid bind address '{}:{}': {}", args.host, args.port, e);
            std::process::exit(1);
        }
    };

    // Run the server
    if let Err(e) = tamariba::run_server(addr).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
