//! Invoice Desk Server Example
//!
//! Starts the invoice REST API from an optional YAML configuration file:
//!
//! ```sh
//! cargo run --example invoice_server -- demos/invoice_server/config.yaml
//! ```
//!
//! Without an argument the in-memory store with sample data is used.

use invoice_desk::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::from_yaml_file(&path)?,
        None => AppConfig::default_config(),
    };

    // RUST_LOG takes precedence over the configured filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.log_filter.as_deref().unwrap_or("info,tower_http=debug"))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let addr = config.server.bind_addr();

    println!("🚀 Starting Invoice Desk v{}", env!("CARGO_PKG_VERSION"));
    println!("📦 Storage backend: {:?}", config.storage.backend);
    println!("\n🌐 Server running on http://{}", addr);
    println!("\n📚 Routes:");
    println!("    GET    /invoices?q=term          - List (and search) invoices");
    println!("    POST   /invoices                 - Create an invoice");
    println!("    GET    /invoices/{{id}}            - Get an invoice");
    println!("    PATCH  /invoices/{{id}}            - Update an invoice status");
    println!("    DELETE /invoices/{{id}}            - Delete an invoice");
    println!("    POST   /invoices/reset           - Restore the sample invoices");
    println!("    GET    /health                   - Health check");

    ServerBuilder::from_config(&config)?.serve(&addr).await
}
