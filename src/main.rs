//! storefront binary.
//!
//! Run with:
//!   RUST_LOG=info cargo run
//!
//! Try:
//!   curl http://localhost:3000/
//!   curl -i http://localhost:3000/add-to-cart/10
//!   curl http://localhost:3000/cart
//!   curl -i http://localhost:3000/confirm-order

use std::process::ExitCode;
use std::sync::Arc;

use storefront::{Config, Server, Shop, shop};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let shop = Arc::new(Shop::open(&config).await);
    match Server::bind(config.addr).serve(shop::router(shop)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server error: {e}");
            ExitCode::FAILURE
        }
    }
}
