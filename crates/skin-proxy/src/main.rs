//! Skin Proxy - Minecraft profile and skin relay
//!
//! Relays Mojang session and account lookups with texture URLs pointed back
//! at this service, and serves skins and capes for Java and Bedrock players.

mod cache;
mod cape;
mod config;
mod error;
mod fetcher;
mod identity;
mod keepalive;
mod middleware;
mod optifine;
mod rewrite;
mod routes;
mod server;
mod state;
mod texture;
mod types;

#[cfg(test)]
mod test_support;

use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::server::start_server;
use crate::state::AppState;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive("skin_proxy=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting skin proxy...");

    let config = Config::from_env().map_err(ProxyError::Config)?;
    info!("Port: {}", config.port);
    info!("Rewrite mode: {:?}", config.rewrite_mode);
    info!("Texture delivery: {:?}", config.texture_delivery);
    info!(
        "Response cache: {} entries for {} seconds",
        config.response_cache_capacity, config.response_cache_ttl_secs
    );
    if let Some(public_url) = &config.public_url {
        info!("Public URL: {}", public_url);
    }

    if let Some(keep_alive) = config.keep_alive.clone() {
        info!(
            "Keep-alive: {} every {} seconds",
            keep_alive.url, keep_alive.interval_secs
        );
        keepalive::spawn(keep_alive);
    }

    let port = config.port;
    let state = AppState::new(config);

    start_server(state, port)
        .await
        .map_err(|e| ProxyError::Config(format!("Server error: {}", e)))?;

    Ok(())
}
