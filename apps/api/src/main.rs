mod config;
mod errors;
mod media;
mod proxy;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::proxy::Endpoint;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting interview proxy v{}", env!("CARGO_PKG_VERSION"));
    info!("Backend: {}", config.backend_url);
    if config.elevenlabs_api_key.is_none() {
        info!("ELEVENLABS_API_KEY not set; /api/speech will answer 500");
    }
    if config.openai_api_key.is_none() {
        info!("OPENAI_API_KEY not set; /api/transcribe will answer 500");
    }
    if let Some(timeout) = config.upstream_timeout {
        info!("Upstream timeout override: {}s", timeout.as_secs());
    }

    for endpoint in Endpoint::ALL {
        debug!(
            "{} -> {}{} (timeout {}s)",
            endpoint.route(),
            config.backend_url,
            endpoint.upstream_path(),
            config
                .upstream_timeout
                .unwrap_or_else(|| endpoint.default_timeout())
                .as_secs()
        );
    }

    let state = AppState::from_config(&config)?;

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
