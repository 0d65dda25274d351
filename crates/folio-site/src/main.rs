//! Folio - HTTP server for a content-backed portfolio site.
//!
//! Pre-resolves every page at startup, then serves pages with
//! stale-while-revalidate caching and relays contact form messages.

use axum::http::Request;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use folio_site::{AppState, Config, router};

/// Folio - content-backed portfolio site server.
#[derive(Parser, Debug)]
#[command(name = "folio-site")]
#[command(about = "Portfolio site server backed by a headless CMS", long_about = None)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,

    /// Skip pre-resolving pages at startup; every page resolves on first request.
    #[arg(long)]
    skip_warm: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load .env file if it exists
    if std::path::Path::new(&args.dotenv).exists() {
        dotenvy::from_path(&args.dotenv)?;
        eprintln!("Loaded environment from {}", args.dotenv);
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let bind_addr = config.bind_addr.clone();

    // Create application state
    let state = AppState::new(config)?;

    // Resolve every known page before taking traffic
    if args.skip_warm {
        tracing::info!("skipping page pre-resolution");
    } else {
        state.resolver.warm().await;
    }

    // Build router with middleware
    let app = router(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "starting site server");

    axum::serve(listener, app).await?;

    Ok(())
}
