use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quantra::config::Config;
use quantra::services::{feed, FeedDriver, MarketStore};
use quantra::websocket::{ws_handler, ClientRegistry};
use quantra::{api, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quantra=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting Quantra server on {}:{}", config.host, config.port);

    // Shared state
    let store = MarketStore::new();
    let registry = ClientRegistry::new();

    // Seed the instrument universe and start the feed driver
    feed::seed_universe(&store);
    let driver = FeedDriver::new(config.clone(), store.clone(), registry.clone());
    tokio::spawn(driver.run());

    let state = AppState {
        config: config.clone(),
        store,
        registry,
    };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .merge(api::router())
        .route("/ws", get(ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Quantra server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
