//! Activity Explorer - Backend Server
//!
//! Lets a user pick a city, lists nearby tourist activities and compares
//! historical weather for the travel date to suggest activity categories.

use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cache;
mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;

use error::AppError;
use external::{AmadeusClient, ArchiveClient};
use services::ExplorerService;

/// How often expired weather lookups are dropped
const CACHE_PURGE_INTERVAL: Duration = Duration::from_secs(600);

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub explorer: ExplorerService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // Load configuration
    let config = config::Config::load()?;

    tracing::info!("Starting Activity Explorer Server");
    tracing::info!("Environment: {}", config.environment);

    if config.amadeus.client_id.is_empty() || config.amadeus.client_secret.is_empty() {
        return Err(AppError::Configuration(
            "EXPLORER_AMADEUS__CLIENT_ID and EXPLORER_AMADEUS__CLIENT_SECRET must be set".into(),
        )
        .into());
    }

    let explorer = ExplorerService::new(
        AmadeusClient::new(&config.amadeus),
        ArchiveClient::new(&config.weather),
    );
    spawn_cache_purge(explorer.clone());

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        explorer,
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Plain text logs by default, JSON lines with EXPLORER_LOG_FORMAT=json
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "explorer_server=debug,tower_http=debug".into());

    let json = std::env::var("EXPLORER_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn spawn_cache_purge(explorer: ExplorerService) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CACHE_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            explorer.purge_expired().await;
        }
    });
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Activity Explorer API v1.0"
}
