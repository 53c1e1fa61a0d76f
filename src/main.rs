use alpiplan::config::Config;
use alpiplan::services::sync_history::SyncHistory;
use alpiplan::services::trekking::TrekkingClient;
use alpiplan::AppState;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alpiplan=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting Alpiplan API server");

    // Create database connection pool and schema
    tracing::info!("Connecting to database...");
    let pool = alpiplan::db::create_pool(&config.database_url).await?;
    alpiplan::db::create_schema(&pool).await?;
    tracing::info!("Database ready");

    // Seed reference data on an empty database
    if alpiplan::db::seed::seed_if_empty(&pool).await? {
        tracing::info!("Seeded initial POI and listing data");
    }

    // Initialize services
    let trekking = TrekkingClient::new(&config)?;
    let sync_history = SyncHistory::new(&config.sync_history_path);

    // Create application state
    let state = Arc::new(AppState {
        pool,
        trekking,
        sync_history,
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", alpiplan::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
