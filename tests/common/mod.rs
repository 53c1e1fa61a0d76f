use alpiplan::config::Config;
use alpiplan::constants::{DEFAULT_SYNC_HISTORY_PATH, DEFAULT_TREKKING_API_URL};
use alpiplan::services::sync_history::SyncHistory;
use alpiplan::services::trekking::TrekkingClient;
use alpiplan::AppState;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;

/// In-memory SQLite with schema and seed data. One connection only, a pool
/// of in-memory connections would each see a different database.
#[allow(dead_code)]
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory SQLite pool");

    alpiplan::db::create_schema(&pool)
        .await
        .expect("Failed to create schema");
    alpiplan::db::seed::seed_if_empty(&pool)
        .await
        .expect("Failed to seed test database");

    pool
}

#[allow(dead_code)]
pub fn get_test_config() -> Config {
    Config {
        host: "0.0.0.0".to_string(),
        port: 3000,
        database_url: "sqlite::memory:".to_string(),
        trekking_api_url: DEFAULT_TREKKING_API_URL.to_string(),
        // No API key: external fetches degrade to an empty result
        trekking_api_key: None,
        http_timeout_secs: 10,
        sync_history_path: DEFAULT_SYNC_HISTORY_PATH.to_string(),
    }
}

/// Router over a seeded in-memory database. The returned TempDir holds the
/// sync history file and must stay alive for the test's duration.
#[allow(dead_code)]
pub async fn setup_test_app() -> (axum::Router, TempDir) {
    let pool = setup_test_db().await;
    let config = get_test_config();
    let history_dir = TempDir::new().expect("Failed to create temp dir");

    let trekking = TrekkingClient::new(&config).expect("Failed to build trekking client");
    let sync_history = SyncHistory::new(history_dir.path().join("sync_history.json"));

    let state = Arc::new(AppState {
        pool,
        trekking,
        sync_history,
    });

    (alpiplan::routes::create_router(state), history_dir)
}
