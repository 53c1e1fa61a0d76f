// Library exports for testing and reusability

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

use services::sync_history::SyncHistory;
use services::trekking::TrekkingClient;
use sqlx::SqlitePool;

// App state shared across request handlers, constructed once at startup
pub struct AppState {
    pub pool: SqlitePool,
    pub trekking: TrekkingClient,
    pub sync_history: SyncHistory,
}
