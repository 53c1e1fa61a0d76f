use crate::{AppState, Result};
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health: database reachability and a rough data census.
pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let poi_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pois")
        .fetch_one(&state.pool)
        .await?;
    let airbnb_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM airbnbs")
        .fetch_one(&state.pool)
        .await?;

    Ok(Json(json!({
        "status": "ok",
        "database": "reachable",
        "poi_count": poi_count,
        "airbnb_count": airbnb_count,
    })))
}
