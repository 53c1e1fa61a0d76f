pub mod airbnbs;
pub mod debug;
pub mod pois;
pub mod ratings;
pub mod recommendations;
pub mod sync;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

/// All API routes. Nested under `/api/v1` by the binary.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/pois", get(pois::list_pois))
        .route(
            "/airbnbs",
            get(airbnbs::list_airbnbs).post(airbnbs::create_airbnb),
        )
        .route("/airbnbs/{id}", get(airbnbs::get_airbnb))
        .route("/trails/{id}/ratings", get(ratings::list_ratings))
        .route("/trails/{id}/rate", post(ratings::rate_trail))
        .route("/recommend/trails", post(recommendations::recommend_trails))
        .route(
            "/trails/difficulty/{level}",
            get(recommendations::trails_by_difficulty),
        )
        .route(
            "/trails/family-friendly",
            get(recommendations::family_friendly_trails),
        )
        .route("/trails/popular", get(recommendations::popular_trails))
        .route(
            "/trails/near-airbnb/{id}",
            get(recommendations::trails_near_airbnb),
        )
        .route("/trails/update-from-api", post(sync::update_from_api))
        .route("/trails/external-sources", get(sync::external_sources))
        .route("/admin/sync-history", get(sync::sync_history))
        .route("/admin/enrich-trails", post(sync::enrich_trails))
        .route("/debug/health", get(debug::health))
        .with_state(state)
}
