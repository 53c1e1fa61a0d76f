use crate::db::poi_queries;
use crate::models::Poi;
use crate::{AppState, Result};
use axum::extract::State;
use axum::Json;
use std::collections::BTreeMap;
use std::sync::Arc;

/// GET /pois: every point of interest, grouped by category name.
pub async fn list_pois(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, Vec<Poi>>>> {
    let categories = poi_queries::all_categories(&state.pool).await?;

    let mut grouped = BTreeMap::new();
    for category in categories {
        let pois = poi_queries::pois_in_category(&state.pool, category.id).await?;
        grouped.insert(category.name, pois);
    }

    Ok(Json(grouped))
}
