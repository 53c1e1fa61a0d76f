use crate::db::{poi_queries, rating_queries};
use crate::models::{Poi, TrailRating};
use crate::{AppError, AppState, Result};
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize)]
pub struct TrailRatingsResponse {
    pub trail: Poi,
    pub ratings: Vec<TrailRating>,
}

/// GET /trails/{id}/ratings: a trail with all its ratings. 404 when the id
/// does not belong to the trails category.
pub async fn list_ratings(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<TrailRatingsResponse>> {
    let trail = poi_queries::find_trail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Trail with ID {id} not found")))?;
    let ratings = rating_queries::ratings_for_trail(&state.pool, id).await?;

    Ok(Json(TrailRatingsResponse { trail, ratings }))
}

#[derive(Serialize)]
pub struct RateTrailResponse {
    pub success: bool,
    pub trail: Poi,
    /// Echoed back so an anonymous client can resubmit under the same
    /// identity and update its rating instead of adding a new one.
    pub user_identifier: String,
}

/// POST /trails/{id}/rate with body {rating, comment?, user_identifier?}.
///
/// The body is taken as a raw JSON value: a wrong-typed or missing `rating`
/// must be a 400 validation error, not the extractor's 422.
pub async fn rate_trail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<RateTrailResponse>> {
    let trail = poi_queries::find_trail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Trail with ID {id} not found")))?;

    let rating = body
        .get("rating")
        .and_then(Value::as_i64)
        .ok_or_else(|| AppError::Validation("rating must be an integer".to_string()))?;
    if !(1..=5).contains(&rating) {
        return Err(AppError::Validation(
            "rating must be between 1 and 5".to_string(),
        ));
    }

    let comment = body.get("comment").and_then(Value::as_str);
    let user_identifier = body
        .get("user_identifier")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    rating_queries::upsert_rating(&state.pool, trail.id, rating, comment, &user_identifier).await?;

    let trail = poi_queries::find_trail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Trail {id} vanished during rating")))?;

    tracing::info!(
        "Trail '{}' rated {} by {} (now {} ratings, avg {})",
        trail.name,
        rating,
        user_identifier,
        trail.rating_count,
        trail.difficulty_rating
    );

    Ok(Json(RateTrailResponse {
        success: true,
        trail,
        user_identifier,
    }))
}
