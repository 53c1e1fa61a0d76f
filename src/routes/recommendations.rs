use crate::constants::{DEFAULT_NEARBY_RADIUS_KM, DIFFICULTY_QUERY_LIMIT, RECOMMENDATION_LIMIT};
use crate::models::Poi;
use crate::services::recommendation::{self, NearbyTrail, TrailPreferences};
use crate::{AppError, AppState, Result};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Serialize)]
pub struct RecommendResponse {
    pub recommendations: recommendation::Recommendations,
}

/// Pull preferences out of a raw JSON body. A wrong-typed field must be a
/// 400 validation error, not the extractor's 422, so each field is checked
/// by hand like the rate endpoint does.
fn parse_preferences(body: &Value) -> Result<TrailPreferences> {
    if !body.is_object() {
        return Err(AppError::Validation(
            "preferences must be a JSON object".to_string(),
        ));
    }

    let difficulty_level = match body.get("difficulty_level") {
        None | Some(Value::Null) => 3,
        Some(value) => value
            .as_u64()
            .and_then(|d| u8::try_from(d).ok())
            .ok_or_else(|| {
                AppError::Validation("difficulty_level must be an integer".to_string())
            })?,
    };

    let family_friendly = match body.get("family_friendly") {
        None | Some(Value::Null) => false,
        Some(value) => value.as_bool().ok_or_else(|| {
            AppError::Validation("family_friendly must be a boolean".to_string())
        })?,
    };

    let airbnb_id = match body.get("airbnb_id") {
        None | Some(Value::Null) => None,
        Some(value) => Some(value.as_i64().ok_or_else(|| {
            AppError::Validation("airbnb_id must be an integer".to_string())
        })?),
    };

    Ok(TrailPreferences {
        difficulty_level,
        family_friendly,
        airbnb_id,
    })
}

/// POST /recommend/trails with a preferences body.
pub async fn recommend_trails(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<RecommendResponse>> {
    let prefs = parse_preferences(&body)?;
    let recommendations = recommendation::recommend(&state.pool, &prefs).await?;
    Ok(Json(RecommendResponse { recommendations }))
}

/// GET /trails/difficulty/{level}: rated trails in the band around a level.
pub async fn trails_by_difficulty(
    State(state): State<Arc<AppState>>,
    Path(level): Path<u8>,
) -> Result<Json<Vec<Poi>>> {
    if !(1..=5).contains(&level) {
        return Err(AppError::Validation(
            "difficulty level must be between 1 and 5".to_string(),
        ));
    }
    let trails =
        recommendation::trails_by_difficulty(&state.pool, Some(level), DIFFICULTY_QUERY_LIMIT)
            .await?;
    Ok(Json(trails))
}

/// GET /trails/family-friendly
pub async fn family_friendly_trails(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Poi>>> {
    let trails =
        recommendation::family_friendly_trails(&state.pool, DIFFICULTY_QUERY_LIMIT).await?;
    Ok(Json(trails))
}

/// GET /trails/popular
pub async fn popular_trails(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Poi>>> {
    let trails = recommendation::popular_trails(&state.pool, DIFFICULTY_QUERY_LIMIT).await?;
    Ok(Json(trails))
}

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub max_distance: Option<f64>,
}

/// GET /trails/near-airbnb/{id}?max_distance=km
///
/// An unknown listing id yields an empty list here, unlike the aggregator
/// where the key is omitted.
pub async fn trails_near_airbnb(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<Vec<NearbyTrail>>> {
    let max_distance = params.max_distance.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
    if max_distance.is_nan() || max_distance <= 0.0 {
        return Err(AppError::Validation(
            "max_distance must be a positive number of kilometers".to_string(),
        ));
    }

    let nearby = match recommendation::trails_near_airbnb(
        &state.pool,
        id,
        max_distance,
        RECOMMENDATION_LIMIT,
    )
    .await
    {
        Ok(nearby) => nearby,
        Err(AppError::NotFound(msg)) => {
            tracing::warn!("{}", msg);
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    let items = nearby
        .into_iter()
        .map(|(trail, distance)| NearbyTrail {
            trail,
            distance_km: (distance * 10.0).round() / 10.0,
        })
        .collect();
    Ok(Json(items))
}
