use crate::db::airbnb_queries::{self, NewAirbnb};
use crate::models::{Airbnb, Coordinates};
use crate::{AppError, AppState, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

/// GET /airbnbs
pub async fn list_airbnbs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Airbnb>>> {
    Ok(Json(airbnb_queries::all_airbnbs(&state.pool).await?))
}

/// GET /airbnbs/{id}
pub async fn get_airbnb(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Airbnb>> {
    let airbnb = airbnb_queries::find_airbnb(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Airbnb with ID {id} not found")))?;
    Ok(Json(airbnb))
}

/// Every field optional so presence can be validated explicitly instead of
/// surfacing a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct CreateAirbnbRequest {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub price: Option<i64>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub bedrooms: Option<i64>,
    pub image_url: Option<String>,
}

/// POST /airbnbs: create a listing. Name and coordinates are required.
pub async fn create_airbnb(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateAirbnbRequest>,
) -> Result<(StatusCode, Json<Airbnb>)> {
    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::Validation("name is required".to_string()))?;
    let (Some(lat), Some(lng)) = (request.lat, request.lng) else {
        return Err(AppError::Validation("lat and lng are required".to_string()));
    };
    let coordinates = Coordinates::new(lat, lng).map_err(AppError::Validation)?;

    let new_airbnb = NewAirbnb {
        name: name.to_string(),
        coordinates,
        price: request.price,
        description: request.description,
        url: request.url,
        bedrooms: request.bedrooms,
        image_url: request.image_url,
    };

    let mut conn = state.pool.acquire().await?;
    let id = airbnb_queries::insert_airbnb(&mut conn, &new_airbnb).await?;
    drop(conn);

    let airbnb = airbnb_queries::find_airbnb(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Internal("Created listing not found".to_string()))?;

    tracing::info!("Created Airbnb listing '{}' (id: {})", airbnb.name, id);
    Ok((StatusCode::CREATED, Json(airbnb)))
}
