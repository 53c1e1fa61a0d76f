//! Trail recommendation engine.
//!
//! A handful of filter/sort queries over the trails category plus a
//! Haversine distance ranking anchored at an accommodation listing. All
//! functions return an empty list when the trails category is missing from
//! the database rather than failing the request.

use crate::constants::{
    DEFAULT_NEARBY_RADIUS_KM, DIFFICULTY_BAND_HALF_WIDTH, FAMILY_FRIENDLY_MAX_DIFFICULTY,
    FAMILY_KEYWORDS, RECOMMENDATION_LIMIT,
};
use crate::db::{airbnb_queries, poi_queries};
use crate::error::{AppError, Result};
use crate::models::Poi;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Validated user preferences for the recommendation aggregator.
#[derive(Debug, Clone, Deserialize)]
pub struct TrailPreferences {
    /// Preferred difficulty level, 1 (easy) to 5 (very difficult).
    #[serde(default = "default_difficulty")]
    pub difficulty_level: u8,
    /// Prioritize family-friendly trails.
    #[serde(default)]
    pub family_friendly: bool,
    /// Accommodation listing to anchor the nearby-trail search.
    #[serde(default)]
    pub airbnb_id: Option<i64>,
}

fn default_difficulty() -> u8 {
    3
}

impl TrailPreferences {
    pub fn validate(&self) -> Result<()> {
        if !(1..=5).contains(&self.difficulty_level) {
            return Err(AppError::Validation(
                "difficulty_level must be between 1 and 5".to_string(),
            ));
        }
        Ok(())
    }
}

/// A trail paired with its distance from the anchor listing.
#[derive(Debug, Serialize)]
pub struct NearbyTrail {
    pub trail: Poi,
    /// Kilometers, rounded to one decimal.
    pub distance_km: f64,
}

/// Grouped recommendation lists. The optional keys are present only when the
/// corresponding preference was supplied and resolvable.
#[derive(Debug, Serialize)]
pub struct Recommendations {
    pub by_difficulty: Vec<Poi>,
    pub popular_trails: Vec<Poi>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_friendly: Option<Vec<Poi>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearby_trails: Option<Vec<NearbyTrail>>,
}

/// Rated trails, optionally restricted to the band
/// [difficulty - 0.5, difficulty + 0.5], most-rated first.
pub async fn trails_by_difficulty(
    pool: &SqlitePool,
    difficulty: Option<u8>,
    limit: usize,
) -> Result<Vec<Poi>> {
    let Some(category_id) = poi_queries::trails_category_id(pool).await? else {
        tracing::error!("Trails category not found in the database");
        return Ok(Vec::new());
    };

    let band = difficulty.map(|d| {
        let d = d as f64;
        (d - DIFFICULTY_BAND_HALF_WIDTH, d + DIFFICULTY_BAND_HALF_WIDTH)
    });

    Ok(poi_queries::trails_with_ratings(pool, category_id, band, limit).await?)
}

/// Family-friendly trails: keyword matches first, then the easiest rated
/// trails not already selected until the limit is filled.
pub async fn family_friendly_trails(pool: &SqlitePool, limit: usize) -> Result<Vec<Poi>> {
    let Some(category_id) = poi_queries::trails_category_id(pool).await? else {
        tracing::error!("Trails category not found in the database");
        return Ok(Vec::new());
    };

    let mut trails =
        poi_queries::trails_matching_keywords(pool, category_id, &FAMILY_KEYWORDS, limit).await?;

    if trails.len() < limit {
        let existing_ids: Vec<i64> = trails.iter().map(|t| t.id).collect();
        let fallback = poi_queries::easy_trails_excluding(
            pool,
            category_id,
            &existing_ids,
            FAMILY_FRIENDLY_MAX_DIFFICULTY,
            limit - trails.len(),
        )
        .await?;
        trails.extend(fallback);
    }

    Ok(trails)
}

/// Trails within `max_distance_km` of an accommodation listing, closest
/// first. Fails with NotFound when the listing does not exist.
///
/// Linear scan over the trails category; POI volumes here are small enough
/// that a spatial index would be overkill.
pub async fn trails_near_airbnb(
    pool: &SqlitePool,
    airbnb_id: i64,
    max_distance_km: f64,
    limit: usize,
) -> Result<Vec<(Poi, f64)>> {
    let airbnb = airbnb_queries::find_airbnb(pool, airbnb_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Airbnb with ID {airbnb_id} not found")))?;

    let Some(category_id) = poi_queries::trails_category_id(pool).await? else {
        tracing::error!("Trails category not found in the database");
        return Ok(Vec::new());
    };

    let trails = poi_queries::pois_in_category(pool, category_id).await?;

    let mut nearby: Vec<(Poi, f64)> = trails
        .into_iter()
        .filter_map(|trail| {
            let distance = airbnb.coordinates.distance_to(&trail.coordinates);
            (distance <= max_distance_km).then_some((trail, distance))
        })
        .collect();

    nearby.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    nearby.truncate(limit);
    Ok(nearby)
}

/// Most popular trails by rating count, ties broken by difficulty.
pub async fn popular_trails(pool: &SqlitePool, limit: usize) -> Result<Vec<Poi>> {
    let Some(category_id) = poi_queries::trails_category_id(pool).await? else {
        tracing::error!("Trails category not found in the database");
        return Ok(Vec::new());
    };

    Ok(poi_queries::popular_trails(pool, category_id, limit).await?)
}

/// Compose the recommendation lists for a preferences payload.
///
/// An accommodation id that does not resolve is logged and the
/// `nearby_trails` key omitted; it is not an error for the caller.
pub async fn recommend(pool: &SqlitePool, prefs: &TrailPreferences) -> Result<Recommendations> {
    prefs.validate()?;

    let by_difficulty =
        trails_by_difficulty(pool, Some(prefs.difficulty_level), RECOMMENDATION_LIMIT).await?;
    let popular = popular_trails(pool, RECOMMENDATION_LIMIT).await?;

    let family_friendly = if prefs.family_friendly {
        Some(family_friendly_trails(pool, RECOMMENDATION_LIMIT).await?)
    } else {
        None
    };

    let nearby_trails = match prefs.airbnb_id {
        Some(airbnb_id) => {
            match trails_near_airbnb(pool, airbnb_id, DEFAULT_NEARBY_RADIUS_KM, RECOMMENDATION_LIMIT)
                .await
            {
                Ok(nearby) => Some(
                    nearby
                        .into_iter()
                        .map(|(trail, distance)| NearbyTrail {
                            trail,
                            distance_km: (distance * 10.0).round() / 10.0,
                        })
                        .collect(),
                ),
                Err(AppError::NotFound(msg)) => {
                    tracing::warn!("Skipping nearby trails: {}", msg);
                    None
                }
                Err(e) => return Err(e),
            }
        }
        None => None,
    };

    Ok(Recommendations {
        by_difficulty,
        popular_trails: popular,
        family_friendly,
        nearby_trails,
    })
}
