//! Client for the external trekking-trails API and the bulk import that
//! feeds its records into the POI table.

use crate::config::Config;
use crate::constants::{IMPORT_COMMIT_BATCH, SIMULATED_PATH_POINTS, SIMULATED_PATH_RADIUS_KM};
use crate::db::poi_queries::{self, NewPoi};
use crate::error::{AppError, Result};
use crate::models::Coordinates;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::time::Duration;

/// Thin wrapper around the upstream trails API. Cloneable; the inner
/// reqwest client is already reference-counted.
#[derive(Clone)]
pub struct TrekkingClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// One trail record as returned by the upstream API. Every field is
/// optional so a single malformed record cannot fail the whole batch;
/// validation happens at import time.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiTrail {
    pub name: Option<String>,
    #[serde(alias = "latitude")]
    pub lat: Option<f64>,
    #[serde(alias = "longitude")]
    pub lng: Option<f64>,
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(alias = "coordinates")]
    pub path: Option<Vec<Coordinates>>,
    pub difficulty: Option<f64>,
}

#[derive(Debug, Default, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

impl TrekkingClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(TrekkingClient {
            client,
            base_url: config.trekking_api_url.clone(),
            api_key: config.trekking_api_key.clone(),
        })
    }

    /// Shared HTTP client, also used by the enrichment page fetcher.
    pub fn http_client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Fetch trail records for a region. Returns an empty list when no API
    /// key is configured so the sync endpoint degrades instead of failing.
    pub async fn fetch_trails(&self, region: &str, limit: usize) -> Result<Vec<ApiTrail>> {
        let Some(api_key) = &self.api_key else {
            tracing::warn!("TREKKING_API_KEY not set, skipping external trail fetch");
            return Ok(Vec::new());
        };

        let url = format!("{}/trails", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("X-API-Key", api_key)
            .query(&[("region", region), ("limit", &limit.to_string())])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Trekking API request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Trekking API returned status {}",
                response.status()
            )));
        }

        response
            .json::<Vec<ApiTrail>>()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid trekking API response: {e}")))
    }
}

/// Generate a plausible circular walking path around a trailhead for
/// records the upstream API ships without geometry. The loop starts and
/// ends at the same point.
pub fn simulate_circular_path(center: &Coordinates) -> Vec<Coordinates> {
    let mut rng = rand::thread_rng();
    // 1 degree of latitude is ~111 km
    let radius_deg = SIMULATED_PATH_RADIUS_KM / 111.0;
    let lat_rad = center.lat.to_radians();

    let mut path: Vec<Coordinates> = (0..SIMULATED_PATH_POINTS)
        .map(|i| {
            let angle = 2.0 * std::f64::consts::PI * (i as f64) / (SIMULATED_PATH_POINTS as f64);
            let jitter = rng.gen_range(0.7..1.3);
            Coordinates {
                lat: center.lat + radius_deg * jitter * angle.sin(),
                lng: center.lng + radius_deg * jitter * angle.cos() / lat_rad.cos().max(0.01),
            }
        })
        .collect();

    if let Some(first) = path.first().copied() {
        path.push(first);
    }
    path
}

/// Insert fetched trail records into the trails category.
///
/// Malformed records and name duplicates are skipped, not fatal. Inserts
/// are committed every [`IMPORT_COMMIT_BATCH`] records so a failure late in
/// a large batch does not discard the whole import.
pub async fn import_trails(pool: &SqlitePool, records: Vec<ApiTrail>) -> Result<ImportSummary> {
    let category_id = poi_queries::trails_category_id(pool)
        .await?
        .ok_or_else(|| AppError::Internal("Trails category not found".to_string()))?;

    let mut summary = ImportSummary::default();
    let mut tx = pool.begin().await?;
    let mut pending = 0usize;

    for record in records {
        let Some(poi) = validate_record(&record, category_id) else {
            tracing::debug!("Skipping malformed trail record: {:?}", record.name);
            summary.skipped += 1;
            continue;
        };

        if poi_queries::trail_exists_by_name(&mut tx, &poi.name, category_id).await? {
            tracing::debug!("Trail '{}' already present, skipping", poi.name);
            summary.skipped += 1;
            continue;
        }

        poi_queries::insert_poi(&mut tx, &poi).await?;
        summary.imported += 1;
        pending += 1;

        if pending >= IMPORT_COMMIT_BATCH {
            tx.commit().await?;
            tx = pool.begin().await?;
            pending = 0;
        }
    }

    tx.commit().await?;

    tracing::info!(
        imported = summary.imported,
        skipped = summary.skipped,
        "Trail import finished"
    );
    Ok(summary)
}

/// Turn an API record into an insert payload, or None when required fields
/// are missing or out of range.
fn validate_record(record: &ApiTrail, category_id: i64) -> Option<NewPoi> {
    let name = record.name.as_deref()?.trim();
    if name.is_empty() {
        return None;
    }
    let coordinates = Coordinates::new(record.lat?, record.lng?).ok()?;

    let path = match &record.path {
        Some(points) if points.len() >= 2 => Some(points.clone()),
        _ => Some(simulate_circular_path(&coordinates)),
    };

    let mut poi = NewPoi::new(name, coordinates, category_id);
    poi.description = record.description.clone().filter(|d| !d.trim().is_empty());
    poi.url = record.url.clone();
    poi.path = path;
    poi.difficulty_rating = record.difficulty.unwrap_or(0.0).clamp(0.0, 5.0);
    Some(poi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::setup_test_pool;

    fn record(name: Option<&str>, lat: Option<f64>, lng: Option<f64>) -> ApiTrail {
        ApiTrail {
            name: name.map(String::from),
            lat,
            lng,
            description: None,
            url: None,
            path: None,
            difficulty: None,
        }
    }

    async fn pool_with_trails_category() -> (SqlitePool, i64) {
        let pool = setup_test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let id = poi_queries::insert_category(&mut conn, "trails", "Family Hiking Trails")
            .await
            .unwrap();
        (pool, id)
    }

    #[test]
    fn simulated_path_is_a_closed_loop_near_the_center() {
        let center = Coordinates::new(46.2302, 10.8248).unwrap();
        let path = simulate_circular_path(&center);

        assert_eq!(path.len(), SIMULATED_PATH_POINTS + 1);
        assert_eq!(path.first().unwrap().lat, path.last().unwrap().lat);
        assert_eq!(path.first().unwrap().lng, path.last().unwrap().lng);
        for point in &path {
            assert!(center.distance_to(point) < 3.0 * SIMULATED_PATH_RADIUS_KM);
        }
    }

    #[test]
    fn validate_record_rejects_missing_fields() {
        assert!(validate_record(&record(None, Some(46.0), Some(10.8)), 1).is_none());
        assert!(validate_record(&record(Some("Trail"), None, Some(10.8)), 1).is_none());
        assert!(validate_record(&record(Some("   "), Some(46.0), Some(10.8)), 1).is_none());
        assert!(validate_record(&record(Some("Trail"), Some(95.0), Some(10.8)), 1).is_none());
        assert!(validate_record(&record(Some("Trail"), Some(46.0), Some(10.8)), 1).is_some());
    }

    #[test]
    fn validate_record_simulates_a_missing_path() {
        let poi = validate_record(&record(Some("Trail"), Some(46.0), Some(10.8)), 1).unwrap();
        assert!(poi.path.as_ref().unwrap().len() > 2);
    }

    #[tokio::test]
    async fn import_skips_malformed_and_duplicate_records() {
        let (pool, category_id) = pool_with_trails_category().await;

        let records = vec![
            record(Some("Sentiero Uno"), Some(46.23), Some(10.82)),
            record(None, Some(46.24), Some(10.83)),
            record(Some("Sentiero Uno"), Some(46.23), Some(10.82)),
            record(Some("Sentiero Due"), Some(46.25), Some(10.84)),
        ];

        let summary = import_trails(&pool, records).await.unwrap();
        assert_eq!(summary.imported, 2);
        assert_eq!(summary.skipped, 2);

        let trails = poi_queries::pois_in_category(&pool, category_id).await.unwrap();
        assert_eq!(trails.len(), 2);
        assert!(trails.iter().all(|t| t.path.is_some()));
        assert!(trails.iter().all(|t| t.rating_count == 0));
    }

    #[tokio::test]
    async fn import_handles_more_records_than_one_commit_batch() {
        let (pool, category_id) = pool_with_trails_category().await;

        let records: Vec<ApiTrail> = (0..25)
            .map(|i| {
                let name = format!("Trail {i}");
                record(Some(name.as_str()), Some(46.2 + i as f64 * 0.01), Some(10.8))
            })
            .collect();

        let summary = import_trails(&pool, records).await.unwrap();
        assert_eq!(summary.imported, 25);

        let trails = poi_queries::pois_in_category(&pool, category_id).await.unwrap();
        assert_eq!(trails.len(), 25);
    }
}
