use crate::models::{Category, Coordinates, Poi};
use sqlx::{SqliteConnection, SqlitePool};

use crate::constants::MIN_DESCRIPTION_LENGTH;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct PoiRow {
    id: i64,
    name: String,
    lat: f64,
    lng: f64,
    description: Option<String>,
    url: Option<String>,
    category_id: i64,
    path: Option<String>,
    difficulty_rating: f64,
    rating_count: i64,
}

impl PoiRow {
    fn into_poi(self) -> Poi {
        let path = self.path.as_deref().and_then(|raw| {
            serde_json::from_str::<Vec<Coordinates>>(raw)
                .map_err(|e| {
                    tracing::warn!(
                        "Invalid path JSON for POI '{}' (id: {}): {}",
                        self.name,
                        self.id,
                        e
                    );
                })
                .ok()
        });

        Poi {
            id: self.id,
            name: self.name,
            coordinates: Coordinates {
                lat: self.lat,
                lng: self.lng,
            },
            description: self.description,
            url: self.url,
            category_id: self.category_id,
            path,
            difficulty_rating: self.difficulty_rating,
            rating_count: self.rating_count,
        }
    }
}

const POI_COLUMNS: &str =
    "id, name, lat, lng, description, url, category_id, path, difficulty_rating, rating_count";

/// Insert payload for a new POI.
pub struct NewPoi {
    pub name: String,
    pub coordinates: Coordinates,
    pub description: Option<String>,
    pub url: Option<String>,
    pub category_id: i64,
    pub path: Option<Vec<Coordinates>>,
    pub difficulty_rating: f64,
    pub rating_count: i64,
}

impl NewPoi {
    pub fn new(name: impl Into<String>, coordinates: Coordinates, category_id: i64) -> Self {
        NewPoi {
            name: name.into(),
            coordinates,
            description: None,
            url: None,
            category_id,
            path: None,
            difficulty_rating: 0.0,
            rating_count: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub async fn all_categories(pool: &SqlitePool) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, (i64, String, String)>(
        "SELECT id, name, display_name FROM categories ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .map(|rows| {
        rows.into_iter()
            .map(|(id, name, display_name)| Category {
                id,
                name,
                display_name,
            })
            .collect()
    })
}

pub async fn category_by_name(
    pool: &SqlitePool,
    name: &str,
) -> Result<Option<Category>, sqlx::Error> {
    let row = sqlx::query_as::<_, (i64, String, String)>(
        "SELECT id, name, display_name FROM categories WHERE name = ?1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, name, display_name)| Category {
        id,
        name,
        display_name,
    }))
}

/// Id of the `trails` category, or None when seed data is absent.
pub async fn trails_category_id(pool: &SqlitePool) -> Result<Option<i64>, sqlx::Error> {
    Ok(category_by_name(pool, "trails").await?.map(|c| c.id))
}

pub async fn insert_category(
    conn: &mut SqliteConnection,
    name: &str,
    display_name: &str,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query("INSERT INTO categories (name, display_name) VALUES (?1, ?2)")
        .bind(name)
        .bind(display_name)
        .execute(conn)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn category_count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(pool)
        .await
}

// ---------------------------------------------------------------------------
// POIs
// ---------------------------------------------------------------------------

pub async fn find_poi(pool: &SqlitePool, id: i64) -> Result<Option<Poi>, sqlx::Error> {
    let sql = format!("SELECT {POI_COLUMNS} FROM pois WHERE id = ?1");
    let row: Option<PoiRow> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row.map(PoiRow::into_poi))
}

/// Look up a POI that must belong to the `trails` category.
pub async fn find_trail(pool: &SqlitePool, id: i64) -> Result<Option<Poi>, sqlx::Error> {
    let row: Option<PoiRow> = sqlx::query_as(
        "SELECT p.id, p.name, p.lat, p.lng, p.description, p.url, p.category_id,
                p.path, p.difficulty_rating, p.rating_count
         FROM pois p
         INNER JOIN categories c ON p.category_id = c.id
         WHERE p.id = ?1 AND c.name = 'trails'",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(PoiRow::into_poi))
}

pub async fn pois_in_category(
    pool: &SqlitePool,
    category_id: i64,
) -> Result<Vec<Poi>, sqlx::Error> {
    let sql = format!("SELECT {POI_COLUMNS} FROM pois WHERE category_id = ?1 ORDER BY id");
    let rows: Vec<PoiRow> = sqlx::query_as(&sql).bind(category_id).fetch_all(pool).await?;
    Ok(rows.into_iter().map(PoiRow::into_poi).collect())
}

/// Existence check on a connection so callers inside a transaction see
/// their own uncommitted inserts.
pub async fn trail_exists_by_name(
    conn: &mut SqliteConnection,
    name: &str,
    category_id: i64,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pois WHERE name = ?1 AND category_id = ?2)")
        .bind(name)
        .bind(category_id)
        .fetch_one(conn)
        .await
}

pub async fn insert_poi(conn: &mut SqliteConnection, poi: &NewPoi) -> Result<i64, sqlx::Error> {
    let path_json = poi
        .path
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

    let result = sqlx::query(
        "INSERT INTO pois (name, lat, lng, description, url, category_id, path,
                           difficulty_rating, rating_count)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(&poi.name)
    .bind(poi.coordinates.lat)
    .bind(poi.coordinates.lng)
    .bind(&poi.description)
    .bind(&poi.url)
    .bind(poi.category_id)
    .bind(path_json)
    .bind(poi.difficulty_rating)
    .bind(poi.rating_count)
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn update_description(
    pool: &SqlitePool,
    poi_id: i64,
    description: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE pois SET description = ?1 WHERE id = ?2")
        .bind(description)
        .bind(poi_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Trails with a missing or minimal description, eligible for enrichment.
pub async fn trails_without_descriptions(
    pool: &SqlitePool,
    category_id: i64,
) -> Result<Vec<Poi>, sqlx::Error> {
    let sql = format!(
        "SELECT {POI_COLUMNS} FROM pois
         WHERE category_id = ?1
           AND (description IS NULL OR length(description) < ?2)
         ORDER BY id"
    );
    let rows: Vec<PoiRow> = sqlx::query_as(&sql)
        .bind(category_id)
        .bind(MIN_DESCRIPTION_LENGTH as i64)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(PoiRow::into_poi).collect())
}

// ---------------------------------------------------------------------------
// Recommendation queries
// ---------------------------------------------------------------------------

/// Rated trails, optionally restricted to a difficulty band, most-rated first.
pub async fn trails_with_ratings(
    pool: &SqlitePool,
    category_id: i64,
    difficulty_band: Option<(f64, f64)>,
    limit: usize,
) -> Result<Vec<Poi>, sqlx::Error> {
    let band_clause = if difficulty_band.is_some() {
        "AND difficulty_rating >= ?2 AND difficulty_rating <= ?3"
    } else {
        ""
    };
    let sql = format!(
        "SELECT {POI_COLUMNS} FROM pois
         WHERE category_id = ?1 AND rating_count > 0
         {band_clause}
         ORDER BY rating_count DESC
         LIMIT {limit}"
    );

    let mut query = sqlx::query_as::<_, PoiRow>(&sql).bind(category_id);
    if let Some((lo, hi)) = difficulty_band {
        query = query.bind(lo).bind(hi);
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows.into_iter().map(PoiRow::into_poi).collect())
}

/// Trails ordered by rating count, ties broken by difficulty.
pub async fn popular_trails(
    pool: &SqlitePool,
    category_id: i64,
    limit: usize,
) -> Result<Vec<Poi>, sqlx::Error> {
    let sql = format!(
        "SELECT {POI_COLUMNS} FROM pois
         WHERE category_id = ?1
         ORDER BY rating_count DESC, difficulty_rating DESC
         LIMIT {limit}"
    );
    let rows: Vec<PoiRow> = sqlx::query_as(&sql).bind(category_id).fetch_all(pool).await?;
    Ok(rows.into_iter().map(PoiRow::into_poi).collect())
}

/// First pass of the family filter: keyword match against name or
/// description, in database iteration order. SQLite's LIKE is
/// case-insensitive for ASCII, matching the keyword set.
pub async fn trails_matching_keywords(
    pool: &SqlitePool,
    category_id: i64,
    keywords: &[&str],
    limit: usize,
) -> Result<Vec<Poi>, sqlx::Error> {
    let like_clauses: Vec<String> = (0..keywords.len())
        .map(|i| {
            let p = i + 2;
            format!("name LIKE ?{p} OR coalesce(description, '') LIKE ?{p}")
        })
        .collect();
    let sql = format!(
        "SELECT {POI_COLUMNS} FROM pois
         WHERE category_id = ?1 AND ({})
         LIMIT {limit}",
        like_clauses.join(" OR ")
    );

    let mut query = sqlx::query_as::<_, PoiRow>(&sql).bind(category_id);
    for kw in keywords {
        query = query.bind(format!("%{kw}%"));
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows.into_iter().map(PoiRow::into_poi).collect())
}

/// Second pass of the family filter: rated, easy trails not already selected,
/// easiest first.
pub async fn easy_trails_excluding(
    pool: &SqlitePool,
    category_id: i64,
    exclude_ids: &[i64],
    max_difficulty: f64,
    limit: usize,
) -> Result<Vec<Poi>, sqlx::Error> {
    let exclude_clause = if exclude_ids.is_empty() {
        String::new()
    } else {
        let placeholders: Vec<String> =
            (0..exclude_ids.len()).map(|i| format!("?{}", i + 3)).collect();
        format!("AND id NOT IN ({})", placeholders.join(", "))
    };
    let sql = format!(
        "SELECT {POI_COLUMNS} FROM pois
         WHERE category_id = ?1 AND rating_count > 0 AND difficulty_rating <= ?2
         {exclude_clause}
         ORDER BY difficulty_rating ASC
         LIMIT {limit}"
    );

    let mut query = sqlx::query_as::<_, PoiRow>(&sql)
        .bind(category_id)
        .bind(max_difficulty);
    for id in exclude_ids {
        query = query.bind(id);
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows.into_iter().map(PoiRow::into_poi).collect())
}
