use crate::models::TrailRating;
use sqlx::SqlitePool;
use time::OffsetDateTime;

#[derive(sqlx::FromRow)]
struct RatingRow {
    id: i64,
    poi_id: i64,
    rating: i64,
    comment: Option<String>,
    user_identifier: String,
    created_at: OffsetDateTime,
}

impl RatingRow {
    fn into_rating(self) -> TrailRating {
        TrailRating {
            id: self.id,
            poi_id: self.poi_id,
            rating: self.rating,
            comment: self.comment,
            user_identifier: self.user_identifier,
            created_at: self.created_at,
        }
    }
}

pub async fn ratings_for_trail(
    pool: &SqlitePool,
    poi_id: i64,
) -> Result<Vec<TrailRating>, sqlx::Error> {
    let rows: Vec<RatingRow> = sqlx::query_as(
        "SELECT id, poi_id, rating, comment, user_identifier, created_at
         FROM trail_ratings WHERE poi_id = ?1 ORDER BY created_at",
    )
    .bind(poi_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(RatingRow::into_rating).collect())
}

/// Insert or overwrite the rating for (trail, user identifier), then
/// recompute the trail's running average inside the same transaction.
///
/// Overwriting keeps `rating_count` unchanged; the average is always the mean
/// of all current rating rows, rounded to one decimal. Concurrent submissions
/// for the same key are only as atomic as this transaction; a race can lose
/// an update (known gap).
pub async fn upsert_rating(
    pool: &SqlitePool,
    trail_id: i64,
    rating: i64,
    comment: Option<&str>,
    user_identifier: &str,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let existing_id: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM trail_ratings WHERE poi_id = ?1 AND user_identifier = ?2",
    )
    .bind(trail_id)
    .bind(user_identifier)
    .fetch_optional(&mut *tx)
    .await?;

    match existing_id {
        Some(id) => {
            sqlx::query("UPDATE trail_ratings SET rating = ?1, comment = ?2 WHERE id = ?3")
                .bind(rating)
                .bind(comment)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        None => {
            sqlx::query(
                "INSERT INTO trail_ratings (poi_id, rating, comment, user_identifier, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(trail_id)
            .bind(rating)
            .bind(comment)
            .bind(user_identifier)
            .bind(OffsetDateTime::now_utc())
            .execute(&mut *tx)
            .await?;
        }
    }

    let ratings: Vec<i64> =
        sqlx::query_scalar("SELECT rating FROM trail_ratings WHERE poi_id = ?1")
            .bind(trail_id)
            .fetch_all(&mut *tx)
            .await?;

    let count = ratings.len() as i64;
    let average = if ratings.is_empty() {
        0.0
    } else {
        let sum: i64 = ratings.iter().sum();
        (sum as f64 / ratings.len() as f64 * 10.0).round() / 10.0
    };

    sqlx::query("UPDATE pois SET difficulty_rating = ?1, rating_count = ?2 WHERE id = ?3")
        .bind(average)
        .bind(count)
        .bind(trail_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}
