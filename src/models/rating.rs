use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A single user's difficulty rating for a trail (1 = easy, 5 = very
/// difficult). One rating per (trail, user identifier); resubmitting
/// overwrites in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailRating {
    pub id: i64,
    pub poi_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    /// Opaque identifier used only to keep the upsert idempotent. Not
    /// serialized; clients receive it once from the rate endpoint.
    #[serde(skip_serializing)]
    pub user_identifier: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
