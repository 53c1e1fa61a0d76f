use crate::models::Coordinates;
use serde::{Deserialize, Serialize};

/// An accommodation listing. Created at seed time or via POST, read-only
/// afterwards; serves as the anchor point for nearby-trail queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airbnb {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    /// Nightly price in euros.
    pub price: Option<i64>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub bedrooms: Option<i64>,
    pub image_url: Option<String>,
}
