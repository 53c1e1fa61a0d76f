use crate::models::Coordinates;
use serde::{Deserialize, Serialize};

/// A category of points of interest (huts, trails, cable cars, ...).
///
/// Category names are free-form seed data rather than a closed enum: the map
/// grows new categories through imports, and deleting a category cascades to
/// its POIs at the database level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    /// Stable key, e.g. `trails`, `huts`, `cableCars`.
    pub name: String,
    /// Human-readable name, e.g. "Family Hiking Trails".
    pub display_name: String,
}

/// A point of interest on the vacation map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poi {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    pub description: Option<String>,
    pub url: Option<String>,
    pub category_id: i64,
    /// Ordered route geometry for trail POIs; other categories carry none.
    pub path: Option<Vec<Coordinates>>,
    /// Running average of submitted difficulty ratings, in [0, 5].
    /// 0 means "unrated"; `rating_count == 0` implies 0.
    pub difficulty_rating: f64,
    pub rating_count: i64,
}

impl Poi {
    /// Whether any keyword appears, case-insensitively, in the name or
    /// description.
    pub fn matches_keywords(&self, keywords: &[&str]) -> bool {
        let name = self.name.to_lowercase();
        let description = self
            .description
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        keywords
            .iter()
            .any(|kw| name.contains(kw) || description.contains(kw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_poi(name: &str, description: Option<&str>) -> Poi {
        Poi {
            id: 1,
            name: name.to_string(),
            coordinates: Coordinates::new(46.2, 10.8).unwrap(),
            description: description.map(String::from),
            url: None,
            category_id: 1,
            path: None,
            difficulty_rating: 0.0,
            rating_count: 0,
        }
    }

    #[test]
    fn test_matches_keywords() {
        let keywords = ["family", "kid"];

        assert!(make_poi("Family Trail", None).matches_keywords(&keywords));
        assert!(make_poi("Sentiero", Some("Great for KIDS")).matches_keywords(&keywords));
        assert!(!make_poi("Via Ferrata", Some("exposed ridge")).matches_keywords(&keywords));
    }

    #[test]
    fn test_poi_serializes_flat_coordinates() {
        let poi = make_poi("Lago di Braies Circuit", None);
        let json = serde_json::to_value(&poi).unwrap();
        assert_eq!(json["lat"], 46.2);
        assert_eq!(json["lng"], 10.8);
        assert!(json.get("coordinates").is_none());
    }
}
