use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn post_json(app: &axum::Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Id of the first seeded trail, looked up through the API itself.
async fn first_trail_id(app: &axum::Router) -> i64 {
    let (status, pois) = get_json(app, "/pois").await;
    assert_eq!(status, StatusCode::OK);
    pois["trails"][0]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let (app, _history) = common::setup_test_app().await;

    let (status, json) = get_json(&app, "/debug/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["database"], "reachable");
    assert!(json["poi_count"].as_i64().unwrap() > 0);
    assert!(json["airbnb_count"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_pois_grouped_by_category() {
    let (app, _history) = common::setup_test_app().await;

    let (status, json) = get_json(&app, "/pois").await;
    assert_eq!(status, StatusCode::OK);

    let groups = json.as_object().unwrap();
    assert_eq!(groups.len(), 9);
    assert_eq!(json["trails"].as_array().unwrap().len(), 8);
    assert_eq!(json["huts"].as_array().unwrap().len(), 5);

    // Coordinates are flattened onto each POI
    let trail = &json["trails"][0];
    assert!(trail["lat"].is_f64());
    assert!(trail["lng"].is_f64());
    assert!(trail["path"].is_array());
}

#[tokio::test]
async fn test_airbnb_listing_and_lookup() {
    let (app, _history) = common::setup_test_app().await;

    let (status, listings) = get_json(&app, "/airbnbs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listings.as_array().unwrap().len(), 5);

    let id = listings[0]["id"].as_i64().unwrap();
    let (status, one) = get_json(&app, &format!("/airbnbs/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["id"], listings[0]["id"]);

    let (status, _) = get_json(&app, "/airbnbs/99999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_airbnb_creation_and_validation() {
    let (app, _history) = common::setup_test_app().await;

    let (status, created) = post_json(
        &app,
        "/airbnbs",
        &json!({
            "name": "Chalet Pinzolo",
            "lat": 46.1606,
            "lng": 10.7581,
            "price": 95,
            "bedrooms": 3
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Chalet Pinzolo");
    assert_eq!(created["price"], 95);

    // Missing coordinates
    let (status, error) = post_json(&app, "/airbnbs", &json!({ "name": "No Coords" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["message"].as_str().unwrap().contains("lat"));

    // Out-of-range latitude
    let (status, _) = post_json(
        &app,
        "/airbnbs",
        &json!({ "name": "Bad", "lat": 95.0, "lng": 10.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Blank name
    let (status, _) = post_json(
        &app,
        "/airbnbs",
        &json!({ "name": "   ", "lat": 46.0, "lng": 10.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rating_flow_updates_trail_average() {
    let (app, _history) = common::setup_test_app().await;
    let trail_id = first_trail_id(&app).await;

    // First anonymous rating: server generates the identifier
    let (status, first) = post_json(
        &app,
        &format!("/trails/{trail_id}/rate"),
        &json!({ "rating": 5, "comment": "Great views" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], true);
    assert_eq!(first["trail"]["rating_count"], 1);
    assert_eq!(first["trail"]["difficulty_rating"], 5.0);
    let identifier = first["user_identifier"].as_str().unwrap().to_string();
    assert!(!identifier.is_empty());

    // A second user
    let (status, second) = post_json(
        &app,
        &format!("/trails/{trail_id}/rate"),
        &json!({ "rating": 3, "user_identifier": "hiker-2" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["trail"]["rating_count"], 2);
    assert_eq!(second["trail"]["difficulty_rating"], 4.0);

    // Resubmission under the first identity overwrites, count unchanged
    let (status, third) = post_json(
        &app,
        &format!("/trails/{trail_id}/rate"),
        &json!({ "rating": 1, "user_identifier": identifier }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(third["trail"]["rating_count"], 2);
    assert_eq!(third["trail"]["difficulty_rating"], 2.0);

    let (status, ratings) = get_json(&app, &format!("/trails/{trail_id}/ratings")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ratings["trail"]["id"].as_i64().unwrap(), trail_id);
    assert_eq!(ratings["ratings"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_rating_validation_and_trail_check() {
    let (app, _history) = common::setup_test_app().await;
    let trail_id = first_trail_id(&app).await;

    // Out of range
    let (status, _) = post_json(
        &app,
        &format!("/trails/{trail_id}/rate"),
        &json!({ "rating": 9 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Wrong type is a validation error, not an extractor rejection
    let (status, _) = post_json(
        &app,
        &format!("/trails/{trail_id}/rate"),
        &json!({ "rating": "five" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A hut is not a trail
    let (_, pois) = get_json(&app, "/pois").await;
    let hut_id = pois["huts"][0]["id"].as_i64().unwrap();
    let (status, _) = post_json(
        &app,
        &format!("/trails/{hut_id}/rate"),
        &json!({ "rating": 4 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_json(&app, &format!("/trails/{hut_id}/ratings")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recommendations_key_presence() {
    let (app, _history) = common::setup_test_app().await;

    // Base request: always by_difficulty and popular_trails, nothing else
    let (status, json) = post_json(&app, "/recommend/trails", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let recs = &json["recommendations"];
    assert!(recs["by_difficulty"].is_array());
    assert!(recs["popular_trails"].is_array());
    assert!(recs.get("family_friendly").is_none());
    assert!(recs.get("nearby_trails").is_none());
    assert!(recs["popular_trails"].as_array().unwrap().len() <= 5);

    // Family flag adds the key even when nothing matches
    let (status, json) = post_json(
        &app,
        "/recommend/trails",
        &json!({ "family_friendly": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["recommendations"]["family_friendly"].is_array());

    // A resolvable listing id adds nearby trails with rounded distances
    let (_, listings) = get_json(&app, "/airbnbs").await;
    let airbnb_id = listings[0]["id"].as_i64().unwrap();
    let (status, json) = post_json(
        &app,
        "/recommend/trails",
        &json!({ "airbnb_id": airbnb_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let nearby = json["recommendations"]["nearby_trails"].as_array().unwrap();
    assert!(!nearby.is_empty());
    for item in nearby {
        assert!(item["trail"]["id"].is_i64());
        assert!(item["distance_km"].as_f64().unwrap() <= 10.0);
    }

    // An unknown listing id drops the key instead of failing
    let (status, json) = post_json(
        &app,
        "/recommend/trails",
        &json!({ "airbnb_id": 99999 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["recommendations"].get("nearby_trails").is_none());
}

#[tokio::test]
async fn test_recommendations_reject_bad_difficulty() {
    let (app, _history) = common::setup_test_app().await;

    let (status, _) = post_json(
        &app,
        "/recommend/trails",
        &json!({ "difficulty_level": 7 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommendations_reject_wrong_typed_payload() {
    let (app, _history) = common::setup_test_app().await;

    // Wrong-typed fields are validation errors with a JSON body, not
    // extractor rejections
    for body in [
        json!({ "difficulty_level": "three" }),
        json!({ "family_friendly": "yes" }),
        json!({ "airbnb_id": "first" }),
        json!([1, 2, 3]),
    ] {
        let (status, error) = post_json(&app, "/recommend/trails", &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {body}");
        assert!(error["message"].is_string(), "payload: {body}");
    }
}

#[tokio::test]
async fn test_difficulty_endpoint_reflects_ratings() {
    let (app, _history) = common::setup_test_app().await;
    let trail_id = first_trail_id(&app).await;

    // Seed trails are unrated, so the band is empty at first
    let (status, json) = get_json(&app, "/trails/difficulty/5").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.as_array().unwrap().is_empty());

    post_json(
        &app,
        &format!("/trails/{trail_id}/rate"),
        &json!({ "rating": 5 }),
    )
    .await;

    let (status, json) = get_json(&app, "/trails/difficulty/5").await;
    assert_eq!(status, StatusCode::OK);
    let trails = json.as_array().unwrap();
    assert_eq!(trails.len(), 1);
    assert_eq!(trails[0]["id"].as_i64().unwrap(), trail_id);

    let (status, _) = get_json(&app, "/trails/difficulty/0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get_json(&app, "/trails/difficulty/6").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_family_friendly_and_popular_endpoints() {
    let (app, _history) = common::setup_test_app().await;

    // Seed descriptions mention families, the keyword pass finds them
    let (status, json) = get_json(&app, "/trails/family-friendly").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!json.as_array().unwrap().is_empty());

    let (status, json) = get_json(&app, "/trails/popular").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.as_array().unwrap().len() <= 10);
}

#[tokio::test]
async fn test_nearby_trails_endpoint() {
    let (app, _history) = common::setup_test_app().await;
    let (_, listings) = get_json(&app, "/airbnbs").await;
    let airbnb_id = listings[0]["id"].as_i64().unwrap();

    let (status, json) = get_json(&app, &format!("/trails/near-airbnb/{airbnb_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let nearby = json.as_array().unwrap();
    assert!(!nearby.is_empty());
    // Closest first
    let distances: Vec<f64> = nearby
        .iter()
        .map(|item| item["distance_km"].as_f64().unwrap())
        .collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));

    // A one-meter radius matches nothing
    let (status, json) = get_json(
        &app,
        &format!("/trails/near-airbnb/{airbnb_id}?max_distance=0.001"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.as_array().unwrap().is_empty());

    // Unknown listing id: empty list, not an error
    let (status, json) = get_json(&app, "/trails/near-airbnb/99999").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.as_array().unwrap().is_empty());

    let (status, _) = get_json(
        &app,
        &format!("/trails/near-airbnb/{airbnb_id}?max_distance=-2"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sync_without_api_key_records_warning() {
    let (app, _history) = common::setup_test_app().await;

    let (status, json) = post_json(&app, "/trails/update-from-api", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "warning");
    assert_eq!(json["imported_count"], 0);
    assert!(json["timestamp"].is_string());

    let (status, history) = get_json(&app, "/admin/sync-history").await;
    assert_eq!(status, StatusCode::OK);
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["status"], "warning");
}

#[tokio::test]
async fn test_external_sources_descriptor() {
    let (app, _history) = common::setup_test_app().await;

    let (status, json) = get_json(&app, "/trails/external-sources").await;
    assert_eq!(status, StatusCode::OK);
    let sources = json["sources"].as_array().unwrap();
    assert!(!sources.is_empty());
    assert_eq!(sources[0]["requires_api_key"], true);
}

#[tokio::test]
async fn test_enrichment_batch_reports_counts() {
    let (app, _history) = common::setup_test_app().await;

    // limit 0 reports the backlog without touching the network
    let (status, json) = post_json(&app, "/admin/enrich-trails", &json!({ "limit": 0 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["processed"], 0);
    assert_eq!(json["enriched"], 0);
    assert!(json["remaining"].is_u64());
}
