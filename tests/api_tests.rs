//! Router tests for the web API, run with every provider unreachable

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Days, Local};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use itinerary_planner::api::AppState;
use itinerary_planner::config::PlannerConfig;
use itinerary_planner::models::DayPlan;
use itinerary_planner::planner::Planner;
use itinerary_planner::{http, web};

const OFFLINE: &str = "http://127.0.0.1:9";

fn offline_config() -> PlannerConfig {
    let mut config = PlannerConfig::default();
    for provider in [
        &mut config.providers.geocoding,
        &mut config.providers.forecast,
        &mut config.providers.openai,
        &mut config.providers.geoapify,
        &mut config.providers.serpapi,
        &mut config.providers.unsplash,
        &mut config.providers.duckduckgo,
        &mut config.providers.news,
    ] {
        provider.base_url = OFFLINE.to_string();
    }
    config.providers.wikipedia.base_url = format!("{OFFLINE}/w/api.php");
    config
}

fn state_with(config: &PlannerConfig) -> AppState {
    let client = http::build_client(&config.http).unwrap();
    AppState::new(Planner::new(client, config), config)
}

fn app_with(config: &PlannerConfig) -> Router {
    web::app(state_with(config))
}

fn app() -> Router {
    app_with(&offline_config())
}

fn trip_request() -> Value {
    let start = Local::now().date_naive() + Days::new(1);
    json!({
        "from_place": "Mumbai",
        "destination": {
            "id": 1260917,
            "latitude": 15.4909,
            "longitude": 73.8278,
            "name": "Panaji",
            "country": "India",
            "region": "Goa",
            "timezone": "Asia/Kolkata"
        },
        "start_date": start.format("%Y-%m-%d").to_string(),
        "num_days": 3,
        "num_people": 2,
        "budget": 25000
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, headers, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Vec<u8>) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, _, body) = send(app, request).await;
    (status, body)
}

async fn create_session(app: &Router) -> String {
    let (status, body) = post_json(app, "/api/itineraries", &trip_request()).await;
    assert_eq!(status, StatusCode::CREATED);
    let body: Value = serde_json::from_slice(&body).unwrap();
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_index_page() {
    let (status, _, body) = get(&app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("Generate My Perfect Itinerary"));
}

#[tokio::test]
async fn test_status_reports_configured_keys() {
    let mut config = offline_config();
    config.providers.news.api_key = Some("news-key".to_string());
    let (status, _, body) = get(&app_with(&config), "/api/status").await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["providers"]["news"], true);
    assert_eq!(body["providers"]["openai"], false);
    assert!(body["version"].as_str().is_some());
}

#[tokio::test]
async fn test_destination_search_degrades_to_empty() {
    let app = app();
    for uri in ["/api/destinations?q=Goa", "/api/destinations?q=", "/api/destinations"] {
        let (status, _, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!([]));
    }
}

#[tokio::test]
async fn test_missing_destination_is_bad_request() {
    let mut request = trip_request();
    request["destination"] = Value::Null;
    let (status, body) = post_json(&app(), "/api/itineraries", &request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body["error"],
        "❌ Please ensure you have entered a 'From' location and selected a 'Destination'!"
    );
}

#[tokio::test]
async fn test_out_of_range_budget_is_bad_request() {
    let mut request = trip_request();
    request["budget"] = json!(500);
    let (status, _) = post_json(&app(), "/api/itineraries", &request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_offline_itinerary_round_trip() {
    let app = app();
    let (status, body) = post_json(&app, "/api/itineraries", &trip_request()).await;
    assert_eq!(status, StatusCode::CREATED);

    let body: Value = serde_json::from_slice(&body).unwrap();
    let id = body["session_id"].as_str().unwrap();
    let itinerary = &body["itinerary"];
    assert_eq!(itinerary["destination"]["name"], "Panaji");
    assert_eq!(itinerary["attractions"], json!([]));
    assert_eq!(itinerary["hotels"], json!([]));
    assert_eq!(itinerary["day_plans"], json!([]));
    assert_eq!(
        itinerary["packing_tips"],
        "👕 Pack comfortable, versatile clothing suitable for urban exploration."
    );

    let (status, _, stored) = get(&app, &format!("/api/itineraries/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let stored: Value = serde_json::from_slice(&stored).unwrap();
    assert_eq!(stored["from_place"], "Mumbai");

    let (status, _, page) = get(&app, &format!("/api/itineraries/{id}/view")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(page).unwrap().contains("Your Trip to Panaji, India (Goa)"));
}

#[tokio::test]
async fn test_text_export_is_attachment() {
    let app = app();
    let id = create_session(&app).await;
    let (status, headers, body) = get(&app, &format!("/api/itineraries/{id}/export.txt")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/plain"));
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"itinerary_Panaji_"));
    assert!(disposition.ends_with(".txt\""));
    assert!(String::from_utf8(body).unwrap().contains("From: Mumbai"));
}

#[tokio::test]
async fn test_document_export_is_attachment() {
    let app = app();
    let id = create_session(&app).await;
    let (status, headers, body) = get(&app, &format!("/api/itineraries/{id}/export.html")).await;

    assert_eq!(status, StatusCode::OK);
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.ends_with(".html\""));
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("✈️ Trip to Panaji"));
    assert!(html.contains("Trip Summary"));
}

#[tokio::test]
async fn test_visual_for_unplanned_day_is_not_found() {
    let app = app();
    let id = create_session(&app).await;
    let request = Request::post(format!("/api/itineraries/{id}/days/1/visual"))
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_and_malformed_sessions() {
    let app = app();
    let (status, _, body) = get(&app, "/api/itineraries/7d7e4a8c-1f1f-4c4e-9a1a-3b8f1e2d9c10").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["error"].as_str().unwrap().contains("expired"));

    let (status, _, _) = get(&app, "/api/itineraries/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stored_day_visual_is_returned_without_generation() {
    let state = state_with(&offline_config());
    let app = web::app(state.clone());
    let id = create_session(&app).await;
    let uuid = Uuid::parse_str(&id).unwrap();
    state
        .sessions
        .update(&uuid, |bundle| {
            bundle
                .day_visuals
                .insert(2, "https://img.example/day2.png".to_string());
        })
        .await
        .unwrap();

    let request = Request::post(format!("/api/itineraries/{id}/days/2/visual"))
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["day"], 2);
    assert_eq!(body["url"], "https://img.example/day2.png");
}

#[tokio::test]
async fn test_day_visual_without_key_names_the_setting() {
    let state = state_with(&offline_config());
    let app = web::app(state.clone());
    let id = create_session(&app).await;
    let uuid = Uuid::parse_str(&id).unwrap();
    let start = Local::now().date_naive() + Days::new(1);
    state
        .sessions
        .update(&uuid, |bundle| {
            bundle.day_plans.push(DayPlan {
                day: 1,
                date: start,
                text: String::new(),
                highlight: "visiting Fort Aguada".to_string(),
                location: "Panaji".to_string(),
                weather: String::new(),
            });
        })
        .await
        .unwrap();

    let request = Request::post(format!("/api/itineraries/{id}/days/1/visual"))
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["error"].as_str().unwrap().contains("OPENAI_API_KEY"));
}

#[test]
fn test_request_timeout_outlasts_hanging_providers() {
    // weather, places, hotels and news; three model calls; four lookups per image
    let worst_case = Duration::from_secs(4 * 5 + 3 * 60 + 16 * 4 * 3);
    assert!(state_with(&offline_config()).request_timeout >= worst_case);

    let mut config = offline_config();
    config.http.max_retries = 1;
    assert!(state_with(&config).request_timeout >= worst_case * 2);
}
