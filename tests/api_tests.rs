use axum::routing;
use axum::{Json, Router};
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use travelhub::{ApiKey, AppConfig, AppState, Credentials, web};

const UNREACHABLE: &str = "http://127.0.0.1:1";

fn offline_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.upstream.hotels.url = format!("{UNREACHABLE}/hotels");
    config.upstream.restaurants.url = format!("{UNREACHABLE}/restaurants");
    config.upstream.rentals.url = format!("{UNREACHABLE}/rentals");
    config.upstream.viator_base_url = format!("{UNREACHABLE}/partner");
    config.upstream.llm_base_url = format!("{UNREACHABLE}/v1");
    config.timeouts.search_seconds = 2;
    config.timeouts.destination_seconds = 2;
    config.timeouts.product_seconds = 2;
    config.timeouts.chat_seconds = 2;
    config.tours.destination_retries = 0;
    config
}

fn all_keys() -> Credentials {
    Credentials::fixed([
        (ApiKey::Viator, "viator-test".to_string()),
        (ApiKey::RapidApi, "rapid-test".to_string()),
        (ApiKey::OpenAi, "openai-test".to_string()),
    ])
}

fn app_with(credentials: Credentials) -> Router {
    app_for(offline_config(), credentials)
}

fn app_for(config: AppConfig, credentials: Credentials) -> Router {
    let state = AppState::new(&config, credentials).unwrap();
    web::app(state, &config)
}

/// Serve `router` on an ephemeral local port, returns its base URL
async fn mock_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{address}")
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_reports_version() {
    let (status, body) = send(app_with(all_keys()), get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], travelhub::VERSION);
}

#[tokio::test]
async fn test_missing_location_is_bad_request() {
    for uri in ["/api/hotels", "/api/restaurants?location=", "/api/rentals?location=%20"] {
        let (status, body) = send(app_with(all_keys()), get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].as_str().unwrap().contains("Location"));
    }
}

#[tokio::test]
async fn test_missing_key_is_server_error() {
    let (status, body) = send(
        app_with(Credentials::fixed([])),
        get("/api/hotels?location=Lisbon"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "API key not configured");

    let (status, _) = send(
        app_with(Credentials::fixed([])),
        post_json("/api/tours/search", &json!({"filtering": {"destination": "684"}})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_unreachable_provider_serves_demo_records() {
    let (status, body) = send(app_with(all_keys()), get("/api/restaurants?location=Rome")).await;
    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 3);
    for record in records {
        assert_eq!(record["kind"], "restaurant");
        for field in ["name", "price", "rating", "link", "image", "address"] {
            assert!(!record[field].as_str().unwrap().is_empty(), "{field}");
        }
    }
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let (status, body) = send(app_with(all_keys()), get("/api/tours/search")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");

    let (status, _) = send(
        app_with(all_keys()),
        post_json("/api/hotels?location=Rome", &json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_freetext_requires_search_term() {
    let (status, body) = send(
        app_with(all_keys()),
        post_json("/api/tours/freetext", &json!({"currency": "USD"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "searchTerm is required");
}

#[tokio::test]
async fn test_known_alias_resolves_without_upstream() {
    let (status, body) = send(
        app_with(Credentials::fixed([])),
        get("/api/destinations/resolve?name=barca"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["destinationId"], 684);
    assert_eq!(body["location"]["country"], "Spain");
}

#[tokio::test]
async fn test_tours_fall_back_to_city_samples() {
    let (status, body) = send(app_with(all_keys()), get("/api/tours?destination=Rome")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["destination"]["destinationId"], 511);
    assert_eq!(body["strategy"], "samples");
    assert_eq!(body["products"][0]["productCode"], "ROM-COLOSSEUM");
}

#[tokio::test]
async fn test_popular_tours_are_capped_and_unique() {
    let (status, body) = send(
        app_with(all_keys()),
        get("/api/tours/popular?destinations=paris,rome"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 8);
    let mut codes: Vec<_> = products
        .iter()
        .map(|p| p["productCode"].as_str().unwrap())
        .collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), 8);
}

#[tokio::test]
async fn test_chat_without_message_is_bad_request() {
    let (status, _) = send(
        app_with(all_keys()),
        post_json("/api/chat", &json!({"sessionId": "s1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_without_key_is_server_error() {
    let (status, _) = send(
        app_with(Credentials::fixed([])),
        post_json("/api/chat", &json!({"message": "Hi"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_chat_failure_serves_apology_and_keeps_history() {
    let app = app_with(all_keys());

    let (status, body) = send(
        app.clone(),
        post_json("/api/chat", &json!({"message": "Weekend in Porto?", "sessionId": "trip"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["html"].as_str().unwrap().contains("Atlas, your travel assistant"));

    let (status, body) = send(app, get("/api/chat/trip/history")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessionId"], "trip");
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"], "Weekend in Porto?");
}

#[tokio::test]
async fn test_upstream_error_status_is_reported() {
    let base = mock_upstream(Router::new().route(
        "/hotels",
        routing::get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "provider overloaded") }),
    ))
    .await;
    let mut config = offline_config();
    config.upstream.hotels.url = format!("{base}/hotels");

    let (status, body) = send(
        app_for(config, all_keys()),
        get("/api/hotels?location=Lisbon"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], 503);
    assert_eq!(body["details"], "provider overloaded");
    assert!(body["error"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn test_live_rentals_are_normalized() {
    let base = mock_upstream(Router::new().route(
        "/rentals",
        routing::get(|| async {
            Json(json!({"results": [
                {
                    "name": "Loft in Gracia",
                    "price": {"total": 180, "currency": "EUR"},
                    "rating": 4.9
                },
                {"name": "Studio near Sagrada Familia"}
            ]}))
        }),
    ))
    .await;
    let mut config = offline_config();
    config.upstream.rentals.url = format!("{base}/rentals");

    let (status, body) = send(
        app_for(config, all_keys()),
        get("/api/rentals?location=Barcelona"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["name"], "Loft in Gracia");
    assert_eq!(records[1]["name"], "Studio near Sagrada Familia");
    assert!(records.iter().all(|r| r["kind"] == "rental"));
}
