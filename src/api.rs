//! HTTP handlers for the `/api` routes

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::Method,
    routing::{MethodRouter, get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::chat::{Assistant, OpenAiChat, SessionStore};
use crate::config::AppConfig;
use crate::credentials::Credentials;
use crate::models::{ChatMessage, Destination, Product, ResourceKind, SearchResult};
use crate::search::PlaceSearch;
use crate::tours::{PlaceProducts, TourPlanner, ViatorCatalog};
use crate::upstream::UpstreamClient;
use crate::{Result, TravelHubError};

const DEFAULT_SESSION: &str = "default";

/// Shared services handed to every handler
#[derive(Clone)]
pub struct AppState {
    places: Arc<PlaceSearch>,
    catalog: Arc<ViatorCatalog>,
    tours: Arc<TourPlanner>,
    assistant: Arc<Assistant>,
    sessions: SessionStore,
}

impl AppState {
    pub fn new(config: &AppConfig, credentials: Credentials) -> Result<Self> {
        let client = Arc::new(UpstreamClient::from_config(config)?);
        let catalog = Arc::new(ViatorCatalog::new(
            client.clone(),
            credentials.clone(),
            config,
        ));
        let model = Arc::new(OpenAiChat::new(client.clone(), credentials.clone(), config));

        Ok(Self {
            places: Arc::new(PlaceSearch::new(client, credentials, config)),
            tours: Arc::new(TourPlanner::new(catalog.clone(), config)),
            catalog,
            assistant: Arc::new(Assistant::new(model)),
            sessions: SessionStore::from_config(&config.chat),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", only(get(health)))
        .route("/hotels", only(get(hotels)))
        .route("/restaurants", only(get(restaurants)))
        .route("/rentals", only(get(rentals)))
        .route("/tours", only(get(tours_for_destination)))
        .route("/tours/popular", only(get(popular_tours)))
        .route("/tours/search", only(post(tours_search)))
        .route("/tours/freetext", only(post(tours_freetext)))
        .route("/destinations/resolve", only(get(resolve_destination)))
        .route("/chat", only(post(chat)))
        .route("/chat/{session}/history", only(get(chat_history)))
        .with_state(state)
}

/// Answer any other method with a JSON 405
fn only(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.fallback(method_not_allowed)
}

async fn method_not_allowed(method: Method) -> TravelHubError {
    TravelHubError::MethodNotAllowed {
        method: method.to_string(),
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| TravelHubError::validation(format!("{name} parameter is required")))
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: crate::VERSION,
    })
}

#[derive(Deserialize)]
struct LocationParams {
    location: Option<String>,
}

async fn search_places(
    state: &AppState,
    kind: ResourceKind,
    params: LocationParams,
) -> Result<Json<Vec<SearchResult>>> {
    let location = required(params.location, "Location")?;
    let outcome = state.places.search(kind, &location).await?;
    debug!("{} results for {} from {:?}", kind, location, outcome.source);
    Ok(Json(outcome.records))
}

async fn hotels(
    State(state): State<AppState>,
    Query(params): Query<LocationParams>,
) -> Result<Json<Vec<SearchResult>>> {
    search_places(&state, ResourceKind::Hotel, params).await
}

async fn restaurants(
    State(state): State<AppState>,
    Query(params): Query<LocationParams>,
) -> Result<Json<Vec<SearchResult>>> {
    search_places(&state, ResourceKind::Restaurant, params).await
}

async fn rentals(
    State(state): State<AppState>,
    Query(params): Query<LocationParams>,
) -> Result<Json<Vec<SearchResult>>> {
    search_places(&state, ResourceKind::Rental, params).await
}

#[derive(Deserialize)]
struct DestinationParams {
    destination: Option<String>,
}

async fn tours_for_destination(
    State(state): State<AppState>,
    Query(params): Query<DestinationParams>,
) -> Result<Json<PlaceProducts>> {
    let destination = required(params.destination, "Destination")?;
    Ok(Json(state.tours.products_for_place(&destination).await?))
}

#[derive(Deserialize)]
struct PopularParams {
    destinations: Option<String>,
}

async fn popular_tours(
    State(state): State<AppState>,
    Query(params): Query<PopularParams>,
) -> Result<Json<Vec<Product>>> {
    let places: Vec<String> = params
        .destinations
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    Ok(Json(state.tours.popular(&places).await?))
}

async fn tours_search(State(state): State<AppState>, Json(body): Json<Value>) -> Result<Json<Value>> {
    Ok(Json(state.catalog.forward_product_search(&body).await?))
}

async fn tours_freetext(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>> {
    Ok(Json(state.catalog.forward_freetext(&body).await?))
}

#[derive(Deserialize)]
struct ResolveParams {
    name: Option<String>,
}

async fn resolve_destination(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> Result<Json<Destination>> {
    let name = required(params.name, "Name")?;
    Ok(Json(state.tours.resolve(&name).await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest {
    message: Option<String>,
    session_id: Option<String>,
}

#[derive(Serialize)]
struct ChatResponse {
    html: String,
}

fn session_key(session_id: Option<String>) -> String {
    session_id
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SESSION.to_string())
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let message = request
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| TravelHubError::validation("Message is required"))?;
    let session = session_key(request.session_id);

    // Held across the model call so turns of one session never interleave
    let shared = state.sessions.history(&session).await;
    let mut history = shared.lock().await;

    let html = state.assistant.reply(&mut history, &message).await?;

    info!("Chat session {} now holds {} messages", session, history.len());
    Ok(Json(ChatResponse { html }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryResponse {
    session_id: String,
    messages: Vec<ChatMessage>,
}

async fn chat_history(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> Json<HistoryResponse> {
    let messages = state.sessions.messages(&session).await;
    Json(HistoryResponse {
        session_id: session,
        messages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, "default")]
    #[case(Some("  ".to_string()), "default")]
    #[case(Some(" trip-42 ".to_string()), "trip-42")]
    fn test_session_key(#[case] input: Option<String>, #[case] expected: &str) {
        assert_eq!(session_key(input), expected);
    }

    #[test]
    fn test_required_parameter() {
        assert_eq!(required(Some(" Rome ".to_string()), "Location").unwrap(), "Rome");
        let err = required(Some(String::new()), "Location").unwrap_err();
        assert_eq!(err.user_message(), "Location parameter is required");
        assert!(required(None, "Name").is_err());
    }
}
