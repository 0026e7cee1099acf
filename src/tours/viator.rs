//! Viator partner API client
//!
//! Implements [`TourCatalog`] for the fallback chains and exposes raw
//! pass-through calls for the POST proxy endpoints.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use super::products::normalize_products;
use super::{DestinationQuery, TourCatalog};
use crate::config::{AppConfig, RecordDefaults};
use crate::credentials::{ApiKey, Credentials};
use crate::models::{Destination, Product};
use crate::normalize::fields::{first_text, first_value};
use crate::upstream::UpstreamClient;
use crate::{Result, TravelHubError};

const SERVICE: &str = "viator";
const DESTINATION_RESULTS: usize = 5;

pub struct ViatorCatalog {
    client: Arc<UpstreamClient>,
    credentials: Credentials,
    base_url: String,
    defaults: RecordDefaults,
    currency: String,
    page_size: u32,
    destination_timeout: Duration,
    product_timeout: Duration,
}

impl ViatorCatalog {
    pub fn new(client: Arc<UpstreamClient>, credentials: Credentials, config: &AppConfig) -> Self {
        Self {
            client,
            credentials,
            base_url: config.upstream.viator_base_url.trim_end_matches('/').to_string(),
            defaults: config.defaults.clone(),
            currency: config.tours.currency.clone(),
            page_size: config.tours.page_size,
            destination_timeout: Duration::from_secs(config.timeouts.destination_seconds),
            product_timeout: Duration::from_secs(config.timeouts.product_seconds),
        }
    }

    fn headers(&self) -> Result<[(&'static str, String); 3]> {
        let api_key = self.credentials.require(ApiKey::Viator)?;
        Ok([
            ("exp-api-key", api_key),
            ("Accept-Language", "en-US".to_string()),
            ("Accept", "application/json;version=2.0".to_string()),
        ])
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Forward a caller-built product search body unchanged
    #[instrument(skip(self, body))]
    pub async fn forward_product_search(&self, body: &Value) -> Result<Value> {
        let headers = self.headers()?;
        self.client
            .post_json(
                SERVICE,
                &self.url("/products/search"),
                &headers,
                body,
                self.product_timeout,
            )
            .await
    }

    /// Forward a free-text search. `searchTerm` is required, `searchTypes`
    /// and `currency` default to a product search in the configured currency.
    #[instrument(skip(self, body))]
    pub async fn forward_freetext(&self, body: &Value) -> Result<Value> {
        let term = body
            .get("searchTerm")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| TravelHubError::validation("searchTerm is required"))?;

        let headers = self.headers()?;

        let mut request = body.clone();
        if let Some(fields) = request.as_object_mut() {
            fields.insert("searchTerm".to_string(), Value::String(term.to_string()));
            fields
                .entry("searchTypes")
                .or_insert_with(|| search_types("PRODUCTS", self.page_size));
            fields
                .entry("currency")
                .or_insert_with(|| Value::String(self.currency.clone()));
        }

        self.client
            .post_json(
                SERVICE,
                &self.url("/search/freetext"),
                &headers,
                &request,
                self.product_timeout,
            )
            .await
    }
}

fn search_types(kind: &str, count: u32) -> Value {
    json!([{
        "searchType": kind,
        "pagination": {"start": 1, "count": count}
    }])
}

/// First destination of a free-text destination search
fn parse_destination(payload: &Value) -> Option<Destination> {
    let first = first_value(
        payload,
        &["/destinations/results/0", "/destinations/0", "/results/0"],
    )?;
    let id = first_value(first, &["/id", "/destinationId", "/ref"]).and_then(|v| match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })?;
    let name = first_text(first, &["/name", "/destinationName"])?;
    let country = first_text(first, &["/countryName", "/parentDestinationName"])
        .unwrap_or_else(|| "Unknown".to_string());
    Some(Destination::new(id, &name, &name, &country))
}

#[async_trait]
impl TourCatalog for ViatorCatalog {
    #[instrument(skip(self))]
    async fn find_destination(&self, name: &str) -> Result<Option<Destination>> {
        let headers = self.headers()?;
        let body = json!({
            "searchTerm": name,
            "searchTypes": search_types("DESTINATIONS", DESTINATION_RESULTS as u32),
            "currency": self.currency,
        });
        let payload = self
            .client
            .post_json_with_retry(
                SERVICE,
                &self.url("/search/freetext"),
                &headers,
                &body,
                self.destination_timeout,
            )
            .await?;
        let destination = parse_destination(&payload);
        debug!("Destination search for {} -> {:?}", name, destination);
        Ok(destination)
    }

    #[instrument(skip(self, query), fields(destination = query.destination_id))]
    async fn products_by_destination(&self, query: &DestinationQuery) -> Result<Vec<Product>> {
        let headers = self.headers()?;
        let body = json!({
            "filtering": {
                "destination": query.destination_id.to_string(),
                "startDate": query.start_date.format("%Y-%m-%d").to_string(),
                "endDate": query.end_date.format("%Y-%m-%d").to_string(),
            },
            "sorting": {"sort": "TRAVELER_RATING", "order": "DESCENDING"},
            "pagination": {"start": 1, "count": query.count},
            "currency": query.currency,
        });
        let payload = self
            .client
            .post_json(
                SERVICE,
                &self.url("/products/search"),
                &headers,
                &body,
                self.product_timeout,
            )
            .await?;
        let products = normalize_products(&payload, &query.destination_name, &self.defaults);
        info!(
            "{} products in destination {}",
            products.len(),
            query.destination_id
        );
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn products_by_text(&self, term: &str, currency: &str) -> Result<Vec<Product>> {
        let headers = self.headers()?;
        let body = json!({
            "searchTerm": term,
            "searchTypes": search_types("PRODUCTS", self.page_size),
            "currency": currency,
        });
        let payload = self
            .client
            .post_json(
                SERVICE,
                &self.url("/search/freetext"),
                &headers,
                &body,
                self.product_timeout,
            )
            .await?;
        Ok(normalize_products(&payload, term, &self.defaults))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::post;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn catalog(credentials: Credentials) -> ViatorCatalog {
        catalog_at("http://127.0.0.1:1/partner/", credentials, 0)
    }

    fn catalog_at(base_url: &str, credentials: Credentials, retries: u32) -> ViatorCatalog {
        let mut config = AppConfig::default();
        config.upstream.viator_base_url = base_url.to_string();
        config.timeouts.destination_seconds = 20;
        config.timeouts.product_seconds = 5;
        let client = Arc::new(UpstreamClient::new("travelhub-test", retries).unwrap());
        ViatorCatalog::new(client, credentials, &config)
    }

    fn keyed() -> Credentials {
        Credentials::fixed([(ApiKey::Viator, "partner-key".to_string())])
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{address}/partner")
    }

    fn authorized(headers: &HeaderMap) -> bool {
        headers.get("exp-api-key").and_then(|v| v.to_str().ok()) == Some("partner-key")
    }

    async fn product_search(
        headers: HeaderMap,
        axum::Json(body): axum::Json<Value>,
    ) -> Response {
        if !authorized(&headers) {
            return (StatusCode::UNAUTHORIZED, "missing key").into_response();
        }
        if body.pointer("/filtering/destination") != Some(&json!("22132")) {
            return axum::Json(json!({"products": [], "totalCount": 0})).into_response();
        }
        axum::Json(json!({
            "products": [{
                "productCode": "12345P1",
                "title": "Golden Circle Day Trip",
                "pricing": {"summary": {"fromPrice": 99.0}, "currency": "EUR"},
                "reviews": {"combinedAverageRating": 4.7, "totalReviews": 310},
                "duration": {"fixedDurationInMinutes": 480}
            }],
            "totalCount": 1
        }))
        .into_response()
    }

    /// Fails with 503 for the first `failures` calls, then finds Reykjavik
    async fn flaky_destinations(
        State((calls, failures)): State<(Arc<AtomicUsize>, usize)>,
        headers: HeaderMap,
    ) -> Response {
        if !authorized(&headers) {
            return (StatusCode::UNAUTHORIZED, "missing key").into_response();
        }
        if calls.fetch_add(1, Ordering::SeqCst) < failures {
            return (StatusCode::SERVICE_UNAVAILABLE, "busy").into_response();
        }
        axum::Json(json!({"destinations": {"results": [
            {"id": 22132, "name": "Reykjavik", "countryName": "Iceland"}
        ]}}))
        .into_response()
    }

    async fn destination_service(failures: usize) -> (String, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route("/partner/search/freetext", post(flaky_destinations))
            .with_state((calls.clone(), failures));
        (serve(router).await, calls)
    }

    fn reykjavik_query() -> DestinationQuery {
        DestinationQuery {
            destination_id: 22132,
            destination_name: "Reykjavik".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            currency: "EUR".to_string(),
            count: 20,
        }
    }

    #[test]
    fn test_parse_destination() {
        let payload = json!({
            "destinations": {"results": [
                {"id": 22132, "name": "Reykjavik", "countryName": "Iceland"},
                {"id": 1, "name": "Other"}
            ]}
        });
        let destination = parse_destination(&payload).unwrap();
        assert_eq!(destination.destination_id, 22132);
        assert_eq!(destination.location.country, "Iceland");
        assert!(parse_destination(&json!({"destinations": {"results": []}})).is_none());
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let catalog = catalog(Credentials::fixed([]));
        assert_eq!(
            catalog.url("/products/search"),
            "http://127.0.0.1:1/partner/products/search"
        );
    }

    #[tokio::test]
    async fn test_freetext_requires_search_term() {
        let catalog = catalog(Credentials::fixed([(ApiKey::Viator, "k".to_string())]));
        let err = catalog
            .forward_freetext(&json!({"currency": "USD"}))
            .await
            .unwrap_err();
        assert!(matches!(err, TravelHubError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        let catalog = catalog(Credentials::fixed([]));
        let err = catalog
            .forward_product_search(&json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, TravelHubError::MissingCredential { .. }));

        let query = DestinationQuery {
            destination_id: 684,
            destination_name: "Barcelona".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            currency: "USD".to_string(),
            count: 20,
        };
        assert!(catalog.products_by_destination(&query).await.is_err());
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_recoverable() {
        let catalog = catalog(Credentials::fixed([(ApiKey::Viator, "k".to_string())]));
        let err = catalog.products_by_text("Rome", "USD").await.unwrap_err();
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_products_by_destination_reads_catalog() {
        let router = Router::new().route("/partner/products/search", post(product_search));
        let base = serve(router).await;
        let catalog = catalog_at(&base, keyed(), 0);

        let products = catalog.products_by_destination(&reykjavik_query()).await.unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].product_code, "12345P1");
        assert_eq!(products[0].price.currency, "EUR");
        assert_eq!(products[0].review_count, 310);
        assert_eq!(products[0].duration, "8h");
        assert_eq!(products[0].location, "Reykjavik");
    }

    #[tokio::test]
    async fn test_find_destination_reads_first_result() {
        let (base, calls) = destination_service(0).await;
        let catalog = catalog_at(&base, keyed(), 3);

        let destination = catalog.find_destination("reykjavik").await.unwrap().unwrap();

        assert_eq!(destination.destination_id, 22132);
        assert_eq!(destination.location.country, "Iceland");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_find_destination_retries_transient_failures() {
        let (base, calls) = destination_service(2).await;
        let catalog = catalog_at(&base, keyed(), 3);

        let destination = catalog.find_destination("reykjavik").await.unwrap();

        assert_eq!(destination.unwrap().name, "Reykjavik");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_find_destination_gives_up_after_retries() {
        let (base, calls) = destination_service(usize::MAX).await;
        let catalog = catalog_at(&base, keyed(), 2);

        let err = catalog.find_destination("reykjavik").await.unwrap_err();

        assert!(matches!(err, TravelHubError::Upstream { status: 503, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
