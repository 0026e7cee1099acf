//! Hotel, restaurant and rental search proxies
//!
//! Each search calls a RapidAPI hosted provider with the location string,
//! normalizes whatever comes back and falls back to demo records when the
//! call fails in transport or yields nothing usable.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::{AppConfig, RecordDefaults, SearchEndpoint, UpstreamConfig};
use crate::credentials::{ApiKey, Credentials};
use crate::models::{ResourceKind, SearchResult};
use crate::normalize::{self, demo_records, profile_for};
use crate::upstream::{UpstreamClient, with_query};
use crate::{Result, TravelHubError};

/// Whether records came from the provider or from the demo payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub records: Vec<SearchResult>,
    pub source: ResultSource,
}

impl SearchOutcome {
    fn fallback(kind: ResourceKind) -> Self {
        Self {
            records: demo_records(kind),
            source: ResultSource::Fallback,
        }
    }
}

pub struct PlaceSearch {
    client: Arc<UpstreamClient>,
    credentials: Credentials,
    endpoints: UpstreamConfig,
    defaults: RecordDefaults,
    timeout: Duration,
}

impl PlaceSearch {
    pub fn new(client: Arc<UpstreamClient>, credentials: Credentials, config: &AppConfig) -> Self {
        Self {
            client,
            credentials,
            endpoints: config.upstream.clone(),
            defaults: config.defaults.clone(),
            timeout: Duration::from_secs(config.timeouts.search_seconds),
        }
    }

    fn endpoint(&self, kind: ResourceKind) -> Result<&SearchEndpoint> {
        match kind {
            ResourceKind::Hotel => Ok(&self.endpoints.hotels),
            ResourceKind::Restaurant => Ok(&self.endpoints.restaurants),
            ResourceKind::Rental => Ok(&self.endpoints.rentals),
            ResourceKind::Tour => Err(TravelHubError::validation(
                "Tours are searched through the tour endpoints",
            )),
        }
    }

    /// Search one resource kind around a free-text location
    #[instrument(skip(self))]
    pub async fn search(&self, kind: ResourceKind, location: &str) -> Result<SearchOutcome> {
        let location = location.trim();
        if location.is_empty() {
            return Err(TravelHubError::validation("Location parameter is required"));
        }

        let endpoint = self.endpoint(kind)?;
        let api_key = self.credentials.require(ApiKey::RapidApi)?;

        let url = with_query(&endpoint.url, &[(endpoint.query_param.as_str(), location)]);
        let headers = [
            ("X-RapidAPI-Key", api_key),
            ("X-RapidAPI-Host", endpoint.host.clone()),
        ];

        let payload = match self
            .client
            .get_json(kind.as_str(), &url, &headers, self.timeout)
            .await
        {
            Ok(payload) => payload,
            Err(e) if e.is_recoverable() => {
                warn!("{} search for '{}' failed, serving demo data: {}", kind, location, e);
                return Ok(SearchOutcome::fallback(kind));
            }
            Err(e) => return Err(e),
        };

        let records = normalize::normalize_records(&payload, profile_for(kind), &self.defaults);
        if records.is_empty() {
            warn!(
                "{} search for '{}' returned no recognizable items, serving demo data",
                kind, location
            );
            return Ok(SearchOutcome::fallback(kind));
        }

        info!("Found {} {} results for '{}'", records.len(), kind, location);
        Ok(SearchOutcome {
            records,
            source: ResultSource::Live,
        })
    }
}
