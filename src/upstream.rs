//! HTTP client shared by every upstream integration
//!
//! Wraps `reqwest` with per-call deadlines, status classification and JSON
//! decoding. Calls that must be retried go through a `reqwest-middleware`
//! client with an exponential backoff policy.

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::{Client, Response};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::AppConfig;
use crate::{Result, TravelHubError};

/// Header name and value pairs attached to a request
pub type Headers<'a> = &'a [(&'static str, String)];

pub struct UpstreamClient {
    client: Client,
    retrying: ClientWithMiddleware,
}

impl UpstreamClient {
    /// Create a client, `retries` applies to the `*_with_retry` calls
    pub fn new(user_agent: &str, retries: u32) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| TravelHubError::config(format!("Failed to create HTTP client: {e}")))?;

        let policy = ExponentialBackoff::builder().build_with_max_retries(retries);
        let retrying = ClientBuilder::new(client.clone())
            .with(RetryTransientMiddleware::new_with_policy(policy))
            .build();

        Ok(Self { client, retrying })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(&config.upstream.user_agent, config.tours.destination_retries)
    }

    #[instrument(skip(self, url, headers))]
    pub async fn get_json(
        &self,
        service: &str,
        url: &str,
        headers: Headers<'_>,
        timeout: Duration,
    ) -> Result<Value> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, value);
        }
        self.execute(service, timeout, async move {
            request.send().await.map_err(TravelHubError::from)
        })
        .await
    }

    #[instrument(skip(self, url, headers, body))]
    pub async fn post_json(
        &self,
        service: &str,
        url: &str,
        headers: Headers<'_>,
        body: &Value,
        timeout: Duration,
    ) -> Result<Value> {
        let mut request = self.client.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, value);
        }
        self.execute(service, timeout, async move {
            request.send().await.map_err(TravelHubError::from)
        })
        .await
    }

    /// POST through the retrying client, transient failures are retried
    #[instrument(skip(self, url, headers, body))]
    pub async fn post_json_with_retry(
        &self,
        service: &str,
        url: &str,
        headers: Headers<'_>,
        body: &Value,
        timeout: Duration,
    ) -> Result<Value> {
        let payload = serde_json::to_vec(body)?;
        let mut request = self
            .retrying
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload);
        for (name, value) in headers {
            request = request.header(*name, value);
        }
        self.execute(service, timeout, async move {
            request.send().await.map_err(TravelHubError::from)
        })
        .await
    }

    async fn execute<F>(&self, service: &str, timeout: Duration, send: F) -> Result<Value>
    where
        F: Future<Output = Result<Response>>,
    {
        let start_time = Instant::now();

        let outcome = tokio::time::timeout(timeout, async {
            let response = send.await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, TravelHubError>((status, body))
        })
        .await;

        let (status, body) = match outcome {
            Ok(result) => result.inspect_err(|e| warn!("{} request failed: {}", service, e))?,
            Err(_) => {
                warn!(
                    "{} request aborted after {:.1}s",
                    service,
                    timeout.as_secs_f64()
                );
                return Err(TravelHubError::timeout(
                    format!("{service} request"),
                    timeout.as_secs(),
                ));
            }
        };

        let duration = start_time.elapsed();
        debug!(
            "{} responded {} in {:.3}s",
            service,
            status,
            duration.as_secs_f64()
        );

        if !status.is_success() {
            warn!("{} returned HTTP {}", service, status);
            return Err(TravelHubError::upstream(service, status.as_u16(), body));
        }

        if duration.as_secs() > 5 {
            warn!("Slow {} response: {:.3}s", service, duration.as_secs_f64());
        } else {
            info!("{} request succeeded in {:.3}s", service, duration.as_secs_f64());
        }

        serde_json::from_str(&body).map_err(|e| {
            TravelHubError::parse(format!("Invalid JSON from {service}: {e}"))
        })
    }
}

/// Build `url?key=value&...` with encoded values
#[must_use]
pub fn with_query(url: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return url.to_string();
    }
    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}
