//! Ordered product search strategies
//!
//! [`ProductSearch`] runs its strategies one after another under a shared
//! per-attempt timeout. The first strategy that yields at least one product
//! wins and the remaining strategies are not invoked. An error, a timeout
//! and an empty list all count as "no result".

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, Utc};
use tracing::{debug, info, instrument, warn};

use super::{DestinationQuery, TourCatalog, samples};
use crate::config::ToursConfig;
use crate::models::{Destination, Product};

/// What the strategies are searching for
#[derive(Debug, Clone)]
pub struct ProductQuery {
    pub destination: Destination,
    pub currency: String,
}

/// Products found and the name of the strategy that found them
#[derive(Debug, Clone)]
pub struct StrategyOutcome {
    pub strategy: String,
    pub products: Vec<Product>,
}

#[async_trait]
pub trait ProductStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// `None` or an empty list hands over to the next strategy
    async fn attempt(&self, query: &ProductQuery) -> Option<Vec<Product>>;
}

/// Structured search inside the destination over a forward date window,
/// most highly rated first
pub struct DestinationSearchStrategy {
    catalog: Arc<dyn TourCatalog>,
    window_days: u64,
    count: u32,
}

impl DestinationSearchStrategy {
    pub fn new(catalog: Arc<dyn TourCatalog>, config: &ToursConfig) -> Self {
        Self {
            catalog,
            window_days: config.window_days.max(1) as u64,
            count: config.page_size,
        }
    }
}

#[async_trait]
impl ProductStrategy for DestinationSearchStrategy {
    fn name(&self) -> &str {
        "destination"
    }

    async fn attempt(&self, query: &ProductQuery) -> Option<Vec<Product>> {
        let start_date = Utc::now().date_naive();
        let end_date = start_date.checked_add_days(Days::new(self.window_days))?;
        let request = DestinationQuery {
            destination_id: query.destination.destination_id,
            destination_name: query.destination.name.clone(),
            start_date,
            end_date,
            currency: query.currency.clone(),
            count: self.count,
        };
        match self.catalog.products_by_destination(&request).await {
            Ok(products) => Some(products),
            Err(e) => {
                warn!(
                    "Destination product search for {} failed: {}",
                    query.destination.name, e
                );
                None
            }
        }
    }
}

/// Free-text product search using the destination name
pub struct FreeTextStrategy {
    catalog: Arc<dyn TourCatalog>,
}

impl FreeTextStrategy {
    pub fn new(catalog: Arc<dyn TourCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ProductStrategy for FreeTextStrategy {
    fn name(&self) -> &str {
        "freetext"
    }

    async fn attempt(&self, query: &ProductQuery) -> Option<Vec<Product>> {
        match self
            .catalog
            .products_by_text(&query.destination.name, &query.currency)
            .await
        {
            Ok(products) => Some(products),
            Err(e) => {
                warn!(
                    "Free-text product search for {} failed: {}",
                    query.destination.name, e
                );
                None
            }
        }
    }
}

/// Hardcoded samples for the destination's city
pub struct SampleStrategy;

#[async_trait]
impl ProductStrategy for SampleStrategy {
    fn name(&self) -> &str {
        "samples"
    }

    async fn attempt(&self, query: &ProductQuery) -> Option<Vec<Product>> {
        Some(samples::for_city(
            &query.destination.location.city,
            &query.currency,
        ))
    }
}

pub struct ProductSearch {
    strategies: Vec<Box<dyn ProductStrategy>>,
    timeout: Duration,
}

impl ProductSearch {
    pub fn new(strategies: Vec<Box<dyn ProductStrategy>>, timeout: Duration) -> Self {
        Self {
            strategies,
            timeout,
        }
    }

    /// Destination search, then free text, then samples
    pub fn standard(catalog: Arc<dyn TourCatalog>, config: &ToursConfig, timeout: Duration) -> Self {
        Self::new(
            vec![
                Box::new(DestinationSearchStrategy::new(catalog.clone(), config)),
                Box::new(FreeTextStrategy::new(catalog)),
                Box::new(SampleStrategy),
            ],
            timeout,
        )
    }

    /// Run the strategies in order. Returns an empty outcome only when every
    /// strategy came back empty.
    #[instrument(skip(self, query), fields(destination = %query.destination.name))]
    pub async fn run(&self, query: &ProductQuery) -> StrategyOutcome {
        for strategy in &self.strategies {
            debug!("Trying product strategy {}", strategy.name());
            match tokio::time::timeout(self.timeout, strategy.attempt(query)).await {
                Ok(Some(products)) if !products.is_empty() => {
                    info!(
                        "Strategy {} found {} products",
                        strategy.name(),
                        products.len()
                    );
                    return StrategyOutcome {
                        strategy: strategy.name().to_string(),
                        products,
                    };
                }
                Ok(_) => debug!("Strategy {} found nothing", strategy.name()),
                Err(_) => warn!(
                    "Strategy {} timed out after {}s",
                    strategy.name(),
                    self.timeout.as_secs()
                ),
            }
        }

        warn!("No product strategy produced results");
        StrategyOutcome {
            strategy: "none".to_string(),
            products: Vec::new(),
        }
    }
}
