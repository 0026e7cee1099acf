//! Tour discovery
//!
//! Resolves free-text places to upstream destination ids and finds tour
//! products for them, falling back step by step until something can be shown:
//! - destinations: static alias table, remote lookup, synthetic destination
//! - strategy: ordered product strategies with a shared per-attempt timeout
//! - aggregate: deduplicated "popular tours" across several destinations
//! - samples: hardcoded products used when every live path is empty
//! - viator: the upstream tour partner API

pub mod aggregate;
pub mod destinations;
pub mod products;
pub mod samples;
pub mod strategy;
pub mod viator;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::Result;
use crate::config::AppConfig;
use crate::models::{Destination, Product};

pub use aggregate::PopularTours;
pub use destinations::DestinationResolver;
pub use strategy::{ProductQuery, ProductSearch, ProductStrategy, StrategyOutcome};
pub use viator::ViatorCatalog;

/// Filter for a structured product search within one destination
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationQuery {
    pub destination_id: i64,
    pub destination_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub currency: String,
    pub count: u32,
}

/// Upstream tour catalog operations used by the fallback chains
#[async_trait]
pub trait TourCatalog: Send + Sync {
    /// Look a place up remotely, `None` when the catalog does not know it
    async fn find_destination(&self, name: &str) -> Result<Option<Destination>>;

    /// Products in a destination for a date window, most popular first
    async fn products_by_destination(&self, query: &DestinationQuery) -> Result<Vec<Product>>;

    /// Products matching a free-text term
    async fn products_by_text(&self, term: &str, currency: &str) -> Result<Vec<Product>>;
}

/// Products found for a place, with the destination and the strategy used
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceProducts {
    pub destination: Destination,
    pub strategy: String,
    pub products: Vec<Product>,
}

/// Entry point combining destination resolution, product strategies and
/// popular-tour aggregation
pub struct TourPlanner {
    resolver: DestinationResolver,
    search: ProductSearch,
    popular: PopularTours,
    currency: String,
}

impl TourPlanner {
    pub fn new(catalog: Arc<dyn TourCatalog>, config: &AppConfig) -> Self {
        let product_timeout = Duration::from_secs(config.timeouts.product_seconds);
        Self {
            resolver: DestinationResolver::new(
                catalog.clone(),
                Duration::from_secs(config.timeouts.destination_seconds),
            ),
            search: ProductSearch::standard(catalog.clone(), &config.tours, product_timeout),
            popular: PopularTours::new(catalog, &config.tours, product_timeout),
            currency: config.tours.currency.clone(),
        }
    }

    pub async fn resolve(&self, name: &str) -> Result<Destination> {
        self.resolver.resolve(name).await
    }

    /// Resolve a place and run the product strategies for it
    pub async fn products_for_place(&self, name: &str) -> Result<PlaceProducts> {
        let destination = self.resolver.resolve(name).await?;
        let query = ProductQuery {
            destination: destination.clone(),
            currency: self.currency.clone(),
        };
        let outcome = self.search.run(&query).await;
        info!(
            "Serving {} products for {} via {}",
            outcome.products.len(),
            destination.name,
            outcome.strategy
        );
        Ok(PlaceProducts {
            destination,
            strategy: outcome.strategy,
            products: outcome.products,
        })
    }

    /// Popular products across several places, or the default cities when
    /// none are given
    pub async fn popular(&self, places: &[String]) -> Result<Vec<Product>> {
        let mut destinations = Vec::with_capacity(places.len());
        for place in places.iter().filter(|p| !p.trim().is_empty()) {
            destinations.push(self.resolver.resolve(place).await?);
        }
        if destinations.is_empty() {
            destinations = destinations::popular_destinations();
        }
        Ok(self.popular.collect(&destinations).await)
    }
}
