//! Popular tours across several destinations

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, Utc};
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use super::destinations::popular_destinations;
use super::{DestinationQuery, TourCatalog, samples};
use crate::config::ToursConfig;
use crate::models::{Destination, Product};

pub struct PopularTours {
    catalog: Arc<dyn TourCatalog>,
    timeout: Duration,
    window_days: u64,
    page_size: u32,
    raw_limit: usize,
    limit: usize,
    currency: String,
}

impl PopularTours {
    pub fn new(catalog: Arc<dyn TourCatalog>, config: &ToursConfig, timeout: Duration) -> Self {
        Self {
            catalog,
            timeout,
            window_days: config.window_days.max(1) as u64,
            page_size: config.page_size,
            raw_limit: config.aggregate_raw_limit,
            limit: config.aggregate_limit,
            currency: config.currency.clone(),
        }
    }

    async fn fetch(&self, destination: &Destination) -> Vec<Product> {
        let start_date = Utc::now().date_naive();
        let Some(end_date) = start_date.checked_add_days(Days::new(self.window_days)) else {
            return Vec::new();
        };
        let query = DestinationQuery {
            destination_id: destination.destination_id,
            destination_name: destination.name.clone(),
            start_date,
            end_date,
            currency: self.currency.clone(),
            count: self.page_size,
        };

        match tokio::time::timeout(self.timeout, self.catalog.products_by_destination(&query)).await
        {
            Ok(Ok(products)) => products,
            Ok(Err(e)) => {
                warn!("Popular products for {} failed: {}", destination.name, e);
                Vec::new()
            }
            Err(_) => {
                warn!(
                    "Popular products for {} timed out after {}s",
                    destination.name,
                    self.timeout.as_secs()
                );
                Vec::new()
            }
        }
    }

    /// Fetch all destinations concurrently, deduplicate by product code and
    /// return the most popular products
    #[instrument(skip(self, destinations), fields(destinations = destinations.len()))]
    pub async fn collect(&self, destinations: &[Destination]) -> Vec<Product> {
        let batches = join_all(destinations.iter().map(|d| self.fetch(d))).await;

        let mut seen = HashSet::new();
        let mut products = Vec::new();
        merge_unique(
            &mut products,
            &mut seen,
            batches.into_iter().flatten(),
            self.raw_limit,
        );
        debug!("Collected {} unique live products", products.len());

        if products.len() < self.limit {
            for city in popular_destinations() {
                if products.len() >= self.limit {
                    break;
                }
                let fallback = samples::for_city(&city.location.city, &self.currency);
                merge_unique(&mut products, &mut seen, fallback, self.raw_limit);
            }
            info!(
                "Topped up popular tours with fallback cities, now {}",
                products.len()
            );
        }

        products.sort_by(Product::popularity_cmp);
        products.truncate(self.limit);
        products
    }
}

/// Append products whose code has not been seen yet, up to `limit` in total
fn merge_unique(
    products: &mut Vec<Product>,
    seen: &mut HashSet<String>,
    incoming: impl IntoIterator<Item = Product>,
    limit: usize,
) {
    for product in incoming {
        if products.len() >= limit {
            break;
        }
        if seen.insert(product.product_code.clone()) {
            products.push(product);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Price;
    use crate::{Result, TravelHubError};
    use async_trait::async_trait;
    use std::collections::HashMap;

    fn product(code: &str, rating: f64, reviews: u32) -> Product {
        Product {
            product_code: code.to_string(),
            title: format!("Tour {code}"),
            price: Price {
                amount: 30.0,
                currency: "USD".to_string(),
            },
            rating,
            review_count: reviews,
            photo_url: "https://img.example/t.jpg".to_string(),
            duration: "2h".to_string(),
            location: "Somewhere".to_string(),
            product_url: "https://tours.example/t".to_string(),
        }
    }

    struct MapCatalog {
        by_destination: HashMap<i64, Vec<Product>>,
    }

    #[async_trait]
    impl TourCatalog for MapCatalog {
        async fn find_destination(&self, _name: &str) -> Result<Option<Destination>> {
            Ok(None)
        }

        async fn products_by_destination(&self, query: &DestinationQuery) -> Result<Vec<Product>> {
            self.by_destination
                .get(&query.destination_id)
                .cloned()
                .ok_or_else(|| TravelHubError::network("unknown destination"))
        }

        async fn products_by_text(&self, _term: &str, _currency: &str) -> Result<Vec<Product>> {
            Ok(Vec::new())
        }
    }

    fn popular(catalog: MapCatalog) -> PopularTours {
        PopularTours::new(
            Arc::new(catalog),
            &ToursConfig::default(),
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn test_duplicates_across_destinations_are_merged() {
        let shared = product("SHARED", 4.9, 100);
        let mut by_destination = HashMap::new();
        by_destination.insert(
            1,
            (0..6)
                .map(|i| product(&format!("A{i}"), 4.0, i))
                .chain([shared.clone()])
                .collect(),
        );
        by_destination.insert(
            2,
            (0..6)
                .map(|i| product(&format!("B{i}"), 4.2, i))
                .chain([shared])
                .collect(),
        );
        let destinations = [
            Destination::new(1, "One", "One", "X"),
            Destination::new(2, "Two", "Two", "X"),
        ];

        let products = popular(MapCatalog { by_destination }).collect(&destinations).await;

        assert_eq!(products.len(), 8);
        let shared_count = products
            .iter()
            .filter(|p| p.product_code == "SHARED")
            .count();
        assert_eq!(shared_count, 1);
        assert_eq!(products[0].product_code, "SHARED");
        assert!(products.windows(2).all(|w| w[0].popularity_cmp(&w[1]).is_le()));
    }

    #[tokio::test]
    async fn test_sparse_results_are_topped_up() {
        let mut by_destination = HashMap::new();
        by_destination.insert(1, vec![product("ONLY", 5.0, 1)]);
        let destinations = [
            Destination::new(1, "One", "One", "X"),
            Destination::new(9, "Broken", "Broken", "X"),
        ];

        let products = popular(MapCatalog { by_destination }).collect(&destinations).await;

        assert_eq!(products.len(), 8);
        assert!(products.iter().any(|p| p.product_code == "ONLY"));
        let mut codes: Vec<_> = products.iter().map(|p| &p.product_code).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 8);
    }

    #[test]
    fn test_merge_stops_at_limit() {
        let mut products = Vec::new();
        let mut seen = HashSet::new();
        let incoming = (0..40).map(|i| product(&format!("P{i}"), 4.0, i));
        merge_unique(&mut products, &mut seen, incoming, 24);
        assert_eq!(products.len(), 24);
    }
}
