//! `travelhub` - backend for a travel planning UI
//!
//! Thin proxies over third-party travel and language model APIs. Upstream
//! JSON is normalized into fixed record shapes and every endpoint degrades
//! to placeholder or sample data instead of failing when an upstream is
//! unreachable.

pub mod api;
pub mod chat;
pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod normalize;
pub mod search;
pub mod telemetry;
pub mod tours;
pub mod upstream;
pub mod web;

// Re-export core types for public API
pub use crate::api::AppState;
pub use crate::chat::{Assistant, ConversationHistory};
pub use crate::config::{AppConfig, RecordDefaults};
pub use crate::credentials::{ApiKey, Credentials};
pub use crate::error::TravelHubError;
pub use crate::models::{ChatMessage, Destination, Product, ResourceKind, SearchResult};
pub use crate::search::{PlaceSearch, SearchOutcome};
pub use crate::tours::{TourCatalog, TourPlanner, ViatorCatalog};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TravelHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
