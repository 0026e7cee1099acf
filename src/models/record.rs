//! Normalized search result shared by every place search proxy

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource types served by the search proxies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Hotel,
    Restaurant,
    Rental,
    Tour,
}

impl ResourceKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Hotel => "hotel",
            ResourceKind::Restaurant => "restaurant",
            ResourceKind::Rental => "rental",
            ResourceKind::Tour => "tour",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized hotel, restaurant, rental or tour record
///
/// Every field is populated. Missing upstream values are replaced by the
/// configured defaults, never by dropping the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub kind: ResourceKind,
    pub name: String,
    /// Display price, e.g. "$120" or "Price not available"
    pub price: String,
    /// Display rating, e.g. "4.5/5"
    pub rating: String,
    pub link: String,
    pub image: String,
    pub address: String,
}

impl SearchResult {
    /// True when all display fields carry a value
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [
            &self.name,
            &self.price,
            &self.rating,
            &self.link,
            &self.image,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let record = SearchResult {
            kind: ResourceKind::Rental,
            name: "Loft".into(),
            price: "$90".into(),
            rating: "4/5".into(),
            link: "https://example.com".into(),
            image: "https://example.com/a.jpg".into(),
            address: "Gracia".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "rental");
        assert!(record.is_complete());
    }
}
