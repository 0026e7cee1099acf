//! Tour product model

use serde::{Deserialize, Serialize};

/// A bookable tour offering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_code: String,
    pub title: String,
    pub price: Price,
    pub rating: f64,
    pub review_count: u32,
    pub photo_url: String,
    pub duration: String,
    pub location: String,
    pub product_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub amount: f64,
    pub currency: String,
}

impl Product {
    /// Ordering used for "popular" listings: rating, then review count, both descending
    #[must_use]
    pub fn popularity_cmp(&self, other: &Product) -> std::cmp::Ordering {
        other
            .rating
            .total_cmp(&self.rating)
            .then_with(|| other.review_count.cmp(&self.review_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(code: &str, rating: f64, reviews: u32) -> Product {
        Product {
            product_code: code.to_string(),
            title: code.to_string(),
            price: Price {
                amount: 10.0,
                currency: "USD".to_string(),
            },
            rating,
            review_count: reviews,
            photo_url: String::new(),
            duration: String::new(),
            location: String::new(),
            product_url: String::new(),
        }
    }

    #[test]
    fn test_popularity_ordering() {
        let mut products = vec![
            product("low", 4.1, 900),
            product("tie-few", 4.8, 10),
            product("tie-many", 4.8, 250),
        ];
        products.sort_by(Product::popularity_cmp);
        let codes: Vec<_> = products.iter().map(|p| p.product_code.as_str()).collect();
        assert_eq!(codes, vec!["tie-many", "tie-few", "low"]);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(product("P1", 4.0, 3)).unwrap();
        assert_eq!(json["productCode"], "P1");
        assert_eq!(json["reviewCount"], 3);
    }
}
