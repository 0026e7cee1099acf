//! Tour product normalization
//!
//! Product payloads go through the tour [`ResourceProfile`] for layout
//! detection and the shared pointer chains, then a few tour-only fields are
//! read on top: product code, review count and duration.

use serde_json::Value;
use tracing::debug;

use crate::config::RecordDefaults;
use crate::models::{Price, Product};
use crate::normalize::fields::{self, first_number, first_text, minutes_display};
use crate::normalize::{PayloadShape, profiles::TOURS};

const CODE: &[&str] = &["/productCode", "/code", "/id"];
const REVIEW_COUNT: &[&str] = &["/reviews/totalReviews", "/reviewCount", "/reviews/count"];
const FIXED_MINUTES: &str = "/duration/fixedDurationInMinutes";
const VARIABLE_FROM: &str = "/duration/variableDurationFromMinutes";
const VARIABLE_TO: &str = "/duration/variableDurationToMinutes";

/// Normalize every product in a catalog payload. `location` fills products
/// that do not name one.
#[must_use]
pub fn normalize_products(payload: &Value, location: &str, defaults: &RecordDefaults) -> Vec<Product> {
    let shape = PayloadShape::detect(payload, &TOURS);
    let items = shape.items();
    debug!(
        "Normalizing {} products from {} layout",
        items.len(),
        shape.label()
    );
    items
        .into_iter()
        .map(|item| normalize_product(item, location, defaults))
        .collect()
}

#[must_use]
pub fn normalize_product(item: &Value, location: &str, defaults: &RecordDefaults) -> Product {
    let title = first_text(item, TOURS.name).unwrap_or_else(|| "Unnamed tour".to_string());

    let product_code = first_text(item, CODE).unwrap_or_else(|| slug(&title));

    let currency =
        first_text(item, TOURS.currency).unwrap_or_else(|| defaults.currency.clone());
    let amount = first_number(item, TOURS.price).unwrap_or(0.0);

    let rating = first_number(item, TOURS.rating).unwrap_or_else(|| defaults.rating_value());
    let review_count = first_number(item, REVIEW_COUNT)
        .map(|n| n.max(0.0).round() as u32)
        .unwrap_or(0);

    let photo_url =
        first_text(item, TOURS.image).unwrap_or_else(|| defaults.image_for(&title));

    let location = first_text(item, TOURS.address).unwrap_or_else(|| match location.trim() {
        "" => defaults.address.clone(),
        place => place.to_string(),
    });

    let product_url = first_text(item, TOURS.link)
        .unwrap_or_else(|| format!("{}{}", TOURS.search_url, urlencoding::encode(&title)));

    Product {
        product_code,
        title,
        price: Price { amount, currency },
        rating,
        review_count,
        photo_url,
        duration: duration(item).unwrap_or_else(|| defaults.duration.clone()),
        location,
        product_url,
    }
}

fn duration(item: &Value) -> Option<String> {
    if let Some(minutes) = item.pointer(FIXED_MINUTES).and_then(fields::number) {
        return Some(minutes_display(minutes));
    }
    let from = item.pointer(VARIABLE_FROM).and_then(fields::number);
    let to = item.pointer(VARIABLE_TO).and_then(fields::number);
    match (from, to) {
        (Some(from), Some(to)) => {
            Some(format!("{} - {}", minutes_display(from), minutes_display(to)))
        }
        (Some(only), None) | (None, Some(only)) => Some(minutes_display(only)),
        (None, None) => item.pointer("/duration").and_then(fields::text),
    }
}

fn slug(title: &str) -> String {
    let slug = title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() { "tour".to_string() } else { slug }
}
