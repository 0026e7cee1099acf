//! Response normalization
//!
//! Upstream search APIs disagree on where the item list lives and on how each
//! item spells its fields. A [`ResourceProfile`] lists the known layouts for
//! one resource kind; [`PayloadShape`] decides which layout a payload has and
//! [`normalize_records`] turns every item into a complete [`SearchResult`].

pub mod demo;
pub mod fields;
pub mod profiles;

use serde_json::Value;
use tracing::debug;

use crate::config::RecordDefaults;
use crate::models::{ResourceKind, SearchResult};

pub use demo::demo_records;
pub use profiles::profile_for;

/// Where items live and how to read each output field for one resource kind
#[derive(Debug)]
pub struct ResourceProfile {
    pub kind: ResourceKind,
    /// Pointer to the item array in the usual response layout
    pub primary: &'static str,
    /// Other known item locations, tried in order
    pub alternates: &'static [&'static str],
    pub name: &'static [&'static str],
    pub price: &'static [&'static str],
    pub currency: &'static [&'static str],
    pub rating: &'static [&'static str],
    pub link: &'static [&'static str],
    pub image: &'static [&'static str],
    pub address: &'static [&'static str],
    /// Provider search page, the item name is appended for a fallback link
    pub search_url: &'static str,
}

/// The recognized layouts of an upstream payload
#[derive(Debug, PartialEq)]
pub enum PayloadShape<'a> {
    /// Items under the profile's primary pointer, or a bare top-level array
    Primary(&'a [Value]),
    /// Items under one of the alternate pointers
    Alternate {
        pointer: &'static str,
        items: &'a [Value],
    },
    /// An object keyed by item id, its values are the items
    ObjectValues(Vec<&'a Value>),
    Unrecognized,
}

fn non_empty_array(value: Option<&Value>) -> Option<&[Value]> {
    value
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .map(Vec::as_slice)
}

/// Values of an object keyed by item id. Every value must be an object that
/// carries a name, so wrappers and error envelopes are not taken for items.
fn object_items<'a>(
    value: Option<&'a Value>,
    profile: &ResourceProfile,
) -> Option<Vec<&'a Value>> {
    let map = value?.as_object()?;
    let is_item =
        |item: &Value| item.is_object() && fields::first_value(item, profile.name).is_some();
    if map.is_empty() || !map.values().all(is_item) {
        return None;
    }
    Some(map.values().collect())
}

impl<'a> PayloadShape<'a> {
    /// Detect the layout: primary pointer, alternates in order, then an
    /// object-of-items. The first non-empty candidate wins.
    ///
    /// A known item location holding an empty array means "no items". The
    /// top-level object is only read as an item map when none of the known
    /// locations exist.
    #[must_use]
    pub fn detect(payload: &'a Value, profile: &ResourceProfile) -> Self {
        if let Some(items) = non_empty_array(Some(payload)) {
            return PayloadShape::Primary(items);
        }

        if let Some(items) = non_empty_array(payload.pointer(profile.primary)) {
            return PayloadShape::Primary(items);
        }

        for pointer in profile.alternates {
            if let Some(items) = non_empty_array(payload.pointer(pointer)) {
                return PayloadShape::Alternate { pointer, items };
            }
        }

        let known = std::iter::once(profile.primary)
            .chain(profile.alternates.iter().copied())
            .filter_map(|pointer| payload.pointer(pointer))
            .collect::<Vec<_>>();

        if known.iter().any(|value| value.is_array()) {
            return PayloadShape::Unrecognized;
        }

        let candidate = if known.is_empty() {
            Some(payload)
        } else {
            payload.pointer(profile.primary)
        };
        if let Some(items) = object_items(candidate, profile) {
            return PayloadShape::ObjectValues(items);
        }

        PayloadShape::Unrecognized
    }

    /// Short name of the detected layout, for logs
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            PayloadShape::Primary(_) => "primary",
            PayloadShape::Alternate { .. } => "alternate",
            PayloadShape::ObjectValues(_) => "object-values",
            PayloadShape::Unrecognized => "unrecognized",
        }
    }

    #[must_use]
    pub fn items(&self) -> Vec<&'a Value> {
        match self {
            PayloadShape::Primary(items) | PayloadShape::Alternate { items, .. } => {
                items.iter().collect()
            }
            PayloadShape::ObjectValues(items) => items.clone(),
            PayloadShape::Unrecognized => Vec::new(),
        }
    }
}

/// Normalize a whole payload. Unrecognized payloads yield an empty vector.
#[must_use]
pub fn normalize_records(
    payload: &Value,
    profile: &ResourceProfile,
    defaults: &RecordDefaults,
) -> Vec<SearchResult> {
    let shape = PayloadShape::detect(payload, profile);
    let items = shape.items();
    debug!(
        "Normalizing {} {} items from {} layout",
        items.len(),
        profile.kind,
        shape.label()
    );

    items
        .into_iter()
        .map(|item| normalize_item(item, profile, defaults))
        .collect()
}

/// Normalize one item; every field falls back independently
#[must_use]
pub fn normalize_item(
    item: &Value,
    profile: &ResourceProfile,
    defaults: &RecordDefaults,
) -> SearchResult {
    let name = fields::first_text(item, profile.name)
        .unwrap_or_else(|| format!("Unnamed {}", profile.kind));

    let currency =
        fields::first_text(item, profile.currency).unwrap_or_else(|| defaults.currency.clone());

    let price = profile
        .price
        .iter()
        .filter_map(|pointer| item.pointer(pointer))
        .find_map(|value| fields::price_display(value, &currency))
        .unwrap_or_else(|| defaults.price.clone());

    let rating = profile
        .rating
        .iter()
        .filter_map(|pointer| item.pointer(pointer))
        .find_map(fields::rating_display)
        .unwrap_or_else(|| defaults.rating.clone());

    let link = fields::first_text(item, profile.link)
        .unwrap_or_else(|| format!("{}{}", profile.search_url, urlencoding::encode(&name)));

    let image = fields::first_text(item, profile.image).unwrap_or_else(|| defaults.image_for(&name));

    let address =
        fields::first_text(item, profile.address).unwrap_or_else(|| defaults.address.clone());

    SearchResult {
        kind: profile.kind,
        name,
        price,
        rating,
        link,
        image,
        address,
    }
}
