//! Destination model for tour product lookups

use serde::{Deserialize, Serialize};

/// A place resolved to an upstream destination identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub destination_id: i64,
    pub name: String,
    pub location: DestinationLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationLocation {
    pub city: String,
    pub country: String,
}

impl Destination {
    #[must_use]
    pub fn new(destination_id: i64, name: &str, city: &str, country: &str) -> Self {
        Self {
            destination_id,
            name: name.to_string(),
            location: DestinationLocation {
                city: city.to_string(),
                country: country.to_string(),
            },
        }
    }
}
