//! Destination Resolution Module
//!
//! This module turns free-text place names into destination identifiers for
//! the tour catalog. Known places come from a static alias table; anything
//! else is looked up remotely, and a synthetic destination is produced when
//! that fails too, so resolution itself never fails for a non-empty name.

use std::sync::Arc;
use std::time::Duration;

use rand::RngExt;
use tracing::{debug, info, warn};

use super::TourCatalog;
use crate::models::Destination;
use crate::{Result, TravelHubError};

/// A well-known destination and the spellings users type for it
pub struct KnownDestination {
    pub id: i64,
    pub name: &'static str,
    pub city: &'static str,
    pub country: &'static str,
    pub aliases: &'static [&'static str],
}

impl KnownDestination {
    fn to_destination(&self) -> Destination {
        Destination::new(self.id, self.name, self.city, self.country)
    }
}

pub const KNOWN_DESTINATIONS: [KnownDestination; 15] = [
    KnownDestination {
        id: 684,
        name: "Barcelona",
        city: "Barcelona",
        country: "Spain",
        aliases: &["barcelona", "barca", "barça", "bcn", "barna"],
    },
    KnownDestination {
        id: 479,
        name: "Paris",
        city: "Paris",
        country: "France",
        aliases: &["paris", "paree", "ville lumiere"],
    },
    KnownDestination {
        id: 511,
        name: "Rome",
        city: "Rome",
        country: "Italy",
        aliases: &["rome", "roma"],
    },
    KnownDestination {
        id: 737,
        name: "London",
        city: "London",
        country: "United Kingdom",
        aliases: &["london", "londres", "ldn"],
    },
    KnownDestination {
        id: 687,
        name: "New York City",
        city: "New York",
        country: "United States",
        aliases: &["new york", "new york city", "nyc", "ny", "manhattan"],
    },
    KnownDestination {
        id: 334,
        name: "Tokyo",
        city: "Tokyo",
        country: "Japan",
        aliases: &["tokyo", "tokio", "toukyou"],
    },
    KnownDestination {
        id: 525,
        name: "Amsterdam",
        city: "Amsterdam",
        country: "Netherlands",
        aliases: &["amsterdam", "ams", "mokum"],
    },
    KnownDestination {
        id: 566,
        name: "Madrid",
        city: "Madrid",
        country: "Spain",
        aliases: &["madrid", "mad"],
    },
    KnownDestination {
        id: 538,
        name: "Lisbon",
        city: "Lisbon",
        country: "Portugal",
        aliases: &["lisbon", "lisboa", "lis"],
    },
    KnownDestination {
        id: 828,
        name: "Dubai",
        city: "Dubai",
        country: "United Arab Emirates",
        aliases: &["dubai", "dxb"],
    },
    KnownDestination {
        id: 343,
        name: "Bangkok",
        city: "Bangkok",
        country: "Thailand",
        aliases: &["bangkok", "bkk", "krung thep"],
    },
    KnownDestination {
        id: 357,
        name: "Sydney",
        city: "Sydney",
        country: "Australia",
        aliases: &["sydney", "syd"],
    },
    KnownDestination {
        id: 585,
        name: "Istanbul",
        city: "Istanbul",
        country: "Turkey",
        aliases: &["istanbul", "constantinople", "ist"],
    },
    KnownDestination {
        id: 462,
        name: "Prague",
        city: "Prague",
        country: "Czech Republic",
        aliases: &["prague", "praha", "prag"],
    },
    KnownDestination {
        id: 488,
        name: "Berlin",
        city: "Berlin",
        country: "Germany",
        aliases: &["berlin", "ber"],
    },
];

/// Cities consulted by aggregation when too few products were found
const POPULAR_CITY_IDS: [i64; 5] = [479, 511, 737, 687, 684];

/// Popular fallback cities, in consultation order
#[must_use]
pub fn popular_destinations() -> Vec<Destination> {
    POPULAR_CITY_IDS
        .iter()
        .filter_map(|id| KNOWN_DESTINATIONS.iter().find(|d| d.id == *id))
        .map(KnownDestination::to_destination)
        .collect()
}

fn normalize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Exact alias match, case-insensitive
#[must_use]
pub fn lookup_exact(name: &str) -> Option<Destination> {
    let query = normalize_name(name);
    KNOWN_DESTINATIONS
        .iter()
        .find(|d| d.aliases.iter().any(|alias| *alias == query))
        .map(KnownDestination::to_destination)
}

/// Word-level match. An alias of four or more characters found as whole
/// words in the query wins, longest alias first. Otherwise the query must
/// start an alias, shortest alias first. "lon" is London and "Romania" is
/// nothing.
#[must_use]
pub fn lookup_partial(name: &str) -> Option<Destination> {
    let query = normalize_name(name);
    if query.chars().count() < 3 {
        return None;
    }
    let words = words(&query);

    let contained = KNOWN_DESTINATIONS
        .iter()
        .flat_map(|d| d.aliases.iter().map(move |alias| (d, *alias)))
        .filter(|(_, alias)| alias.chars().count() >= 4 && contains_words(&words, alias))
        .max_by_key(|(_, alias)| alias.chars().count());
    if let Some((destination, _)) = contained {
        return Some(destination.to_destination());
    }

    KNOWN_DESTINATIONS
        .iter()
        .flat_map(|d| d.aliases.iter().map(move |alias| (d, *alias)))
        .filter(|(_, alias)| alias.starts_with(query.as_str()))
        .min_by_key(|(_, alias)| alias.chars().count())
        .map(|(destination, _)| destination.to_destination())
}

fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

/// True when the alias words appear consecutively in `words`
fn contains_words(words: &[&str], alias: &str) -> bool {
    let needle = self::words(alias);
    !needle.is_empty() && words.windows(needle.len()).any(|window| window == needle.as_slice())
}

/// Pseudo destination with a random six digit id
#[must_use]
pub fn synthetic_destination(name: &str) -> Destination {
    let id: i64 = rand::rng().random_range(100_000..1_000_000);
    let display = title_case(name.trim());
    Destination::new(id, &display, &display, "Unknown")
}

fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Service for resolving place names into destinations
pub struct DestinationResolver {
    catalog: Arc<dyn TourCatalog>,
    timeout: Duration,
}

impl DestinationResolver {
    pub fn new(catalog: Arc<dyn TourCatalog>, timeout: Duration) -> Self {
        Self { catalog, timeout }
    }

    /// Resolve a place name: exact alias, partial alias, remote search, then
    /// a synthetic destination. Only an empty name is an error.
    pub async fn resolve(&self, name: &str) -> Result<Destination> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TravelHubError::validation("Destination name is required"));
        }
        debug!("Resolving destination: {}", name);

        if let Some(destination) = lookup_exact(name) {
            debug!("Exact match: {} -> {}", name, destination.destination_id);
            return Ok(destination);
        }

        if let Some(destination) = lookup_partial(name) {
            debug!("Partial match: {} -> {}", name, destination.destination_id);
            return Ok(destination);
        }

        match tokio::time::timeout(self.timeout, self.catalog.find_destination(name)).await {
            Ok(Ok(Some(destination))) => {
                info!(
                    "Remote lookup resolved {} to {}",
                    name, destination.destination_id
                );
                return Ok(destination);
            }
            Ok(Ok(None)) => debug!("Remote lookup found nothing for {}", name),
            Ok(Err(e)) => warn!("Remote destination lookup for {} failed: {}", name, e),
            Err(_) => warn!(
                "Remote destination lookup for {} aborted after {}s",
                name,
                self.timeout.as_secs()
            ),
        }

        let destination = synthetic_destination(name);
        info!(
            "Using synthetic destination {} for {}",
            destination.destination_id, name
        );
        Ok(destination)
    }
}
