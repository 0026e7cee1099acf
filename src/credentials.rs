//! Upstream API keys
//!
//! Keys are looked up when a request needs them rather than at startup, so a
//! missing key turns into a 500 response for the affected endpoints only.

use std::collections::HashMap;
use std::env;

use crate::{Result, TravelHubError};

/// The upstream providers that need a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiKey {
    /// Tour partner API
    Viator,
    /// Hotel, restaurant and rental search
    RapidApi,
    /// Language model provider
    OpenAi,
}

impl ApiKey {
    /// Environment variables accepted for this key, in lookup order
    #[must_use]
    pub fn env_names(self) -> &'static [&'static str] {
        match self {
            ApiKey::Viator => &["VIATOR_API_KEY", "VITE_VIATOR_API_KEY"],
            ApiKey::RapidApi => &["RAPIDAPI_KEY", "VITE_RAPIDAPI_KEY"],
            ApiKey::OpenAi => &["OPENAI_API_KEY", "VITE_OPENAI_API_KEY"],
        }
    }

    #[must_use]
    pub fn primary_name(self) -> &'static str {
        self.env_names()[0]
    }
}

/// Where API keys come from
#[derive(Debug, Clone, Default)]
pub enum Credentials {
    /// Read the process environment on every lookup
    #[default]
    Environment,
    /// Fixed set of keys, used by tests and embedding callers
    Fixed(HashMap<ApiKey, String>),
}

impl Credentials {
    #[must_use]
    pub fn fixed<I: IntoIterator<Item = (ApiKey, String)>>(keys: I) -> Self {
        Credentials::Fixed(keys.into_iter().collect())
    }

    /// Look up a key, blank values count as missing
    #[must_use]
    pub fn get(&self, key: ApiKey) -> Option<String> {
        let value = match self {
            Credentials::Environment => key
                .env_names()
                .iter()
                .find_map(|name| env::var(name).ok().filter(|v| !v.trim().is_empty())),
            Credentials::Fixed(keys) => keys.get(&key).cloned(),
        };
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Look up a key or fail with [`TravelHubError::MissingCredential`]
    pub fn require(&self, key: ApiKey) -> Result<String> {
        self.get(key).ok_or_else(|| {
            tracing::warn!("{} is not configured", key.primary_name());
            TravelHubError::missing_credential(key.primary_name())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_credentials() {
        let credentials = Credentials::fixed([(ApiKey::Viator, "abc123".to_string())]);
        assert_eq!(credentials.get(ApiKey::Viator).as_deref(), Some("abc123"));
        assert!(credentials.get(ApiKey::OpenAi).is_none());
    }

    #[test]
    fn test_blank_key_is_missing() {
        let credentials = Credentials::fixed([(ApiKey::RapidApi, "   ".to_string())]);
        let err = credentials.require(ApiKey::RapidApi).unwrap_err();
        assert!(matches!(err, TravelHubError::MissingCredential { .. }));
        assert!(err.to_string().contains("RAPIDAPI_KEY"));
    }

    #[test]
    fn test_lookup_order_prefers_primary_name() {
        assert_eq!(ApiKey::Viator.primary_name(), "VIATOR_API_KEY");
        assert_eq!(ApiKey::OpenAi.env_names().len(), 2);
    }

    #[test]
    fn test_default_reads_environment() {
        assert!(matches!(Credentials::default(), Credentials::Environment));
    }
}
