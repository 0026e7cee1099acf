//! Error types and handling for the travelhub service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main error type for the travelhub service
#[derive(Error, Debug)]
pub enum TravelHubError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Missing or invalid request input
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Endpoint called with an unsupported HTTP method
    #[error("Method not allowed: {method}")]
    MethodNotAllowed { method: String },

    /// An upstream API key is not configured
    #[error("Missing credential: {name} is not configured")]
    MissingCredential { name: String },

    /// Upstream answered with a non-2xx status
    #[error("Upstream {service} returned {status}: {body}")]
    Upstream {
        service: String,
        status: u16,
        body: String,
    },

    /// Transport failure talking to an upstream
    #[error("Network error: {message}")]
    Network { message: String },

    /// An upstream call exceeded its deadline
    #[error("Timed out after {seconds}s: {operation}")]
    Timeout { operation: String, seconds: u64 },

    /// Upstream body could not be decoded
    #[error("Parse error: {message}")]
    Parse { message: String },
}

impl TravelHubError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn missing_credential<S: Into<String>>(name: S) -> Self {
        Self::MissingCredential { name: name.into() }
    }

    pub fn upstream<S: Into<String>, B: Into<String>>(service: S, status: u16, body: B) -> Self {
        Self::Upstream {
            service: service.into(),
            status,
            body: body.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn timeout<S: Into<String>>(operation: S, seconds: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            seconds,
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Transport, timeout and decoding failures. Callers degrade these to
    /// fallback data instead of surfacing them.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TravelHubError::Network { .. } | TravelHubError::Timeout { .. } | TravelHubError::Parse { .. }
        )
    }

    /// HTTP status used when the error reaches the handler boundary
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            TravelHubError::Validation { .. } => StatusCode::BAD_REQUEST,
            TravelHubError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TravelHubError::Config { .. } => {
                "Server configuration error. Please contact the administrator.".to_string()
            }
            TravelHubError::Validation { message } => message.clone(),
            TravelHubError::MethodNotAllowed { .. } => "Method not allowed".to_string(),
            TravelHubError::MissingCredential { .. } => "API key not configured".to_string(),
            TravelHubError::Upstream { service, status, .. } => {
                format!("{service} request failed with status {status}")
            }
            TravelHubError::Network { .. } | TravelHubError::Timeout { .. } => {
                "Unable to reach external services. Please try again later.".to_string()
            }
            TravelHubError::Parse { .. } => {
                "Received an invalid response from an external service.".to_string()
            }
        }
    }
}

impl IntoResponse for TravelHubError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        let body = match &self {
            TravelHubError::Upstream {
                status: upstream_status,
                body,
                ..
            } => json!({
                "error": self.user_message(),
                "status": upstream_status,
                "details": body,
            }),
            _ => json!({ "error": self.user_message() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<reqwest::Error> for TravelHubError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TravelHubError::timeout("upstream request", 0)
        } else if err.is_decode() {
            TravelHubError::parse(err.to_string())
        } else {
            TravelHubError::network(err.to_string())
        }
    }
}

impl From<reqwest_middleware::Error> for TravelHubError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(err) => err.into(),
            reqwest_middleware::Error::Middleware(err) => TravelHubError::network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for TravelHubError {
    fn from(err: serde_json::Error) -> Self {
        TravelHubError::parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = TravelHubError::config("bad port");
        assert!(matches!(config_err, TravelHubError::Config { .. }));

        let validation_err = TravelHubError::validation("location is required");
        assert!(matches!(validation_err, TravelHubError::Validation { .. }));

        let upstream_err = TravelHubError::upstream("viator", 503, "unavailable");
        assert!(matches!(
            upstream_err,
            TravelHubError::Upstream { status: 503, .. }
        ));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            TravelHubError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TravelHubError::MethodNotAllowed {
                method: "GET".into()
            }
            .status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            TravelHubError::missing_credential("VIATOR_API_KEY").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            TravelHubError::upstream("rapidapi", 404, "nope").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(TravelHubError::network("refused").is_recoverable());
        assert!(TravelHubError::timeout("search", 10).is_recoverable());
        assert!(TravelHubError::parse("bad json").is_recoverable());
        assert!(!TravelHubError::upstream("viator", 500, "boom").is_recoverable());
        assert!(!TravelHubError::missing_credential("KEY").is_recoverable());
    }

    #[test]
    fn test_user_messages() {
        let validation_err = TravelHubError::validation("Location parameter is required");
        assert_eq!(validation_err.user_message(), "Location parameter is required");

        let upstream_err = TravelHubError::upstream("viator", 502, "bad gateway");
        assert!(upstream_err.user_message().contains("502"));

        let credential_err = TravelHubError::missing_credential("OPENAI_API_KEY");
        assert!(credential_err.user_message().contains("not configured"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: TravelHubError = json_err.into();
        assert!(matches!(err, TravelHubError::Parse { .. }));
    }
}
