//! Error types for solr-query

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while executing a search request.
///
/// Invalid builder input is never reported here; see [`crate::builder::Rejection`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {url}")]
    Status { status: u16, url: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {url}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unexpected response shape: {0}")]
    ShapeMismatch(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = Error::Status {
            status: 503,
            url: "http://localhost:8983/select".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("HTTP 503"));
        assert!(msg.contains("http://localhost:8983/select"));
    }

    #[test]
    fn test_invalid_url_keeps_source() {
        let err = Error::InvalidUrl {
            url: "::".to_string(),
            source: url::ParseError::RelativeUrlWithoutBase,
        };
        assert!(err.to_string().contains("Invalid URL"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_json_error_from() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
