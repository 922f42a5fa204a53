//! Error taxonomy for LinkCraft.
//!
//! Configuration errors are fatal for the process. External-service errors
//! are transient: they are reported and the session carries on with its
//! previous state. Empty results are not errors at all (see
//! [`crate::session::Outcome`]).

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while configuring or running a LinkCraft session.
#[derive(Error, Debug)]
pub enum LinkcraftError {
    #[error("missing API key: {0}")]
    MissingCredential(&'static str),

    #[error("cannot read config file {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid URL for {what}: {source}")]
    InvalidUrl {
        what: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("start date {start} must be earlier than or equal to end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid date {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("{service} error: {message}")]
    ExternalService {
        service: &'static str,
        message: String,
    },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no headline selected; fetch headlines and pick one first")]
    NothingSelected,

    #[error("no post generated yet; generate a post first")]
    NoPost,

    #[error("no headline number {0}")]
    NoSuchHeadline(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LinkcraftError {
    /// Whether this error ends the session rather than just the current action.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LinkcraftError::MissingCredential(_)
                | LinkcraftError::ConfigRead { .. }
                | LinkcraftError::ConfigParse { .. }
                | LinkcraftError::InvalidUrl { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LinkcraftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_is_fatal() {
        let e = LinkcraftError::MissingCredential("NEWS_API.api_key");
        assert!(e.is_fatal());
        assert_eq!(e.to_string(), "missing API key: NEWS_API.api_key");
    }

    #[test]
    fn test_service_error_is_transient() {
        let e = LinkcraftError::ExternalService {
            service: "NewsAPI",
            message: "rateLimited".to_string(),
        };
        assert!(!e.is_fatal());
        assert_eq!(e.to_string(), "NewsAPI error: rateLimited");
    }
}
