//! Error types for lookup clients.
//!
//! These errors stay inside a single lookup: the scanner converts them into a
//! failed outcome on the task that produced them.

use crate::source::Source;
use thiserror::Error;

/// Errors that can occur while querying one source.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The source needs a key and none is configured
    #[error("missing API key for {service}")]
    MissingApiKey {
        /// Source that needs the key
        service: Source,
    },

    /// Non-success HTTP status
    #[error("API error ({service}): status {status}, {message}")]
    Api {
        /// Source that answered
        service: Source,
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// The source throttled us or demanded a CAPTCHA
    #[error("rate limited by {service}")]
    RateLimited {
        /// Source that throttled
        service: Source,
    },

    /// The source answered but refused the query
    #[error("{service} rejected the query: {message}")]
    Rejected {
        /// Source that refused
        service: Source,
        /// Reason given by the source
        message: String,
    },

    /// The query cannot be used with this source
    #[error("invalid query for {service}: {reason}")]
    InvalidQuery {
        /// Source the query was meant for
        service: Source,
        /// Why it cannot be used
        reason: String,
    },

    /// Response parsing error
    #[error("failed to parse response from {service}: {message}")]
    Parse {
        /// Source whose response was malformed
        service: Source,
        /// Error message
        message: String,
    },

    /// DNS resolution error
    #[error("DNS error: {0}")]
    Dns(#[from] hickory_resolver::error::ResolveError),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// HTTP client could not be built
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

/// Result type alias for lookup operations.
pub type Result<T> = std::result::Result<T, LookupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LookupError::MissingApiKey {
            service: Source::Hunter,
        };
        assert_eq!(err.to_string(), "missing API key for Hunter");

        let err = LookupError::Api {
            service: Source::HaveIBeenPwned,
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error (Have I Been Pwned): status 401, Unauthorized"
        );
    }
}
