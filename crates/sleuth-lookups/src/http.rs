//! Shared HTTP plumbing for the web-based lookups.

use crate::error::{LookupError, Result};
use crate::evidence::Evidence;
use crate::source::Source;
use reqwest::{Client, Response, StatusCode};
use sleuth_core::{ScanningConfig, Subject};
use std::time::Duration;

/// Settings applied to the one HTTP client shared by all lookups.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// User agent header
    pub user_agent: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self::from(&ScanningConfig::default())
    }
}

impl From<&ScanningConfig> for HttpSettings {
    fn from(config: &ScanningConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

/// Build the HTTP client shared by every web lookup in a run.
///
/// # Errors
/// Returns error if the TLS backend cannot be initialised.
pub fn build_client(settings: &HttpSettings) -> Result<Client> {
    Client::builder()
        .user_agent(settings.user_agent.clone())
        .timeout(settings.timeout)
        .build()
        .map_err(|e| LookupError::Client(e.to_string()))
}

/// Map throttling and error statuses to a [`LookupError`].
pub(crate) async fn ensure_success(service: Source, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(LookupError::RateLimited { service });
    }

    let message = response
        .text()
        .await
        .ok()
        .filter(|body| !body.trim().is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    Err(LookupError::Api {
        service,
        status: status.as_u16(),
        message: truncate(&message, 200),
    })
}

/// Decode a JSON body, tagging parse failures with the source.
pub(crate) async fn json<T: serde::de::DeserializeOwned>(
    service: Source,
    response: Response,
) -> Result<T> {
    response.json().await.map_err(|e| LookupError::Parse {
        service,
        message: e.to_string(),
    })
}

/// Fail with [`LookupError::MissingApiKey`] when no key is configured.
pub(crate) fn require_key(service: Source, key: Option<&str>) -> Result<&str> {
    key.filter(|k| !k.is_empty())
        .ok_or(LookupError::MissingApiKey { service })
}

/// Extract the domain of an email address query.
pub(crate) fn domain_of(service: Source, query: &str) -> Result<String> {
    let subject = Subject::parse(query).map_err(|e| LookupError::InvalidQuery {
        service,
        reason: e.to_string(),
    })?;

    let domain = subject.domain().trim().trim_end_matches('.');
    if domain.is_empty() {
        return Err(LookupError::InvalidQuery {
            service,
            reason: format!("'{query}' has no domain"),
        });
    }

    Ok(domain.to_lowercase())
}

/// Evidence for a presence check: one line when registered, none otherwise.
pub(crate) fn presence(registered: bool) -> Vec<Evidence> {
    if registered {
        vec![Evidence::new("account", "registered")]
    } else {
        Vec::new()
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
