//! Have I Been Pwned v3 breached-account lookups.

use crate::error::Result;
use crate::evidence::Evidence;
use crate::http::{ensure_success, json, require_key};
use crate::lookup::Lookup;
use crate::source::Source;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://haveibeenpwned.com";

/// Lists the breaches Have I Been Pwned knows for an address.
#[derive(Clone)]
pub struct HaveIBeenPwnedLookup {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl HaveIBeenPwnedLookup {
    /// Create a lookup with an optional API key.
    #[must_use]
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_BASE_URL)
    }

    /// Create a lookup against a custom endpoint.
    #[must_use]
    pub fn with_base_url(
        client: Client,
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Lookup for HaveIBeenPwnedLookup {
    fn source(&self) -> Source {
        Source::HaveIBeenPwned
    }

    async fn lookup(&self, query: &str) -> Result<Vec<Evidence>> {
        let key = require_key(Source::HaveIBeenPwned, self.api_key.as_deref())?;

        let response = self
            .client
            .get(format!(
                "{}/api/v3/breachedaccount/{}",
                self.base_url,
                urlencoding::encode(query)
            ))
            .query(&[("truncateResponse", "false")])
            .header("hibp-api-key", key)
            .send()
            .await?;

        // 404 is how the API says "not pwned"
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let breaches: Vec<Breach> = json(
            Source::HaveIBeenPwned,
            ensure_success(Source::HaveIBeenPwned, response).await?,
        )
        .await?;

        Ok(breaches
            .into_iter()
            .map(|breach| {
                let name = breach.title.unwrap_or(breach.name);
                let mut value = name;
                if let Some(domain) = breach.domain.filter(|d| !d.is_empty()) {
                    value.push_str(&format!(" [{domain}]"));
                }
                if let Some(date) = breach.breach_date {
                    value.push_str(&format!(" on {date}"));
                }
                Evidence::new("breach", value)
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Breach {
    name: String,
    title: Option<String>,
    domain: Option<String>,
    breach_date: Option<String>,
}
