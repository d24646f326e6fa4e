//! `BreachDirectory` lookups through `RapidAPI`.

use crate::error::Result;
use crate::evidence::Evidence;
use crate::http::{ensure_success, json, require_key};
use crate::lookup::Lookup;
use crate::source::Source;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://breachdirectory.p.rapidapi.com";
const RAPIDAPI_HOST: &str = "breachdirectory.p.rapidapi.com";

/// Lists the breaches an address appears in.
#[derive(Clone)]
pub struct BreachDirectoryLookup {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl BreachDirectoryLookup {
    /// Create a lookup with an optional `RapidAPI` key.
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
impl Lookup for BreachDirectoryLookup {
    fn source(&self) -> Source {
        Source::BreachDirectory
    }

    async fn lookup(&self, query: &str) -> Result<Vec<Evidence>> {
        let key = require_key(Source::BreachDirectory, self.api_key.as_deref())?;

        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .query(&[("func", "auto"), ("term", query)])
            .header("X-RapidAPI-Key", key)
            .header("X-RapidAPI-Host", RAPIDAPI_HOST)
            .send()
            .await?;

        let body: BreachDirectoryResponse =
            json(Source::BreachDirectory, ensure_success(Source::BreachDirectory, response).await?)
                .await?;

        if !body.success || body.result.is_empty() {
            return Ok(Vec::new());
        }

        let mut evidence = vec![Evidence::new("found", body.found.to_string())];
        evidence.extend(body.result.into_iter().map(|entry| {
            let sources = entry.sources.join(", ");
            let value = match entry.password.filter(|_| entry.has_password) {
                Some(password) => format!("{sources} (password: {password})"),
                None => sources,
            };
            Evidence::new("breach", value)
        }));

        Ok(evidence)
    }
}

#[derive(Debug, Deserialize)]
struct BreachDirectoryResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    found: u64,
    #[serde(default)]
    result: Vec<BreachEntry>,
}

#[derive(Debug, Deserialize)]
struct BreachEntry {
    #[serde(default)]
    has_password: bool,
    password: Option<String>,
    #[serde(default)]
    sources: BreachSources,
}

/// The API returns either a list of sources or the string `"Unverified"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BreachSources {
    Many(Vec<String>),
    One(String),
}

impl Default for BreachSources {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl BreachSources {
    fn join(&self, separator: &str) -> String {
        match self {
            Self::Many(names) if names.is_empty() => "unknown source".to_string(),
            Self::Many(names) => names.join(separator),
            Self::One(name) => name.clone(),
        }
    }
}
