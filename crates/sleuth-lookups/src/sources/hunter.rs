//! hunter.io domain search.

use crate::error::Result;
use crate::evidence::Evidence;
use crate::http::{domain_of, ensure_success, json, require_key};
use crate::lookup::Lookup;
use crate::source::Source;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://api.hunter.io";

/// Lists other addresses Hunter knows on the subject's domain.
#[derive(Clone)]
pub struct HunterLookup {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl HunterLookup {
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
impl Lookup for HunterLookup {
    fn source(&self) -> Source {
        Source::Hunter
    }

    async fn lookup(&self, query: &str) -> Result<Vec<Evidence>> {
        let key = require_key(Source::Hunter, self.api_key.as_deref())?;
        let domain = domain_of(Source::Hunter, query)?;

        let response = self
            .client
            .get(format!("{}/v2/domain-search", self.base_url))
            .query(&[("domain", domain.as_str()), ("api_key", key)])
            .send()
            .await?;

        let body: HunterResponse =
            json(Source::Hunter, ensure_success(Source::Hunter, response).await?).await?;

        let mut evidence = Vec::new();
        if let Some(organization) = body.data.organization.filter(|o| !o.is_empty()) {
            evidence.push(Evidence::new("organization", organization));
        }
        evidence.extend(body.data.emails.into_iter().map(|email| {
            let value = match email.confidence {
                Some(confidence) => format!("{} ({confidence}%)", email.value),
                None => email.value,
            };
            Evidence::new("related email", value)
        }));

        Ok(evidence)
    }
}

#[derive(Debug, Deserialize)]
struct HunterResponse {
    data: HunterData,
}

#[derive(Debug, Deserialize)]
struct HunterData {
    organization: Option<String>,
    #[serde(default)]
    emails: Vec<HunterEmail>,
}

#[derive(Debug, Deserialize)]
struct HunterEmail {
    value: String,
    confidence: Option<u8>,
}
