//! psbdmp.ws paste dump search.

use crate::error::Result;
use crate::evidence::Evidence;
use crate::http::{ensure_success, json};
use crate::lookup::Lookup;
use crate::source::Source;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://psbdmp.ws";

/// Finds Pastebin dumps that mention an address.
#[derive(Clone)]
pub struct PsbdmpLookup {
    client: Client,
    base_url: String,
}

impl PsbdmpLookup {
    /// Create a lookup against the public endpoint.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// Create a lookup against a custom endpoint.
    #[must_use]
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Lookup for PsbdmpLookup {
    fn source(&self) -> Source {
        Source::Psbdmp
    }

    async fn lookup(&self, query: &str) -> Result<Vec<Evidence>> {
        let response = self
            .client
            .get(format!(
                "{}/api/v3/search/{}",
                self.base_url,
                urlencoding::encode(query)
            ))
            .send()
            .await?;

        let dumps: Vec<Dump> =
            json(Source::Psbdmp, ensure_success(Source::Psbdmp, response).await?).await?;

        Ok(dumps
            .into_iter()
            .filter(|dump| !dump.id.is_empty())
            .map(|dump| Evidence::new("paste", format!("https://pastebin.com/{}", dump.id)))
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct Dump {
    #[serde(default)]
    id: String,
}
