//! Intelligence X two-phase search.
//!
//! A search is submitted first and returns an id; results are then fetched
//! for that id. The result endpoint may report "not ready yet", in which case
//! it is polled a few more times.

use crate::error::{LookupError, Result};
use crate::evidence::Evidence;
use crate::http::{ensure_success, json, require_key};
use crate::lookup::Lookup;
use crate::source::Source;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://2.intelx.io";
const MAX_RESULTS: u32 = 20;
const MAX_POLLS: u32 = 3;
const POLL_DELAY: Duration = Duration::from_millis(750);

/// Search result status meaning "no results available yet, try again".
const STATUS_PENDING: i32 = 3;
/// Search result status meaning "search id not found".
const STATUS_UNKNOWN_ID: i32 = 2;

/// Lists leak and paste records Intelligence X holds for an address.
#[derive(Clone)]
pub struct IntelxLookup {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    poll_delay: Duration,
}

impl IntelxLookup {
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
            poll_delay: POLL_DELAY,
        }
    }

    /// Set the delay between result polls.
    #[must_use]
    pub fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = delay;
        self
    }

    async fn submit(&self, key: &str, term: &str) -> Result<String> {
        let request = SearchRequest {
            term,
            maxresults: MAX_RESULTS,
            media: 0,
            sort: 2,
            terminate: Vec::new(),
            timeout: 5,
        };

        let response = self
            .client
            .post(format!("{}/intelligent/search", self.base_url))
            .header("x-key", key)
            .json(&request)
            .send()
            .await?;

        let submitted: SearchSubmitted =
            json(Source::Intelx, ensure_success(Source::Intelx, response).await?).await?;

        if submitted.id.is_empty() {
            return Err(LookupError::Rejected {
                service: Source::Intelx,
                message: format!("search not accepted (status {})", submitted.status),
            });
        }

        Ok(submitted.id)
    }

    async fn results(&self, key: &str, id: &str) -> Result<Vec<IntelxRecord>> {
        let limit = MAX_RESULTS.to_string();
        let mut records = Vec::new();

        for attempt in 1..=MAX_POLLS {
            let response = self
                .client
                .get(format!("{}/intelligent/search/result", self.base_url))
                .query(&[("id", id), ("limit", limit.as_str())])
                .header("x-key", key)
                .send()
                .await?;

            let page: SearchResult =
                json(Source::Intelx, ensure_success(Source::Intelx, response).await?).await?;

            if page.status == STATUS_UNKNOWN_ID {
                return Err(LookupError::Rejected {
                    service: Source::Intelx,
                    message: format!("search id {id} not found"),
                });
            }

            records.extend(page.records);
            if page.status != STATUS_PENDING || !records.is_empty() {
                break;
            }

            tracing::debug!(attempt, "intelx results not ready, polling again");
            tokio::time::sleep(self.poll_delay).await;
        }

        Ok(records)
    }
}

#[async_trait]
impl Lookup for IntelxLookup {
    fn source(&self) -> Source {
        Source::Intelx
    }

    async fn lookup(&self, query: &str) -> Result<Vec<Evidence>> {
        let key = require_key(Source::Intelx, self.api_key.as_deref())?;
        let id = self.submit(key, query).await?;
        let records = self.results(key, &id).await?;

        Ok(records
            .into_iter()
            .map(|record| {
                let label = record.bucket.unwrap_or_else(|| "record".to_string());
                let value = match record.date.filter(|d| !d.is_empty()) {
                    Some(date) => format!("{} ({date})", record.name),
                    None => record.name,
                };
                Evidence::new(label, value)
            })
            .collect())
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    term: &'a str,
    maxresults: u32,
    media: u32,
    sort: u32,
    terminate: Vec<String>,
    timeout: u32,
}

#[derive(Debug, Deserialize)]
struct SearchSubmitted {
    #[serde(default)]
    id: String,
    #[serde(default)]
    status: i32,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    records: Vec<IntelxRecord>,
    #[serde(default)]
    status: i32,
}

#[derive(Debug, Deserialize)]
struct IntelxRecord {
    #[serde(default)]
    name: String,
    bucket: Option<String>,
    date: Option<String>,
}
