//! Google web search for an address or a username.

use crate::error::{LookupError, Result};
use crate::evidence::Evidence;
use crate::http::ensure_success;
use crate::lookup::Lookup;
use crate::source::Source;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};

const DEFAULT_BASE_URL: &str = "https://www.google.com";

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid link selector"));
static HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h3").expect("valid heading selector"));

/// Scrapes the result links of a quoted Google search.
#[derive(Clone)]
pub struct GoogleSearchLookup {
    client: Client,
    base_url: String,
    max_results: usize,
}

impl GoogleSearchLookup {
    /// Create a search lookup keeping at most `max_results` links.
    #[must_use]
    pub fn new(client: Client, max_results: usize) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL, max_results)
    }

    /// Create a search lookup against a custom endpoint.
    #[must_use]
    pub fn with_base_url(client: Client, base_url: impl Into<String>, max_results: usize) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            max_results,
        }
    }
}

#[async_trait]
impl Lookup for GoogleSearchLookup {
    fn source(&self) -> Source {
        Source::GoogleSearch
    }

    async fn lookup(&self, query: &str) -> Result<Vec<Evidence>> {
        if query.trim().is_empty() {
            tracing::warn!("searching for an empty query");
        }

        let quoted = format!("\"{query}\"");
        let num = self.max_results.to_string();
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", quoted.as_str()), ("num", num.as_str()), ("hl", "en")])
            .send()
            .await?;

        let html = ensure_success(Source::GoogleSearch, response)
            .await?
            .text()
            .await?;

        if is_blocked(&html) {
            return Err(LookupError::RateLimited {
                service: Source::GoogleSearch,
            });
        }

        Ok(extract_result_links(&html, self.max_results)
            .into_iter()
            .map(|url| Evidence::new("result", url))
            .collect())
    }
}

/// Google answers automated traffic with an interstitial instead of results.
fn is_blocked(html: &str) -> bool {
    html.contains("unusual traffic") || html.contains("/sorry/index") || html.contains("g-recaptcha")
}

/// Collect outbound result links, in page order, without duplicates.
fn extract_result_links(html: &str, max_results: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links: Vec<String> = Vec::new();

    for anchor in document.select(&LINK_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        let target = if let Some(redirect) = href.strip_prefix("/url?") {
            redirect_target(redirect)
        } else if anchor.select(&HEADING_SELECTOR).next().is_some() {
            Some(href.to_string())
        } else {
            None
        };

        let Some(target) = target.filter(|t| is_outbound(t)) else {
            continue;
        };

        if !links.contains(&target) {
            links.push(target);
        }
        if links.len() >= max_results {
            break;
        }
    }

    links
}

/// Pull the destination out of a `/url?q=<target>&...` redirect.
fn redirect_target(params: &str) -> Option<String> {
    params
        .split('&')
        .find_map(|pair| pair.strip_prefix("q=").or_else(|| pair.strip_prefix("url=")))
        .and_then(|encoded| urlencoding::decode(encoded).ok())
        .map(std::borrow::Cow::into_owned)
}

fn is_outbound(url: &str) -> bool {
    let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    else {
        return false;
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    !(host == "google.com" || host.ends_with(".google.com") || host.contains(".google."))
}
