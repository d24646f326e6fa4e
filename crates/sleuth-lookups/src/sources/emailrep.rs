//! emailrep.io reputation lookups.

use crate::error::Result;
use crate::evidence::Evidence;
use crate::http::{ensure_success, json};
use crate::lookup::Lookup;
use crate::source::Source;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://emailrep.io";

/// Reputation, leak flags and known profiles for an address.
///
/// The key is optional: emailrep.io answers anonymous queries at a lower rate.
#[derive(Clone)]
pub struct EmailRepLookup {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl EmailRepLookup {
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
impl Lookup for EmailRepLookup {
    fn source(&self) -> Source {
        Source::EmailRep
    }

    async fn lookup(&self, query: &str) -> Result<Vec<Evidence>> {
        let mut request = self.client.get(format!(
            "{}/{}",
            self.base_url,
            urlencoding::encode(query)
        ));
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            request = request.header("Key", key);
        }

        let response = request.send().await?;
        let report: EmailRepResponse =
            json(Source::EmailRep, ensure_success(Source::EmailRep, response).await?).await?;

        Ok(report.into_evidence())
    }
}

#[derive(Debug, Deserialize)]
struct EmailRepResponse {
    reputation: Option<String>,
    #[serde(default)]
    suspicious: bool,
    #[serde(default)]
    references: u64,
    #[serde(default)]
    details: EmailRepDetails,
}

#[derive(Debug, Default, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
struct EmailRepDetails {
    #[serde(default)]
    blacklisted: bool,
    #[serde(default)]
    malicious_activity: bool,
    #[serde(default)]
    credentials_leaked: bool,
    #[serde(default)]
    data_breach: bool,
    first_seen: Option<String>,
    last_seen: Option<String>,
    #[serde(default)]
    profiles: Vec<String>,
}

impl EmailRepResponse {
    fn into_evidence(self) -> Vec<Evidence> {
        let yes_no = |flag: bool| if flag { "yes" } else { "no" };
        let details = self.details;

        let mut evidence = vec![
            Evidence::new(
                "reputation",
                self.reputation.unwrap_or_else(|| "none".to_string()),
            ),
            Evidence::new("suspicious", yes_no(self.suspicious)),
            Evidence::new("references", self.references.to_string()),
            Evidence::new("blacklisted", yes_no(details.blacklisted)),
            Evidence::new("malicious activity", yes_no(details.malicious_activity)),
            Evidence::new("credentials leaked", yes_no(details.credentials_leaked)),
            Evidence::new("data breach", yes_no(details.data_breach)),
        ];

        if let Some(first_seen) = details.first_seen {
            evidence.push(Evidence::new("first seen", first_seen));
        }
        if let Some(last_seen) = details.last_seen {
            evidence.push(Evidence::new("last seen", last_seen));
        }
        if !details.profiles.is_empty() {
            evidence.push(Evidence::new("profiles", details.profiles.join(", ")));
        }

        evidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_evidence() {
        let report: EmailRepResponse = serde_json::from_str(
            r#"{
                "email": "alice@example.com",
                "reputation": "high",
                "suspicious": false,
                "references": 12,
                "details": {
                    "credentials_leaked": true,
                    "first_seen": "07/01/2008",
                    "last_seen": "never",
                    "profiles": ["twitter", "github"]
                }
            }"#,
        )
        .expect("parse report");

        let evidence = report.into_evidence();
        assert_eq!(evidence[0], Evidence::new("reputation", "high"));
        assert!(evidence.contains(&Evidence::new("credentials leaked", "yes")));
        assert!(evidence.contains(&Evidence::new("profiles", "twitter, github")));
    }
}
