//! ip-api.com geolocation of the subject's domain.

use crate::error::{LookupError, Result};
use crate::evidence::Evidence;
use crate::http::{domain_of, ensure_success, json};
use crate::lookup::Lookup;
use crate::source::Source;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "http://ip-api.com";

/// Geolocates the host serving the subject's domain.
#[derive(Clone)]
pub struct IpApiLookup {
    client: Client,
    base_url: String,
}

impl IpApiLookup {
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
impl Lookup for IpApiLookup {
    fn source(&self) -> Source {
        Source::IpApi
    }

    async fn lookup(&self, query: &str) -> Result<Vec<Evidence>> {
        let domain = domain_of(Source::IpApi, query)?;

        let response = self
            .client
            .get(format!(
                "{}/json/{}",
                self.base_url,
                urlencoding::encode(&domain)
            ))
            .send()
            .await?;

        let geo: IpApiResponse =
            json(Source::IpApi, ensure_success(Source::IpApi, response).await?).await?;

        if geo.status != "success" {
            return Err(LookupError::Rejected {
                service: Source::IpApi,
                message: geo.message.unwrap_or_else(|| geo.status.clone()),
            });
        }

        let fields = [
            ("IP", geo.query),
            ("country", geo.country),
            ("region", geo.region_name),
            ("city", geo.city),
            ("ISP", geo.isp),
            ("organization", geo.org),
            ("AS", geo.as_name),
        ];

        Ok(fields
            .into_iter()
            .filter_map(|(label, value)| {
                value
                    .filter(|v| !v.is_empty())
                    .map(|v| Evidence::new(label, v))
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    query: Option<String>,
    country: Option<String>,
    region_name: Option<String>,
    city: Option<String>,
    isp: Option<String>,
    org: Option<String>,
    #[serde(rename = "as")]
    as_name: Option<String>,
}
