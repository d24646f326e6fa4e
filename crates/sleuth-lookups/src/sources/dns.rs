//! DNS records of the subject's mail domain.

use crate::error::Result;
use crate::evidence::Evidence;
use crate::http::domain_of;
use crate::lookup::Lookup;
use crate::source::Source;
use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::TokioAsyncResolver;

/// Resolves MX, NS, A, SPF and DMARC records for the domain of an address.
pub struct DnsLookup {
    resolver: TokioAsyncResolver,
}

impl DnsLookup {
    /// Create a lookup using public resolvers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default(), ResolverOpts::default())
    }

    /// Create a lookup with an explicit resolver configuration.
    #[must_use]
    pub fn with_config(config: ResolverConfig, options: ResolverOpts) -> Self {
        Self {
            resolver: TokioAsyncResolver::tokio(config, options),
        }
    }

    async fn mx(&self, domain: &str) -> Result<Vec<Evidence>> {
        let lookup = no_records_as_empty(self.resolver.mx_lookup(domain).await)?;
        let mut records: Vec<_> = lookup
            .iter()
            .flat_map(|l| l.iter())
            .map(|mx| (mx.preference(), mx.exchange().to_string()))
            .collect();
        records.sort();

        Ok(records
            .into_iter()
            .map(|(preference, exchange)| Evidence::new("MX", format!("{exchange} ({preference})")))
            .collect())
    }

    async fn ns(&self, domain: &str) -> Result<Vec<Evidence>> {
        let lookup = no_records_as_empty(self.resolver.ns_lookup(domain).await)?;
        Ok(lookup
            .iter()
            .flat_map(|l| l.iter())
            .map(|ns| Evidence::new("NS", ns.to_string()))
            .collect())
    }

    async fn a(&self, domain: &str) -> Result<Vec<Evidence>> {
        let lookup = no_records_as_empty(self.resolver.ipv4_lookup(domain).await)?;
        Ok(lookup
            .iter()
            .flat_map(|l| l.iter())
            .map(|a| Evidence::new("A", a.to_string()))
            .collect())
    }

    async fn txt(&self, name: &str) -> Result<Vec<String>> {
        let lookup = no_records_as_empty(self.resolver.txt_lookup(name).await)?;
        Ok(lookup
            .iter()
            .flat_map(|l| l.iter())
            .map(|txt| {
                txt.txt_data()
                    .iter()
                    .map(|chunk| String::from_utf8_lossy(chunk))
                    .collect::<String>()
            })
            .collect())
    }
}

impl Default for DnsLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Lookup for DnsLookup {
    fn source(&self) -> Source {
        Source::Dns
    }

    async fn lookup(&self, query: &str) -> Result<Vec<Evidence>> {
        let domain = domain_of(Source::Dns, query)?;
        tracing::debug!(%domain, "resolving DNS records");

        let policy_name = dmarc_name(&domain);
        let (mx, ns, a, txt, dmarc) = tokio::try_join!(
            self.mx(&domain),
            self.ns(&domain),
            self.a(&domain),
            self.txt(&domain),
            self.txt(&policy_name),
        )?;

        let mut evidence = mx;
        evidence.extend(ns);
        evidence.extend(a);
        evidence.extend(
            txt.iter()
                .filter(|record| is_spf(record))
                .map(|record| Evidence::new("SPF", record.clone())),
        );
        evidence.extend(
            dmarc
                .iter()
                .filter(|record| is_dmarc(record))
                .map(|record| Evidence::new("DMARC", record.clone())),
        );

        Ok(evidence)
    }
}

/// A name with no records of the requested type is an empty answer, not a failure.
fn no_records_as_empty<T>(result: std::result::Result<T, ResolveError>) -> Result<Option<T>> {
    match result {
        Ok(lookup) => Ok(Some(lookup)),
        Err(e) if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// DMARC policy lives in a TXT record under the `_dmarc` label.
fn dmarc_name(domain: &str) -> String {
    format!("_dmarc.{domain}")
}

fn is_spf(record: &str) -> bool {
    record.trim_start().to_ascii_lowercase().starts_with("v=spf1")
}

fn is_dmarc(record: &str) -> bool {
    record
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("v=dmarc1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_classification() {
        assert!(is_spf("v=spf1 include:_spf.google.com ~all"));
        assert!(is_spf("  V=SPF1 -all"));
        assert!(!is_spf("google-site-verification=abc"));

        assert!(is_dmarc("v=DMARC1; p=reject"));
        assert!(!is_dmarc("v=spf1 -all"));
    }

    #[test]
    fn test_dmarc_name() {
        assert_eq!(dmarc_name("example.com"), "_dmarc.example.com");
    }

    #[tokio::test]
    async fn test_unreachable_resolver_fails_whole_lookup() {
        use hickory_resolver::config::NameServerConfigGroup;
        use std::net::{IpAddr, Ipv4Addr};
        use std::time::Duration;

        let servers =
            NameServerConfigGroup::from_ips_clear(&[IpAddr::V4(Ipv4Addr::LOCALHOST)], 1, true);
        let mut options = ResolverOpts::default();
        options.timeout = Duration::from_millis(200);
        options.attempts = 1;
        let dns = DnsLookup::with_config(ResolverConfig::from_parts(None, vec![], servers), options);

        let result = dns.lookup("alice@example.com").await;
        assert!(matches!(result, Err(crate::LookupError::Dns(_))), "{result:?}");
    }

    #[tokio::test]
    async fn test_rejects_query_without_domain() {
        let dns = DnsLookup::new();
        let err = dns.lookup("alice").await.expect_err("no domain");
        assert!(matches!(err, crate::LookupError::InvalidQuery { .. }));
    }
}
