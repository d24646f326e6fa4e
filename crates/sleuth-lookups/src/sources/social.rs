//! Social network presence checks.
//!
//! Each check asks a sign-up endpoint whether the address is already taken.
//! A taken address yields one "registered" evidence line; a free one yields
//! nothing.

use crate::error::{LookupError, Result};
use crate::evidence::Evidence;
use crate::http::{ensure_success, json, presence};
use crate::lookup::Lookup;
use crate::source::Source;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{COOKIE, REFERER, SET_COOKIE};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

static CSRF_COOKIE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"csrftoken=([^;]+)").expect("valid csrf cookie regex"));

/// Spotify's sign-up validation status for an address already in use.
const SPOTIFY_EMAIL_TAKEN: i32 = 20;

/// Checks whether an address has an Instagram account.
#[derive(Clone)]
pub struct InstagramLookup {
    client: Client,
    base_url: String,
}

impl InstagramLookup {
    /// Create a check against the public endpoint.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, "https://www.instagram.com")
    }

    /// Create a check against a custom endpoint.
    #[must_use]
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// The sign-up form hands out the CSRF token the attempt endpoint needs.
    async fn csrf_token(&self) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/accounts/emailsignup/", self.base_url))
            .send()
            .await?;
        let response = ensure_success(Source::Instagram, response).await?;

        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|cookie| CSRF_COOKIE.captures(cookie))
            .map(|captures| captures[1].to_string())
            .ok_or_else(|| LookupError::Parse {
                service: Source::Instagram,
                message: "no csrftoken cookie in sign-up response".to_string(),
            })
    }
}

#[async_trait]
impl Lookup for InstagramLookup {
    fn source(&self) -> Source {
        Source::Instagram
    }

    async fn lookup(&self, query: &str) -> Result<Vec<Evidence>> {
        let token = self.csrf_token().await?;

        let response = self
            .client
            .post(format!(
                "{}/api/v1/web/accounts/web_create_ajax/attempt/",
                self.base_url
            ))
            .header("X-CSRFToken", token.as_str())
            .header(COOKIE, format!("csrftoken={token}"))
            .header(REFERER, format!("{}/accounts/emailsignup/", self.base_url))
            .header("X-Requested-With", "XMLHttpRequest")
            .form(&[
                ("email", query),
                ("username", ""),
                ("first_name", ""),
                ("opt_into_one_tap", "false"),
            ])
            .send()
            .await?;

        // The attempt endpoint reports field errors with a 400 status
        let response = if response.status() == StatusCode::BAD_REQUEST {
            response
        } else {
            ensure_success(Source::Instagram, response).await?
        };
        let body = response.text().await?;
        if body.contains("Please wait a few minutes") {
            return Err(LookupError::RateLimited {
                service: Source::Instagram,
            });
        }

        Ok(presence(body.contains("email_is_taken")))
    }
}

/// Checks whether an address has a Spotify account.
#[derive(Clone)]
pub struct SpotifyLookup {
    client: Client,
    base_url: String,
}

impl SpotifyLookup {
    /// Create a check against the public endpoint.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, "https://spclient.wg.spotify.com")
    }

    /// Create a check against a custom endpoint.
    #[must_use]
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Lookup for SpotifyLookup {
    fn source(&self) -> Source {
        Source::Spotify
    }

    async fn lookup(&self, query: &str) -> Result<Vec<Evidence>> {
        let response = self
            .client
            .get(format!("{}/signup/public/v1/account", self.base_url))
            .query(&[("validate", "1"), ("email", query)])
            .send()
            .await?;

        let body: SpotifyValidation =
            json(Source::Spotify, ensure_success(Source::Spotify, response).await?).await?;

        Ok(presence(body.status == SPOTIFY_EMAIL_TAKEN))
    }
}

#[derive(Debug, Deserialize)]
struct SpotifyValidation {
    status: i32,
}

/// Checks whether an address has a Twitter account.
#[derive(Clone)]
pub struct TwitterLookup {
    client: Client,
    base_url: String,
}

impl TwitterLookup {
    /// Create a check against the public endpoint.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, "https://api.twitter.com")
    }

    /// Create a check against a custom endpoint.
    #[must_use]
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Lookup for TwitterLookup {
    fn source(&self) -> Source {
        Source::Twitter
    }

    async fn lookup(&self, query: &str) -> Result<Vec<Evidence>> {
        let response = self
            .client
            .get(format!("{}/i/users/email_available.json", self.base_url))
            .query(&[("email", query)])
            .send()
            .await?;

        let body: TwitterAvailability =
            json(Source::Twitter, ensure_success(Source::Twitter, response).await?).await?;

        Ok(presence(body.taken))
    }
}

#[derive(Debug, Deserialize)]
struct TwitterAvailability {
    #[serde(default)]
    taken: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csrf_cookie_regex() {
        let cookie = "csrftoken=AbC123xyz; Domain=.instagram.com; Path=/; Secure";
        let captures = CSRF_COOKIE.captures(cookie).expect("token present");
        assert_eq!(&captures[1], "AbC123xyz");

        assert!(CSRF_COOKIE.captures("mid=xyz; Path=/").is_none());
    }
}
