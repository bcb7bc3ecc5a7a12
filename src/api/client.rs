//! HTTP client for the archive REST API
//!
//! Wraps reqwest::Client with the configured base URL and a shared
//! response-status check, so callers only deal with well-formed successes.

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::config::Config;

/// Client bound to one archive backend origin.
pub struct ArchiveClient {
    http: reqwest::Client,
    base: String,
}

impl ArchiveClient {
    /// Build a client for the given API origin. A trailing slash on the
    /// origin is tolerated and stripped.
    pub fn new(api_base: impl Into<String>) -> Self {
        let mut base = api_base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    /// Build a client from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_base.clone())
    }

    /// The messages collection URL (trailing slash, as the backend routes it).
    pub fn collection_url(&self) -> String {
        format!("{}/messages/", self.base)
    }

    /// The URL of a single message record.
    pub fn record_url(&self, id: i64) -> String {
        format!("{}/messages/{}", self.base, id)
    }

    /// GET request to an API path.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response> {
        tracing::debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;

        check_response(resp, url).await
    }

    /// POST request with a JSON body.
    pub async fn post<B: Serialize>(&self, url: &str, body: &B) -> Result<reqwest::Response> {
        tracing::debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {} failed", url))?;

        check_response(resp, url).await
    }

    /// PUT request with a JSON body.
    pub async fn put<B: Serialize>(&self, url: &str, body: &B) -> Result<reqwest::Response> {
        tracing::debug!("PUT {}", url);

        let resp = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("PUT {} failed", url))?;

        check_response(resp, url).await
    }

    /// DELETE request.
    pub async fn delete(&self, url: &str) -> Result<reqwest::Response> {
        tracing::debug!("DELETE {}", url);

        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .with_context(|| format!("DELETE {} failed", url))?;

        check_response(resp, url).await
    }
}

/// Check HTTP response status code and return a clear error on failure.
///
/// Non-2xx becomes an error carrying the status and response body, so a
/// 404 on update/delete reads as a server error rather than a parse error.
async fn check_response(resp: reqwest::Response, url: &str) -> Result<reqwest::Response> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("HTTP {} for {}: {}", status.as_u16(), url, body);
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = ArchiveClient::new("http://127.0.0.1:8000");
        assert_eq!(client.collection_url(), "http://127.0.0.1:8000/messages/");
        assert_eq!(client.record_url(42), "http://127.0.0.1:8000/messages/42");
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let client = ArchiveClient::new("http://localhost:8000/");
        assert_eq!(client.collection_url(), "http://localhost:8000/messages/");
    }
}
