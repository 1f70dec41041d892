//! Shared request plumbing for the backend's REST and auth APIs.
//!
//! Endpoint methods live next to their concern (`auth`, `tables`, `visits`);
//! this module owns the HTTP client, URL construction, the common headers and
//! the mapping of error responses to [`BackendError::Api`].

use std::time::Duration;

use chispa_core::AppConfig;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::BackendError;

/// Client for one backend project.
///
/// Cheap to clone; clones share the connection pool. Use
/// [`BackendClient::from_config`] in binaries or
/// [`BackendClient::with_base_url`] to point at a mock server in tests.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    anon_key: String,
    base_url: Url,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url.as_str())
            .field("anon_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// # Errors
    ///
    /// Returns [`BackendError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`BackendError::InvalidUrl`] for a malformed backend URL.
    pub fn from_config(config: &AppConfig) -> Result<Self, BackendError> {
        Self::with_base_url(
            &config.backend_url,
            &config.backend_anon_key,
            config.backend_timeout_secs,
            &config.backend_user_agent,
        )
    }

    /// # Errors
    ///
    /// Returns [`BackendError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`BackendError::InvalidUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        anon_key: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so `join` appends below any path prefix
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| BackendError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            anon_key: anon_key.to_owned(),
            base_url,
        })
    }

    /// Resolves `path` (no leading slash) against the base URL and appends
    /// percent-encoded query pairs.
    pub(crate) fn build_url(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Url, BackendError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| BackendError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    pub(crate) fn http_get(&self, url: Url, token: Option<&str>) -> RequestBuilder {
        self.authorize(self.client.get(url), token)
    }

    pub(crate) fn http_post(&self, url: Url, token: Option<&str>) -> RequestBuilder {
        self.authorize(self.client.post(url), token)
    }

    pub(crate) fn http_patch(&self, url: Url, token: Option<&str>) -> RequestBuilder {
        self.authorize(self.client.patch(url), token)
    }

    pub(crate) fn http_delete(&self, url: Url, token: Option<&str>) -> RequestBuilder {
        self.authorize(self.client.delete(url), token)
    }

    /// Adds `apikey` and the bearer; without a user token the anon key is the
    /// bearer.
    fn authorize(&self, request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(token.unwrap_or(&self.anon_key))
    }

    /// Sends the request and maps non-2xx responses to [`BackendError::Api`].
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Http`] on network failure and
    /// [`BackendError::Api`] for any non-success status.
    pub(crate) async fn send(request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .map_or_else(|| format!("HTTP {}", status.as_u16()), ToOwned::to_owned)
        });
        tracing::warn!(status = status.as_u16(), %message, "backend request failed");
        Err(BackendError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Sends the request and deserializes a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, BackendError> {
        let body = Self::send(request).await?.text().await?;
        serde_json::from_str(&body).map_err(|e| BackendError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

/// Pulls the human-readable message out of an error body.
///
/// PostgREST uses `message`; GoTrue uses `msg`, `error_description` or
/// `error` depending on the endpoint and version.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "msg", "error_description", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(serde_json::Value::as_str))
        .filter(|m| !m.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
