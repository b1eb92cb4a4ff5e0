//! HTTP client for the eBird v2 REST API.
//!
//! Wraps `reqwest` with the `X-eBirdApiToken` credential header, URL
//! construction, and typed response deserialization. Non-2xx responses are
//! surfaced as [`EbirdError::UnexpectedStatus`] carrying eBird's own error
//! title when the body has one.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::EbirdError;
use crate::types::ChecklistDetail;

const DEFAULT_BASE_URL: &str = "https://api.ebird.org/v2/";
const API_TOKEN_HEADER: &str = "X-eBirdApiToken";

/// Client for the eBird v2 API.
///
/// Use [`EbirdClient::new`] for production or [`EbirdClient::with_base_url`]
/// to point at a mock server in tests.
pub struct EbirdClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl EbirdClient {
    /// Creates a new client pointed at the production eBird API.
    ///
    /// # Errors
    ///
    /// Returns [`EbirdError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, EbirdError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`EbirdError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`EbirdError::InvalidBaseUrl`] if `base_url` does not parse as an
    /// absolute hierarchical URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, EbirdError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| EbirdError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(EbirdError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot carry a path".to_owned(),
            });
        }

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
        })
    }

    /// Fetches a full checklist by submission id.
    ///
    /// # Errors
    ///
    /// - [`EbirdError::Http`] on network failure.
    /// - [`EbirdError::UnexpectedStatus`] on a non-2xx response.
    /// - [`EbirdError::Deserialize`] if the body is not a checklist.
    pub async fn fetch_checklist(&self, sub_id: &str) -> Result<ChecklistDetail, EbirdError> {
        let url = self.build_url(&["product", "checklist", "view", sub_id], &[]);
        self.request_json(&url, &format!("checklist {sub_id}"))
            .await
    }

    /// Builds a request URL from path segments and query parameters.
    ///
    /// Segments are percent-encoded individually, so a code containing `/`
    /// cannot escape its path position.
    pub(crate) fn build_url(&self, segments: &[&str], params: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends an authenticated GET, asserts a 2xx status, and parses the body.
    ///
    /// # Errors
    ///
    /// - [`EbirdError::Http`] on network failure.
    /// - [`EbirdError::UnexpectedStatus`] on a non-2xx response.
    /// - [`EbirdError::Deserialize`] if the body does not match `T`.
    pub(crate) async fn request_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<T, EbirdError> {
        tracing::debug!(url = %url, "eBird request");
        let response = self
            .client
            .get(url.clone())
            .header(API_TOKEN_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(EbirdError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                message: error_title(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| EbirdError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

/// Pulls `errors[0].title` out of an eBird error body, if present.
fn error_title(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("errors")?
                .get(0)?
                .get("title")?
                .as_str()
                .map(str::to_owned)
        })
        .unwrap_or_else(|| "no error detail".to_owned())
}
