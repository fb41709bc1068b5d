//! Shared HTTP client for the BAG registries

use std::time::Duration;

use bag_core::{ProviderError, ProviderResult};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Header the Kadaster APIs read the API key from
const API_KEY_HEADER: &str = "x-api-key";

/// Problem details as returned by the Kadaster APIs (RFC 7807)
#[derive(Deserialize)]
struct ProblemResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// HTTP client bound to one registry base URL
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: Client,
    base_url: Url,
}

impl RegistryClient {
    /// Create a client for `base_url`.
    ///
    /// The base URL is treated as a directory: a missing trailing slash is
    /// added so that resource paths are appended rather than replacing the
    /// last segment.
    pub fn new(
        base_url: Url,
        api_key: Option<&str>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> ProviderResult<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/hal+json"),
        );
        if let Some(key) = api_key {
            let value = reqwest::header::HeaderValue::from_str(key)
                .map_err(|e| ProviderError::Transport(format!("Invalid API key: {}", e)))?;
            headers.insert(API_KEY_HEADER, value);
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ProviderError::Transport(format!("Failed to create client: {}", e)))?;

        let mut base_url = base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `<base>/<segments...>?<query...>` with proper escaping
    pub fn resource_url(&self, segments: &[&str], query: &[(&str, String)]) -> ProviderResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ProviderError::Transport(format!("Base URL cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// GET a resource and decode the JSON body.
    ///
    /// `context` names what was asked for (the id or the tuple) and ends up
    /// in the error on failure.
    #[instrument(skip(self, url), fields(url = %url))]
    pub async fn get_json(&self, url: Url, context: &str) -> ProviderResult<Value> {
        debug!("Querying registry");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(e, context))?;

        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ProviderError::Malformed(format!("{}: {}", context, e)))
        } else {
            Err(extract_error(response, status, context).await)
        }
    }
}

fn transport_error(err: reqwest::Error, context: &str) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(context.to_string())
    } else {
        ProviderError::Transport(format!("{}: {}", context, err))
    }
}

async fn extract_error(
    response: reqwest::Response,
    status: StatusCode,
    context: &str,
) -> ProviderError {
    let message = match response.json::<ProblemResponse>().await {
        Ok(problem) => problem
            .detail
            .or(problem.title)
            .unwrap_or_else(|| format!("HTTP {}", status)),
        Err(_) => format!("HTTP {}", status),
    };

    match status {
        StatusCode::NOT_FOUND => ProviderError::NotFound(context.to_string()),
        StatusCode::BAD_REQUEST => {
            ProviderError::InvalidRequest(format!("{}: {}", context, message))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Unauthorized(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ProviderError::Timeout(context.to_string())
        }
        _ => ProviderError::Upstream {
            status: status.as_u16(),
            message: format!("{}: {}", context, message),
        },
    }
}
