//! Content-host client for fetching raw skill files and directory listings
//!
//! Talks to a GitHub-style host: raw file content by `(owner/repo, ref, path)`
//! and directory listings through the contents API. The client performs no
//! caching and no retries — the orchestrator layers a cache on top, and a
//! failed call degrades the affected item instead of being retried within
//! the request.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{RateLimitConfig, ServiceConfig, DEFAULT_API_BASE_URL, DEFAULT_RAW_BASE_URL};
use crate::error::{Error, Result};

/// Web host for human-facing source links.
const SOURCE_WEB_BASE: &str = "https://github.com";

/// One entry from a directory listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirEntry {
    /// File or directory name.
    pub name: String,

    /// Repository-relative path.
    pub path: String,

    /// Entry type as reported by the host: `file`, `dir`, `symlink`, ...
    #[serde(rename = "type")]
    pub kind: String,
}

impl DirEntry {
    /// True if the entry is a regular file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == "file"
    }
}

/// Client for a source-control content host.
///
/// Cheap to clone; the underlying HTTP connection pool is shared.
///
/// # Example
///
/// ```rust,no_run
/// use skillscout::client::ContentHostClient;
///
/// # async fn example() -> skillscout::Result<()> {
/// let client = ContentHostClient::builder()
///     .token("ghp_example")
///     .build()?;
///
/// let content = client.fetch_file("vercel-labs/agent-skills", "skills/react/SKILL.md").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ContentHostClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    /// HTTP client for making requests
    http: reqwest::Client,
    /// Base URL for the contents API (directory listings)
    api_base: Url,
    /// Base URL for raw file content
    raw_base: Url,
    /// Optional bearer token; without it the host's unauthenticated rate
    /// ceiling applies
    token: Option<SecretString>,
    /// Git ref used for raw fetches
    content_ref: String,
    /// Independent timeout per outbound call
    timeout: Duration,
    /// Optional client-side throttle
    rate_limiter: Option<governor::DefaultDirectRateLimiter>,
}

impl std::fmt::Debug for ContentHostClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentHostClient")
            .field("api_base", &self.inner.api_base.as_str())
            .field("raw_base", &self.inner.raw_base.as_str())
            .field("authenticated", &self.inner.token.is_some())
            .field("content_ref", &self.inner.content_ref)
            .finish_non_exhaustive()
    }
}

impl ContentHostClient {
    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> ContentHostClientBuilder {
        ContentHostClientBuilder::default()
    }

    /// Create a client from a service configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let mut builder = Self::builder()
            .api_base_url(&config.api_base_url)
            .raw_base_url(&config.raw_base_url)
            .content_ref(&config.content_ref)
            .timeout(config.request_timeout);

        if let Some(token) = &config.content_host_token {
            builder = builder.token(token.expose_secret());
        }
        if let Some(rate_limit) = config.rate_limit {
            builder = builder.rate_limit(rate_limit);
        }

        builder.build()
    }

    /// Fetch raw file content from a repository.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if `repo` is not `owner/name` or `path` is empty
    /// - [`Error::NotFound`] on 404
    /// - [`Error::RateLimited`] on 403/429
    /// - [`Error::Transient`] / [`Error::Timeout`] on transport failures
    pub async fn fetch_file(&self, repo: &str, path: &str) -> Result<String> {
        validate_repo(repo)?;
        let path = path.trim_matches('/');
        if path.is_empty() {
            return Err(Error::validation("file path must not be empty"));
        }

        self.throttle().await;

        let url = self.raw_content_url(repo, path);
        tracing::debug!(%url, "fetching raw content");

        let response = self
            .request(self.inner.http.get(&url))
            .send()
            .await
            .map_err(|e| Error::from_transport(&e, self.inner.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::from_status(status, &format!("{repo}/{path}")));
        }

        response
            .text()
            .await
            .map_err(|e| Error::from_transport(&e, self.inner.timeout))
    }

    /// List a directory in a repository.
    ///
    /// An empty `path` lists the repository root.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ContentHostClient::fetch_file`].
    pub async fn list_directory(&self, repo: &str, path: &str) -> Result<Vec<DirEntry>> {
        validate_repo(repo)?;
        let path = path.trim_matches('/');

        self.throttle().await;

        let base = self.inner.api_base.as_str().trim_end_matches('/');
        let url = if path.is_empty() {
            format!("{base}/repos/{repo}/contents")
        } else {
            format!("{base}/repos/{repo}/contents/{path}")
        };
        tracing::debug!(%url, "listing directory");

        let response = self
            .request(self.inner.http.get(&url))
            .query(&[("ref", self.inner.content_ref.as_str())])
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await
            .map_err(|e| Error::from_transport(&e, self.inner.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::from_status(status, &format!("{repo}/{path}")));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::from_transport(&e, self.inner.timeout))?;

        // The contents API returns an array for directories and a single
        // object when the path is a file.
        match body {
            serde_json::Value::Array(items) => Ok(items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect()),
            other => Ok(serde_json::from_value::<DirEntry>(other)
                .map(|entry| vec![entry])
                .unwrap_or_default()),
        }
    }

    /// Raw-content URL for a repository file.
    #[must_use]
    pub fn raw_content_url(&self, repo: &str, path: &str) -> String {
        let base = self.inner.raw_base.as_str().trim_end_matches('/');
        format!(
            "{base}/{repo}/{}/{}",
            self.inner.content_ref,
            path.trim_matches('/')
        )
    }

    /// Human-facing source URL for a skill directory.
    #[must_use]
    pub fn source_tree_url(&self, repo: &str, path: &str) -> String {
        let path = path.trim_matches('/');
        if path.is_empty() {
            format!("{SOURCE_WEB_BASE}/{repo}")
        } else {
            format!("{SOURCE_WEB_BASE}/{repo}/tree/{}/{path}", self.inner.content_ref)
        }
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.timeout(self.inner.timeout);
        match &self.inner.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn throttle(&self) {
        if let Some(limiter) = &self.inner.rate_limiter {
            limiter.until_ready().await;
        }
    }
}

/// Builder for [`ContentHostClient`].
pub struct ContentHostClientBuilder {
    api_base_url: String,
    raw_base_url: String,
    token: Option<SecretString>,
    content_ref: String,
    timeout: Duration,
    rate_limit: Option<RateLimitConfig>,
}

impl Default for ContentHostClientBuilder {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            raw_base_url: DEFAULT_RAW_BASE_URL.to_string(),
            token: None,
            content_ref: "HEAD".to_string(),
            timeout: Duration::from_secs(10),
            rate_limit: None,
        }
    }
}

impl ContentHostClientBuilder {
    /// Set the contents-API base URL.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the raw-content base URL.
    pub fn raw_base_url(mut self, url: impl Into<String>) -> Self {
        self.raw_base_url = url.into();
        self
    }

    /// Set the bearer token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::new(token.into().into_boxed_str()));
        self
    }

    /// Set the git ref for raw fetches.
    pub fn content_ref(mut self, content_ref: impl Into<String>) -> Self {
        self.content_ref = content_ref.into();
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable client-side throttling.
    #[must_use]
    pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = Some(config);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] for malformed or non-HTTP base URLs and
    /// [`Error::HttpClient`] if the HTTP client cannot be initialized.
    pub fn build(self) -> Result<ContentHostClient> {
        let api_base = parse_base_url(&self.api_base_url)?;
        let raw_base = parse_base_url(&self.raw_base_url)?;

        let http = reqwest::Client::builder()
            .user_agent(format!("skillscout/{}", crate::VERSION))
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        let rate_limiter = self.rate_limit.map(|config| {
            let per_second =
                NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
            let burst = NonZeroU32::new(config.burst_size).unwrap_or(per_second);
            governor::RateLimiter::direct(
                governor::Quota::per_second(per_second).allow_burst(burst),
            )
        });

        Ok(ContentHostClient {
            inner: Arc::new(ClientInner {
                http,
                api_base,
                raw_base,
                token: self.token,
                content_ref: self.content_ref,
                timeout: self.timeout,
                rate_limiter,
            }),
        })
    }
}

fn parse_base_url(url: &str) -> Result<Url> {
    if url.trim().is_empty() {
        return Err(Error::InvalidUrl("base URL cannot be empty".to_string()));
    }

    let parsed: Url = url
        .parse()
        .map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(Error::InvalidUrl(format!(
            "invalid URL scheme '{scheme}', only 'http' and 'https' are supported"
        ))),
    }
}

/// Validate an `owner/name` repository identifier.
pub(crate) fn validate_repo(repo: &str) -> Result<()> {
    let mut parts = repo.split('/');
    let owner = parts.next().unwrap_or_default();
    let name = parts.next().unwrap_or_default();

    if owner.is_empty()
        || name.is_empty()
        || parts.next().is_some()
        || repo.chars().any(char::is_whitespace)
    {
        return Err(Error::validation(format!(
            "repository must be in owner/name format, got '{repo}'"
        )));
    }
    Ok(())
}
