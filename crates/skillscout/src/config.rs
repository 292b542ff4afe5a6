//! Configuration for the skillscout pipeline

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

/// Default marketplace base URL (search API and skill pages).
pub const DEFAULT_MARKETPLACE_BASE_URL: &str = "https://skills.sh";

/// Default content-host API base URL (directory listings).
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Default raw-content base URL (file fetches).
pub const DEFAULT_RAW_BASE_URL: &str = "https://raw.githubusercontent.com";

/// Default community-curated skill list.
pub const DEFAULT_COMMUNITY_LIST_URL: &str =
    "https://raw.githubusercontent.com/ComposioHQ/awesome-claude-skills/master/README.md";

/// Configuration for the search service and its collaborators.
///
/// All values have working defaults; construct with `ServiceConfig::default()`
/// and override with the `with_*` methods.
///
/// # Example
///
/// ```rust
/// use skillscout::ServiceConfig;
/// use std::time::Duration;
///
/// let config = ServiceConfig::default()
///     .with_content_host_token("ghp_example")
///     .with_cache_ttl(Duration::from_secs(3600))
///     .with_community_list(false);
/// ```
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Bearer token for the content host.
    ///
    /// Optional: without it the host's unauthenticated rate ceiling applies
    /// (~60 requests/hour on GitHub vs ~5000/hour authenticated).
    pub content_host_token: Option<SecretString>,

    /// Time-to-live for cached content and search responses.
    pub cache_ttl: Duration,

    /// Independent timeout for each outbound network call.
    pub request_timeout: Duration,

    /// Git ref used when fetching raw content. `HEAD` resolves to the
    /// repository's default branch on GitHub.
    pub content_ref: String,

    /// Enable the marketplace source.
    pub enable_marketplace: bool,

    /// Enable the community-curated list source.
    pub enable_community_list: bool,

    /// Enable the local registry source.
    pub enable_local_registry: bool,

    /// Path to the local registry table.
    pub registry_path: PathBuf,

    /// Marketplace base URL (API and skill pages). Overridable for tests.
    pub marketplace_base_url: String,

    /// Content-host API base URL (directory listings). Overridable for tests.
    pub api_base_url: String,

    /// Raw-content base URL (file fetches). Overridable for tests.
    pub raw_base_url: String,

    /// Community list URL. Overridable for tests.
    pub community_list_url: String,

    /// Optional client-side throttle on content-host calls.
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            content_host_token: None,
            cache_ttl: Duration::from_secs(86_400), // 24 hours
            request_timeout: Duration::from_secs(10),
            content_ref: "HEAD".to_string(),
            enable_marketplace: true,
            enable_community_list: true,
            enable_local_registry: true,
            registry_path: PathBuf::from("registry/SKILLS.md"),
            marketplace_base_url: DEFAULT_MARKETPLACE_BASE_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            raw_base_url: DEFAULT_RAW_BASE_URL.to_string(),
            community_list_url: DEFAULT_COMMUNITY_LIST_URL.to_string(),
            rate_limit: None,
        }
    }
}

impl ServiceConfig {
    /// Set the content-host bearer token.
    pub fn with_content_host_token(mut self, token: impl Into<String>) -> Self {
        self.content_host_token = Some(SecretString::new(token.into().into_boxed_str()));
        self
    }

    /// Set the cache time-to-live.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Enable or disable the marketplace source.
    #[must_use]
    pub fn with_marketplace(mut self, enabled: bool) -> Self {
        self.enable_marketplace = enabled;
        self
    }

    /// Enable or disable the community-list source.
    #[must_use]
    pub fn with_community_list(mut self, enabled: bool) -> Self {
        self.enable_community_list = enabled;
        self
    }

    /// Enable or disable the local registry source.
    #[must_use]
    pub fn with_local_registry(mut self, enabled: bool) -> Self {
        self.enable_local_registry = enabled;
        self
    }

    /// Set the local registry table path.
    pub fn with_registry_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.registry_path = path.into();
        self
    }

    /// Override the marketplace base URL.
    pub fn with_marketplace_base_url(mut self, url: impl Into<String>) -> Self {
        self.marketplace_base_url = url.into();
        self
    }

    /// Override the content-host API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Override the raw-content base URL.
    pub fn with_raw_base_url(mut self, url: impl Into<String>) -> Self {
        self.raw_base_url = url.into();
        self
    }

    /// Override the community list URL.
    pub fn with_community_list_url(mut self, url: impl Into<String>) -> Self {
        self.community_list_url = url.into();
        self
    }

    /// Set the git ref used for raw-content fetches.
    pub fn with_content_ref(mut self, content_ref: impl Into<String>) -> Self {
        self.content_ref = content_ref.into();
        self
    }

    /// Enable client-side throttling of content-host calls.
    #[must_use]
    pub fn with_rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = Some(config);
        self
    }

    /// Load configuration overrides from the environment.
    ///
    /// Reads `.env` if present, then:
    /// - `SKILLSCOUT_GITHUB_TOKEN` or `GITHUB_TOKEN` — content-host token
    /// - `SKILLSCOUT_CACHE_TTL_SECS` — cache TTL in seconds
    /// - `SKILLSCOUT_REGISTRY_PATH` — local registry table path
    /// - `SKILLSCOUT_DISABLE_COMMUNITY_LIST` — set to `1`/`true` to disable
    ///
    /// Unset or unparseable variables leave the defaults in place.
    #[cfg(feature = "env")]
    #[must_use]
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(token) = std::env::var("SKILLSCOUT_GITHUB_TOKEN")
            .or_else(|_| std::env::var("GITHUB_TOKEN"))
        {
            if !token.trim().is_empty() {
                config = config.with_content_host_token(token);
            }
        }

        if let Some(secs) = std::env::var("SKILLSCOUT_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.cache_ttl = Duration::from_secs(secs);
        }

        if let Ok(path) = std::env::var("SKILLSCOUT_REGISTRY_PATH") {
            config.registry_path = PathBuf::from(path);
        }

        if let Ok(flag) = std::env::var("SKILLSCOUT_DISABLE_COMMUNITY_LIST") {
            if flag == "1" || flag.eq_ignore_ascii_case("true") {
                config.enable_community_list = false;
            }
        }

        config
    }
}

/// Client-side rate limiting for the content host.
///
/// Uses a token-bucket limiter so bursts up to `burst_size` pass through
/// while sustained throughput stays at `requests_per_second`.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Sustained requests per second.
    pub requests_per_second: u32,

    /// Burst capacity.
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10,
            burst_size: 20,
        }
    }
}
