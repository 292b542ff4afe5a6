//! Marketplace source — the primary skill registry
//!
//! Queries the marketplace search API. This is the only source with install
//! counts, which is why it sits first in the dedup priority order.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{SearchResult, SkillSource};
use crate::config::ServiceConfig;
use crate::error::{Error, Result};

/// Search endpoint path on the marketplace host.
const SEARCH_ENDPOINT: &str = "/api/search";

/// Skill source backed by the marketplace search API.
pub struct MarketplaceSource {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    enabled: bool,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    skills: Vec<ApiSkill>,
}

#[derive(Debug, Deserialize)]
struct ApiSkill {
    #[serde(default)]
    id: String,
    name: Option<String>,
    #[serde(rename = "topSource", default)]
    top_source: String,
    #[serde(default)]
    installs: u64,
}

impl MarketplaceSource {
    /// Source name used in logs, health reports, and source listings.
    pub const NAME: &'static str = "marketplace";

    /// Create a source from the service configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("skillscout/{}", crate::VERSION))
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.marketplace_base_url.trim_end_matches('/').to_string(),
            timeout: config.request_timeout,
            enabled: config.enable_marketplace,
        })
    }
}

#[async_trait]
impl SkillSource for MarketplaceSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let url = format!("{}{SEARCH_ENDPOINT}", self.base_url);

        let response = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .query(&[("q", query), ("limit", &limit.to_string())])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::from_transport(&e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::from_status(status, "marketplace search"));
        }

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| Error::from_transport(&e, self.timeout))?;

        let results: Vec<SearchResult> = body
            .skills
            .into_iter()
            .filter(|skill| {
                if skill.id.is_empty() || !skill.top_source.contains('/') {
                    tracing::debug!(id = %skill.id, "skipping marketplace entry without id or repo");
                    return false;
                }
                true
            })
            .map(|skill| SearchResult {
                // The API reports only the repository; skills in marketplace
                // repos live under the conventional skills/ directory.
                path: format!("skills/{}", skill.id),
                source_repo: skill.top_source,
                title_hint: skill.name,
                description_hint: None,
                install_count: skill.installs,
                skill_id: skill.id,
            })
            .collect();

        tracing::debug!(query, count = results.len(), "marketplace search complete");
        Ok(results)
    }

    async fn ping(&self) -> bool {
        let url = format!("{}{SEARCH_ENDPOINT}", self.base_url);
        match self
            .http
            .get(&url)
            .timeout(self.timeout)
            .query(&[("q", "ping"), ("limit", "1")])
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
