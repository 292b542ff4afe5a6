//! Community-curated list source
//!
//! Parses a curated markdown list of skills (an "awesome list") fetched from
//! the raw-content host. The parsed list is cached inside the source with
//! its own TTL so repeated searches don't refetch it. No install counts.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::{term_fraction, SearchResult, SkillSource};
use crate::config::ServiceConfig;
use crate::error::{Error, Result};

/// How long a fetched list stays fresh.
const LIST_TTL: Duration = Duration::from_secs(3600);

/// Rows that are links to docs rather than skills.
const SKIP_KEYWORDS: [&str; 5] = ["documentation", "official", "anthropic.com", "blog", "guide"];

/// `- [name](https://github.com/owner/repo[/tree/branch/path]) - description`
static ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^-\s+\[([^\]]+)\]\(https://github\.com/([^/\s)]+)/([^/\s)]+?)(?:/tree/[^/\s)]+/([^\s)]+?))?/?\)\s*[-–—]\s*(.+)$",
    )
    .expect("community entry regex compiles")
});

#[derive(Debug, Clone, PartialEq, Eq)]
struct CommunityEntry {
    name: String,
    description: String,
    repo: String,
    /// Skill directory inside the repo; empty when the link points at the
    /// repository root.
    path: String,
}

struct CachedList {
    entries: Vec<CommunityEntry>,
    fetched_at: Instant,
}

/// Skill source backed by a community-curated markdown list.
pub struct CommunityListSource {
    http: reqwest::Client,
    list_url: String,
    /// The list's own repository, filtered out of its results.
    list_repo: Option<String>,
    timeout: Duration,
    enabled: bool,
    cache: RwLock<Option<CachedList>>,
}

impl CommunityListSource {
    /// Source name used in logs, health reports, and source listings.
    pub const NAME: &'static str = "community-list";

    /// Create a source from the service configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("skillscout/{}", crate::VERSION))
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        Ok(Self {
            list_repo: repo_of_raw_url(&config.community_list_url),
            list_url: config.community_list_url.clone(),
            http,
            timeout: config.request_timeout,
            enabled: config.enable_community_list,
            cache: RwLock::new(None),
        })
    }

    async fn fetch_list(&self) -> Result<String> {
        let response = self
            .http
            .get(&self.list_url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::from_transport(&e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::from_status(status, "community list"));
        }

        response
            .text()
            .await
            .map_err(|e| Error::from_transport(&e, self.timeout))
    }

    /// Return the cached entries, refreshing them when stale.
    ///
    /// A refresh failure falls back to the stale copy when one exists.
    async fn entries(&self) -> Result<Vec<CommunityEntry>> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < LIST_TTL {
                    return Ok(cached.entries.clone());
                }
            }
        }

        match self.fetch_list().await {
            Ok(markdown) => {
                let entries = parse_list(&markdown, self.list_repo.as_deref());
                tracing::info!(count = entries.len(), "refreshed community skill list");
                let mut cache = self.cache.write().await;
                *cache = Some(CachedList {
                    entries: entries.clone(),
                    fetched_at: Instant::now(),
                });
                Ok(entries)
            }
            Err(error) => {
                let cache = self.cache.read().await;
                if let Some(cached) = cache.as_ref() {
                    tracing::warn!(%error, "community list refresh failed, serving stale copy");
                    Ok(cached.entries.clone())
                } else {
                    Err(error)
                }
            }
        }
    }
}

#[async_trait]
impl SkillSource for CommunityListSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let entries = self.entries().await?;

        let query_lower = query.to_lowercase();
        let terms: Vec<&str> = query_lower.split_whitespace().collect();

        let mut scored: Vec<(f64, &CommunityEntry)> = entries
            .iter()
            .filter_map(|entry| {
                let score = match_entry(entry, &query_lower, &terms);
                (score > 0.0).then_some((score, entry))
            })
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let results: Vec<SearchResult> = scored
            .into_iter()
            .take(limit)
            .map(|(_, entry)| SearchResult {
                source_repo: entry.repo.clone(),
                path: entry.path.clone(),
                skill_id: entry_skill_id(entry),
                install_count: 0,
                title_hint: Some(entry.name.clone()),
                description_hint: Some(entry.description.clone()),
            })
            .collect();

        tracing::debug!(query, count = results.len(), "community list search complete");
        Ok(results)
    }

    async fn ping(&self) -> bool {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < LIST_TTL {
                    return true;
                }
            }
        }
        self.entries().await.is_ok()
    }
}

/// Score how well an entry matches the query, on a 0–1 scale.
fn match_entry(entry: &CommunityEntry, query_lower: &str, terms: &[&str]) -> f64 {
    let name_lower = entry.name.to_lowercase();
    let desc_lower = entry.description.to_lowercase();

    if query_lower == name_lower {
        return 1.0;
    }
    if name_lower.contains(query_lower) {
        return 0.9;
    }
    if desc_lower.contains(query_lower) {
        return 0.7;
    }

    0.5 * term_fraction(&format!("{name_lower} {desc_lower}"), terms)
}

/// Skill id for an entry: the last path segment when the link points into a
/// skill directory, otherwise the slugified display name.
fn entry_skill_id(entry: &CommunityEntry) -> String {
    match entry.path.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => entry.name.to_lowercase().replace(' ', "-"),
    }
}

fn parse_list(markdown: &str, skip_repo: Option<&str>) -> Vec<CommunityEntry> {
    let mut entries = Vec::new();

    for captures in ENTRY.captures_iter(markdown) {
        let name = captures[1].trim().to_string();
        let owner = captures[2].trim();
        let repo_name = captures[3].trim();
        let path = captures
            .get(4)
            .map_or(String::new(), |m| m.as_str().trim_matches('/').to_string());
        let mut description = captures[5].trim().to_string();

        // Drop trailing attribution like "*By someone*".
        if let Some(idx) = description.find("*By") {
            description = description[..idx].trim().trim_end_matches('.').to_string();
        }

        let description_lower = description.to_lowercase();
        if SKIP_KEYWORDS.iter().any(|kw| description_lower.contains(kw)) {
            continue;
        }

        let repo = format!("{owner}/{repo_name}");
        if skip_repo.is_some_and(|skip| skip == repo) {
            continue;
        }

        entries.push(CommunityEntry {
            name,
            description,
            repo,
            path,
        });
    }

    entries
}

/// Derive `owner/repo` from a raw-content URL like
/// `https://raw.githubusercontent.com/owner/repo/branch/README.md`.
fn repo_of_raw_url(url: &str) -> Option<String> {
    let rest = url.strip_prefix("https://raw.githubusercontent.com/")?;
    let mut segments = rest.split('/');
    let owner = segments.next()?;
    let repo = segments.next()?;
    (!owner.is_empty() && !repo.is_empty()).then(|| format!("{owner}/{repo}"))
}
