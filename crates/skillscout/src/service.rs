//! Search service orchestrating sources, fetching, caching, and ranking
//!
//! Per-request pipeline: fan out to every enabled source concurrently,
//! merge and deduplicate, resolve content and references through the cache,
//! rank, then truncate. Failures are handled per item; a single source or
//! fetch failure never fails the request.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use skillscout_manifest::{first_heading, parse_skill_document};

use crate::cache::{keys, CacheBackend, CacheStats, InMemoryCache};
use crate::client::{validate_repo, ContentHostClient, DirEntry};
use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::models::{
    HealthReport, Reference, SearchResponse, Skill, SkillRefs, SourceHealth, SourceInfo,
};
use crate::ranking::{Ranker, RelevanceRanker};
use crate::sources::{
    CommunityListSource, LocalRegistrySource, MarketplaceSource, SearchResult, SkillSource,
};

/// Smallest accepted `limit`.
pub const MIN_LIMIT: usize = 1;

/// Largest accepted `limit`.
pub const MAX_LIMIT: usize = 50;

/// Default result limit.
pub const DEFAULT_LIMIT: usize = 10;

/// The skill document filename inside a skill directory.
const SKILL_FILE: &str = "SKILL.md";

/// Directories searched for reference files below the skill path.
const REFERENCE_DIRS: [&str; 2] = ["references", "resources"];

/// Options for a search request.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    /// Maximum number of results, 1..=50.
    pub limit: usize,

    /// Fetch full skill content for each result.
    pub include_content: bool,

    /// Fetch reference files for each result.
    pub include_references: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            include_content: true,
            include_references: false,
        }
    }
}

/// Main service for searching and retrieving agent skills.
///
/// All collaborators are pluggable: sources (their order is the dedup
/// priority), the cache backend, and the ranker are injected at
/// construction time via [`SkillSearchService::builder`].
///
/// # Example
///
/// ```rust,no_run
/// use skillscout::{SearchOptions, ServiceConfig, SkillSearchService};
///
/// # async fn example() -> skillscout::Result<()> {
/// let service = SkillSearchService::new(ServiceConfig::default())?;
///
/// let response = service.search("react performance", SearchOptions::default()).await?;
/// for skill in &response.skills {
///     println!("{} ({:.1}): {:?}", skill.title, skill.relevance_score, skill.description);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SkillSearchService {
    sources: Vec<Arc<dyn SkillSource>>,
    client: ContentHostClient,
    cache: Arc<dyn CacheBackend>,
    ranker: Arc<dyn Ranker>,
    cache_ttl: Duration,
    marketplace_base: String,
}

impl SkillSearchService {
    /// Create a service with default collaborators from a configuration.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Create a builder for injecting custom collaborators.
    #[must_use]
    pub fn builder() -> SkillSearchServiceBuilder {
        SkillSearchServiceBuilder::default()
    }

    /// Search for skills matching a query across all enabled sources.
    ///
    /// Results are deduplicated across sources (earlier sources win),
    /// assembled best-effort, ranked, and truncated to `limit` only after
    /// ranking. Identical requests within the cache TTL are served from the
    /// whole-response cache without touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty query or a limit outside
    /// 1..=50. Upstream failures never produce an error: a request where
    /// every source failed yields an empty response.
    pub async fn search(&self, query: &str, options: SearchOptions) -> Result<SearchResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::validation("query must not be empty"));
        }
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&options.limit) {
            return Err(Error::validation(format!(
                "limit must be between {MIN_LIMIT} and {MAX_LIMIT}, got {}",
                options.limit
            )));
        }

        let cache_key = keys::search(
            query,
            options.limit,
            options.include_content,
            options.include_references,
        );
        if let Some(value) = self.cache.get(&cache_key).await {
            match serde_json::from_value::<SearchResponse>(value) {
                Ok(response) => {
                    tracing::debug!(query, "serving cached search response");
                    return Ok(response);
                }
                Err(error) => {
                    tracing::warn!(%error, "discarding undecodable cached search response");
                }
            }
        }

        let merged = self.fan_out(query, options.limit).await;

        let skills = join_all(merged.iter().map(|result| {
            self.assemble_skill(result, options.include_content, options.include_references)
        }))
        .await;

        let mut ranked = self
            .ranker
            .rank(skills, query, options.include_references);
        // Truncation happens after ranking so a late-arriving, higher-scoring
        // result is never pushed out by arrival order.
        ranked.truncate(options.limit);

        let response = SearchResponse {
            query: query.to_string(),
            count: ranked.len(),
            skills: ranked,
        };

        // Empty responses are not cached: "nothing found" and "everything
        // down" look the same here, and pinning an outage for a full TTL
        // would hide recovery.
        if response.count > 0 {
            match serde_json::to_value(&response) {
                Ok(value) => self.cache.set(&cache_key, value, self.cache_ttl).await,
                Err(error) => {
                    tracing::warn!(%error, "failed to serialize search response for caching");
                }
            }
        }

        Ok(response)
    }

    /// Get a specific skill by repository and id.
    ///
    /// The skill document is probed at the conventional locations
    /// (`skills/{id}`, `.claude/skills/{id}`, `{id}`, repository root).
    /// Returns `Ok(None)` when no location has it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a malformed repository identifier
    /// or an empty skill id.
    pub async fn get(
        &self,
        source: &str,
        skill_id: &str,
        include_references: bool,
    ) -> Result<Option<Skill>> {
        validate_repo(source)?;
        let skill_id = skill_id.trim();
        if skill_id.is_empty() {
            return Err(Error::validation("skill id must not be empty"));
        }

        for path in probe_paths(skill_id) {
            let doc_path = skill_document_path(&path);
            match self.cached_fetch_file(source, &doc_path).await {
                // The probe populates the cache, so assembly below hits it.
                Ok(_) => {
                    let result = SearchResult {
                        source_repo: source.to_string(),
                        path,
                        skill_id: skill_id.to_string(),
                        install_count: 0,
                        title_hint: None,
                        description_hint: None,
                    };
                    let skill = self.assemble_skill(&result, true, include_references).await;
                    return Ok(Some(skill));
                }
                Err(error) if error.is_not_found() => continue,
                Err(error) => {
                    tracing::warn!(source, skill_id, %error, "skill lookup failed");
                    return Ok(None);
                }
            }
        }

        Ok(None)
    }

    /// Best-effort health report across the enabled sources.
    ///
    /// Probes run concurrently. An unreachable source degrades the report
    /// but never errors; search keeps working without it.
    pub async fn health(&self) -> HealthReport {
        let probes = join_all(
            self.sources
                .iter()
                .filter(|source| source.enabled())
                .map(|source| async move {
                    SourceHealth {
                        name: source.name().to_string(),
                        reachable: source.ping().await,
                    }
                }),
        )
        .await;

        HealthReport::from_probes(probes)
    }

    /// Cache hit/miss counters.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// The configured sources, in dedup-priority order.
    #[must_use]
    pub fn sources(&self) -> Vec<SourceInfo> {
        self.sources
            .iter()
            .map(|source| SourceInfo {
                name: source.name().to_string(),
                enabled: source.enabled(),
            })
            .collect()
    }

    /// Query every enabled source concurrently and merge the results.
    ///
    /// The source list order is the dedup priority: batches are merged in
    /// that order and the first copy of a key wins, so the outcome never
    /// depends on arrival timing. Ordering within one source's batch is
    /// preserved. No truncation happens here.
    async fn fan_out(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        let batches = join_all(
            self.sources
                .iter()
                .filter(|source| source.enabled())
                .map(|source| async move {
                    (source.name().to_string(), source.search(query, limit).await)
                }),
        )
        .await;

        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        for (name, batch) in batches {
            match batch {
                Ok(results) => {
                    for result in results {
                        if seen.insert(result.dedup_key()) {
                            merged.push(result);
                        }
                    }
                }
                Err(error) => {
                    tracing::warn!(source = %name, %error, "source search failed, contributing zero results");
                }
            }
        }

        tracing::debug!(query, count = merged.len(), "merged deduplicated results");
        merged
    }

    /// Build a [`Skill`] from a search result, optionally resolving content
    /// and references through the cache.
    ///
    /// Every failure is converted into a partial-result marker: a fetch or
    /// parse problem sets `fetch_error` and leaves `content` absent, and a
    /// failed reference is simply omitted. This method never errors.
    async fn assemble_skill(
        &self,
        result: &SearchResult,
        include_content: bool,
        include_references: bool,
    ) -> Skill {
        let path = result.path.trim_matches('/').to_string();

        let mut skill = Skill {
            id: result.skill_id.clone(),
            title: result
                .title_hint
                .clone()
                .unwrap_or_else(|| result.skill_id.clone()),
            description: result.description_hint.clone(),
            version: None,
            allowed_tools: None,
            source: result.source_repo.clone(),
            refs: SkillRefs {
                marketplace: format!(
                    "{}/{}/{}",
                    self.marketplace_base, result.source_repo, result.skill_id
                ),
                source: self.client.source_tree_url(&result.source_repo, &path),
                raw: None,
            },
            install_count: result.install_count,
            relevance_score: 0.0,
            content: None,
            metadata: BTreeMap::new(),
            references: Vec::new(),
            fetch_error: None,
        };

        if !include_content {
            return skill;
        }

        let doc_path = skill_document_path(&path);
        match self.cached_fetch_file(&result.source_repo, &doc_path).await {
            Ok(raw) => {
                skill.refs.raw = Some(self.client.raw_content_url(&result.source_repo, &doc_path));

                match parse_skill_document(&raw) {
                    Ok(parsed) => {
                        if let Some(name) = &parsed.manifest.name {
                            skill.title = name.clone();
                        } else if result.title_hint.is_none() {
                            if let Some(heading) = first_heading(&parsed.body) {
                                skill.title = heading;
                            }
                        }
                        if parsed.manifest.description.is_some() {
                            skill.description = parsed.manifest.description.clone();
                        }
                        skill.version = parsed.manifest.version.clone();
                        skill.allowed_tools = parsed.manifest.allowed_tools.clone();
                        skill.metadata = parsed.manifest.metadata.clone();
                        skill.content = Some(parsed.body);
                    }
                    Err(error) => {
                        tracing::warn!(skill = %skill.id, %error, "unparseable skill document");
                        skill.fetch_error = Some(format!("parse error: {error}"));
                    }
                }

                if include_references {
                    skill.references = self
                        .fetch_references(&result.source_repo, &path)
                        .await;
                }
            }
            Err(error) => {
                tracing::warn!(skill = %skill.id, source = %result.source_repo, %error, "content fetch failed");
                skill.fetch_error = Some(error.to_string());
            }
        }

        skill
    }

    /// Fetch a file through the cache. Only successes are memoized, so a
    /// transient outage never poisons the cache.
    async fn cached_fetch_file(&self, repo: &str, path: &str) -> Result<String> {
        let key = keys::skill_content(repo, path);
        if let Some(value) = self.cache.get(&key).await {
            if let Some(content) = value.as_str() {
                return Ok(content.to_string());
            }
        }

        let content = self.client.fetch_file(repo, path).await?;
        self.cache
            .set(
                &key,
                serde_json::Value::String(content.clone()),
                self.cache_ttl,
            )
            .await;
        Ok(content)
    }

    /// List a directory through the cache. Only successes are memoized.
    async fn cached_list_directory(&self, repo: &str, path: &str) -> Result<Vec<DirEntry>> {
        let key = keys::listing(repo, path);
        if let Some(value) = self.cache.get(&key).await {
            if let Ok(entries) = serde_json::from_value::<Vec<DirEntry>>(value) {
                return Ok(entries);
            }
        }

        let entries = self.client.list_directory(repo, path).await?;
        if let Ok(value) = serde_json::to_value(&entries) {
            self.cache.set(&key, value, self.cache_ttl).await;
        }
        Ok(entries)
    }

    /// Discover and fetch reference files below a skill path.
    ///
    /// Looks for markdown files under the conventional reference
    /// directories. Every listing and fetch is independent and best-effort:
    /// failures shrink the list, never error the request.
    async fn fetch_references(&self, repo: &str, skill_path: &str) -> Vec<Reference> {
        let mut entries: Vec<DirEntry> = Vec::new();

        for dir in REFERENCE_DIRS {
            let dir_path = if skill_path.is_empty() {
                dir.to_string()
            } else {
                format!("{skill_path}/{dir}")
            };

            match self.cached_list_directory(repo, &dir_path).await {
                Ok(listing) => entries.extend(
                    listing
                        .into_iter()
                        .filter(|entry| entry.is_file() && entry.path.ends_with(".md")),
                ),
                Err(error) if error.is_not_found() => {}
                Err(error) => {
                    tracing::debug!(repo, dir = %dir_path, %error, "reference listing failed");
                }
            }
        }

        if entries.is_empty() {
            return Vec::new();
        }

        let fetched = join_all(entries.into_iter().map(|entry| async move {
            match self.cached_fetch_file(repo, &entry.path).await {
                Ok(content) => Some(Reference {
                    name: entry.name,
                    raw_url: self.client.raw_content_url(repo, &entry.path),
                    path: entry.path,
                    content,
                }),
                Err(error) => {
                    tracing::debug!(repo, path = %entry.path, %error, "reference fetch failed, omitting");
                    None
                }
            }
        }))
        .await;

        fetched.into_iter().flatten().collect()
    }
}

/// The skill document path for a skill directory (empty = repository root).
fn skill_document_path(skill_path: &str) -> String {
    if skill_path.is_empty() {
        SKILL_FILE.to_string()
    } else {
        format!("{skill_path}/{SKILL_FILE}")
    }
}

/// Conventional locations probed by [`SkillSearchService::get`], in order.
fn probe_paths(skill_id: &str) -> [String; 4] {
    [
        format!("skills/{skill_id}"),
        format!(".claude/skills/{skill_id}"),
        skill_id.to_string(),
        String::new(),
    ]
}

/// Builder for [`SkillSearchService`].
///
/// Sources are added in dedup-priority order; when none are added the
/// default trio (marketplace, community list, local registry) is used.
#[derive(Default)]
pub struct SkillSearchServiceBuilder {
    config: ServiceConfig,
    client: Option<ContentHostClient>,
    cache: Option<Arc<dyn CacheBackend>>,
    ranker: Option<Arc<dyn Ranker>>,
    sources: Vec<Arc<dyn SkillSource>>,
}

impl SkillSearchServiceBuilder {
    /// Set the service configuration.
    #[must_use]
    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Inject a content-host client.
    #[must_use]
    pub fn client(mut self, client: ContentHostClient) -> Self {
        self.client = Some(client);
        self
    }

    /// Inject a cache backend.
    #[must_use]
    pub fn cache(mut self, cache: Arc<dyn CacheBackend>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Inject a ranker.
    #[must_use]
    pub fn ranker(mut self, ranker: Arc<dyn Ranker>) -> Self {
        self.ranker = Some(ranker);
        self
    }

    /// Append a source. The order of calls defines the dedup priority.
    #[must_use]
    pub fn source(mut self, source: Arc<dyn SkillSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Build the service, filling in defaults for anything not injected.
    ///
    /// # Errors
    ///
    /// Returns an error if the content-host client or a default source
    /// cannot be constructed (invalid base URLs).
    pub fn build(self) -> Result<SkillSearchService> {
        let client = match self.client {
            Some(client) => client,
            None => ContentHostClient::from_config(&self.config)?,
        };

        let sources = if self.sources.is_empty() {
            default_sources(&self.config)?
        } else {
            self.sources
        };

        let enabled: Vec<&str> = sources
            .iter()
            .filter(|s| s.enabled())
            .map(|s| s.name())
            .collect();
        tracing::info!(sources = ?enabled, "skill search service ready");

        Ok(SkillSearchService {
            client,
            cache: self
                .cache
                .unwrap_or_else(|| Arc::new(InMemoryCache::new())),
            ranker: self.ranker.unwrap_or_else(|| Arc::new(RelevanceRanker)),
            sources,
            cache_ttl: self.config.cache_ttl,
            marketplace_base: self
                .config
                .marketplace_base_url
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

/// The default source set, in dedup-priority order: marketplace first (it
/// has install counts and the cleanest metadata), then the community list,
/// then the local registry.
fn default_sources(config: &ServiceConfig) -> Result<Vec<Arc<dyn SkillSource>>> {
    Ok(vec![
        Arc::new(MarketplaceSource::from_config(config)?),
        Arc::new(CommunityListSource::from_config(config)?),
        Arc::new(LocalRegistrySource::from_config(config)),
    ])
}
