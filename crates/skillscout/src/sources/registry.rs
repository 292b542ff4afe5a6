//! Local registry source
//!
//! Reads a bundled, operator-editable text table with one skill per line:
//!
//! ```text
//! skill-id | owner/repo | path/to/skill | Description
//! ```
//!
//! An empty path means the skill lives at the repository root. Lines
//! starting with `#` and blank lines are skipped; malformed lines are
//! logged and skipped, never fatal.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{term_fraction, SearchResult, SkillSource};
use crate::config::ServiceConfig;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
struct RegistryEntry {
    id: String,
    repo: String,
    path: String,
    description: String,
}

/// Skill source backed by a local registry table.
pub struct LocalRegistrySource {
    path: PathBuf,
    enabled: bool,
    entries: RwLock<Option<Vec<RegistryEntry>>>,
}

impl LocalRegistrySource {
    /// Source name used in logs, health reports, and source listings.
    pub const NAME: &'static str = "local-registry";

    /// Create a source from the service configuration.
    #[must_use]
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            path: config.registry_path.clone(),
            enabled: config.enable_local_registry,
            entries: RwLock::new(None),
        }
    }

    /// Return the parsed table, loading it on first use.
    async fn entries(&self) -> Result<Vec<RegistryEntry>> {
        {
            let entries = self.entries.read().await;
            if let Some(entries) = entries.as_ref() {
                return Ok(entries.clone());
            }
        }

        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            Error::transient(format!("registry table {}: {e}", self.path.display()))
        })?;

        let parsed = parse_table(&content);
        tracing::info!(
            count = parsed.len(),
            path = %self.path.display(),
            "loaded local skill registry"
        );

        let mut entries = self.entries.write().await;
        *entries = Some(parsed.clone());
        Ok(parsed)
    }
}

#[async_trait]
impl SkillSource for LocalRegistrySource {
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

        let mut scored: Vec<(f64, &RegistryEntry)> = entries
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
                title_hint: Some(entry.id.clone()),
                description_hint: Some(entry.description.clone()),
            })
            .collect();

        tracing::debug!(query, count = results.len(), "local registry search complete");
        Ok(results)
    }

    async fn ping(&self) -> bool {
        self.entries().await.is_ok()
    }
}

/// Score how well an entry matches the query, on a 0–1 scale.
fn match_entry(entry: &RegistryEntry, query_lower: &str, terms: &[&str]) -> f64 {
    let id_lower = entry.id.to_lowercase();
    let desc_lower = entry.description.to_lowercase();

    if query_lower == id_lower {
        return 1.0;
    }
    if id_lower.contains(query_lower) {
        return 0.9;
    }
    if desc_lower.contains(query_lower) {
        return 0.7;
    }

    0.3 * term_fraction(&format!("{id_lower} {desc_lower}"), terms)
}

/// Skill id for fetching: the last path segment when a path is given (the
/// directory name is what the content host knows), otherwise the table id.
fn entry_skill_id(entry: &RegistryEntry) -> String {
    match entry.path.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => entry.id.clone(),
    }
}

fn parse_table(content: &str) -> Vec<RegistryEntry> {
    let mut entries = Vec::new();

    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('|').map(str::trim).collect();
        let &[id, repo, path, description] = fields.as_slice() else {
            tracing::warn!(line = number + 1, "skipping malformed registry line");
            continue;
        };

        if id.is_empty() || !repo.contains('/') {
            tracing::warn!(line = number + 1, "skipping registry line without id or repo");
            continue;
        }

        entries.push(RegistryEntry {
            id: id.to_string(),
            repo: repo.to_string(),
            path: path.trim_matches('/').to_string(),
            description: description.to_string(),
        });
    }

    entries
}
