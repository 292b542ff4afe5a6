//! Response models for skill search
//!
//! These are the structures handed to callers (and to the outer REST/MCP
//! layers that wrap this crate). All of them serialize cleanly so whole
//! search responses can round-trip through the cache.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reference URLs for viewing a skill.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillRefs {
    /// Marketplace page URL.
    pub marketplace: String,

    /// Source-host tree URL (best guess from the skill path).
    pub source: String,

    /// Direct raw-content URL, when the content was successfully fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// A reference/resource file bundled alongside a skill's main document.
///
/// Only successfully fetched references appear in a response; a reference
/// whose fetch failed is omitted rather than carried with an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reference {
    /// Filename.
    pub name: String,

    /// Repository-relative path.
    pub path: String,

    /// Full markdown content.
    pub content: String,

    /// Direct raw-content URL.
    pub raw_url: String,
}

/// A complete agent skill with parsed metadata and content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Skill {
    /// Skill identifier/slug.
    pub id: String,

    /// Display name, falling back to the first body heading or the id.
    pub title: String,

    /// What the skill does and when to use it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Semantic version, if declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Tools the skill is allowed to use, in declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_tools: Option<Vec<String>>,

    /// Source repository in `owner/repo` form.
    pub source: String,

    /// Reference URLs for viewing the skill.
    pub refs: SkillRefs,

    /// Install count from the marketplace; 0 when the source has no signal.
    #[serde(default)]
    pub install_count: u64,

    /// Relevance score in [0, 100], set by the ranker on every search
    /// response.
    #[serde(default)]
    pub relevance_score: f64,

    /// Skill instructions in markdown (frontmatter removed). Absent when
    /// the fetch failed or content was not requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Additional frontmatter fields not otherwise modeled.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,

    /// Reference files, populated only when requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,

    /// Error description when the content fetch failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
}

impl Skill {
    /// True if skill content was successfully fetched.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// True if the skill has at least one fetched reference file.
    #[must_use]
    pub fn has_references(&self) -> bool {
        !self.references.is_empty()
    }
}

/// Response for a skill search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    /// The query that was executed.
    pub query: String,

    /// Number of skills returned.
    pub count: usize,

    /// Matching skills, sorted by `relevance_score` descending.
    pub skills: Vec<Skill>,
}

/// Information about one configured source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceInfo {
    /// Source name.
    pub name: String,

    /// Whether the source is enabled.
    pub enabled: bool,
}

/// Reachability of one enabled source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceHealth {
    /// Source name.
    pub name: String,

    /// Whether the source answered its probe.
    pub reachable: bool,
}

/// Overall service health.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Every enabled source answered its probe.
    Healthy,

    /// At least one enabled source is unreachable. Search still works;
    /// the affected source contributes zero results.
    Degraded,
}

/// Health report across the configured sources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthReport {
    /// Overall status.
    pub status: HealthStatus,

    /// Per-source probe results (enabled sources only).
    pub sources: Vec<SourceHealth>,
}

impl HealthReport {
    /// Build a report from per-source probe results.
    #[must_use]
    pub fn from_probes(sources: Vec<SourceHealth>) -> Self {
        let status = if sources.iter().all(|s| s.reachable) {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        };
        Self { status, sources }
    }
}
