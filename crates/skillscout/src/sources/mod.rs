//! Skill discovery sources
//!
//! Every registry the pipeline can search implements [`SkillSource`]. The
//! orchestrator holds sources in a fixed order that doubles as the dedup
//! priority: when two sources report the same skill, the earlier source's
//! copy wins.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod community;
pub mod marketplace;
pub mod registry;

pub use community::CommunityListSource;
pub use marketplace::MarketplaceSource;
pub use registry::LocalRegistrySource;

/// A skill reference produced by a source.
///
/// Carries enough to locate the skill's content plus whatever ranking signal
/// and display hints the source natively has. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    /// Source repository in `owner/repo` form.
    pub source_repo: String,

    /// Repository-relative path of the skill directory; empty means the
    /// repository root.
    pub path: String,

    /// Skill identifier, unique within `(source_repo, path)`.
    pub skill_id: String,

    /// Source-native ranking signal (install count); 0 when the source has
    /// no signal.
    pub install_count: u64,

    /// Display-name hint, overwritten once full content is parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_hint: Option<String>,

    /// Description hint, overwritten once full content is parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_hint: Option<String>,
}

impl SearchResult {
    /// Deduplication key: `(repo, normalized path, id)`.
    ///
    /// The path is normalized by trimming slashes; everything else is
    /// case-sensitive as supplied by the source.
    #[must_use]
    pub fn dedup_key(&self) -> (String, String, String) {
        (
            self.source_repo.clone(),
            self.path.trim_matches('/').to_string(),
            self.skill_id.clone(),
        )
    }
}

/// A pluggable provider of skill search results.
///
/// Sources must tolerate total upstream unavailability: a failing source
/// returns an error that the orchestrator catches, logs, and treats as zero
/// results. A source never takes down the whole search.
#[async_trait]
pub trait SkillSource: Send + Sync {
    /// Human-readable source name.
    fn name(&self) -> &str;

    /// Whether this source is currently enabled.
    fn enabled(&self) -> bool {
        true
    }

    /// Search for skills matching a query.
    ///
    /// `query` is non-empty after trimming and `limit >= 1`; the
    /// orchestrator validates both before fanning out. Results preserve
    /// this source's own ordering.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>>;

    /// Best-effort reachability probe for health reporting.
    async fn ping(&self) -> bool {
        true
    }
}

/// Fraction of query terms found in a haystack, for the keyword-matching
/// sources. Both sides are expected to be lowercased already.
pub(crate) fn term_fraction(haystack: &str, terms: &[&str]) -> f64 {
    if terms.is_empty() {
        return 0.0;
    }
    let matched = terms.iter().filter(|t| haystack.contains(*t)).count();
    matched as f64 / terms.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_key_normalizes_path() {
        let result = SearchResult {
            source_repo: "owner/repo".to_string(),
            path: "/skills/pdf/".to_string(),
            skill_id: "pdf".to_string(),
            install_count: 0,
            title_hint: None,
            description_hint: None,
        };

        let (repo, path, id) = result.dedup_key();
        assert_eq!(repo, "owner/repo");
        assert_eq!(path, "skills/pdf");
        assert_eq!(id, "pdf");
    }

    #[test]
    fn test_dedup_key_is_case_sensitive() {
        let lower = SearchResult {
            source_repo: "owner/repo".to_string(),
            path: String::new(),
            skill_id: "pdf".to_string(),
            install_count: 0,
            title_hint: None,
            description_hint: None,
        };
        let mut upper = lower.clone();
        upper.skill_id = "PDF".to_string();

        assert_ne!(lower.dedup_key(), upper.dedup_key());
    }

    #[test]
    fn test_term_fraction() {
        assert_eq!(term_fraction("react performance tips", &["react"]), 1.0);
        assert_eq!(term_fraction("react performance tips", &["react", "vue"]), 0.5);
        assert_eq!(term_fraction("react", &[]), 0.0);
    }
}
