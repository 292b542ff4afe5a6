//! # skillscout
//!
//! Discover, aggregate, and rank agent skills (SKILL.md documents) across
//! heterogeneous registries: a marketplace API, a community-curated list,
//! and a local operator-maintained registry.
//!
//! The crate is the pipeline behind a skill search endpoint: it fans a
//! query out to every enabled source concurrently, merges and deduplicates
//! the results, resolves full content and optional reference files from the
//! source-control host through a pluggable TTL cache, scores every skill
//! with a deterministic multi-signal formula, and returns the ranked list.
//! Outer layers (REST server, MCP tool server) wrap [`SkillSearchService`].
//!
//! Failures degrade, they don't propagate: a dead source contributes zero
//! results, a failed content fetch leaves the skill in the response with
//! `fetch_error` set, and a failed reference fetch just shrinks the
//! reference list.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use skillscout::{SearchOptions, ServiceConfig, SkillSearchService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServiceConfig::default()
//!         .with_content_host_token("ghp_...");
//!     let service = SkillSearchService::new(config)?;
//!
//!     let response = service
//!         .search("react performance", SearchOptions::default())
//!         .await?;
//!
//!     for skill in &response.skills {
//!         println!("{:>5.1}  {}", skill.relevance_score, skill.title);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-export commonly used types
pub use cache::{CacheBackend, CacheStats, InMemoryCache};
pub use client::{ContentHostClient, DirEntry};
pub use config::{RateLimitConfig, ServiceConfig};
pub use error::{Error, Result};
pub use models::{
    HealthReport, HealthStatus, Reference, SearchResponse, Skill, SkillRefs, SourceHealth,
    SourceInfo,
};
pub use ranking::{Ranker, RelevanceRanker};
pub use service::{SearchOptions, SkillSearchService, SkillSearchServiceBuilder};
pub use sources::{SearchResult, SkillSource};

// Module declarations
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod ranking;
pub mod service;
pub mod sources;

// Re-export key dependencies for convenience
pub use async_trait::async_trait;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use skillscout::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        CacheBackend, Error, InMemoryCache, Ranker, RelevanceRanker, Result, SearchOptions,
        SearchResponse, SearchResult, ServiceConfig, Skill, SkillSearchService, SkillSource,
    };
}

/// Crate version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }
}
