//! Ranking strategies for assembled skills
//!
//! A ranker scores every skill in [0, 100] and returns the list sorted
//! descending. Scoring is pure local computation; it never suspends.

use crate::models::Skill;

pub mod relevance;

pub use relevance::RelevanceRanker;

/// A pluggable ranking strategy.
///
/// The returned order is exactly the order served to the caller; the
/// orchestrator never re-sorts. Implementations must be stable on ties so
/// equal-scoring skills keep their merge order.
pub trait Ranker: Send + Sync {
    /// Score and sort skills for a query.
    ///
    /// `include_references` reports whether the caller asked for reference
    /// files; rankers that reward references must not award the bonus when
    /// references were never requested.
    fn rank(&self, skills: Vec<Skill>, query: &str, include_references: bool) -> Vec<Skill>;
}
