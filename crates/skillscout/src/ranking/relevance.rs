//! Default relevance ranker combining multiple signals

use super::Ranker;
use crate::models::Skill;

/// Points for having fetched, non-empty content.
const CONTENT_POINTS: f64 = 40.0;

/// Maximum points for the query match against the skill id.
const QUERY_MATCH_POINTS: f64 = 30.0;

/// Points for having at least one fetched reference, when references were
/// requested.
const REFERENCE_POINTS: f64 = 15.0;

/// Maximum points for popularity.
const POPULARITY_POINTS: f64 = 15.0;

/// Install count at which the popularity signal saturates.
const POPULARITY_SATURATION: f64 = 10_000.0;

/// Default ranker combining four independent, capped signals:
///
/// - content availability (0 or 40)
/// - query match against the skill id (0–30)
/// - fetched references, only when requested (0 or 15)
/// - log-scaled install count (0–15, saturating at 10k installs)
///
/// The final score is the unweighted sum, bounded to [0, 100], rounded to
/// two decimals. Sorting is stable so ties keep their merge order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceRanker;

impl Ranker for RelevanceRanker {
    fn rank(&self, mut skills: Vec<Skill>, query: &str, include_references: bool) -> Vec<Skill> {
        for skill in &mut skills {
            let content = if skill.has_content() { 1.0 } else { 0.0 };
            let references = if include_references && skill.has_references() {
                1.0
            } else {
                0.0
            };

            let score = content * CONTENT_POINTS
                + query_match(&skill.id, query) * QUERY_MATCH_POINTS
                + references * REFERENCE_POINTS
                + popularity(skill.install_count) * POPULARITY_POINTS;

            skill.relevance_score = (score * 100.0).round() / 100.0;
        }

        // Stable: equal scores keep their merge order.
        skills.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        skills
    }
}

/// How well the skill id matches the query, on a 0–1 scale.
///
/// Both sides are normalized: lowercased and tokenized on non-alphanumeric
/// boundaries, so `gpt-researcher` and `GPT Researcher` compare equal.
///
/// Tiers:
/// - 1.0 — normalized id equals the normalized query
/// - 0.9 — every query token is a substring of the id
/// - 0.85 — every id token appears within the query
/// - 0–0.5 — linear in the fraction of query tokens found in the id
fn query_match(id: &str, query: &str) -> f64 {
    let id_norm = normalize(id);
    let query_norm = normalize(query);

    if query_norm.is_empty() || id_norm.is_empty() {
        return 0.0;
    }

    if id_norm == query_norm {
        return 1.0;
    }

    let query_tokens: Vec<&str> = query_norm.split(' ').collect();
    if query_tokens.iter().all(|t| id_norm.contains(t)) {
        return 0.9;
    }

    if id_norm.split(' ').all(|t| query_norm.contains(t)) {
        return 0.85;
    }

    let matched = query_tokens.iter().filter(|t| id_norm.contains(**t)).count();
    0.5 * matched as f64 / query_tokens.len() as f64
}

/// Install count normalized to a 0–1 scale, log-curved.
///
/// `ln(1 + installs) / ln(1 + 10_000)`, clamped: 0 installs scores 0,
/// ~100 installs half the cap, 10k or more saturates.
fn popularity(install_count: u64) -> f64 {
    if install_count == 0 {
        return 0.0;
    }
    let normalized = (1.0 + install_count as f64).ln() / (1.0 + POPULARITY_SATURATION).ln();
    normalized.min(1.0)
}

/// Lowercase and collapse non-alphanumeric runs to single spaces.
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SkillRefs;
    use rstest::rstest;
    use std::collections::BTreeMap;

    fn skill(id: &str, content: bool, references: bool, installs: u64) -> Skill {
        Skill {
            id: id.to_string(),
            title: id.to_string(),
            description: None,
            version: None,
            allowed_tools: None,
            source: "owner/repo".to_string(),
            refs: SkillRefs {
                marketplace: format!("https://skills.sh/owner/repo/{id}"),
                source: "https://github.com/owner/repo".to_string(),
                raw: None,
            },
            install_count: installs,
            relevance_score: 0.0,
            content: content.then(|| "# Body".to_string()),
            metadata: BTreeMap::new(),
            references: if references {
                vec![crate::models::Reference {
                    name: "guide.md".to_string(),
                    path: "skills/x/references/guide.md".to_string(),
                    content: "ref".to_string(),
                    raw_url: "https://raw.example/guide.md".to_string(),
                }]
            } else {
                Vec::new()
            },
            fetch_error: None,
        }
    }

    #[rstest]
    #[case("gpt-researcher", "gpt-researcher", 1.0)]
    #[case("gpt-researcher", "GPT Researcher", 1.0)]
    #[case("gpt_researcher", "gpt researcher", 1.0)]
    #[case("vercel-react-best-practices", "react best", 0.9)]
    #[case("gpt-researcher", "gpt researcher deep research", 0.85)]
    #[case("react-performance", "react charts", 0.25)]
    #[case("react-performance", "vue charts", 0.0)]
    fn test_query_match_tiers(#[case] id: &str, #[case] query: &str, #[case] expected: f64) {
        assert!((query_match(id, query) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_popularity_anchors() {
        assert_eq!(popularity(0), 0.0);
        // ~half the cap at 100 installs, 3/4 at 1000, saturated at 10k.
        assert!((popularity(100) * POPULARITY_POINTS - 7.5).abs() < 0.1);
        assert!((popularity(1_000) * POPULARITY_POINTS - 11.25).abs() < 0.1);
        assert_eq!(popularity(10_000), 1.0);
        assert_eq!(popularity(5_000_000), 1.0);
    }

    #[test]
    fn test_popularity_is_monotonic() {
        let counts = [0u64, 1, 10, 99, 100, 500, 1_000, 9_999, 10_000, 100_000];
        for pair in counts.windows(2) {
            assert!(popularity(pair[0]) <= popularity(pair[1]));
        }
    }

    #[test]
    fn test_perfect_score() {
        let ranker = RelevanceRanker;
        let ranked = ranker.rank(
            vec![skill("react-best-practices", true, true, 10_000)],
            "react best practices",
            true,
        );
        assert_eq!(ranked[0].relevance_score, 100.0);
    }

    #[test]
    fn test_reference_bonus_requires_request_flag() {
        let ranker = RelevanceRanker;

        let with_flag = ranker.rank(vec![skill("x", false, true, 0)], "q", true);
        assert_eq!(with_flag[0].relevance_score, 15.0);

        // References exist but were not requested: no bonus.
        let without_flag = ranker.rank(vec![skill("x", false, true, 0)], "q", false);
        assert_eq!(without_flag[0].relevance_score, 0.0);
    }

    #[rstest]
    #[case(true, true, 0)]
    #[case(true, false, 123)]
    #[case(false, true, 10_000)]
    #[case(false, false, u64::MAX)]
    fn test_score_bounds(#[case] content: bool, #[case] references: bool, #[case] installs: u64) {
        let ranker = RelevanceRanker;
        for query in ["pdf", "react best practices", "x"] {
            let ranked = ranker.rank(
                vec![skill("react-best-practices", content, references, installs)],
                query,
                references,
            );
            let score = ranked[0].relevance_score;
            assert!((0.0..=100.0).contains(&score), "score {score} out of bounds");
        }
    }

    #[test]
    fn test_sort_is_descending_and_stable_on_ties() {
        let ranker = RelevanceRanker;

        // a and b tie (content only), c wins on popularity.
        let ranked = ranker.rank(
            vec![
                skill("alpha", true, false, 0),
                skill("beta", true, false, 0),
                skill("gamma", true, false, 10_000),
            ],
            "unrelated-query",
            false,
        );

        assert_eq!(ranked[0].id, "gamma");
        assert_eq!(ranked[1].id, "alpha");
        assert_eq!(ranked[2].id, "beta");
    }
}
