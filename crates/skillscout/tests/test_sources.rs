//! Source adapter tests against a mocked upstream

use skillscout::sources::{CommunityListSource, MarketplaceSource};
use skillscout::{Error, SkillSource};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

use common::test_config;

#[tokio::test]
async fn test_marketplace_search_maps_api_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("q", "react"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "skills": [
                {
                    "id": "react-best-practices",
                    "name": "React Best Practices",
                    "topSource": "vercel-labs/agent-skills",
                    "installs": 74200
                },
                {
                    "id": "react-charts",
                    "topSource": "charts-org/skills",
                    "installs": 12
                },
                {"id": "", "topSource": "a/b", "installs": 5},
                {"id": "broken", "topSource": "not-a-repo", "installs": 5}
            ]
        })))
        .mount(&server)
        .await;

    let source = MarketplaceSource::from_config(&test_config(&server)).unwrap();
    let results = source.search("react", 10).await.unwrap();

    // Entries without an id or a usable repo are dropped.
    assert_eq!(results.len(), 2);

    assert_eq!(results[0].skill_id, "react-best-practices");
    assert_eq!(results[0].source_repo, "vercel-labs/agent-skills");
    assert_eq!(results[0].path, "skills/react-best-practices");
    assert_eq!(results[0].install_count, 74200);
    assert_eq!(results[0].title_hint.as_deref(), Some("React Best Practices"));

    assert_eq!(results[1].skill_id, "react-charts");
    assert!(results[1].title_hint.is_none());
}

#[tokio::test]
async fn test_marketplace_upstream_error_is_returned_not_panicked() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let source = MarketplaceSource::from_config(&test_config(&server)).unwrap();
    let error = source.search("react", 10).await.unwrap_err();

    assert!(matches!(error, Error::Transient(_)));
}

#[tokio::test]
async fn test_marketplace_rate_limit_maps_to_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let source = MarketplaceSource::from_config(&test_config(&server)).unwrap();
    let error = source.search("react", 10).await.unwrap_err();

    assert!(matches!(error, Error::RateLimited(_)));
}

#[tokio::test]
async fn test_marketplace_ping_reflects_endpoint_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"skills": []})))
        .mount(&server)
        .await;

    let source = MarketplaceSource::from_config(&test_config(&server)).unwrap();
    assert!(source.ping().await);

    let dead = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&dead)
        .await;

    let source = MarketplaceSource::from_config(&test_config(&dead)).unwrap();
    assert!(!source.ping().await);
}

const COMMUNITY_LIST: &str = r"# Awesome Agent Skills

## Development

- [React Performance](https://github.com/vercel-labs/agent-skills/tree/main/skills/react-performance) - Optimize React rendering paths
- [PDF Toolkit](https://github.com/tools-org/pdf-skills) - Extract and transform PDF documents
- [Writing Skills Guide](https://github.com/anthropics/docs) - Official documentation for skill authors
";

#[tokio::test]
async fn test_community_list_search_parses_and_matches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/README.md"))
        .respond_with(ResponseTemplate::new(200).set_body_string(COMMUNITY_LIST))
        .expect(1)
        .mount(&server)
        .await;

    let source = CommunityListSource::from_config(&test_config(&server)).unwrap();

    let results = source.search("react", 10).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].skill_id, "react-performance");
    assert_eq!(results[0].source_repo, "vercel-labs/agent-skills");
    assert_eq!(results[0].path, "skills/react-performance");
    assert_eq!(results[0].install_count, 0);
    assert_eq!(
        results[0].description_hint.as_deref(),
        Some("Optimize React rendering paths")
    );

    // Documentation rows are filtered out.
    let results = source.search("guide", 10).await.unwrap();
    assert!(results.is_empty());

    // The second search reused the cached list; the mock allows one fetch.
    server.verify().await;
}

#[tokio::test]
async fn test_community_list_unreachable_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/README.md"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = CommunityListSource::from_config(&test_config(&server)).unwrap();

    assert!(source.search("react", 10).await.is_err());
    assert!(!source.ping().await);
}

#[tokio::test]
async fn test_source_names_and_toggles() {
    let server = MockServer::start().await;
    let config = test_config(&server)
        .with_marketplace(false)
        .with_community_list(false);

    let marketplace = MarketplaceSource::from_config(&config).unwrap();
    assert_eq!(marketplace.name(), "marketplace");
    assert!(!marketplace.enabled());

    let community = CommunityListSource::from_config(&config).unwrap();
    assert_eq!(community.name(), "community-list");
    assert!(!community.enabled());
}
