//! Common test utilities and fixtures
//!
//! - wiremock for HTTP mocking (isolated, parallel-safe)
//! - StaticSource for deterministic, network-free source fan-out
//! - #[tokio::test] for async testing

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use skillscout::{
    ContentHostClient, Error, Result, SearchResult, ServiceConfig, SkillSearchService,
    SkillSource,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Git ref used by all test services.
pub const TEST_REF: &str = "main";

/// A source returning a fixed result list, or failing on demand.
pub struct StaticSource {
    pub name: &'static str,
    pub results: Vec<SearchResult>,
    pub fail: bool,
    pub enabled: bool,
}

impl StaticSource {
    pub fn new(name: &'static str, results: Vec<SearchResult>) -> Self {
        Self {
            name,
            results,
            fail: false,
            enabled: true,
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            name,
            results: Vec::new(),
            fail: true,
            enabled: true,
        }
    }
}

#[async_trait]
impl SkillSource for StaticSource {
    fn name(&self) -> &str {
        self.name
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchResult>> {
        if self.fail {
            return Err(Error::transient("source upstream unavailable"));
        }
        // Return the full configured list: real sources do not self-truncate,
        // and the service truncates to `limit` only after ranking (spec §4.5).
        Ok(self.results.clone())
    }

    async fn ping(&self) -> bool {
        !self.fail
    }
}

/// Shorthand for building a search result.
pub fn result(repo: &str, path: &str, id: &str, installs: u64) -> SearchResult {
    SearchResult {
        source_repo: repo.to_string(),
        path: path.to_string(),
        skill_id: id.to_string(),
        install_count: installs,
        title_hint: None,
        description_hint: None,
    }
}

/// Config with every base URL pointed at the mock server.
pub fn test_config(server: &MockServer) -> ServiceConfig {
    ServiceConfig::default()
        .with_api_base_url(server.uri())
        .with_raw_base_url(server.uri())
        .with_marketplace_base_url(server.uri())
        .with_community_list_url(format!("{}/README.md", server.uri()))
        .with_content_ref(TEST_REF)
}

/// Service with injected sources, all hosts pointed at the mock server.
pub fn service_with_sources(
    server: &MockServer,
    sources: Vec<Arc<dyn SkillSource>>,
) -> SkillSearchService {
    let config = test_config(server);
    let client = ContentHostClient::from_config(&config).unwrap();

    let mut builder = SkillSearchService::builder().config(config).client(client);
    for source in sources {
        builder = builder.source(source);
    }
    builder.build().unwrap()
}

/// A minimal SKILL.md document.
pub fn skill_doc(name: &str, description: &str) -> String {
    format!(
        "---\nname: {name}\ndescription: {description}\n---\n\n# {name}\n\nInstructions for {name}.\n"
    )
}

/// Mount a raw skill file at `/{repo}/{ref}/{path}`.
pub async fn mount_file(server: &MockServer, repo: &str, file_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/{repo}/{TEST_REF}/{file_path}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mount a status-only response for a raw file path.
pub async fn mount_file_status(server: &MockServer, repo: &str, file_path: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/{repo}/{TEST_REF}/{file_path}")))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Mount a directory listing at `/repos/{repo}/contents/{dir}`.
pub async fn mount_listing(server: &MockServer, repo: &str, dir: &str, entries: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{repo}/contents/{dir}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries))
        .mount(server)
        .await;
}
