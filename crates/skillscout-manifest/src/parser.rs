//! SKILL.md document parsing

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ManifestError, Result};
use crate::manifest::SkillManifest;

/// Frontmatter block between the leading `---` markers
///
/// Non-greedy so `---` horizontal rules inside the body are left alone.
static FRONTMATTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\n(.*?)\n---[ \t]*(?:\n|\z)").expect("frontmatter regex compiles")
});

/// Frontmatter keys mapped to dedicated [`SkillManifest`] fields
const STANDARD_FIELDS: [&str; 4] = ["name", "description", "version", "allowed-tools"];

/// A parsed SKILL.md document: structured manifest plus markdown body
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSkill {
    /// Fields recovered from the frontmatter block
    pub manifest: SkillManifest,

    /// Markdown body with the frontmatter removed, trimmed
    pub body: String,
}

impl ParsedSkill {
    /// Display title for the skill
    ///
    /// Prefers the frontmatter `name`, then the first `#` heading of the
    /// body, then the supplied fallback (usually the skill id).
    #[must_use]
    pub fn title_or(&self, fallback: &str) -> String {
        if let Some(name) = self.manifest.name.as_deref() {
            return name.to_string();
        }
        first_heading(&self.body).unwrap_or_else(|| fallback.to_string())
    }
}

/// Parse a SKILL.md document into a manifest and body
///
/// Expected format:
/// ```yaml
/// ---
/// name: skill-name
/// description: Description here
/// ---
///
/// # Markdown body
/// ```
///
/// Leniency rules:
/// - No frontmatter block: the entire document is the body.
/// - Malformed YAML, or frontmatter that is not a mapping: the block is
///   discarded and the remainder is the body.
/// - Unknown keys are retained in [`SkillManifest::metadata`]; values that
///   cannot be represented as JSON are dropped.
///
/// # Errors
///
/// Returns [`ManifestError::EmptyDocument`] if the input is empty or
/// whitespace-only. This is the only hard failure.
pub fn parse_skill_document(raw: &str) -> Result<ParsedSkill> {
    if raw.trim().is_empty() {
        return Err(ManifestError::EmptyDocument);
    }

    let Some(captures) = FRONTMATTER.captures(raw) else {
        tracing::debug!("no frontmatter block, treating whole document as body");
        return Ok(ParsedSkill {
            manifest: SkillManifest::default(),
            body: raw.trim().to_string(),
        });
    };

    let block = captures.get(1).map_or("", |m| m.as_str());
    let body = raw[captures.get(0).map_or(0, |m| m.end())..].trim().to_string();

    let mapping = match serde_yaml::from_str::<serde_yaml::Value>(block) {
        Ok(serde_yaml::Value::Mapping(mapping)) => mapping,
        Ok(other) => {
            tracing::warn!(kind = yaml_kind(&other), "frontmatter is not a mapping, discarding");
            return Ok(ParsedSkill {
                manifest: SkillManifest::default(),
                body,
            });
        }
        Err(error) => {
            tracing::warn!(%error, "malformed YAML frontmatter, discarding");
            return Ok(ParsedSkill {
                manifest: SkillManifest::default(),
                body,
            });
        }
    };

    let mut manifest = SkillManifest {
        name: mapping.get("name").and_then(scalar_to_string),
        description: mapping.get("description").and_then(scalar_to_string),
        version: mapping.get("version").and_then(scalar_to_string),
        allowed_tools: mapping.get("allowed-tools").and_then(parse_allowed_tools),
        metadata: Default::default(),
    };

    for (key, value) in &mapping {
        let Some(key) = key.as_str() else { continue };
        if STANDARD_FIELDS.contains(&key) {
            continue;
        }
        // Best-effort: values that don't transcode to JSON are dropped.
        if let Ok(json) = serde_json::to_value(value) {
            manifest.metadata.insert(key.to_string(), json);
        }
    }

    Ok(ParsedSkill { manifest, body })
}

/// Extract the first H1 heading from a markdown body
#[must_use]
pub fn first_heading(body: &str) -> Option<String> {
    body.lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("# ").map(|rest| rest.trim().to_string()))
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parse `allowed-tools`, which may be a sequence or a comma-separated string
fn parse_allowed_tools(value: &serde_yaml::Value) -> Option<Vec<String>> {
    match value {
        serde_yaml::Value::Sequence(items) => Some(
            items
                .iter()
                .filter_map(scalar_to_string)
                .map(|tool| tool.trim().to_string())
                .filter(|tool| !tool.is_empty())
                .collect(),
        ),
        serde_yaml::Value::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|tool| !tool.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "bool",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_skill() {
        let doc = r"---
name: test-skill
description: A test skill
---

# Test Content

This is the body.
";

        let parsed = parse_skill_document(doc).unwrap();

        assert_eq!(parsed.manifest.name.as_deref(), Some("test-skill"));
        assert_eq!(parsed.manifest.description.as_deref(), Some("A test skill"));
        assert!(parsed.manifest.version.is_none());
        assert!(parsed.manifest.allowed_tools.is_none());
        assert!(parsed.manifest.metadata.is_empty());
        assert!(parsed.body.contains("# Test Content"));
        assert!(parsed.body.contains("This is the body."));
    }

    #[test]
    fn test_parse_full_skill() {
        let doc = r#"---
name: full-skill
description: |
  Multi-line description
  with multiple lines
version: "1.2.0"
allowed-tools:
  - Bash
  - Read
  - Write
author: Someone
homepage: https://example.com
---

# Full Skill

Content here.
"#;

        let parsed = parse_skill_document(doc).unwrap();

        assert_eq!(parsed.manifest.name.as_deref(), Some("full-skill"));
        assert!(parsed.manifest.description.as_deref().unwrap().contains("Multi-line"));
        assert_eq!(parsed.manifest.version.as_deref(), Some("1.2.0"));
        assert_eq!(
            parsed.manifest.allowed_tools.as_deref(),
            Some(&["Bash".to_string(), "Read".to_string(), "Write".to_string()][..])
        );
        assert_eq!(parsed.manifest.metadata.len(), 2);
        assert_eq!(
            parsed.manifest.metadata["author"],
            serde_json::json!("Someone")
        );
    }

    #[test]
    fn test_parse_allowed_tools_comma_string() {
        let doc = r"---
name: test
description: Test
allowed-tools: Bash, Read , Write
---
Body
";

        let parsed = parse_skill_document(doc).unwrap();
        assert_eq!(
            parsed.manifest.allowed_tools.as_deref(),
            Some(&["Bash".to_string(), "Read".to_string(), "Write".to_string()][..])
        );
    }

    #[test]
    fn test_parse_empty_allowed_tools() {
        let doc = r"---
name: test
description: Test
allowed-tools: []
---
Body
";

        let parsed = parse_skill_document(doc).unwrap();
        assert_eq!(parsed.manifest.allowed_tools.as_deref(), Some(&[][..]));
    }

    #[test]
    fn test_parse_no_frontmatter() {
        let doc = "# Just a Heading\n\nSome content.\n";

        let parsed = parse_skill_document(doc).unwrap();

        assert!(parsed.manifest.is_empty());
        assert!(parsed.body.contains("# Just a Heading"));
        assert_eq!(parsed.title_or("fallback-id"), "Just a Heading");
    }

    #[test]
    fn test_parse_no_frontmatter_no_heading_falls_back_to_id() {
        let parsed = parse_skill_document("plain text body").unwrap();
        assert_eq!(parsed.title_or("my-skill"), "my-skill");
    }

    #[test]
    fn test_parse_malformed_yaml_degrades_to_body() {
        let doc = r"---
name: test
broken: [unclosed
---
Body text
";

        let parsed = parse_skill_document(doc).unwrap();

        assert!(parsed.manifest.is_empty());
        assert_eq!(parsed.body, "Body text");
    }

    #[test]
    fn test_parse_non_mapping_frontmatter_degrades_to_body() {
        let doc = "---\n- just\n- a\n- list\n---\nBody\n";

        let parsed = parse_skill_document(doc).unwrap();

        assert!(parsed.manifest.is_empty());
        assert_eq!(parsed.body, "Body");
    }

    #[test]
    fn test_parse_empty_document_is_error() {
        assert!(matches!(
            parse_skill_document(""),
            Err(ManifestError::EmptyDocument)
        ));
        assert!(matches!(
            parse_skill_document("   \n\t\n"),
            Err(ManifestError::EmptyDocument)
        ));
    }

    #[test]
    fn test_parse_body_preserves_horizontal_rules() {
        let doc = r"---
name: test
description: Test
---

Intro

---

After the rule
";

        let parsed = parse_skill_document(doc).unwrap();
        assert!(parsed.body.contains("---"));
        assert!(parsed.body.contains("After the rule"));
    }

    #[test]
    fn test_parse_empty_body_is_valid() {
        let doc = "---\nname: minimal\ndescription: Minimal\n---\n";

        let parsed = parse_skill_document(doc).unwrap();
        assert!(parsed.body.is_empty());
    }

    #[test]
    fn test_parse_numeric_version_stringified() {
        let doc = "---\nname: test\nversion: 2\n---\nBody\n";

        let parsed = parse_skill_document(doc).unwrap();
        assert_eq!(parsed.manifest.version.as_deref(), Some("2"));
    }

    #[test]
    fn test_title_prefers_manifest_name() {
        let doc = "---\nname: named\n---\n# Different Heading\n";

        let parsed = parse_skill_document(doc).unwrap();
        assert_eq!(parsed.title_or("id"), "named");
    }

    #[test]
    fn test_first_heading() {
        assert_eq!(first_heading("# Title\nBody"), Some("Title".to_string()));
        assert_eq!(first_heading("Body\n  # Indented\n"), Some("Indented".to_string()));
        assert_eq!(first_heading("## Not H1\nBody"), None);
        assert_eq!(first_heading(""), None);
    }
}
