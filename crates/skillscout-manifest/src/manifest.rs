//! Manifest types extracted from SKILL.md frontmatter

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata from the YAML frontmatter of a SKILL.md file
///
/// All fields are optional: the parser recovers what it can and callers fall
/// back to source-supplied hints (skill id, registry description) for
/// anything missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SkillManifest {
    /// Skill name from the `name` key
    pub name: Option<String>,

    /// What the skill does and when to use it, from the `description` key
    pub description: Option<String>,

    /// Semantic version from the `version` key
    pub version: Option<String>,

    /// Tools the skill is pre-approved to run, from `allowed-tools`
    ///
    /// Accepted frontmatter forms:
    /// - YAML sequence: `allowed-tools: [Bash, Read, Write]`
    /// - Comma-separated string: `allowed-tools: "Bash, Read, Write"`
    ///
    /// Order is preserved as written.
    pub allowed_tools: Option<Vec<String>>,

    /// Frontmatter keys not otherwise modeled, retained verbatim
    ///
    /// A `BTreeMap` keeps serialization order deterministic.
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl SkillManifest {
    /// True if no frontmatter field was recovered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.version.is_none()
            && self.allowed_tools.is_none()
            && self.metadata.is_empty()
    }
}
