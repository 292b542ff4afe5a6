//! # skillscout-manifest
//!
//! Parsing for SKILL.md documents: a YAML frontmatter block delimited by
//! `---` markers, followed by a markdown body.
//!
//! The parser is deliberately lenient. Skill files in the wild are written by
//! hand, and a manifest that fails strict validation is still worth serving:
//! a document without frontmatter becomes a body-only skill, malformed YAML
//! degrades the same way, and unknown frontmatter keys are retained verbatim
//! in [`SkillManifest::metadata`]. Only an empty document is a hard error.
//!
//! ## Example
//!
//! ```rust
//! use skillscout_manifest::parse_skill_document;
//!
//! let doc = "---\nname: pdf-tools\ndescription: Work with PDFs\n---\n\n# PDF Tools\n";
//! let parsed = parse_skill_document(doc).unwrap();
//!
//! assert_eq!(parsed.manifest.name.as_deref(), Some("pdf-tools"));
//! assert!(parsed.body.contains("# PDF Tools"));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub use error::{ManifestError, Result};
pub use manifest::SkillManifest;
pub use parser::{first_heading, parse_skill_document, ParsedSkill};

pub mod error;
pub mod manifest;
pub mod parser;
