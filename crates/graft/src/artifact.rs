//! The on-disk form of a compiled grammar.
//!
//! An artifact is a small JSON header wrapped around a `grammar.json` rule
//! graph:
//!
//! ```json
//! {
//!   "format": "tree-sitter-language",
//!   "abi_version": 14,
//!   "start": "file",
//!   "grammar": { "name": "cil", "rules": { "file": { "type": "BLANK" } } }
//! }
//! ```
//!
//! Artifacts are produced by an external grammar compiler and only ever read
//! here.

use crate::grammar::{Grammar, GrammarError};
use facet::Facet;

/// The only format tag this crate knows how to link.
pub const FORMAT_TAG: &str = "tree-sitter-language";

/// A compiled grammar artifact as read from JSON.
#[derive(Debug, Clone, Facet)]
pub struct Artifact {
    /// Format tag identifying the artifact layout.
    pub format: String,

    /// Declared ABI version of the parse tables the artifact describes.
    pub abi_version: u32,

    /// Name of the entry-point rule.
    pub start: String,

    /// The rule graph.
    pub grammar: Grammar,
}

impl Artifact {
    /// Parse an artifact from its JSON text.
    ///
    /// Only the shape is checked here. The format tag, start rule and rule
    /// graph are checked when the artifact is linked into a
    /// [`Registry`](crate::registry::Registry).
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::JsonParse`] if the text is not a well-formed
    /// artifact document.
    pub fn from_json(json: &str) -> Result<Self, GrammarError> {
        facet_json::from_str(json).map_err(|e| GrammarError::JsonParse(e.to_string()))
    }

    /// The grammar's name, which is also the reference it is linked under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.grammar.name
    }

    /// Returns `true` if the format tag is one this crate understands.
    #[must_use]
    pub fn has_known_format(&self) -> bool {
        self.format == FORMAT_TAG
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_header() {
        let artifact = Artifact::from_json(
            r#"{
                "format": "tree-sitter-language",
                "abi_version": 14,
                "start": "file",
                "grammar": {"name": "cil", "rules": {"file": {"type": "BLANK"}}}
            }"#,
        )
        .unwrap();

        assert_eq!(artifact.name(), "cil");
        assert_eq!(artifact.abi_version, 14);
        assert_eq!(artifact.start, "file");
        assert!(artifact.has_known_format());
    }

    #[test]
    fn test_requires_format_tag() {
        let result = Artifact::from_json(
            r#"{
                "abi_version": 14,
                "start": "file",
                "grammar": {"name": "cil", "rules": {}}
            }"#,
        );
        assert!(matches!(result, Err(GrammarError::JsonParse(_))));
    }

    #[test]
    fn test_unknown_format_still_parses() {
        let artifact = Artifact::from_json(
            r#"{
                "format": "wasm",
                "abi_version": 14,
                "start": "file",
                "grammar": {"name": "cil", "rules": {}}
            }"#,
        )
        .unwrap();
        assert!(!artifact.has_known_format());
    }
}
