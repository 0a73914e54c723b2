//! The rule graph carried inside a grammar artifact.
//!
//! This is the `grammar.json` document emitted by `tree-sitter generate`. It is
//! deserialized with [`facet_json`] and is what the linker walks to derive a
//! language's symbol and field tables.

use facet::Facet;
use std::collections::{BTreeSet, HashMap};

mod rules;

pub use rules::{Rule, RuleType, RuleValue};

/// Represents a full Tree-sitter grammar definition.
///
/// This structure mirrors the serialized JSON format produced by
/// `tree-sitter generate`. It captures the complete rule set along with
/// auxiliary metadata such as precedences, conflicts, and supertypes.
///
/// See <https://tree-sitter.github.io/tree-sitter/assets/schemas/grammar.schema.json>
#[derive(Debug, Clone, Facet)]
pub struct Grammar {
    /// Optional `$schema` field from the JSON, typically used for schema
    /// validation or editor integration.
    #[facet(rename = "$schema")]
    #[facet(default)]
    pub schema: Option<String>,

    /// The short name of the grammar (e.g. `"cil"`).
    pub name: String,

    /// Optional name of a base grammar that this one inherits from.
    #[facet(default)]
    pub inherits: Option<String>,

    /// Map of all rule identifiers to their corresponding definitions.
    pub rules: HashMap<String, Rule>,

    /// “Extras” that may appear between other tokens, such as whitespace or comments.
    #[facet(default)]
    pub extras: Option<Vec<Rule>>,

    /// Rules implemented externally via a scanner.
    #[facet(default)]
    pub externals: Option<Vec<Rule>>,

    /// Names of rules that should be inlined into other rules.
    #[facet(default)]
    pub inline: Option<Vec<String>>,

    /// Precedence orderings, each entry a `STRING` or `SYMBOL` rule.
    #[facet(default)]
    pub precedences: Option<Vec<Vec<Rule>>>,

    /// Explicit conflict groups expected during parsing.
    #[facet(default)]
    pub conflicts: Option<Vec<Vec<String>>>,

    /// Context-specific reserved word definitions.
    #[facet(default)]
    pub reserved: Option<HashMap<String, Vec<Rule>>>,

    /// The special rule name used to identify word tokens (keywords, identifiers, etc.).
    #[facet(default)]
    pub word: Option<String>,

    /// A list of node supertypes, grouping related syntactic forms.
    #[facet(default)]
    pub supertypes: Option<Vec<String>>,
}

/// Parse a JSON grammar definition into a strongly typed [`Grammar`] structure.
///
/// # Errors
///
/// Returns [`GrammarError::JsonParse`] if the provided string is not valid JSON
/// or fails schema deserialization.
pub fn parse_grammar(json: &str) -> Result<Grammar, GrammarError> {
    facet_json::from_str(json).map_err(|e| GrammarError::JsonParse(e.to_string()))
}

/// Errors raised while reading a grammar document.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    /// The input JSON was syntactically invalid or structurally mismatched.
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

impl Grammar {
    /// Returns `true` if a rule with this name is defined.
    #[must_use]
    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Returns `true` if the named rule is listed for inlining.
    #[must_use]
    pub fn is_inlined(&self, name: &str) -> bool {
        self.inline.as_ref().is_some_and(|v| v.iter().any(|n| n == name))
    }

    /// Rule definitions followed by the `extras` list, i.e. every rule tree
    /// that can contribute symbols to the language.
    pub fn rule_trees(&self) -> impl Iterator<Item = &Rule> {
        self.rules
            .values()
            .chain(self.extras.iter().flatten())
    }

    /// Every field name used anywhere in the grammar, sorted and deduplicated.
    #[must_use]
    pub fn field_names(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        for rule in self.rule_trees() {
            rule.visit(&mut |r| {
                if matches!(r.rule_type, RuleType::Field) {
                    if let Some(name) = r.name.as_deref() {
                        names.insert(name);
                    }
                }
            });
        }
        names
    }
}
