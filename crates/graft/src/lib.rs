//! Load compiled tree-sitter grammars and hand back validated language handles.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::multiple_crate_versions)]

/// The JSON envelope of a compiled grammar.
pub mod artifact;

/// Core structures and parsing logic for Tree-sitter grammars.
///
/// This module defines how a grammar's rule graph is represented once read
/// out of an artifact. The linker walks these types to derive symbol tables.
pub mod grammar;

/// The "can load grammar" verification harness.
pub mod harness;

/// The copyable handle given to parser runtimes.
pub mod language;

/// Reference resolution and ABI checking.
pub mod loader;

/// Linking artifacts into a process-local registry.
///
/// Linking is where an artifact's structure is checked and its symbol table is
/// built. Grammars that fail to link never become resolvable.
pub mod registry;

/// Symbol and field tables.
pub mod symbols;

/// Grammar validation and consistency checking utilities.
///
/// Validation exists to protect downstream stages from malformed grammars. It
/// enforces Tree-sitter's invariants before a grammar is linked.
pub mod validate;

/// ABI compatibility ranges.
pub mod version;

pub use artifact::{Artifact, FORMAT_TAG};
pub use grammar::{parse_grammar, Grammar, GrammarError, Rule};
pub use harness::{verify, Harness, HarnessFailure, HarnessState, Verdict};
pub use language::Language;
pub use loader::{LoadError, LoadLanguage, Loader};
pub use registry::{LinkError, LinkedGrammar, Registry};
pub use symbols::{FieldId, SymbolId};
pub use validate::{validate, ValidationError};
pub use version::{VersionRange, VersionRangeError};
