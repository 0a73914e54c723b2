//! The process-local artifact linker.
//!
//! A [`Registry`] owns every grammar that has been linked into memory and
//! resolves artifact references (grammar names) to them. Linking is the only
//! step that mutates a registry; once built it is shared read-only with any
//! number of [`Loader`](crate::loader::Loader)s.

use crate::artifact::Artifact;
use crate::grammar::GrammarError;
use crate::symbols::{SymbolId, SymbolTable, TableOverflow};
use crate::validate::{validate, ValidationError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reasons an artifact could not be linked.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// The artifact file could not be read.
    #[error("cannot read artifact {}: {source}", .path.display())]
    Io {
        /// The file that was requested.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// The text is not a well-formed artifact document.
    #[error("malformed artifact: {0}")]
    Parse(#[from] GrammarError),

    /// The format tag is not one this crate can link.
    #[error("artifact '{name}' has unknown format '{format}'")]
    UnknownFormat {
        /// Grammar name.
        name: String,
        /// The declared tag.
        format: String,
    },

    /// The declared start rule is not defined.
    #[error("artifact '{name}' declares start rule '{start}' which is not defined")]
    MissingStart {
        /// Grammar name.
        name: String,
        /// The declared start rule.
        start: String,
    },

    /// The rule graph failed validation.
    #[error("artifact '{name}' is invalid: {source}")]
    Invalid {
        /// Grammar name.
        name: String,
        /// The validation failure.
        source: ValidationError,
    },

    /// The symbol or field table cannot be addressed.
    #[error("artifact '{name}' is too large: {source}")]
    Overflow {
        /// Grammar name.
        name: String,
        /// The overflowing table.
        source: TableOverflow,
    },

    /// A grammar with the same name is already linked.
    #[error("a grammar named '{0}' is already linked")]
    Duplicate(String),
}

/// A validated artifact together with its derived tables.
#[derive(Debug)]
pub struct LinkedGrammar {
    pub(crate) artifact: Artifact,
    pub(crate) symbols: SymbolTable,
    pub(crate) entry: Option<SymbolId>,
}

impl LinkedGrammar {
    /// Validates `artifact` and derives its symbol and field tables.
    ///
    /// # Errors
    ///
    /// Returns a [`LinkError`] if the format tag is unknown, the start rule is
    /// missing, the rule graph is invalid or the tables overflow.
    pub fn link(artifact: Artifact) -> Result<Self, LinkError> {
        let name = artifact.name().to_string();

        if !artifact.has_known_format() {
            return Err(LinkError::UnknownFormat {
                name,
                format: artifact.format,
            });
        }
        if !artifact.grammar.has_rule(&artifact.start) {
            return Err(LinkError::MissingStart {
                name,
                start: artifact.start,
            });
        }

        validate(&artifact.grammar, &artifact.start).map_err(|source| LinkError::Invalid {
            name: name.clone(),
            source,
        })?;
        let symbols = SymbolTable::build(&artifact.grammar, &artifact.start)
            .map_err(|source| LinkError::Overflow { name, source })?;
        let entry = symbols.symbol_for_name(&artifact.start, true);

        debug!(
            grammar = artifact.name(),
            abi_version = artifact.abi_version,
            symbols = symbols.symbol_count(),
            fields = symbols.field_count(),
            "linked grammar"
        );
        Ok(Self {
            artifact,
            symbols,
            entry,
        })
    }

    /// The artifact this grammar was linked from.
    #[must_use]
    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    /// The derived symbol and field tables.
    #[must_use]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }
}

/// Grammars linked into this process, keyed by grammar name.
#[derive(Debug, Default)]
pub struct Registry {
    grammars: HashMap<String, LinkedGrammar>,
}

impl Registry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and links an artifact from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Parse`] for malformed JSON, and any error from
    /// [`LinkedGrammar::link`] or [`Registry::insert`].
    pub fn link_str(&mut self, json: &str) -> Result<&LinkedGrammar, LinkError> {
        let artifact = Artifact::from_json(json)?;
        self.insert(LinkedGrammar::link(artifact)?)
    }

    /// Reads, parses and links an artifact file.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Io`] if the file cannot be read, otherwise as
    /// [`Registry::link_str`].
    pub fn link_file(&mut self, path: impl AsRef<Path>) -> Result<&LinkedGrammar, LinkError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LinkError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "read artifact");
        self.link_str(&json)
    }

    /// Registers an already linked grammar under its name.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Duplicate`] if the name is taken. The registry is
    /// left unchanged.
    pub fn insert(&mut self, grammar: LinkedGrammar) -> Result<&LinkedGrammar, LinkError> {
        use std::collections::hash_map::Entry;

        match self.grammars.entry(grammar.artifact.name().to_string()) {
            Entry::Occupied(slot) => Err(LinkError::Duplicate(slot.key().clone())),
            Entry::Vacant(slot) => Ok(slot.insert(grammar)),
        }
    }

    /// Resolves an artifact reference.
    #[must_use]
    pub fn resolve(&self, reference: &str) -> Option<&LinkedGrammar> {
        self.grammars.get(reference)
    }

    /// Names of all linked grammars, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.grammars.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of linked grammars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.grammars.len()
    }

    /// Returns `true` if nothing has been linked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }
}
