//! Turning artifact references into [`Language`] handles.

use crate::language::Language;
use crate::registry::Registry;
use crate::version::VersionRange;
use tracing::{debug, warn};

/// Why a reference could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// Nothing is linked under the reference.
    #[error("ArtifactUnavailable: no grammar is linked as '{reference}'")]
    ArtifactUnavailable {
        /// The reference that failed to resolve.
        reference: String,
    },

    /// The artifact's ABI version is outside the supported range.
    #[error("VersionMismatch: '{reference}' declares ABI {found}, runtime supports {supported}")]
    VersionMismatch {
        /// The reference that resolved.
        reference: String,
        /// The ABI version the artifact declared.
        found: u32,
        /// What the loader accepts.
        supported: VersionRange,
    },
}

impl LoadError {
    /// Short name of the error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::ArtifactUnavailable { .. } => "ArtifactUnavailable",
            LoadError::VersionMismatch { .. } => "VersionMismatch",
        }
    }
}

/// Anything that can produce a [`Language`] from an artifact reference.
pub trait LoadLanguage<'r> {
    /// Loads the grammar named by `reference`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] describing the first check that failed.
    fn load(&self, reference: &str) -> Result<Language<'r>, LoadError>;
}

/// Resolves references against an injected [`Registry`] and checks ABI
/// compatibility.
#[derive(Debug, Clone, Copy)]
pub struct Loader<'r> {
    registry: &'r Registry,
    supported: VersionRange,
}

impl<'r> Loader<'r> {
    /// A loader accepting artifacts whose ABI lies in `supported`.
    #[must_use]
    pub fn new(registry: &'r Registry, supported: VersionRange) -> Self {
        Self {
            registry,
            supported,
        }
    }

    /// A loader accepting [`VersionRange::RUNTIME`].
    #[must_use]
    pub fn with_runtime_range(registry: &'r Registry) -> Self {
        Self::new(registry, VersionRange::RUNTIME)
    }

    /// The accepted ABI range.
    #[must_use]
    pub fn supported(&self) -> VersionRange {
        self.supported
    }
}

impl<'r> LoadLanguage<'r> for Loader<'r> {
    fn load(&self, reference: &str) -> Result<Language<'r>, LoadError> {
        let Some(grammar) = self.registry.resolve(reference) else {
            warn!(reference, "artifact unavailable");
            return Err(LoadError::ArtifactUnavailable {
                reference: reference.to_string(),
            });
        };

        let found = grammar.artifact().abi_version;
        if !self.supported.contains(found) {
            warn!(reference, found, supported = %self.supported, "ABI version mismatch");
            return Err(LoadError::VersionMismatch {
                reference: reference.to_string(),
                found,
                supported: self.supported,
            });
        }

        debug!(reference, abi_version = found, "loaded language");
        Ok(Language::new(grammar))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(name: &str, abi_version: u32) -> Registry {
        let mut registry = Registry::new();
        registry
            .link_str(&format!(
                r#"{{
                    "format": "tree-sitter-language",
                    "abi_version": {abi_version},
                    "start": "file",
                    "grammar": {{"name": "{name}", "rules": {{"file": {{"type": "STRING", "value": ".module"}}}}}}
                }}"#
            ))
            .unwrap();
        registry
    }

    #[test]
    fn test_loads_compatible_artifact() {
        let registry = registry_with("cil", 14);
        let loader = Loader::new(&registry, VersionRange::new(13, 15).unwrap());
        let language = loader.load("cil").unwrap();
        assert_eq!(language.name(), "cil");
        assert!(language.is_live());
    }

    #[test]
    fn test_version_mismatch_is_hard_failure() {
        let registry = registry_with("cil", 9);
        let loader = Loader::new(&registry, VersionRange::new(13, 15).unwrap());
        let err = loader.load("cil").unwrap_err();
        assert_eq!(
            err,
            LoadError::VersionMismatch {
                reference: "cil".to_string(),
                found: 9,
                supported: VersionRange::new(13, 15).unwrap(),
            }
        );
        assert_eq!(err.kind(), "VersionMismatch");
    }

    #[test]
    fn test_newer_than_runtime() {
        let registry = registry_with("cil", 16);
        let err = Loader::with_runtime_range(&registry).load("cil").unwrap_err();
        assert!(matches!(err, LoadError::VersionMismatch { found: 16, .. }));
    }

    #[test]
    fn test_unresolved_reference() {
        let registry = registry_with("cil", 14);
        let err = Loader::with_runtime_range(&registry)
            .load("tree_sitter_msil")
            .unwrap_err();
        assert_eq!(err.kind(), "ArtifactUnavailable");
        assert!(err.to_string().starts_with("ArtifactUnavailable"));
    }

    #[test]
    fn test_repeated_loads_are_equal() {
        let registry = registry_with("cil", 14);
        let loader = Loader::with_runtime_range(&registry);
        let a = loader.load("cil").unwrap();
        let b = loader.load("cil").unwrap();
        assert_eq!(a, b);
    }
}
