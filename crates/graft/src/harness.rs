//! A "can load grammar" check.
//!
//! [`Harness`] is bound to one loader and one reference. It drives the loader
//! once and records the outcome. A successful load is not enough to pass: the
//! returned handle must also be live.

use crate::loader::{LoadError, LoadLanguage};
use std::fmt;
use tracing::info;

/// Why a verification failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HarnessFailure {
    /// The loader refused the reference.
    #[error("grammar failed to load: {0}")]
    Load(LoadError),

    /// The loader returned a handle that is not safe to use.
    #[error("grammar failed to load: HandleInvalid: '{reference}' has no usable entry point")]
    HandleInvalid {
        /// The reference that was loaded.
        reference: String,
    },
}

impl HarnessFailure {
    /// Short name of the failure kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            HarnessFailure::Load(err) => err.kind(),
            HarnessFailure::HandleInvalid { .. } => "HandleInvalid",
        }
    }
}

/// Outcome of a verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// A live handle was produced.
    Passed,
    /// See the failure.
    Failed(HarnessFailure),
}

impl Verdict {
    /// Returns `true` for [`Verdict::Passed`].
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Passed)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Passed => f.write_str("pass"),
            Verdict::Failed(failure) => write!(f, "fail: {failure}"),
        }
    }
}

/// Where a harness is in its (one-shot) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarnessState {
    /// [`Harness::verify`] has not been called.
    NotRun,
    /// Terminal.
    Passed,
    /// Terminal.
    Failed(HarnessFailure),
}

/// Runs a loader against one reference and asserts the handle is live.
#[derive(Debug)]
pub struct Harness<L> {
    loader: L,
    reference: String,
    state: HarnessState,
}

impl<L> Harness<L> {
    /// A harness for `reference` that has not run yet.
    #[must_use]
    pub fn new(loader: L, reference: impl Into<String>) -> Self {
        Self {
            loader,
            reference: reference.into(),
            state: HarnessState::NotRun,
        }
    }

    /// The reference this harness verifies.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &HarnessState {
        &self.state
    }
}

impl<'r, L: LoadLanguage<'r>> Harness<L> {
    /// Loads the bound reference and checks the handle.
    ///
    /// Both outcomes are terminal: once run, later calls return the recorded
    /// verdict without loading again.
    pub fn verify(&mut self) -> Verdict {
        match &self.state {
            HarnessState::Passed => return Verdict::Passed,
            HarnessState::Failed(failure) => return Verdict::Failed(failure.clone()),
            HarnessState::NotRun => {}
        }

        let verdict = match self.loader.load(&self.reference) {
            Err(err) => Verdict::Failed(HarnessFailure::Load(err)),
            Ok(language) if !language.is_live() => {
                Verdict::Failed(HarnessFailure::HandleInvalid {
                    reference: self.reference.clone(),
                })
            }
            Ok(_) => Verdict::Passed,
        };

        info!(reference = %self.reference, %verdict, "verified grammar");
        self.state = match &verdict {
            Verdict::Passed => HarnessState::Passed,
            Verdict::Failed(failure) => HarnessState::Failed(failure.clone()),
        };
        verdict
    }
}

/// Runs a fresh [`Harness`] over `reference`.
#[must_use]
pub fn verify<'r>(loader: impl LoadLanguage<'r>, reference: &str) -> Verdict {
    Harness::new(loader, reference).verify()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::Artifact;
    use crate::language::Language;
    use crate::loader::Loader;
    use crate::registry::{LinkedGrammar, Registry};
    use crate::symbols::SymbolTable;
    use crate::version::VersionRange;
    use std::cell::Cell;

    const CIL: &str = r#"{
        "format": "tree-sitter-language",
        "abi_version": 14,
        "start": "file",
        "grammar": {"name": "cil", "rules": {"file": {"type": "STRING", "value": ".assembly"}}}
    }"#;

    /// Hands out a handle whose entry point never resolved.
    struct DeadLoader(LinkedGrammar);

    impl<'r> LoadLanguage<'r> for &'r DeadLoader {
        fn load(&self, _reference: &str) -> Result<Language<'r>, LoadError> {
            let this: &'r DeadLoader = *self;
            Ok(Language::new(&this.0))
        }
    }

    /// Counts the loads it forwards.
    struct Counting<'c, L> {
        inner: L,
        calls: &'c Cell<u32>,
    }

    impl<'r, L: LoadLanguage<'r>> LoadLanguage<'r> for Counting<'_, L> {
        fn load(&self, reference: &str) -> Result<Language<'r>, LoadError> {
            self.calls.set(self.calls.get() + 1);
            self.inner.load(reference)
        }
    }

    #[test]
    fn test_passes_compatible_artifact() {
        let mut registry = Registry::new();
        registry.link_str(CIL).unwrap();
        let loader = Loader::new(&registry, VersionRange::new(13, 15).unwrap());

        let mut harness = Harness::new(loader, "cil");
        assert_eq!(harness.reference(), "cil");
        assert_eq!(harness.state(), &HarnessState::NotRun);
        assert_eq!(harness.verify(), Verdict::Passed);
        assert_eq!(harness.state(), &HarnessState::Passed);
    }

    #[test]
    fn test_reports_version_mismatch_by_name() {
        let mut registry = Registry::new();
        registry.link_str(CIL).unwrap();
        let loader = Loader::new(&registry, VersionRange::new(15, 15).unwrap());

        let Verdict::Failed(failure) = verify(loader, "cil") else {
            panic!("expected failure");
        };
        assert_eq!(failure.kind(), "VersionMismatch");
        let message = failure.to_string();
        assert!(message.starts_with("grammar failed to load: VersionMismatch"), "{message}");
    }

    #[test]
    fn test_reports_unavailable_artifact() {
        let registry = Registry::new();
        let verdict = verify(Loader::with_runtime_range(&registry), "cil");
        assert!(matches!(
            verdict,
            Verdict::Failed(HarnessFailure::Load(LoadError::ArtifactUnavailable { .. }))
        ));
    }

    #[test]
    fn test_dead_handle_is_invalid() {
        let artifact = Artifact::from_json(CIL).unwrap();
        let dead = DeadLoader(LinkedGrammar {
            artifact,
            symbols: SymbolTable::default(),
            entry: None,
        });

        let verdict = verify(&dead, "cil");
        let Verdict::Failed(failure) = verdict else {
            panic!("dead handle passed");
        };
        assert_eq!(failure.kind(), "HandleInvalid");
        assert!(failure.to_string().contains("HandleInvalid"));
    }

    #[test]
    fn test_passed_is_terminal() {
        let mut registry = Registry::new();
        registry.link_str(CIL).unwrap();
        let calls = Cell::new(0);
        let loader = Counting {
            inner: Loader::with_runtime_range(&registry),
            calls: &calls,
        };
        let mut harness = Harness::new(loader, "cil");

        assert_eq!(harness.verify(), Verdict::Passed);
        assert_eq!(harness.verify(), Verdict::Passed);
        assert_eq!(harness.state(), &HarnessState::Passed);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_failed_is_terminal() {
        let registry = Registry::new();
        let calls = Cell::new(0);
        let loader = Counting {
            inner: Loader::with_runtime_range(&registry),
            calls: &calls,
        };
        let mut harness = Harness::new(loader, "msil");

        let first = harness.verify();
        let second = harness.verify();
        assert!(!first.is_pass());
        assert_eq!(first, second);
        assert!(matches!(
            harness.state(),
            HarnessState::Failed(f) if f.kind() == "ArtifactUnavailable"
        ));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_harnesses_do_not_share_verdicts() {
        let mut registry = Registry::new();
        registry.link_str(CIL).unwrap();
        let loader = Loader::with_runtime_range(&registry);

        let mut linked = Harness::new(loader, "cil");
        let mut unlinked = Harness::new(loader, "msil");
        assert_eq!(linked.verify(), Verdict::Passed);
        assert!(!unlinked.verify().is_pass());
    }
}
