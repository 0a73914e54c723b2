//! Python bindings for graft.
//!
//! Exposes the "can load grammar" check to Python:
//!
//! ```python
//! from graft import check
//! check(open("tree-sitter-cil.json").read())  # -> "cil"
//! ```

use graft::{verify, Loader, Registry, Verdict, VersionRange};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Link an artifact, load it and check the handle is live.
///
/// Returns the grammar name. Raises `ValueError` naming the failure kind
/// (`ArtifactUnavailable`, `VersionMismatch` or `HandleInvalid`) otherwise.
#[pyfunction]
#[pyo3(signature = (json, min_abi=None, max_abi=None))]
fn check(json: &str, min_abi: Option<u32>, max_abi: Option<u32>) -> PyResult<String> {
    let supported = VersionRange::new(
        min_abi.unwrap_or(VersionRange::RUNTIME.min()),
        max_abi.unwrap_or(VersionRange::RUNTIME.max()),
    )
    .map_err(|e| PyValueError::new_err(e.to_string()))?;

    let mut registry = Registry::new();
    let name = registry
        .link_str(json)
        .map_err(|e| {
            PyValueError::new_err(format!("grammar failed to load: ArtifactUnavailable: {e}"))
        })?
        .artifact()
        .name()
        .to_string();

    match verify(Loader::new(&registry, supported), &name) {
        Verdict::Passed => Ok(name),
        Verdict::Failed(failure) => Err(PyValueError::new_err(failure.to_string())),
    }
}

/// The `(min, max)` artifact ABI versions accepted by default.
#[pyfunction]
fn supported_abi() -> (u32, u32) {
    (VersionRange::RUNTIME.min(), VersionRange::RUNTIME.max())
}

/// The `_graft` extension module.
#[pymodule]
fn _graft(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(check, m)?)?;
    m.add_function(wrap_pyfunction!(supported_abi, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
