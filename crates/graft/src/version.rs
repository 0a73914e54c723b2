//! ABI compatibility between artifacts and the parser runtime.

use std::fmt;

/// Newest artifact ABI the runtime can consume.
pub const LANGUAGE_VERSION: u32 = 15;

/// Oldest artifact ABI the runtime can still consume.
pub const MIN_COMPATIBLE_LANGUAGE_VERSION: u32 = 13;

/// An inclusive range of artifact ABI versions accepted by a runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionRange {
    min: u32,
    max: u32,
}

/// A range was requested whose lower bound exceeds its upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid ABI range: minimum {min} is greater than maximum {max}")]
pub struct VersionRangeError {
    /// Requested lower bound.
    pub min: u32,
    /// Requested upper bound.
    pub max: u32,
}

impl VersionRange {
    /// The range supported by this runtime.
    pub const RUNTIME: Self = Self {
        min: MIN_COMPATIBLE_LANGUAGE_VERSION,
        max: LANGUAGE_VERSION,
    };

    /// Builds the range `min..=max`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionRangeError`] if `min > max`.
    pub fn new(min: u32, max: u32) -> Result<Self, VersionRangeError> {
        if min > max {
            return Err(VersionRangeError { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lowest accepted version.
    #[must_use]
    pub fn min(self) -> u32 {
        self.min
    }

    /// Highest accepted version.
    #[must_use]
    pub fn max(self) -> u32 {
        self.max
    }

    /// Returns `true` if an artifact declaring `version` may be loaded.
    #[must_use]
    pub fn contains(self, version: u32) -> bool {
        (self.min..=self.max).contains(&version)
    }
}

impl Default for VersionRange {
    fn default() -> Self {
        Self::RUNTIME
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_range() {
        let range = VersionRange::default();
        assert_eq!(range, VersionRange::RUNTIME);
        assert_eq!(range.to_string(), "[13, 15]");
        assert!(range.contains(13));
        assert!(range.contains(14));
        assert!(range.contains(15));
        assert!(!range.contains(9));
        assert!(!range.contains(16));
    }

    #[test]
    fn test_single_version_range() {
        let range = VersionRange::new(14, 14).unwrap();
        assert!(range.contains(14));
        assert!(!range.contains(13));
    }

    #[test]
    fn test_rejects_inverted_range() {
        assert_eq!(
            VersionRange::new(15, 13),
            Err(VersionRangeError { min: 15, max: 13 })
        );
    }
}
