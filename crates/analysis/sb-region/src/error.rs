//! Region solving errors.

use thiserror::Error;

use crate::region::{Region, RegionId};

/// Result type for region graph operations.
pub type RegionResult<T> = Result<T, RegionError>;

/// Errors produced by the region graph.
///
/// `NoCommonRegion` and `UnsatisfiableConstraint` are consequences of the
/// constraints a caller recorded. The remaining variants mean the inference
/// engine itself misbehaved and must not be reported as user errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    /// A variable reached resolution without constraints or a default.
    #[error("region variable {0:?} is unconstrained")]
    UnconstrainedRegion(RegionId),

    /// `resolve` was called before `solve`, or after a later mutation.
    #[error("region graph has not been solved since it was last modified")]
    Unsolved,

    /// Two concrete regions had to be joined or met but are unrelated.
    #[error("regions {a:?} and {b:?} have no common bound")]
    NoCommonRegion {
        /// First region
        a: Region,
        /// Second region
        b: Region,
    },

    /// A constraint does not hold for the solved values.
    #[error("constraint {lo:?} <= {hi:?} cannot be satisfied")]
    UnsatisfiableConstraint {
        /// Shorter-lived side
        lo: RegionId,
        /// Longer-lived side
        hi: RegionId,
    },

    /// The taint closure grew past its configured size.
    #[error("taint set of {root:?} exceeds {limit} regions")]
    TaintLimitExceeded {
        /// Region whose taint set was requested
        root: RegionId,
        /// Configured maximum size
        limit: usize,
    },
}

impl RegionError {
    /// Returns `true` for errors that indicate a solver bug rather than bad input.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        match self {
            Self::UnconstrainedRegion(_) | Self::Unsolved | Self::TaintLimitExceeded { .. } => true,
            Self::NoCommonRegion { .. } | Self::UnsatisfiableConstraint { .. } => false,
        }
    }
}
