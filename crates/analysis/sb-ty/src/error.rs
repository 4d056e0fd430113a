//! LUB/GLB and subtyping errors.

use sb_region::{BoundRegion, FreeRegion, RegionError, RegionId};
use thiserror::Error;

/// Result type for lattice operations.
pub type LatticeResult<T> = Result<T, LatticeError>;

/// Why two signatures have no common bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundMismatch {
    /// Different numbers of parameters or tuple elements.
    Arity {
        /// Count on the left
        left: usize,
        /// Count on the right
        right: usize,
    },
    /// Incompatible type constructors, base types or reference mutability.
    Structure,
    /// Two free regions without a declared ordering had to be combined.
    UnrelatedRegions {
        /// Left-hand region
        left: FreeRegion,
        /// Right-hand region
        right: FreeRegion,
    },
    /// The region constraints produced by the combination cannot be solved.
    Unsolvable(RegionError),
}

/// Errors from computing a LUB, GLB or subtyping relation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LatticeError {
    /// The two signatures have no join (or meet).
    #[error("no common bound exists: {0:?}")]
    NoCommonBound(BoundMismatch),

    /// A signature refers to a bound region outside its binder.
    #[error("bound region {0} is not declared by the signature's binder")]
    UnboundRegion(BoundRegion),

    /// A signature carried an inference variable from another session.
    #[error("signature contains inference variable {0:?} from another session")]
    ForeignVariable(RegionId),

    /// Generalization found a variable tied to no left-hand bound region.
    #[error("region variable {0:?} cannot be generalized")]
    Ungeneralizable(RegionId),

    /// The region engine failed in a way that indicates a solver bug.
    #[error("internal region error: {0}")]
    Internal(RegionError),
}

impl LatticeError {
    /// Returns `true` for errors that indicate a bug in the engine rather
    /// than incompatible or malformed input.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Ungeneralizable(_) | Self::Internal(_))
    }

    /// Classifies a region solving failure.
    pub(crate) fn from_solve(error: RegionError) -> Self {
        if error.is_internal() {
            Self::Internal(error)
        } else {
            Self::NoCommonBound(BoundMismatch::Unsolvable(error))
        }
    }
}

impl From<RegionError> for LatticeError {
    fn from(error: RegionError) -> Self {
        Self::Internal(error)
    }
}
