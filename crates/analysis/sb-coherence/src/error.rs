//! Coherence errors.

use sb_intern::Symbol;
use sb_span::FileSpan;
use thiserror::Error;

use crate::ty::{ImplId, ImplTy, TraitId, TyVar};

/// Result type for coherence checking.
pub type CoherenceResult<T> = Result<T, CoherenceError>;

/// Resolved types of each impl's type parameters at an overlap.
///
/// A type that is still a unification variable overlaps for any type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplSubstitution {
    /// Parameters of the first impl, in declaration order
    pub left: Vec<(Symbol, ImplTy)>,
    /// Parameters of the second impl, in declaration order
    pub right: Vec<(Symbol, ImplTy)>,
}

/// Why an impl declaration cannot be checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformed {
    /// `ImplTy::Param(i)` where `generics[i]` is missing or a lifetime
    NotATypeParam(u32),
    /// A unification variable in a declaration
    InferenceVariable(TyVar),
}

/// Coherence errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoherenceError {
    /// Neither the trait nor any root type of the header is local.
    #[error("{impl_id} of trait {trait_id:?} is an orphan: neither the trait nor a type in its header is local")]
    OrphanImpl {
        /// Rejected impl
        impl_id: ImplId,
        /// Implemented trait
        trait_id: TraitId,
        /// Location of the impl
        span: FileSpan,
    },

    /// Two impls of the same trait apply to the same types.
    #[error("conflicting implementations of {trait_id:?}: {impl_a} and {impl_b}")]
    Overlapping {
        /// Trait implemented by both
        trait_id: TraitId,
        /// Earlier impl
        impl_a: ImplId,
        /// Later impl
        impl_b: ImplId,
        /// Substitution under which both apply
        substitution: ImplSubstitution,
    },

    /// Bound resolution for a pair did not finish within the limit.
    #[error("overflow checking {impl_a} against {impl_b}: recursion limit {limit} reached")]
    CoherenceRecursionLimit {
        /// Earlier impl
        impl_a: ImplId,
        /// Later impl
        impl_b: ImplId,
        /// Limit in effect
        limit: usize,
    },

    /// Two impls were registered under the same id.
    #[error("{0} was registered twice")]
    DuplicateImplId(ImplId),

    /// An impl declaration is inconsistent with its own generics.
    #[error("{impl_id} is malformed: {reason:?}")]
    MalformedImpl {
        /// Offending impl
        impl_id: ImplId,
        /// What is wrong with it
        reason: Malformed,
    },
}

impl CoherenceError {
    /// Returns `true` for errors caused by inconsistent input rather than
    /// by the impls themselves.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::DuplicateImplId(_) | Self::MalformedImpl { .. })
    }
}
