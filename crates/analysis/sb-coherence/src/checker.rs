//! Whole-set coherence check.
#![allow(
    clippy::min_ident_chars,
    reason = "a and b are the two impls of a pair"
)]

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use tracing::{debug, info};

use crate::{
    error::{CoherenceError, CoherenceResult},
    infer::InferCtxt,
    orphan::{is_orphan, LocalItems},
    overlap::{check_pair, PairOutcome},
    resolve::BoundResolver,
    ty::{ImplId, TraitId, TraitImpl},
};

/// Default maximum nesting of bound resolution.
pub const DEFAULT_RECURSION_LIMIT: usize = 64;

/// Outcome of a coherence check over a set of impls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoherenceReport {
    /// Orphan, overlap and overflow errors in the order they were found
    pub errors: Vec<CoherenceError>,
    /// Impls that passed the orphan rule, in registration order
    pub admitted: Vec<ImplId>,
}

impl CoherenceReport {
    /// Returns `true` if no error was found.
    #[must_use]
    pub fn is_coherent(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks a compilation unit's impls for orphans and overlaps.
#[derive(Debug, Clone, Copy)]
pub struct CoherenceChecker<'local> {
    local: &'local LocalItems,
    recursion_limit: usize,
}

impl<'local> CoherenceChecker<'local> {
    /// Creates a checker for the unit whose local items are `local`.
    #[must_use]
    pub fn new(local: &'local LocalItems) -> Self {
        Self {
            local,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    /// Sets the maximum nesting of bound resolution.
    #[must_use]
    pub fn with_recursion_limit(mut self, recursion_limit: usize) -> Self {
        self.recursion_limit = recursion_limit;
        self
    }

    /// Checks `impls`.
    ///
    /// Orphans are reported and excluded; every remaining pair of impls of
    /// the same trait is then compared. Errors in the returned report
    /// accumulate over the whole set.
    ///
    /// # Errors
    ///
    /// [`CoherenceError::DuplicateImplId`] and
    /// [`CoherenceError::MalformedImpl`] abort the check.
    pub fn check(&self, impls: &[TraitImpl]) -> CoherenceResult<CoherenceReport> {
        let mut seen = FxHashSet::default();
        for imp in impls {
            if !seen.insert(imp.id) {
                return Err(CoherenceError::DuplicateImplId(imp.id));
            }
            InferCtxt::new().instantiate(imp)?;
        }

        let mut report = CoherenceReport::default();
        let mut by_trait: IndexMap<TraitId, Vec<&TraitImpl>> = IndexMap::new();
        for imp in impls {
            if is_orphan(imp, self.local) {
                debug!(impl_id = %imp.id, "orphan impl");
                report.errors.push(CoherenceError::OrphanImpl {
                    impl_id: imp.id,
                    trait_id: imp.trait_id,
                    span: imp.span,
                });
                continue;
            }
            report.admitted.push(imp.id);
            by_trait.entry(imp.trait_id).or_default().push(imp);
        }

        let resolver = BoundResolver::new(&by_trait, self.recursion_limit);
        let mut pairs = 0_usize;
        for (trait_id, group) in &by_trait {
            for (i, a) in group.iter().enumerate() {
                for b in &group[i + 1..] {
                    pairs += 1;
                    match check_pair(&resolver, a, b)? {
                        PairOutcome::Disjoint => {}
                        PairOutcome::Overlapping(substitution) => {
                            report.errors.push(CoherenceError::Overlapping {
                                trait_id: *trait_id,
                                impl_a: a.id,
                                impl_b: b.id,
                                substitution,
                            });
                        }
                        PairOutcome::RecursionLimit => {
                            report.errors.push(CoherenceError::CoherenceRecursionLimit {
                                impl_a: a.id,
                                impl_b: b.id,
                                limit: self.recursion_limit,
                            });
                        }
                    }
                }
            }
        }

        info!(
            impls = impls.len(),
            admitted = report.admitted.len(),
            pairs,
            errors = report.errors.len(),
            "coherence check finished"
        );
        Ok(report)
    }
}
