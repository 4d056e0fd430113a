//! A checking session: shared inputs, configured limits and diagnostics.
#![allow(
    clippy::min_ident_chars,
    reason = "a and b are the two signatures being combined"
)]

use sb_coherence::{CoherenceChecker, ImplId, LocalItems, TraitImpl};
use sb_region::FreeRegionMap;
use sb_ty::{FnSig, LatticeCtxt};
use tracing::{debug, info};

use crate::{
    config::SessionConfig,
    diagnostics::{Diagnostic, Diagnostics, Report},
};

/// State shared by the queries of one compilation unit.
///
/// Query failures are recorded rather than returned; the caller collects
/// them all at the end with [`Session::finish`].
#[derive(Debug, Default)]
pub struct Session {
    config: SessionConfig,
    free_regions: FreeRegionMap,
    local: LocalItems,
    diagnostics: Diagnostics,
}

impl Session {
    /// Creates a session with no free region relations and no local items.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replaces the free region ordering.
    #[must_use]
    pub fn with_free_regions(mut self, free_regions: FreeRegionMap) -> Self {
        self.free_regions = free_regions;
        self
    }

    /// Replaces the set of local items.
    #[must_use]
    pub fn with_local_items(mut self, local: LocalItems) -> Self {
        self.local = local;
        self
    }

    /// Configuration in effect.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Free region ordering, for adding relations.
    pub fn free_regions_mut(&mut self) -> &mut FreeRegionMap {
        &mut self.free_regions
    }

    /// Local items, for registering definitions.
    pub fn local_items_mut(&mut self) -> &mut LocalItems {
        &mut self.local
    }

    /// Diagnostics recorded so far.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    fn lattice(&self) -> LatticeCtxt<'_> {
        LatticeCtxt::new(&self.free_regions).with_taint_limit(self.config.taint_limit)
    }

    /// LUB of two signatures, `None` if it failed.
    pub fn lub(&mut self, a: &FnSig, b: &FnSig) -> Option<FnSig> {
        let result = self.lattice().lub(a, b);
        self.record(result)
    }

    /// GLB of two signatures, `None` if it failed.
    pub fn glb(&mut self, a: &FnSig, b: &FnSig) -> Option<FnSig> {
        let result = self.lattice().glb(a, b);
        self.record(result)
    }

    /// Whether `sub <: sup`, `None` if the check itself failed.
    pub fn is_subtype(&mut self, sub: &FnSig, sup: &FnSig) -> Option<bool> {
        let result = self.lattice().is_subtype(sub, sup);
        self.record(result)
    }

    /// Runs the coherence check and returns the impls that were admitted.
    ///
    /// Orphan, overlap and overflow errors are recorded. If the check
    /// aborts, the error is recorded and no impl is admitted.
    pub fn check_impls(&mut self, impls: &[TraitImpl]) -> Vec<ImplId> {
        let checker =
            CoherenceChecker::new(&self.local).with_recursion_limit(self.config.recursion_limit);
        match checker.check(impls) {
            Ok(report) => {
                debug!(errors = report.errors.len(), "coherence report");
                self.diagnostics.extend(report.errors);
                report.admitted
            }
            Err(error) => {
                self.diagnostics.push(error);
                Vec::new()
            }
        }
    }

    fn record<T, E: Into<Diagnostic>>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.diagnostics.push(error);
                None
            }
        }
    }

    /// Ends the session and returns everything it reported.
    #[must_use]
    pub fn finish(self) -> Report {
        let report = self.diagnostics.finish();
        info!(
            errors = report.errors.len(),
            internal = report.internal.len(),
            "session finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_coherence::{CoherenceError, ImplTy, TraitId, TypeDefId};
    use sb_intern::Interner;
    use sb_region::{BoundRegion, FreeRegion, Region};
    use sb_ty::{LatticeError, Ty};

    #[test]
    fn test_session_accumulates_errors() {
        let interner = Interner::new();
        let int = Ty::Base(interner.intern("int"));
        let a = FnSig::returning_unit(0, vec![Ty::shared(Region::Free(FreeRegion(interner.intern("A"))), int.clone())]);
        let z = FnSig::returning_unit(0, vec![Ty::shared(Region::Free(FreeRegion(interner.intern("Z"))), int.clone())]);
        let poly = FnSig::returning_unit(1, vec![Ty::shared(Region::Bound(BoundRegion(0)), int)]);

        let show = TraitId(interner.intern("Show"));
        let foreign = TraitImpl::new(ImplId(0), show, ImplTy::adt(TypeDefId(interner.intern("int"))));

        let mut session = Session::new(SessionConfig::default());
        assert!(session.lub(&a, &z).is_none());
        assert_eq!(session.glb(&poly, &poly), Some(poly.clone()));
        assert_eq!(session.is_subtype(&poly, &a), Some(true));
        assert!(session.check_impls(&[foreign]).is_empty());

        let report = session.finish();
        assert_eq!(report.errors.len(), 2);
        assert!(matches!(report.errors[0], Diagnostic::Lattice(LatticeError::NoCommonBound(_))));
        assert!(matches!(
            report.errors[1],
            Diagnostic::Coherence(CoherenceError::OrphanImpl { .. })
        ));
        assert!(report.internal.is_empty());
    }

    #[test]
    fn test_taint_limit_comes_from_config() {
        let interner = Interner::new();
        let int = Ty::Base(interner.intern("int"));
        let b0 = Region::Bound(BoundRegion(0));
        let b1 = Region::Bound(BoundRegion(1));
        let ab = FnSig::returning_unit(2, vec![Ty::shared(b0, int.clone()), Ty::shared(b1, int.clone())]);
        let aa = FnSig::returning_unit(1, vec![Ty::shared(b0, int.clone()), Ty::shared(b0, int)]);

        let config = SessionConfig {
            taint_limit: 2,
            ..SessionConfig::default()
        };
        let mut session = Session::new(config);
        assert!(session.lub(&ab, &aa).is_none());

        let report = session.finish();
        assert!(report.errors.is_empty());
        assert_eq!(report.internal.len(), 1);
    }
}
