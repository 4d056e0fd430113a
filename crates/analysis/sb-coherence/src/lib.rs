//! Trait coherence: orphan rule and pairwise overlap of impls.
//!
//! A set of [`TraitImpl`]s is coherent when no two impls of the same trait
//! can apply to the same self type and trait arguments. The
//! [`CoherenceChecker`] first rejects impls that violate the orphan rule
//! (relative to an explicit [`LocalItems`] set), then compares every
//! remaining pair of impls of the same trait:
//!
//! 1. both headers are instantiated with fresh unification variables and
//!    unified; failure means the pair is disjoint;
//! 2. every bound of both impls must still possibly hold under the unifying
//!    substitution, found by a depth-limited search over the admitted impls;
//!    a bound that cannot hold makes the pair disjoint;
//! 3. otherwise the pair overlaps.
//!
//! Regions never influence the outcome.
#![allow(
    clippy::min_ident_chars,
    reason = "short names mirror the written impls"
)]

mod checker;
mod error;
mod infer;
mod orphan;
mod overlap;
mod resolve;
mod ty;

pub use checker::{CoherenceChecker, CoherenceReport, DEFAULT_RECURSION_LIMIT};
pub use error::{CoherenceError, CoherenceResult, ImplSubstitution, Malformed};
pub use orphan::LocalItems;
pub use ty::{
    GenericParam, GenericParamKind, ImplId, ImplRegion, ImplTy, TraitBound, TraitId, TraitImpl,
    TraitPredicate, TyVar, TypeDefId,
};

#[cfg(test)]
mod tests {
    use super::*;
    use sb_intern::Interner;
    use sb_span::{FileId, FileSpan, Span};

    struct Fixture {
        interner: Interner,
        local: LocalItems,
    }

    impl Fixture {
        fn new() -> Self {
            let interner = Interner::new();
            let local = LocalItems::new().with_trait(TraitId(interner.intern("Trait")));
            Self { interner, local }
        }

        fn trait_id(&self, name: &str) -> TraitId {
            TraitId(self.interner.intern(name))
        }

        fn ty(&self, name: &str) -> ImplTy {
            ImplTy::adt(TypeDefId(self.interner.intern(name)))
        }

        fn check(&self, impls: &[TraitImpl]) -> CoherenceReport {
            CoherenceChecker::new(&self.local).check(impls).unwrap()
        }
    }

    #[test]
    fn test_distinct_concrete_impls_are_disjoint() {
        let fx = Fixture::new();
        let impls = [
            TraitImpl::new(ImplId(0), fx.trait_id("Trait"), fx.ty("int")),
            TraitImpl::new(ImplId(1), fx.trait_id("Trait"), fx.ty("bool")),
        ];

        let report = fx.check(&impls);
        assert!(report.is_coherent());
        assert_eq!(report.admitted, vec![ImplId(0), ImplId(1)]);
    }

    #[test]
    fn test_blanket_impl_overlaps_concrete_impl() {
        let fx = Fixture::new();
        let x = fx.interner.intern("X");
        let impls = [
            TraitImpl::new(ImplId(0), fx.trait_id("Trait"), ImplTy::Param(0)).with_type_param(x, Vec::new()),
            TraitImpl::new(ImplId(1), fx.trait_id("Trait"), fx.ty("int")),
        ];

        let report = fx.check(&impls);
        assert_eq!(
            report.errors,
            vec![CoherenceError::Overlapping {
                trait_id: fx.trait_id("Trait"),
                impl_a: ImplId(0),
                impl_b: ImplId(1),
                substitution: ImplSubstitution {
                    left: vec![(x, fx.ty("int"))],
                    right: Vec::new(),
                },
            }]
        );
    }

    #[test]
    fn test_unsatisfiable_bound_separates_impls() {
        let mut fx = Fixture::new();
        let x = fx.interner.intern("X");
        let copy = fx.trait_id("Copy");
        fx.local.add_trait(copy);
        let impls = [
            TraitImpl::new(ImplId(0), copy, fx.ty("bool")),
            TraitImpl::new(ImplId(1), fx.trait_id("Trait"), ImplTy::Param(0))
                .with_type_param(x, vec![TraitBound::new(copy)]),
            TraitImpl::new(ImplId(2), fx.trait_id("Trait"), fx.ty("int")),
        ];

        assert!(fx.check(&impls).is_coherent());
    }

    #[test]
    fn test_foreign_impl_is_orphan() {
        let fx = Fixture::new();
        let span = FileSpan::new(FileId(2), Span::new(10, 30));
        let show = fx.trait_id("Show");
        let impls = [
            TraitImpl::new(ImplId(0), show, fx.ty("int")).with_span(span),
            TraitImpl::new(ImplId(1), show, fx.ty("int")),
        ];

        let report = fx.check(&impls);
        assert_eq!(report.admitted, Vec::new());
        assert_eq!(report.errors.len(), 2);
        assert_eq!(
            report.errors[0],
            CoherenceError::OrphanImpl {
                impl_id: ImplId(0),
                trait_id: show,
                span,
            }
        );
    }

    #[test]
    fn test_recursion_limit_is_reported() {
        let mut fx = Fixture::new();
        let t = fx.interner.intern("T");
        let looping = fx.trait_id("Loop");
        fx.local.add_trait(looping);
        let impls = [
            TraitImpl::new(ImplId(0), looping, ImplTy::Param(0)).with_type_param(t, vec![TraitBound::new(looping)]),
            TraitImpl::new(ImplId(1), fx.trait_id("Trait"), ImplTy::Param(0))
                .with_type_param(t, vec![TraitBound::new(looping)]),
            TraitImpl::new(ImplId(2), fx.trait_id("Trait"), fx.ty("int")),
        ];

        let report = CoherenceChecker::new(&fx.local)
            .with_recursion_limit(8)
            .check(&impls)
            .unwrap();
        assert_eq!(
            report.errors,
            vec![CoherenceError::CoherenceRecursionLimit {
                impl_a: ImplId(1),
                impl_b: ImplId(2),
                limit: 8,
            }]
        );
    }

    #[test]
    fn test_duplicate_impl_id_aborts() {
        let fx = Fixture::new();
        let impls = [
            TraitImpl::new(ImplId(4), fx.trait_id("Trait"), fx.ty("int")),
            TraitImpl::new(ImplId(4), fx.trait_id("Trait"), fx.ty("bool")),
        ];

        let err = CoherenceChecker::new(&fx.local).check(&impls).unwrap_err();
        assert_eq!(err, CoherenceError::DuplicateImplId(ImplId(4)));
        assert!(err.is_internal());
    }

    #[test]
    fn test_result_does_not_depend_on_order() {
        let fx = Fixture::new();
        let x = fx.interner.intern("X");
        let blanket = TraitImpl::new(ImplId(0), fx.trait_id("Trait"), ImplTy::Param(0)).with_type_param(x, Vec::new());
        let int = TraitImpl::new(ImplId(1), fx.trait_id("Trait"), fx.ty("int"));
        let boolean = TraitImpl::new(ImplId(2), fx.trait_id("Trait"), fx.ty("bool"));

        let forward = fx.check(&[blanket.clone(), int.clone(), boolean.clone()]);
        let backward = fx.check(&[boolean, int, blanket]);
        let pairs = |report: &CoherenceReport| {
            let mut pairs: Vec<_> = report
                .errors
                .iter()
                .map(|error| match error {
                    CoherenceError::Overlapping { impl_a, impl_b, .. } => {
                        (impl_a.0.min(impl_b.0), impl_a.0.max(impl_b.0))
                    }
                    other => panic!("unexpected error {other:?}"),
                })
                .collect();
            pairs.sort_unstable();
            pairs
        };
        assert_eq!(pairs(&forward), vec![(0, 1), (0, 2)]);
        assert_eq!(pairs(&backward), pairs(&forward));
    }

    #[test]
    fn test_failing_bound_wins_over_overflow_in_either_order() {
        let mut fx = Fixture::new();
        let t = fx.interner.intern("T");
        let looping = fx.trait_id("Loop");
        let copy = fx.trait_id("Copy");
        fx.local.add_trait(looping);
        fx.local.add_trait(copy);
        let int_bound = |trait_id| TraitPredicate {
            trait_id,
            self_ty: fx.ty("int"),
            args: Vec::new(),
        };
        let base = [
            TraitImpl::new(ImplId(0), looping, ImplTy::Param(0)).with_type_param(t, vec![TraitBound::new(looping)]),
            TraitImpl::new(ImplId(1), copy, fx.ty("bool")),
        ];
        let loops = TraitImpl::new(ImplId(2), fx.trait_id("Trait"), fx.ty("int")).with_where(int_bound(looping));
        let copies = TraitImpl::new(ImplId(3), fx.trait_id("Trait"), fx.ty("int")).with_where(int_bound(copy));

        let checker = CoherenceChecker::new(&fx.local).with_recursion_limit(6);
        let mut forward = base.to_vec();
        forward.extend([loops.clone(), copies.clone()]);
        let mut backward = base.to_vec();
        backward.extend([copies, loops]);

        let forward = checker.check(&forward).unwrap();
        let backward = checker.check(&backward).unwrap();
        assert!(forward.is_coherent(), "{:?}", forward.errors);
        assert!(backward.is_coherent(), "{:?}", backward.errors);
        assert_eq!(forward.errors, backward.errors);
    }
}
