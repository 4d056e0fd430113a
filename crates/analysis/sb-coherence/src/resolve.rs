//! Depth-bounded search for impls that may satisfy a trait predicate.
#![allow(
    clippy::min_ident_chars,
    reason = "T is the conventional type parameter name"
)]

use indexmap::IndexMap;
use tracing::trace;

use crate::{
    error::CoherenceResult,
    infer::InferCtxt,
    ty::{ImplTy, TraitId, TraitImpl, TraitPredicate},
};

/// Outcome of asking whether a predicate may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Evaluation {
    /// Some impl may apply, or the self type is still unknown
    MayHold,
    /// No impl can apply
    DoesNotHold,
    /// The search went deeper than the recursion limit
    Overflow,
}

/// Answers "could this predicate hold for some instantiation?".
pub(crate) struct BoundResolver<'impls> {
    impls: &'impls IndexMap<TraitId, Vec<&'impls TraitImpl>>,
    recursion_limit: usize,
}

impl<'impls> BoundResolver<'impls> {
    pub(crate) fn new(impls: &'impls IndexMap<TraitId, Vec<&'impls TraitImpl>>, recursion_limit: usize) -> Self {
        Self {
            impls,
            recursion_limit,
        }
    }

    pub(crate) fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }

    /// Evaluates `goal` at nesting depth `depth`.
    ///
    /// Every candidate is tried in isolation; bindings made while trying it
    /// are rolled back. The predicate may hold if any candidate may apply,
    /// so the answer does not depend on the order candidates are listed in.
    pub(crate) fn may_hold(
        &self,
        infcx: &mut InferCtxt,
        goal: &TraitPredicate,
        depth: usize,
    ) -> CoherenceResult<Evaluation> {
        if depth > self.recursion_limit {
            trace!(depth, trait_id = ?goal.trait_id, "recursion limit reached");
            return Ok(Evaluation::Overflow);
        }
        if matches!(infcx.shallow_resolve(&goal.self_ty), ImplTy::Infer(_)) {
            return Ok(Evaluation::MayHold);
        }

        let mut overflowed = false;
        for candidate in self.impls.get(&goal.trait_id).into_iter().flatten() {
            let snapshot = infcx.snapshot();
            let evaluation = self.try_candidate(infcx, goal, candidate, depth);
            infcx.rollback(snapshot);
            match evaluation? {
                Evaluation::MayHold => return Ok(Evaluation::MayHold),
                Evaluation::Overflow => overflowed = true,
                Evaluation::DoesNotHold => {}
            }
        }

        Ok(if overflowed {
            Evaluation::Overflow
        } else {
            Evaluation::DoesNotHold
        })
    }

    fn try_candidate(
        &self,
        infcx: &mut InferCtxt,
        goal: &TraitPredicate,
        candidate: &TraitImpl,
        depth: usize,
    ) -> CoherenceResult<Evaluation> {
        let instantiated = infcx.instantiate(candidate)?;
        if infcx.unify(&goal.self_ty, &instantiated.self_ty).is_err()
            || infcx.unify_all(&goal.args, &instantiated.trait_args).is_err()
        {
            return Ok(Evaluation::DoesNotHold);
        }

        let evaluation = self.all_may_hold(infcx, &instantiated.predicates, depth + 1)?;
        if evaluation == Evaluation::MayHold {
            trace!(impl_id = %candidate.id, depth, "candidate may apply");
        }
        Ok(evaluation)
    }

    /// Evaluates a conjunction of predicates.
    ///
    /// A predicate that cannot hold decides the result even when another one
    /// overflows, so the order of the predicates does not matter.
    pub(crate) fn all_may_hold<'pred>(
        &self,
        infcx: &mut InferCtxt,
        predicates: impl IntoIterator<Item = &'pred TraitPredicate>,
        depth: usize,
    ) -> CoherenceResult<Evaluation> {
        let mut overflowed = false;
        for predicate in predicates {
            match self.may_hold(infcx, predicate, depth)? {
                Evaluation::MayHold => {}
                Evaluation::DoesNotHold => {
                    trace!(trait_id = ?predicate.trait_id, depth, "obligation cannot hold");
                    return Ok(Evaluation::DoesNotHold);
                }
                Evaluation::Overflow => overflowed = true,
            }
        }

        Ok(if overflowed {
            Evaluation::Overflow
        } else {
            Evaluation::MayHold
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::{ImplId, TraitBound, TypeDefId};
    use sb_intern::Interner;

    struct Fixture {
        interner: Interner,
        impls: Vec<TraitImpl>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                interner: Interner::new(),
                impls: Vec::new(),
            }
        }

        fn trait_id(&self, name: &str) -> TraitId {
            TraitId(self.interner.intern(name))
        }

        fn ty(&self, name: &str) -> ImplTy {
            ImplTy::adt(TypeDefId(self.interner.intern(name)))
        }

        fn add(&mut self, imp: TraitImpl) {
            self.impls.push(imp);
        }

        fn index(&self) -> IndexMap<TraitId, Vec<&TraitImpl>> {
            let mut map: IndexMap<TraitId, Vec<&TraitImpl>> = IndexMap::new();
            for imp in &self.impls {
                map.entry(imp.trait_id).or_default().push(imp);
            }
            map
        }

        fn goal(&self, trait_name: &str, self_ty: ImplTy) -> TraitPredicate {
            TraitPredicate {
                trait_id: self.trait_id(trait_name),
                self_ty,
                args: Vec::new(),
            }
        }
    }

    #[test]
    fn test_concrete_impl_satisfies_goal() {
        let mut fx = Fixture::new();
        fx.add(TraitImpl::new(ImplId(0), fx.trait_id("Show"), fx.ty("int")));
        let index = fx.index();
        let resolver = BoundResolver::new(&index, 8);
        let mut infcx = InferCtxt::new();

        let holds = resolver.may_hold(&mut infcx, &fx.goal("Show", fx.ty("int")), 0).unwrap();
        let fails = resolver.may_hold(&mut infcx, &fx.goal("Show", fx.ty("bool")), 0).unwrap();
        assert_eq!(holds, Evaluation::MayHold);
        assert_eq!(fails, Evaluation::DoesNotHold);
    }

    #[test]
    fn test_unknown_self_type_may_hold() {
        let fx = Fixture::new();
        let index = fx.index();
        let resolver = BoundResolver::new(&index, 8);
        let mut infcx = InferCtxt::new();
        let var = infcx.fresh_var();

        let evaluation = resolver.may_hold(&mut infcx, &fx.goal("Show", var), 0).unwrap();
        assert_eq!(evaluation, Evaluation::MayHold);
    }

    #[test]
    fn test_nested_bounds_are_checked() {
        let mut fx = Fixture::new();
        let t = fx.interner.intern("T");
        let show = fx.trait_id("Show");
        let vec = TypeDefId(fx.interner.intern("Vec"));
        fx.add(TraitImpl::new(ImplId(0), show, fx.ty("int")));
        fx.add(
            TraitImpl::new(ImplId(1), show, ImplTy::adt_with(vec, vec![ImplTy::Param(0)]))
                .with_type_param(t, vec![TraitBound::new(show)]),
        );
        let index = fx.index();
        let resolver = BoundResolver::new(&index, 8);
        let mut infcx = InferCtxt::new();

        let vec_int = ImplTy::adt_with(vec, vec![fx.ty("int")]);
        let vec_bool = ImplTy::adt_with(vec, vec![fx.ty("bool")]);
        assert_eq!(
            resolver.may_hold(&mut infcx, &fx.goal("Show", vec_int), 0).unwrap(),
            Evaluation::MayHold
        );
        assert_eq!(
            resolver.may_hold(&mut infcx, &fx.goal("Show", vec_bool), 0).unwrap(),
            Evaluation::DoesNotHold
        );
    }

    #[test]
    fn test_self_referential_bound_overflows() {
        let mut fx = Fixture::new();
        let t = fx.interner.intern("T");
        let looping = fx.trait_id("Loop");
        fx.add(
            TraitImpl::new(ImplId(0), looping, ImplTy::Param(0))
                .with_type_param(t, vec![TraitBound::new(looping)]),
        );
        let index = fx.index();
        let resolver = BoundResolver::new(&index, 4);
        let mut infcx = InferCtxt::new();

        let evaluation = resolver.may_hold(&mut infcx, &fx.goal("Loop", fx.ty("int")), 0).unwrap();
        assert_eq!(evaluation, Evaluation::Overflow);
    }

    #[test]
    fn test_failing_where_clause_beats_overflow() {
        let mut fx = Fixture::new();
        let t = fx.interner.intern("T");
        let looping = fx.trait_id("Loop");
        let copy = fx.trait_id("Copy");
        let loops = fx.goal("Loop", fx.ty("int"));
        let copies = fx.goal("Copy", fx.ty("int"));
        fx.add(
            TraitImpl::new(ImplId(0), looping, ImplTy::Param(0))
                .with_type_param(t, vec![TraitBound::new(looping)]),
        );
        fx.add(TraitImpl::new(ImplId(1), copy, fx.ty("bool")));
        fx.add(
            TraitImpl::new(ImplId(2), fx.trait_id("First"), fx.ty("int"))
                .with_where(loops.clone())
                .with_where(copies.clone()),
        );
        fx.add(
            TraitImpl::new(ImplId(3), fx.trait_id("Second"), fx.ty("int"))
                .with_where(copies)
                .with_where(loops),
        );
        let index = fx.index();
        let resolver = BoundResolver::new(&index, 6);
        let mut infcx = InferCtxt::new();

        let first = resolver.may_hold(&mut infcx, &fx.goal("First", fx.ty("int")), 0).unwrap();
        let second = resolver.may_hold(&mut infcx, &fx.goal("Second", fx.ty("int")), 0).unwrap();
        assert_eq!(first, Evaluation::DoesNotHold);
        assert_eq!(second, Evaluation::DoesNotHold);
    }
}
