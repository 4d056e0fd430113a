//! Pairwise overlap check between two impls of the same trait.
#![allow(
    clippy::min_ident_chars,
    reason = "a and b are the two impls of a pair"
)]

use sb_intern::Symbol;
use tracing::debug;

use crate::{
    error::{CoherenceResult, ImplSubstitution},
    infer::{InferCtxt, Instantiated, UnifyError},
    resolve::{BoundResolver, Evaluation},
    ty::{ImplTy, TraitImpl},
};

/// Result of comparing two impls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PairOutcome {
    Disjoint,
    Overlapping(ImplSubstitution),
    RecursionLimit,
}

/// Decides whether `a` and `b` can apply to the same types.
///
/// Both headers are instantiated with fresh variables and unified; if that
/// succeeds, every obligation of both impls must still possibly hold under
/// the unifying substitution for the pair to overlap. One obligation that
/// cannot hold makes the pair disjoint even if another one overflows.
pub(crate) fn check_pair(
    resolver: &BoundResolver<'_>,
    a: &TraitImpl,
    b: &TraitImpl,
) -> CoherenceResult<PairOutcome> {
    let mut infcx = InferCtxt::new();
    let left = infcx.instantiate(a)?;
    let right = infcx.instantiate(b)?;

    if let Err(error) = infcx
        .unify(&left.self_ty, &right.self_ty)
        .and_then(|()| infcx.unify_all(&left.trait_args, &right.trait_args))
    {
        match error {
            UnifyError::Mismatch { left: left_ty, right: right_ty } => {
                debug!(impl_a = %a.id, impl_b = %b.id, ?left_ty, ?right_ty, "headers do not unify");
            }
            UnifyError::OccursCheck { var, ty } => {
                debug!(impl_a = %a.id, impl_b = %b.id, ?var, ?ty, "headers do not unify: occurs check");
            }
        }
        return Ok(PairOutcome::Disjoint);
    }

    let predicates = left.predicates.iter().chain(&right.predicates);
    match resolver.all_may_hold(&mut infcx, predicates, 0)? {
        Evaluation::MayHold => {}
        Evaluation::DoesNotHold => {
            debug!(impl_a = %a.id, impl_b = %b.id, "obligation cannot hold");
            return Ok(PairOutcome::Disjoint);
        }
        Evaluation::Overflow => {
            debug!(impl_a = %a.id, impl_b = %b.id, limit = resolver.recursion_limit(), "overflow");
            return Ok(PairOutcome::RecursionLimit);
        }
    }

    Ok(PairOutcome::Overlapping(ImplSubstitution {
        left: resolved_params(&infcx, &left),
        right: resolved_params(&infcx, &right),
    }))
}

fn resolved_params(infcx: &InferCtxt, instantiated: &Instantiated) -> Vec<(Symbol, ImplTy)> {
    instantiated
        .params
        .iter()
        .flatten()
        .map(|(name, var)| (*name, infcx.resolve(var)))
        .collect()
}
