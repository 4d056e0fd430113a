//! Unification of impl headers.
#![allow(
    clippy::min_ident_chars,
    reason = "Ty is the conventional name in type system implementations"
)]

use rustc_hash::FxHashMap;
use sb_intern::Symbol;
use thiserror::Error;
use tracing::trace;

use crate::{
    error::{CoherenceError, CoherenceResult, Malformed},
    ty::{GenericParamKind, ImplTy, TraitImpl, TraitPredicate, TyVar},
};

/// Unification error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum UnifyError {
    /// Different type constructors
    #[error("cannot unify {left:?} with {right:?}")]
    Mismatch {
        /// Left type, shallowly resolved
        left: ImplTy,
        /// Right type, shallowly resolved
        right: ImplTy,
    },

    /// Binding would create an infinite type
    #[error("{var:?} occurs in {ty:?}")]
    OccursCheck {
        /// Variable being bound
        var: TyVar,
        /// Type containing it
        ty: ImplTy,
    },
}

/// An impl header with its type parameters replaced by fresh variables.
#[derive(Debug, Clone)]
pub(crate) struct Instantiated {
    /// Fresh variable per generic parameter, `None` for lifetimes
    pub(crate) params: Vec<Option<(Symbol, ImplTy)>>,
    pub(crate) self_ty: ImplTy,
    pub(crate) trait_args: Vec<ImplTy>,
    pub(crate) predicates: Vec<TraitPredicate>,
}

/// Saved substitution, restored by [`InferCtxt::rollback`].
pub(crate) struct Snapshot(FxHashMap<TyVar, ImplTy>);

/// Substitution from unification variables to types.
#[derive(Debug, Default)]
pub(crate) struct InferCtxt {
    subst: FxHashMap<TyVar, ImplTy>,
    next_var: u32,
}

impl InferCtxt {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fresh_var(&mut self) -> ImplTy {
        let var = TyVar(self.next_var);
        self.next_var += 1;
        ImplTy::Infer(var)
    }

    /// Replaces every type parameter of `imp` by a fresh variable.
    ///
    /// # Errors
    ///
    /// [`CoherenceError::MalformedImpl`] if the header refers to a generic
    /// parameter that is not a type parameter or carries a variable.
    pub(crate) fn instantiate(&mut self, imp: &TraitImpl) -> CoherenceResult<Instantiated> {
        let params: Vec<Option<(Symbol, ImplTy)>> = imp
            .generics
            .iter()
            .map(|param| match param.kind {
                GenericParamKind::Type { .. } => Some((param.name, self.fresh_var())),
                GenericParamKind::Lifetime => None,
            })
            .collect();

        let subst = |ty: &ImplTy| {
            substitute(ty, &params).map_err(|reason| CoherenceError::MalformedImpl {
                impl_id: imp.id,
                reason,
            })
        };

        let self_ty = subst(&imp.self_ty)?;
        let trait_args = imp
            .trait_args
            .iter()
            .map(subst)
            .collect::<CoherenceResult<Vec<_>>>()?;
        let predicates = imp
            .predicates()
            .map(|predicate| {
                Ok(TraitPredicate {
                    trait_id: predicate.trait_id,
                    self_ty: subst(&predicate.self_ty)?,
                    args: predicate
                        .args
                        .iter()
                        .map(subst)
                        .collect::<CoherenceResult<Vec<_>>>()?,
                })
            })
            .collect::<CoherenceResult<Vec<_>>>()?;

        Ok(Instantiated {
            params,
            self_ty,
            trait_args,
            predicates,
        })
    }

    /// Follows variable bindings until reaching a non-variable or an
    /// unbound variable.
    pub(crate) fn shallow_resolve(&self, ty: &ImplTy) -> ImplTy {
        let mut current = ty;
        while let ImplTy::Infer(var) = current {
            match self.subst.get(var) {
                Some(bound) => current = bound,
                None => break,
            }
        }
        current.clone()
    }

    /// Applies the substitution everywhere in `ty`.
    pub(crate) fn resolve(&self, ty: &ImplTy) -> ImplTy {
        match self.shallow_resolve(ty) {
            ImplTy::Adt { def, args } => ImplTy::Adt {
                def,
                args: args.iter().map(|arg| self.resolve(arg)).collect(),
            },
            ImplTy::Ref {
                region,
                mutability,
                inner,
            } => ImplTy::Ref {
                region,
                mutability,
                inner: Box::new(self.resolve(&inner)),
            },
            ImplTy::Tuple(elements) => {
                ImplTy::Tuple(elements.iter().map(|element| self.resolve(element)).collect())
            }
            resolved @ (ImplTy::Param(_) | ImplTy::Infer(_)) => resolved,
        }
    }

    /// Unifies two types. Regions are ignored.
    ///
    /// # Errors
    ///
    /// Returns `UnifyError` if the types cannot be unified. Bindings made
    /// before the failure are kept; callers roll back through a snapshot.
    pub(crate) fn unify(&mut self, left: &ImplTy, right: &ImplTy) -> Result<(), UnifyError> {
        let left = self.shallow_resolve(left);
        let right = self.shallow_resolve(right);
        if left == right {
            return Ok(());
        }

        match (&left, &right) {
            (ImplTy::Infer(var), other) | (other, ImplTy::Infer(var)) => self.bind(*var, other),

            (
                ImplTy::Adt {
                    def: left_def,
                    args: left_args,
                },
                ImplTy::Adt {
                    def: right_def,
                    args: right_args,
                },
            ) if left_def == right_def => self.unify_all(left_args, right_args),

            (
                ImplTy::Ref {
                    mutability: left_mut,
                    inner: left_inner,
                    ..
                },
                ImplTy::Ref {
                    mutability: right_mut,
                    inner: right_inner,
                    ..
                },
            ) if left_mut == right_mut => self.unify(left_inner, right_inner),

            (ImplTy::Tuple(left_elems), ImplTy::Tuple(right_elems)) => {
                self.unify_all(left_elems, right_elems)
            }

            _ => Err(UnifyError::Mismatch {
                left: left.clone(),
                right: right.clone(),
            }),
        }
    }

    /// Unifies two lists pairwise; lists of different length never unify.
    pub(crate) fn unify_all(&mut self, left: &[ImplTy], right: &[ImplTy]) -> Result<(), UnifyError> {
        if left.len() != right.len() {
            return Err(UnifyError::Mismatch {
                left: ImplTy::Tuple(left.to_vec()),
                right: ImplTy::Tuple(right.to_vec()),
            });
        }
        for (l, r) in left.iter().zip(right) {
            self.unify(l, r)?;
        }
        Ok(())
    }

    fn bind(&mut self, var: TyVar, ty: &ImplTy) -> Result<(), UnifyError> {
        if self.occurs_in(var, ty) {
            return Err(UnifyError::OccursCheck {
                var,
                ty: ty.clone(),
            });
        }
        trace!(?var, ?ty, "bound type variable");
        self.subst.insert(var, ty.clone());
        Ok(())
    }

    fn occurs_in(&self, var: TyVar, ty: &ImplTy) -> bool {
        match self.shallow_resolve(ty) {
            ImplTy::Infer(other) => other == var,
            ImplTy::Adt { args: tys, .. } | ImplTy::Tuple(tys) => {
                tys.iter().any(|ty| self.occurs_in(var, ty))
            }
            ImplTy::Ref { inner, .. } => self.occurs_in(var, &inner),
            ImplTy::Param(_) => false,
        }
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot(self.subst.clone())
    }

    pub(crate) fn rollback(&mut self, snapshot: Snapshot) {
        self.subst = snapshot.0;
    }
}

fn substitute(ty: &ImplTy, params: &[Option<(Symbol, ImplTy)>]) -> Result<ImplTy, Malformed> {
    Ok(match ty {
        ImplTy::Param(index) => params
            .get(*index as usize)
            .and_then(|param| param.as_ref())
            .map(|(_, var)| var.clone())
            .ok_or(Malformed::NotATypeParam(*index))?,
        ImplTy::Infer(var) => return Err(Malformed::InferenceVariable(*var)),
        ImplTy::Adt { def, args } => ImplTy::Adt {
            def: *def,
            args: args
                .iter()
                .map(|arg| substitute(arg, params))
                .collect::<Result<_, _>>()?,
        },
        ImplTy::Ref {
            region,
            mutability,
            inner,
        } => ImplTy::Ref {
            region: *region,
            mutability: *mutability,
            inner: Box::new(substitute(inner, params)?),
        },
        ImplTy::Tuple(elements) => ImplTy::Tuple(
            elements
                .iter()
                .map(|element| substitute(element, params))
                .collect::<Result<_, _>>()?,
        ),
    })
}
