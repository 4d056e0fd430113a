//! Trait impl declarations as seen by the coherence checker.
#![allow(
    clippy::min_ident_chars,
    reason = "Ty is the conventional name in type system implementations"
)]

use sb_intern::Symbol;
use sb_span::{FileId, FileSpan};
use sb_ty::Mutability;
use std::fmt;

/// Trait identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraitId(pub Symbol);

/// Nominal type definition identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeDefId(pub Symbol);

/// Impl identifier, unique within one coherence check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImplId(pub u32);

impl fmt::Display for ImplId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "impl#{}", self.0)
    }
}

/// Unification variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TyVar(pub u32);

/// Region position in an impl header. Coherence never looks at regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImplRegion {
    /// Lifetime parameter of the impl, by generics index
    Param(u32),
    /// Named region from outside the impl
    Named(Symbol),
}

/// Type in an impl header or bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImplTy {
    /// Type parameter of the impl, by generics index
    Param(u32),
    /// Unification variable, only produced while checking
    Infer(TyVar),
    /// Nominal type applied to arguments
    Adt {
        /// Type definition
        def: TypeDefId,
        /// Generic arguments
        args: Vec<ImplTy>,
    },
    /// Reference type
    Ref {
        /// Ignored by unification
        region: ImplRegion,
        /// Shared or mutable
        mutability: Mutability,
        /// Referent
        inner: Box<ImplTy>,
    },
    /// Tuple type
    Tuple(Vec<ImplTy>),
}

impl ImplTy {
    /// Nominal type without arguments.
    #[must_use]
    pub fn adt(def: TypeDefId) -> Self {
        Self::Adt {
            def,
            args: Vec::new(),
        }
    }

    /// Nominal type applied to `args`.
    #[must_use]
    pub fn adt_with(def: TypeDefId, args: Vec<Self>) -> Self {
        Self::Adt { def, args }
    }

    /// `&'region inner`.
    #[must_use]
    pub fn shared(region: ImplRegion, inner: Self) -> Self {
        Self::Ref {
            region,
            mutability: Mutability::Shared,
            inner: Box::new(inner),
        }
    }

    /// `&'region mut inner`.
    #[must_use]
    pub fn mutable(region: ImplRegion, inner: Self) -> Self {
        Self::Ref {
            region,
            mutability: Mutability::Mut,
            inner: Box::new(inner),
        }
    }
}

/// `self_ty: trait_id<args>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraitPredicate {
    /// Trait that must be implemented
    pub trait_id: TraitId,
    /// Implementing type
    pub self_ty: ImplTy,
    /// Trait arguments
    pub args: Vec<ImplTy>,
}

/// Bound on a type parameter; the parameter is the bound's self type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraitBound {
    /// Required trait
    pub trait_id: TraitId,
    /// Trait arguments
    pub args: Vec<ImplTy>,
}

impl TraitBound {
    /// Bound on a trait without arguments.
    #[must_use]
    pub fn new(trait_id: TraitId) -> Self {
        Self {
            trait_id,
            args: Vec::new(),
        }
    }
}

/// Kind of a generic parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenericParamKind {
    /// Type parameter with its inline bounds
    Type {
        /// Bounds the parameter must satisfy
        bounds: Vec<TraitBound>,
    },
    /// Lifetime parameter
    Lifetime,
}

/// Generic parameter of an impl.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericParam {
    /// Parameter name
    pub name: Symbol,
    /// Type or lifetime
    pub kind: GenericParamKind,
}

/// A trait implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitImpl {
    /// Impl identifier
    pub id: ImplId,
    /// Implemented trait
    pub trait_id: TraitId,
    /// Generic parameters; `ImplTy::Param(i)` refers to `generics[i]`
    pub generics: Vec<GenericParam>,
    /// Implementing type
    pub self_ty: ImplTy,
    /// Trait arguments
    pub trait_args: Vec<ImplTy>,
    /// Where clauses beyond the inline parameter bounds
    pub where_clauses: Vec<TraitPredicate>,
    /// Location of the impl header
    pub span: FileSpan,
}

impl TraitImpl {
    /// Creates a non-generic impl of `trait_id` for `self_ty`.
    #[must_use]
    pub fn new(id: ImplId, trait_id: TraitId, self_ty: ImplTy) -> Self {
        Self {
            id,
            trait_id,
            generics: Vec::new(),
            self_ty,
            trait_args: Vec::new(),
            where_clauses: Vec::new(),
            span: FileSpan::detached(FileId(0)),
        }
    }

    /// Appends a type parameter and returns the impl.
    ///
    /// The parameter is referred to as `ImplTy::Param(i)` where `i` is the
    /// number of generic parameters declared before it.
    #[must_use]
    pub fn with_type_param(mut self, name: Symbol, bounds: Vec<TraitBound>) -> Self {
        self.generics.push(GenericParam {
            name,
            kind: GenericParamKind::Type { bounds },
        });
        self
    }

    /// Appends a lifetime parameter and returns the impl.
    #[must_use]
    pub fn with_lifetime_param(mut self, name: Symbol) -> Self {
        self.generics.push(GenericParam {
            name,
            kind: GenericParamKind::Lifetime,
        });
        self
    }

    /// Sets the trait arguments.
    #[must_use]
    pub fn with_trait_args(mut self, args: Vec<ImplTy>) -> Self {
        self.trait_args = args;
        self
    }

    /// Adds a where clause.
    #[must_use]
    pub fn with_where(mut self, predicate: TraitPredicate) -> Self {
        self.where_clauses.push(predicate);
        self
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_span(mut self, span: FileSpan) -> Self {
        self.span = span;
        self
    }

    /// Every obligation of the impl: inline bounds first, then where clauses.
    pub fn predicates(&self) -> impl Iterator<Item = TraitPredicate> + '_ {
        let inline = self.generics.iter().zip(0..).flat_map(|(param, index)| {
            let bounds: &[TraitBound] = match &param.kind {
                GenericParamKind::Type { bounds } => bounds,
                GenericParamKind::Lifetime => &[],
            };
            bounds.iter().map(move |bound| TraitPredicate {
                trait_id: bound.trait_id,
                self_ty: ImplTy::Param(index),
                args: bound.args.clone(),
            })
        });
        inline.chain(self.where_clauses.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_intern::Interner;

    #[test]
    fn test_predicates_follow_declaration_order() {
        let interner = Interner::new();
        let show = TraitId(interner.intern("Show"));
        let eq = TraitId(interner.intern("Eq"));
        let vec = TypeDefId(interner.intern("Vec"));

        let imp = TraitImpl::new(ImplId(0), show, ImplTy::adt_with(vec, vec![ImplTy::Param(1)]))
            .with_lifetime_param(interner.intern("a"))
            .with_type_param(interner.intern("T"), vec![TraitBound::new(show), TraitBound::new(eq)])
            .with_where(TraitPredicate {
                trait_id: eq,
                self_ty: ImplTy::adt_with(vec, vec![ImplTy::Param(1)]),
                args: Vec::new(),
            });

        let traits: Vec<_> = imp.predicates().map(|predicate| predicate.trait_id).collect();
        assert_eq!(traits, vec![show, eq, eq]);
        let first = imp.predicates().next().unwrap();
        assert_eq!(first.self_ty, ImplTy::Param(1));
    }

    #[test]
    fn test_impl_id_display() {
        assert_eq!(ImplId(7).to_string(), "impl#7");
    }
}
