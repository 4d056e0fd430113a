//! Orphan rule.

use rustc_hash::FxHashSet;
use std::iter;

use crate::ty::{ImplTy, TraitId, TraitImpl, TypeDefId};

/// Traits and types defined by the compilation unit being checked.
#[derive(Debug, Clone, Default)]
pub struct LocalItems {
    traits: FxHashSet<TraitId>,
    types: FxHashSet<TypeDefId>,
}

impl LocalItems {
    /// Creates an empty set: nothing is local.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `trait_id` as local and returns the set.
    #[must_use]
    pub fn with_trait(mut self, trait_id: TraitId) -> Self {
        self.add_trait(trait_id);
        self
    }

    /// Marks `def` as local and returns the set.
    #[must_use]
    pub fn with_type(mut self, def: TypeDefId) -> Self {
        self.add_type(def);
        self
    }

    /// Marks `trait_id` as local.
    pub fn add_trait(&mut self, trait_id: TraitId) {
        self.traits.insert(trait_id);
    }

    /// Marks `def` as local.
    pub fn add_type(&mut self, def: TypeDefId) {
        self.types.insert(def);
    }

    /// Returns `true` if the trait is defined locally.
    #[must_use]
    pub fn is_local_trait(&self, trait_id: TraitId) -> bool {
        self.traits.contains(&trait_id)
    }

    /// Returns `true` if the type is defined locally.
    #[must_use]
    pub fn is_local_type(&self, def: TypeDefId) -> bool {
        self.types.contains(&def)
    }
}

/// Returns `true` if `imp` may not be declared in this compilation unit.
pub(crate) fn is_orphan(imp: &TraitImpl, local: &LocalItems) -> bool {
    if local.is_local_trait(imp.trait_id) {
        return false;
    }
    !iter::once(&imp.self_ty)
        .chain(&imp.trait_args)
        .any(|ty| has_local_root(ty, local))
}

/// References are fundamental: `&Local` is as local as `Local`.
fn has_local_root(ty: &ImplTy, local: &LocalItems) -> bool {
    match ty {
        ImplTy::Adt { def, .. } => local.is_local_type(*def),
        ImplTy::Ref { inner, .. } => has_local_root(inner, local),
        ImplTy::Param(_) | ImplTy::Infer(_) | ImplTy::Tuple(_) => false,
    }
}
