//! Declared ordering between free regions.
#![allow(
    clippy::min_ident_chars,
    reason = "a and b are the two regions being combined"
)]

use rustc_hash::{FxHashMap, FxHashSet};

use crate::region::{ConcreteRegion, FreeRegion};

/// Caller-supplied `a <= b` facts between free regions.
///
/// The relation is queried transitively. Regions that are not connected by
/// any chain of declared facts are unrelated: they have neither a least upper
/// bound nor a greatest lower bound.
#[derive(Debug, Clone, Default)]
pub struct FreeRegionMap {
    /// `sub -> [sup, ...]` in declaration order
    supers: FxHashMap<FreeRegion, Vec<FreeRegion>>,
}

impl FreeRegionMap {
    /// Creates a map in which every free region is related only to itself.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `sub <= sup`.
    pub fn relate(&mut self, sub: FreeRegion, sup: FreeRegion) {
        let supers = self.supers.entry(sub).or_default();
        if !supers.contains(&sup) {
            supers.push(sup);
        }
    }

    /// Builder form of [`relate`](Self::relate).
    #[must_use]
    pub fn with(mut self, sub: FreeRegion, sup: FreeRegion) -> Self {
        self.relate(sub, sup);
        self
    }

    /// Returns `true` if `sub <= sup` follows from the declared facts.
    #[must_use]
    pub fn sub_free_region(&self, sub: FreeRegion, sup: FreeRegion) -> bool {
        if sub == sup {
            return true;
        }

        let mut visited = FxHashSet::default();
        let mut stack = vec![sub];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            for &next in self.supers.get(&current).into_iter().flatten() {
                if next == sup {
                    return true;
                }
                stack.push(next);
            }
        }
        false
    }

    /// Least upper bound of two free regions, if they are related.
    #[must_use]
    pub fn lub_free_regions(&self, a: FreeRegion, b: FreeRegion) -> Option<FreeRegion> {
        if self.sub_free_region(a, b) {
            Some(b)
        } else if self.sub_free_region(b, a) {
            Some(a)
        } else {
            None
        }
    }

    /// Greatest lower bound of two free regions, if they are related.
    #[must_use]
    pub fn glb_free_regions(&self, a: FreeRegion, b: FreeRegion) -> Option<FreeRegion> {
        if self.sub_free_region(a, b) {
            Some(a)
        } else if self.sub_free_region(b, a) {
            Some(b)
        } else {
            None
        }
    }

    /// `sub <= sup` over concrete regions. Placeholders only relate to themselves.
    #[must_use]
    pub fn sub_concrete(&self, sub: ConcreteRegion, sup: ConcreteRegion) -> bool {
        match (sub, sup) {
            (ConcreteRegion::Free(lo), ConcreteRegion::Free(hi)) => self.sub_free_region(lo, hi),
            _ => sub == sup,
        }
    }

    /// Least upper bound over concrete regions.
    #[must_use]
    pub fn lub_concrete(&self, a: ConcreteRegion, b: ConcreteRegion) -> Option<ConcreteRegion> {
        match (a, b) {
            (ConcreteRegion::Free(left), ConcreteRegion::Free(right)) => {
                self.lub_free_regions(left, right).map(ConcreteRegion::Free)
            }
            _ => (a == b).then_some(a),
        }
    }

    /// Greatest lower bound over concrete regions.
    #[must_use]
    pub fn glb_concrete(&self, a: ConcreteRegion, b: ConcreteRegion) -> Option<ConcreteRegion> {
        match (a, b) {
            (ConcreteRegion::Free(left), ConcreteRegion::Free(right)) => {
                self.glb_free_regions(left, right).map(ConcreteRegion::Free)
            }
            _ => (a == b).then_some(a),
        }
    }
}
