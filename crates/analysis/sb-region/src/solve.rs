//! Fixed-point region solving.
#![allow(
    clippy::min_ident_chars,
    reason = "a and b are the two sides of a failed constraint"
)]

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    error::{RegionError, RegionResult},
    free::FreeRegionMap,
    graph::RegionGraph,
    region::{ConcreteRegion, RegionId},
};

impl RegionGraph {
    /// Assigns a concrete value to every variable that can have one.
    ///
    /// Concrete records and defaults seed the values. Then, until nothing
    /// changes:
    ///
    /// 1. expansion: for `lo <= var`, `var` grows to the least upper bound of
    ///    its value and the value of `lo`;
    /// 2. contraction: a variable that still has no value takes the greatest
    ///    lower bound of the values of its upper bounds.
    ///
    /// Finally every constraint whose two sides have values is verified.
    /// Values only ever grow along a finite order, so the loop terminates.
    ///
    /// # Errors
    ///
    /// [`RegionError::NoCommonRegion`] if two values must be joined or met
    /// but are unrelated, [`RegionError::UnsatisfiableConstraint`] if a
    /// constraint fails verification.
    pub fn solve(&mut self, free_regions: &FreeRegionMap) -> RegionResult<()> {
        let mut values: FxHashMap<RegionId, ConcreteRegion> = FxHashMap::default();
        for (id, data) in self.records() {
            if let Some(value) = data.concrete().or_else(|| self.default_for(id)) {
                values.insert(id, value);
            }
        }

        let mut rounds = 0_usize;
        loop {
            rounds += 1;
            let expanded = self.expand(free_regions, &mut values)?;
            let contracted = self.contract(free_regions, &mut values)?;
            if !expanded && !contracted {
                break;
            }
        }

        self.verify(free_regions, &values)?;
        debug!(
            rounds,
            regions = self.num_regions(),
            constraints = self.num_constraints(),
            "region graph solved"
        );
        self.values = Some(values);
        Ok(())
    }

    fn expand(
        &self,
        free_regions: &FreeRegionMap,
        values: &mut FxHashMap<RegionId, ConcreteRegion>,
    ) -> RegionResult<bool> {
        let mut changed = false;
        for constraint in self.constraints() {
            if !self.is_var(constraint.hi) {
                continue;
            }
            let Some(lo_value) = values.get(&constraint.lo).copied() else {
                continue;
            };

            let next = match values.get(&constraint.hi).copied() {
                None => lo_value,
                Some(hi_value) => free_regions
                    .lub_concrete(lo_value, hi_value)
                    .ok_or(RegionError::NoCommonRegion {
                        a: lo_value.into(),
                        b: hi_value.into(),
                    })?,
            };

            if values.insert(constraint.hi, next) != Some(next) {
                changed = true;
            }
        }
        Ok(changed)
    }

    fn contract(
        &self,
        free_regions: &FreeRegionMap,
        values: &mut FxHashMap<RegionId, ConcreteRegion>,
    ) -> RegionResult<bool> {
        // Only variables without a value at the start of the pass contract,
        // and each one sees all of its upper bounds at once.
        let mut contracted: FxHashMap<RegionId, ConcreteRegion> = FxHashMap::default();
        for constraint in self.constraints() {
            if !self.is_var(constraint.lo) || values.contains_key(&constraint.lo) {
                continue;
            }
            let Some(hi_value) = values.get(&constraint.hi).copied() else {
                continue;
            };

            let next = match contracted.get(&constraint.lo).copied() {
                None => hi_value,
                Some(prev) => free_regions.glb_concrete(prev, hi_value).ok_or(
                    RegionError::NoCommonRegion {
                        a: prev.into(),
                        b: hi_value.into(),
                    },
                )?,
            };
            contracted.insert(constraint.lo, next);
        }

        let changed = !contracted.is_empty();
        values.extend(contracted);
        Ok(changed)
    }

    fn verify(
        &self,
        free_regions: &FreeRegionMap,
        values: &FxHashMap<RegionId, ConcreteRegion>,
    ) -> RegionResult<()> {
        for constraint in self.constraints() {
            let (Some(&lo), Some(&hi)) = (values.get(&constraint.lo), values.get(&constraint.hi))
            else {
                continue;
            };
            if !free_regions.sub_concrete(lo, hi) {
                return Err(RegionError::UnsatisfiableConstraint {
                    lo: constraint.lo,
                    hi: constraint.hi,
                });
            }
        }
        Ok(())
    }
}
