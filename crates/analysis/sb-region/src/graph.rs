//! The region graph of one inference session.
#![allow(
    clippy::min_ident_chars,
    reason = "a and b are the two sides of an equality"
)]

use la_arena::Arena;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::{
    error::{RegionError, RegionResult},
    region::{
        BoundRegion, ConcreteRegion, Constraint, FreeRegion, Region, RegionData, RegionId,
        RegionKind, RegionOrigin,
    },
};

/// Default maximum size of a taint set.
pub const DEFAULT_TAINT_LIMIT: usize = 4096;

/// Regions and constraints recorded by one inference session.
///
/// Free regions and placeholders get one record each, so constraints are
/// always between [`RegionId`]s. Nothing is validated when a constraint is
/// added; contradictions surface in [`solve`](Self::solve).
#[derive(Debug)]
pub struct RegionGraph {
    /// All region records, variables and concrete regions alike
    regions: Arena<RegionData>,

    /// Constraints in insertion order
    constraints: Vec<Constraint>,

    /// Record for each free region seen so far
    free_regions: FxHashMap<FreeRegion, RegionId>,

    /// Record for each placeholder seen so far
    placeholders: FxHashMap<BoundRegion, RegionId>,

    /// Explicit defaults for variables
    defaults: FxHashMap<RegionId, ConcreteRegion>,

    /// Values from the last solve; `None` when stale
    pub(crate) values: Option<FxHashMap<RegionId, ConcreteRegion>>,

    /// Maximum taint set size
    pub(crate) taint_limit: usize,
}

impl RegionGraph {
    /// Creates an empty graph with the default taint limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_taint_limit(DEFAULT_TAINT_LIMIT)
    }

    /// Creates an empty graph whose taint closures stop at `taint_limit` regions.
    #[must_use]
    pub fn with_taint_limit(taint_limit: usize) -> Self {
        Self {
            regions: Arena::new(),
            constraints: Vec::new(),
            free_regions: FxHashMap::default(),
            placeholders: FxHashMap::default(),
            defaults: FxHashMap::default(),
            values: None,
            taint_limit,
        }
    }

    /// Allocates a fresh inference variable.
    pub fn new_region(&mut self) -> RegionId {
        self.new_region_with_origin(RegionOrigin::Fresh)
    }

    /// Allocates a fresh inference variable remembering where it came from.
    pub fn new_region_with_origin(&mut self, origin: RegionOrigin) -> RegionId {
        self.values = None;
        let id = self.regions.alloc(RegionData {
            kind: RegionKind::Var(origin),
        });
        trace!(?id, ?origin, "new region variable");
        id
    }

    /// Returns the record for a free region, creating it on first use.
    pub fn free_region(&mut self, free: FreeRegion) -> RegionId {
        if let Some(&id) = self.free_regions.get(&free) {
            return id;
        }
        self.values = None;
        let id = self.regions.alloc(RegionData {
            kind: RegionKind::Free(free),
        });
        self.free_regions.insert(free, id);
        id
    }

    /// Returns the placeholder record for a bound region, creating it on first use.
    pub fn placeholder(&mut self, bound: BoundRegion) -> RegionId {
        if let Some(&id) = self.placeholders.get(&bound) {
            return id;
        }
        self.values = None;
        let id = self.regions.alloc(RegionData {
            kind: RegionKind::Placeholder(bound),
        });
        self.placeholders.insert(bound, id);
        id
    }

    /// Records `lo <= hi`.
    pub fn add_constraint(&mut self, lo: RegionId, hi: RegionId) {
        trace!(?lo, ?hi, "add constraint");
        self.values = None;
        self.constraints.push(Constraint { lo, hi });
    }

    /// Records `a <= b` and `b <= a`.
    pub fn add_equality(&mut self, a: RegionId, b: RegionId) {
        self.add_constraint(a, b);
        self.add_constraint(b, a);
    }

    /// Gives a variable a starting value for solving.
    pub fn set_default(&mut self, var: RegionId, value: ConcreteRegion) {
        self.values = None;
        self.defaults.insert(var, value);
    }

    /// Reads back the value of `region` after [`solve`](Self::solve).
    ///
    /// Concrete records resolve to themselves; placeholders come back as the
    /// bound region they stand for.
    ///
    /// # Errors
    ///
    /// [`RegionError::Unsolved`] if the graph changed since the last solve,
    /// [`RegionError::UnconstrainedRegion`] if solving found no value.
    pub fn resolve(&self, region: RegionId) -> RegionResult<Region> {
        let values = self.values.as_ref().ok_or(RegionError::Unsolved)?;
        values
            .get(&region)
            .map(|&value| Region::from(value))
            .ok_or(RegionError::UnconstrainedRegion(region))
    }

    /// Returns what a record stands for.
    #[must_use]
    pub fn kind(&self, region: RegionId) -> RegionKind {
        self.regions[region].kind
    }

    /// Returns `true` if `region` is an inference variable.
    #[must_use]
    pub fn is_var(&self, region: RegionId) -> bool {
        matches!(self.kind(region), RegionKind::Var(_))
    }

    /// Origin of a variable, `None` for concrete records.
    #[must_use]
    pub fn origin(&self, region: RegionId) -> Option<RegionOrigin> {
        match self.kind(region) {
            RegionKind::Var(origin) => Some(origin),
            RegionKind::Free(_) | RegionKind::Placeholder(_) => None,
        }
    }

    /// Concrete region denoted by a record, `None` for variables.
    #[must_use]
    pub fn concrete(&self, region: RegionId) -> Option<ConcreteRegion> {
        self.regions[region].concrete()
    }

    /// Default recorded for a variable.
    pub(crate) fn default_for(&self, region: RegionId) -> Option<ConcreteRegion> {
        self.defaults.get(&region).copied()
    }

    /// All constraints, in insertion order.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// All inference variables, in allocation order.
    pub fn vars(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.regions
            .iter()
            .filter(|(_, data)| matches!(data.kind, RegionKind::Var(_)))
            .map(|(id, _)| id)
    }

    /// Every record, in allocation order.
    pub(crate) fn records(&self) -> impl Iterator<Item = (RegionId, &RegionData)> + '_ {
        self.regions.iter()
    }

    /// Number of region records.
    #[must_use]
    pub fn num_regions(&self) -> usize {
        self.regions.len()
    }

    /// Number of recorded constraints.
    #[must_use]
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Configured taint limit.
    #[must_use]
    pub fn taint_limit(&self) -> usize {
        self.taint_limit
    }
}

impl Default for RegionGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FreeRegionMap;
    use sb_intern::Interner;

    #[test]
    fn test_free_regions_are_deduplicated() {
        let interner = Interner::new();
        let scope = FreeRegion(interner.intern("fn_body"));
        let mut graph = RegionGraph::new();

        let first = graph.free_region(scope);
        let second = graph.free_region(scope);
        assert_eq!(first, second);
        assert_eq!(graph.num_regions(), 1);
        assert_eq!(graph.concrete(first), Some(ConcreteRegion::Free(scope)));
    }

    #[test]
    fn test_resolve_requires_solve() {
        let mut graph = RegionGraph::new();
        let var = graph.new_region();
        assert_eq!(graph.resolve(var), Err(RegionError::Unsolved));

        graph.solve(&FreeRegionMap::new()).unwrap();
        assert_eq!(graph.resolve(var), Err(RegionError::UnconstrainedRegion(var)));

        // Mutation invalidates the previous solution.
        graph.new_region();
        assert_eq!(graph.resolve(var), Err(RegionError::Unsolved));
    }

    #[test]
    fn test_origins_are_recorded() {
        let mut graph = RegionGraph::new();
        let left = graph.new_region_with_origin(RegionOrigin::BoundLeft(BoundRegion(0)));
        let placeholder = graph.placeholder(BoundRegion(0));

        assert_eq!(graph.origin(left), Some(RegionOrigin::BoundLeft(BoundRegion(0))));
        assert_eq!(graph.origin(placeholder), None);
        assert_eq!(graph.vars().collect::<Vec<_>>(), vec![left]);
    }
}
