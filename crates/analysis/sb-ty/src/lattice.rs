//! LUB and GLB of function signatures with bound regions.
//!
//! Both computations run in a private [`RegionGraph`]:
//!
//! 1. the binders of both inputs are opened, every bound region becoming a
//!    fresh variable that remembers its side and position;
//! 2. the opened signatures are combined structurally, creating combination
//!    variables wherever two distinct regions meet;
//! 3. every variable in the candidate is generalized by looking at its taint
//!    set: variables tied only to renamed bound regions become bound regions
//!    of the result, variables tied to free regions stay and are solved;
//! 4. the result's bound regions are numbered in order of first appearance.
#![allow(
    clippy::min_ident_chars,
    reason = "a and b are the two signatures being combined"
)]

use rustc_hash::FxHashMap;
use sb_region::{
    BoundRegion, FreeRegionMap, Region, RegionGraph, RegionId, RegionKind, RegionOrigin, TaintSet,
    DEFAULT_TAINT_LIMIT,
};
use std::convert::Infallible;
use tracing::{debug, trace};

use crate::{
    combine::{check_arity, Combiner, LatticeOp},
    error::{LatticeError, LatticeResult},
    ty::FnSig,
};

/// Entry point for LUB, GLB and subtyping queries.
///
/// The context only holds read-only inputs; every query builds and drops its
/// own region graph, so one context can serve many independent queries.
#[derive(Debug, Clone, Copy)]
pub struct LatticeCtxt<'ctx> {
    pub(crate) free_regions: &'ctx FreeRegionMap,
    pub(crate) taint_limit: usize,
}

impl<'ctx> LatticeCtxt<'ctx> {
    /// Creates a context over the caller's free region ordering.
    #[must_use]
    pub fn new(free_regions: &'ctx FreeRegionMap) -> Self {
        Self {
            free_regions,
            taint_limit: DEFAULT_TAINT_LIMIT,
        }
    }

    /// Bounds the size of every taint set computed by this context.
    #[must_use]
    pub fn with_taint_limit(mut self, taint_limit: usize) -> Self {
        self.taint_limit = taint_limit;
        self
    }

    /// Least upper bound: the tightest signature both inputs upcast to.
    ///
    /// # Errors
    ///
    /// [`LatticeError::NoCommonBound`] if the signatures have no join.
    pub fn lub(&self, a: &FnSig, b: &FnSig) -> LatticeResult<FnSig> {
        self.combine(LatticeOp::Lub, a, b)
    }

    /// Greatest lower bound: the loosest signature that upcasts to both inputs.
    ///
    /// # Errors
    ///
    /// [`LatticeError::NoCommonBound`] if the signatures have no meet.
    pub fn glb(&self, a: &FnSig, b: &FnSig) -> LatticeResult<FnSig> {
        self.combine(LatticeOp::Glb, a, b)
    }

    /// Computes `op` of two signatures.
    ///
    /// # Errors
    ///
    /// See [`lub`](Self::lub) and [`glb`](Self::glb). Internal errors are
    /// reported as [`LatticeError::Internal`] or
    /// [`LatticeError::Ungeneralizable`].
    pub fn combine(&self, op: LatticeOp, a: &FnSig, b: &FnSig) -> LatticeResult<FnSig> {
        debug!(?op, left_bound = a.bound_regions, right_bound = b.bound_regions, "combining signatures");
        check_arity(a.params.len(), b.params.len())?;

        let mut graph = RegionGraph::with_taint_limit(self.taint_limit);
        let a_vars: Vec<RegionId> = a
            .binder()
            .map(|bound| graph.new_region_with_origin(RegionOrigin::BoundLeft(bound)))
            .collect();
        let b_vars: Vec<RegionId> = b
            .binder()
            .map(|bound| graph.new_region_with_origin(RegionOrigin::BoundRight(bound)))
            .collect();
        let a_open = open_binder(a, &a_vars)?;
        let b_open = open_binder(b, &b_vars)?;

        let candidate = {
            let mut combiner = Combiner::new(&mut graph, self.free_regions);
            let params = a_open
                .params
                .iter()
                .zip(&b_open.params)
                .map(|(left, right)| combiner.tys(op.flip(), left, right))
                .collect::<LatticeResult<Vec<_>>>()?;
            let ret = combiner.tys(op, &a_open.ret, &b_open.ret)?;
            FnSig::new(0, params, ret)
        };

        let mut generalizer = Generalizer {
            graph: &graph,
            op,
            a_vars: &a_vars,
            next_fresh: a.bound_regions,
        };
        let generalized = candidate.try_map_regions(&mut |region| generalizer.generalize(region))?;

        graph
            .solve(self.free_regions)
            .map_err(LatticeError::from_solve)?;
        let resolved = generalized.try_map_regions(&mut |region| match region {
            Region::Var(var) => graph.resolve(var).map_err(LatticeError::Internal),
            Region::Free(_) | Region::Bound(_) => Ok(region),
        })?;

        Ok(rebind(&resolved))
    }
}

/// Replaces the bound regions of `sig` by the graph handles in `regions`.
///
/// The returned signature has an empty binder.
pub(crate) fn open_binder(sig: &FnSig, regions: &[RegionId]) -> LatticeResult<FnSig> {
    let mut opened = sig.try_map_regions(&mut |region| match region {
        Region::Bound(bound) => regions
            .get(bound.index())
            .map(|&id| Region::Var(id))
            .ok_or(LatticeError::UnboundRegion(bound)),
        Region::Var(var) => Err(LatticeError::ForeignVariable(var)),
        Region::Free(_) => Ok(region),
    })?;
    opened.bound_regions = 0;
    Ok(opened)
}

/// Numbers bound regions by first appearance and sets the binder size.
fn rebind(sig: &FnSig) -> FnSig {
    let mut renumbered: FxHashMap<BoundRegion, BoundRegion> = FxHashMap::default();
    let result = sig.try_map_regions(&mut |region| {
        Ok::<_, Infallible>(match region {
            Region::Bound(provisional) => {
                let next = BoundRegion(renumbered.len() as u32);
                Region::Bound(*renumbered.entry(provisional).or_insert(next))
            }
            Region::Free(_) | Region::Var(_) => region,
        })
    });
    let mut sig = match result {
        Ok(sig) => sig,
        Err(never) => match never {},
    };
    sig.bound_regions = renumbered.len() as u32;
    sig
}

/// Decides, occurrence by occurrence, what each candidate region becomes.
///
/// Bound regions handed out here are provisional: regions derived from the
/// left-hand binder reuse its indices, fresh ones count up from its size.
struct Generalizer<'graph> {
    graph: &'graph RegionGraph,
    op: LatticeOp,
    a_vars: &'graph [RegionId],
    next_fresh: u32,
}

impl Generalizer<'_> {
    fn generalize(&mut self, region: Region) -> LatticeResult<Region> {
        let Region::Var(var) = region else {
            return Ok(region);
        };
        let taint = self.graph.tainted(var)?;
        let generalized = match self.op {
            LatticeOp::Lub => self.generalize_lub(var, &taint)?,
            LatticeOp::Glb => self.generalize_glb(var, &taint),
        };
        trace!(?var, taint = taint.len(), ?generalized, "generalized region");
        Ok(generalized)
    }

    fn generalize_lub(&self, var: RegionId, taint: &TaintSet) -> LatticeResult<Region> {
        // Tied to a region that predates the computation: solving decides.
        if taint.iter().any(|region| !self.graph.is_var(region)) {
            return Ok(Region::Var(var));
        }

        self.a_vars
            .iter()
            .zip(0..)
            .find(|(a_var, _)| taint.contains(**a_var))
            .map(|(_, index)| Region::Bound(BoundRegion(index)))
            .ok_or(LatticeError::Ungeneralizable(var))
    }

    fn generalize_glb(&mut self, var: RegionId, taint: &TaintSet) -> Region {
        if taint.is_singleton() {
            return Region::Var(var);
        }

        let mut left = None;
        let mut left_count = 0_usize;
        let mut right_count = 0_usize;
        let mut only_vars = true;
        for region in taint.iter() {
            match self.graph.kind(region) {
                RegionKind::Var(RegionOrigin::BoundLeft(bound)) => {
                    left_count += 1;
                    left = Some(bound);
                }
                RegionKind::Var(RegionOrigin::BoundRight(_)) => right_count += 1,
                RegionKind::Var(RegionOrigin::Fresh | RegionOrigin::Combine) => {}
                RegionKind::Free(_) | RegionKind::Placeholder(_) => only_vars = false,
            }
        }

        match (left, left_count, right_count) {
            (Some(bound), 1, 1) if only_vars => Region::Bound(bound),
            (_, 0, 0) => Region::Var(var),
            _ => self.fresh_bound(),
        }
    }

    fn fresh_bound(&mut self) -> Region {
        let bound = BoundRegion(self.next_fresh);
        self.next_fresh += 1;
        Region::Bound(bound)
    }
}
