//! Structural combination of types for LUB and GLB.
#![allow(
    clippy::min_ident_chars,
    reason = "Ty is the conventional name in type system implementations"
)]

use rustc_hash::FxHashMap;
use sb_region::{FreeRegionMap, Region, RegionGraph, RegionId, RegionOrigin};
use tracing::trace;

use crate::{
    error::{BoundMismatch, LatticeError, LatticeResult},
    ty::{FnTy, Mutability, Ty},
};

/// Which bound is being computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LatticeOp {
    /// Least upper bound: the tightest common supertype
    Lub,
    /// Greatest lower bound: the loosest common subtype
    Glb,
}

impl LatticeOp {
    /// The dual operation, used in contravariant positions.
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::Lub => Self::Glb,
            Self::Glb => Self::Lub,
        }
    }
}

/// Walks two types in lockstep, recording region constraints in `graph`.
pub(crate) struct Combiner<'ctx> {
    graph: &'ctx mut RegionGraph,
    free_regions: &'ctx FreeRegionMap,
    /// Combination variable already created for a `(op, a, b)` triple
    combined: FxHashMap<(LatticeOp, Region, Region), RegionId>,
}

impl<'ctx> Combiner<'ctx> {
    pub(crate) fn new(graph: &'ctx mut RegionGraph, free_regions: &'ctx FreeRegionMap) -> Self {
        Self {
            graph,
            free_regions,
            combined: FxHashMap::default(),
        }
    }

    /// Computes `op` of two types.
    ///
    /// References are contravariant in their region: a longer-lived
    /// reference is the subtype, so the type LUB takes the region GLB.
    pub(crate) fn tys(&mut self, op: LatticeOp, a: &Ty, b: &Ty) -> LatticeResult<Ty> {
        match (a, b) {
            (Ty::Base(left), Ty::Base(right)) if left == right => Ok(a.clone()),

            (
                Ty::Ref {
                    region: a_region,
                    mutability: a_mut,
                    inner: a_inner,
                },
                Ty::Ref {
                    region: b_region,
                    mutability: b_mut,
                    inner: b_inner,
                },
            ) if a_mut == b_mut => {
                let region = self.regions(op.flip(), *a_region, *b_region)?;
                let inner = match a_mut {
                    Mutability::Shared => self.tys(op, a_inner, b_inner)?,
                    Mutability::Mut => self.equate_tys(a_inner, b_inner)?,
                };
                Ok(Ty::Ref {
                    region,
                    mutability: *a_mut,
                    inner: Box::new(inner),
                })
            }

            (Ty::Tuple(left), Ty::Tuple(right)) => {
                check_arity(left.len(), right.len())?;
                let elements = left
                    .iter()
                    .zip(right)
                    .map(|(l, r)| self.tys(op, l, r))
                    .collect::<LatticeResult<_>>()?;
                Ok(Ty::Tuple(elements))
            }

            (
                Ty::Adt {
                    name: a_name,
                    args: a_args,
                },
                Ty::Adt {
                    name: b_name,
                    args: b_args,
                },
            ) if a_name == b_name => {
                check_arity(a_args.len(), b_args.len())?;
                let args = a_args
                    .iter()
                    .zip(b_args)
                    .map(|(l, r)| self.equate_tys(l, r))
                    .collect::<LatticeResult<_>>()?;
                Ok(Ty::Adt {
                    name: *a_name,
                    args,
                })
            }

            (Ty::Fn(left), Ty::Fn(right)) => {
                check_arity(left.params.len(), right.params.len())?;
                let params = left
                    .params
                    .iter()
                    .zip(&right.params)
                    .map(|(l, r)| self.tys(op.flip(), l, r))
                    .collect::<LatticeResult<_>>()?;
                let ret = self.tys(op, &left.ret, &right.ret)?;
                Ok(Ty::Fn(Box::new(FnTy { params, ret })))
            }

            _ => Err(LatticeError::NoCommonBound(BoundMismatch::Structure)),
        }
    }

    /// Requires two types to be equal, equating their regions.
    fn equate_tys(&mut self, a: &Ty, b: &Ty) -> LatticeResult<Ty> {
        match (a, b) {
            (Ty::Base(left), Ty::Base(right)) if left == right => Ok(a.clone()),

            (
                Ty::Ref {
                    region: a_region,
                    mutability: a_mut,
                    inner: a_inner,
                },
                Ty::Ref {
                    region: b_region,
                    mutability: b_mut,
                    inner: b_inner,
                },
            ) if a_mut == b_mut => Ok(Ty::Ref {
                region: self.equate_regions(*a_region, *b_region)?,
                mutability: *a_mut,
                inner: Box::new(self.equate_tys(a_inner, b_inner)?),
            }),

            (Ty::Tuple(left), Ty::Tuple(right)) => {
                check_arity(left.len(), right.len())?;
                Ok(Ty::Tuple(self.equate_all(left, right)?))
            }

            (
                Ty::Adt {
                    name: a_name,
                    args: a_args,
                },
                Ty::Adt {
                    name: b_name,
                    args: b_args,
                },
            ) if a_name == b_name => {
                check_arity(a_args.len(), b_args.len())?;
                Ok(Ty::Adt {
                    name: *a_name,
                    args: self.equate_all(a_args, b_args)?,
                })
            }

            (Ty::Fn(left), Ty::Fn(right)) => {
                check_arity(left.params.len(), right.params.len())?;
                Ok(Ty::Fn(Box::new(FnTy {
                    params: self.equate_all(&left.params, &right.params)?,
                    ret: self.equate_tys(&left.ret, &right.ret)?,
                })))
            }

            _ => Err(LatticeError::NoCommonBound(BoundMismatch::Structure)),
        }
    }

    fn equate_all(&mut self, left: &[Ty], right: &[Ty]) -> LatticeResult<Vec<Ty>> {
        left.iter()
            .zip(right)
            .map(|(l, r)| self.equate_tys(l, r))
            .collect()
    }

    /// Computes `op` of two regions under the `<=` order.
    fn regions(&mut self, op: LatticeOp, a: Region, b: Region) -> LatticeResult<Region> {
        if a == b {
            return Ok(a);
        }

        if let (Region::Free(left), Region::Free(right)) = (a, b) {
            let combined = match op {
                LatticeOp::Lub => self.free_regions.lub_free_regions(left, right),
                LatticeOp::Glb => self.free_regions.glb_free_regions(left, right),
            };
            return combined
                .map(Region::Free)
                .ok_or(LatticeError::NoCommonBound(BoundMismatch::UnrelatedRegions {
                    left,
                    right,
                }));
        }

        if let Some(&var) = self.combined.get(&(op, a, b)) {
            return Ok(Region::Var(var));
        }

        let var = self.graph.new_region_with_origin(RegionOrigin::Combine);
        self.combined.insert((op, a, b), var);
        let a_id = self.region_id(a)?;
        let b_id = self.region_id(b)?;
        match op {
            LatticeOp::Lub => {
                self.graph.add_constraint(a_id, var);
                self.graph.add_constraint(b_id, var);
            }
            LatticeOp::Glb => {
                self.graph.add_constraint(var, a_id);
                self.graph.add_constraint(var, b_id);
            }
        }
        trace!(?op, ?a, ?b, ?var, "combined regions");
        Ok(Region::Var(var))
    }

    fn equate_regions(&mut self, a: Region, b: Region) -> LatticeResult<Region> {
        if a == b {
            return Ok(a);
        }

        if let (Region::Free(left), Region::Free(right)) = (a, b) {
            let equivalent = self.free_regions.sub_free_region(left, right)
                && self.free_regions.sub_free_region(right, left);
            return if equivalent {
                Ok(a)
            } else {
                Err(LatticeError::NoCommonBound(BoundMismatch::UnrelatedRegions {
                    left,
                    right,
                }))
            };
        }

        let a_id = self.region_id(a)?;
        let b_id = self.region_id(b)?;
        self.graph.add_equality(a_id, b_id);
        Ok(a)
    }

    fn region_id(&mut self, region: Region) -> LatticeResult<RegionId> {
        match region {
            Region::Var(id) => Ok(id),
            Region::Free(free) => Ok(self.graph.free_region(free)),
            // Binders are opened before combination starts.
            Region::Bound(bound) => Err(LatticeError::UnboundRegion(bound)),
        }
    }
}

pub(crate) fn check_arity(left: usize, right: usize) -> LatticeResult<()> {
    if left == right {
        Ok(())
    } else {
        Err(LatticeError::NoCommonBound(BoundMismatch::Arity { left, right }))
    }
}
