//! Subtyping between signatures with bound regions.
//!
//! `sub <: sup` holds when every instantiation of `sup`'s binder can be
//! matched by some instantiation of `sub`'s. The binder of `sup` is replaced
//! by placeholders, the binder of `sub` by fresh variables; the relation is
//! then checked structurally, placeholders are checked for leaks into each
//! other or into free regions, and the collected constraints are solved.
#![allow(
    clippy::min_ident_chars,
    reason = "Ty is the conventional name in type system implementations"
)]

use sb_region::{Region, RegionGraph, RegionId, RegionOrigin};
use tracing::debug;

use crate::{
    error::{LatticeError, LatticeResult},
    lattice::{open_binder, LatticeCtxt},
    ty::{FnSig, Mutability, Ty},
};

impl LatticeCtxt<'_> {
    /// Returns `true` if `sub` can be used wherever `sup` is expected.
    ///
    /// # Errors
    ///
    /// Malformed signatures ([`LatticeError::UnboundRegion`],
    /// [`LatticeError::ForeignVariable`]) and internal solver failures.
    /// A signature that is simply not a subtype yields `Ok(false)`.
    pub fn is_subtype(&self, sub: &FnSig, sup: &FnSig) -> LatticeResult<bool> {
        if sub.params.len() != sup.params.len() {
            return Ok(false);
        }

        let mut graph = RegionGraph::with_taint_limit(self.taint_limit);
        let placeholders: Vec<RegionId> = sup.binder().map(|bound| graph.placeholder(bound)).collect();
        let vars: Vec<RegionId> = sub
            .binder()
            .map(|bound| graph.new_region_with_origin(RegionOrigin::BoundLeft(bound)))
            .collect();
        // Placeholders travel through the opened signature as graph handles.
        let sup_open = open_binder(sup, &placeholders)?;
        let sub_open = open_binder(sub, &vars)?;

        let related = {
            let mut relate = Relate { graph: &mut graph };
            relate.sig(&sub_open, &sup_open)?
        };
        if !related {
            debug!("signatures differ structurally");
            return Ok(false);
        }

        for &placeholder in &placeholders {
            let taint = graph.tainted(placeholder)?;
            let leaked = taint
                .iter()
                .find(|&region| region != placeholder && graph.concrete(region).is_some());
            if let Some(region) = leaked {
                debug!(?placeholder, ?region, "placeholder leaked");
                return Ok(false);
            }
        }

        match graph.solve(self.free_regions) {
            Ok(()) => Ok(true),
            Err(error) if error.is_internal() => Err(LatticeError::Internal(error)),
            Err(error) => {
                debug!(%error, "subtyping constraints unsatisfiable");
                Ok(false)
            }
        }
    }
}

struct Relate<'graph> {
    graph: &'graph mut RegionGraph,
}

impl Relate<'_> {
    fn sig(&mut self, sub: &FnSig, sup: &FnSig) -> LatticeResult<bool> {
        for (sub_param, sup_param) in sub.params.iter().zip(&sup.params) {
            if !self.sub_tys(sup_param, sub_param)? {
                return Ok(false);
            }
        }
        self.sub_tys(&sub.ret, &sup.ret)
    }

    /// Records the constraints for `a <: b`; `false` on a structural mismatch.
    fn sub_tys(&mut self, a: &Ty, b: &Ty) -> LatticeResult<bool> {
        match (a, b) {
            (Ty::Base(left), Ty::Base(right)) => Ok(left == right),

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
                // `&'ra A <: &'rb B` needs `'ra` to outlive `'rb`.
                let a_id = self.region_id(*a_region)?;
                let b_id = self.region_id(*b_region)?;
                self.graph.add_constraint(b_id, a_id);
                match a_mut {
                    Mutability::Shared => self.sub_tys(a_inner, b_inner),
                    Mutability::Mut => self.equate_tys(a_inner, b_inner),
                }
            }

            (Ty::Tuple(left), Ty::Tuple(right)) if left.len() == right.len() => {
                for (l, r) in left.iter().zip(right) {
                    if !self.sub_tys(l, r)? {
                        return Ok(false);
                    }
                }
                Ok(true)
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
            ) if a_name == b_name && a_args.len() == b_args.len() => {
                for (l, r) in a_args.iter().zip(b_args) {
                    if !self.equate_tys(l, r)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }

            (Ty::Fn(left), Ty::Fn(right)) if left.params.len() == right.params.len() => {
                for (l, r) in left.params.iter().zip(&right.params) {
                    if !self.sub_tys(r, l)? {
                        return Ok(false);
                    }
                }
                self.sub_tys(&left.ret, &right.ret)
            }

            _ => Ok(false),
        }
    }

    fn equate_tys(&mut self, a: &Ty, b: &Ty) -> LatticeResult<bool> {
        Ok(self.sub_tys(a, b)? && self.sub_tys(b, a)?)
    }

    fn region_id(&mut self, region: Region) -> LatticeResult<RegionId> {
        match region {
            Region::Var(id) => Ok(id),
            Region::Free(free) => Ok(self.graph.free_region(free)),
            Region::Bound(bound) => Err(LatticeError::UnboundRegion(bound)),
        }
    }
}
