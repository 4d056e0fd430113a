//! Region-bearing types, LUB/GLB of function signatures and subtyping.
//!
//! Signatures carry a binder of bound regions (`for<'a, 'b> fn(&'a T, &'b U)`).
//! [`LatticeCtxt::lub`] and [`LatticeCtxt::glb`] compute the tightest common
//! supertype and the loosest common subtype of two such signatures;
//! [`LatticeCtxt::is_subtype`] checks the order itself.
//!
//! Each query runs in its own [`sb_region::RegionGraph`], so a context can be
//! shared freely.
//!
//! # Examples
//!
//! ```rust
//! use sb_intern::Interner;
//! use sb_region::{BoundRegion, FreeRegionMap, Region};
//! use sb_ty::{FnSig, LatticeCtxt, Ty};
//!
//! let interner = Interner::new();
//! let int = Ty::Base(interner.intern("int"));
//! let a = Region::Bound(BoundRegion(0));
//! let b = Region::Bound(BoundRegion(1));
//!
//! let distinct = FnSig::returning_unit(2, vec![Ty::shared(a, int.clone()), Ty::shared(b, int.clone())]);
//! let shared = FnSig::returning_unit(1, vec![Ty::shared(a, int.clone()), Ty::shared(a, int)]);
//!
//! let free_regions = FreeRegionMap::new();
//! let ctx = LatticeCtxt::new(&free_regions);
//! let lub = ctx.lub(&distinct, &shared).unwrap();
//! assert_eq!(lub.display(&interner).to_string(), "for<'a> fn(&'a int, &'a int)");
//! ```

mod combine;
mod error;
mod lattice;
mod sub;
mod ty;

pub use combine::LatticeOp;
pub use error::{BoundMismatch, LatticeError, LatticeResult};
pub use lattice::LatticeCtxt;
pub use ty::{DisplayFnSig, FnSig, FnTy, Mutability, Ty};
