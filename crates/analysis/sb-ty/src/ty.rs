//! Region-bearing types and function signatures.
#![allow(
    clippy::min_ident_chars,
    reason = "Ty is the conventional name in type system implementations"
)]

use sb_intern::{Interner, Symbol};
use sb_region::{BoundRegion, Region};
use std::fmt;

/// Mutability of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutability {
    /// `&'r T`, covariant in `T`
    Shared,
    /// `&'r mut T`, invariant in `T`
    Mut,
}

/// A type that may mention regions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    /// Opaque base type such as `int` or `bool`.
    Base(Symbol),

    /// Reference type.
    Ref {
        /// Region the reference is valid for
        region: Region,
        /// Shared or mutable
        mutability: Mutability,
        /// Referent
        inner: Box<Ty>,
    },

    /// Tuple type; the empty tuple is unit.
    Tuple(Vec<Ty>),

    /// Nominal type applied to arguments. Arguments are invariant.
    Adt {
        /// Resolved type name
        name: Symbol,
        /// Generic arguments
        args: Vec<Ty>,
    },

    /// Function pointer nested inside a signature.
    ///
    /// Nested function types have no binder of their own; bound regions in
    /// them refer to the enclosing [`FnSig`].
    Fn(Box<FnTy>),
}

/// Parameters and return type of a nested function pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FnTy {
    /// Parameter types
    pub params: Vec<Ty>,
    /// Return type
    pub ret: Ty,
}

impl Ty {
    /// Unit type `()`.
    #[must_use]
    pub fn unit() -> Self {
        Self::Tuple(Vec::new())
    }

    /// `&'region inner`.
    #[must_use]
    pub fn shared(region: Region, inner: Self) -> Self {
        Self::Ref {
            region,
            mutability: Mutability::Shared,
            inner: Box::new(inner),
        }
    }

    /// `&'region mut inner`.
    #[must_use]
    pub fn mutable(region: Region, inner: Self) -> Self {
        Self::Ref {
            region,
            mutability: Mutability::Mut,
            inner: Box::new(inner),
        }
    }

    /// Nested `fn(params) -> ret`.
    #[must_use]
    pub fn function(params: Vec<Self>, ret: Self) -> Self {
        Self::Fn(Box::new(FnTy { params, ret }))
    }

    /// Rebuilds the type with every region passed through `f`.
    ///
    /// Regions are visited left to right, a reference's region before its
    /// referent, parameters before the return type.
    ///
    /// # Errors
    ///
    /// Stops at the first error returned by `f`.
    pub fn try_map_regions<E>(
        &self,
        f: &mut impl FnMut(Region) -> Result<Region, E>,
    ) -> Result<Self, E> {
        Ok(match self {
            Self::Base(name) => Self::Base(*name),
            Self::Ref {
                region,
                mutability,
                inner,
            } => {
                let region = f(*region)?;
                Self::Ref {
                    region,
                    mutability: *mutability,
                    inner: Box::new(inner.try_map_regions(f)?),
                }
            }
            Self::Tuple(elements) => Self::Tuple(map_all(elements, f)?),
            Self::Adt { name, args } => Self::Adt {
                name: *name,
                args: map_all(args, f)?,
            },
            Self::Fn(fn_ty) => Self::Fn(Box::new(FnTy {
                params: map_all(&fn_ty.params, f)?,
                ret: fn_ty.ret.try_map_regions(f)?,
            })),
        })
    }
}

fn map_all<E>(
    tys: &[Ty],
    f: &mut impl FnMut(Region) -> Result<Region, E>,
) -> Result<Vec<Ty>, E> {
    tys.iter().map(|ty| ty.try_map_regions(f)).collect()
}

/// A function signature with a binder of bound regions.
///
/// `Region::Bound(i)` anywhere in the parameters or return type refers to the
/// `i`-th region of this signature's binder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FnSig {
    /// Number of regions the signature quantifies over
    pub bound_regions: u32,
    /// Parameter types
    pub params: Vec<Ty>,
    /// Return type
    pub ret: Ty,
}

impl FnSig {
    /// Creates a signature.
    #[must_use]
    pub fn new(bound_regions: u32, params: Vec<Ty>, ret: Ty) -> Self {
        Self {
            bound_regions,
            params,
            ret,
        }
    }

    /// Signature returning unit.
    #[must_use]
    pub fn returning_unit(bound_regions: u32, params: Vec<Ty>) -> Self {
        Self::new(bound_regions, params, Ty::unit())
    }

    /// The bound regions of the binder, in declaration order.
    pub fn binder(&self) -> impl Iterator<Item = BoundRegion> {
        (0..self.bound_regions).map(BoundRegion)
    }

    /// Rebuilds parameters and return type with every region passed through `f`.
    ///
    /// The binder is kept as is.
    ///
    /// # Errors
    ///
    /// Stops at the first error returned by `f`.
    pub fn try_map_regions<E>(
        &self,
        f: &mut impl FnMut(Region) -> Result<Region, E>,
    ) -> Result<Self, E> {
        Ok(Self {
            bound_regions: self.bound_regions,
            params: map_all(&self.params, f)?,
            ret: self.ret.try_map_regions(f)?,
        })
    }

    /// Renders the signature, resolving names through `interner`.
    #[must_use]
    pub fn display<'sig>(&'sig self, interner: &'sig Interner) -> DisplayFnSig<'sig> {
        DisplayFnSig {
            sig: self,
            interner,
        }
    }
}

/// Display adapter returned by [`FnSig::display`].
pub struct DisplayFnSig<'sig> {
    sig: &'sig FnSig,
    interner: &'sig Interner,
}

impl fmt::Display for DisplayFnSig<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sig.bound_regions > 0 {
            f.write_str("for<")?;
            for (i, bound) in self.sig.binder().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{bound}")?;
            }
            f.write_str("> ")?;
        }
        write_fn(f, self.interner, &self.sig.params, &self.sig.ret)
    }
}

fn write_fn(f: &mut fmt::Formatter<'_>, interner: &Interner, params: &[Ty], ret: &Ty) -> fmt::Result {
    f.write_str("fn(")?;
    write_list(f, interner, params)?;
    f.write_str(")")?;
    if *ret != Ty::unit() {
        f.write_str(" -> ")?;
        write_ty(f, interner, ret)?;
    }
    Ok(())
}

fn write_list(f: &mut fmt::Formatter<'_>, interner: &Interner, tys: &[Ty]) -> fmt::Result {
    for (i, ty) in tys.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_ty(f, interner, ty)?;
    }
    Ok(())
}

fn write_region(f: &mut fmt::Formatter<'_>, interner: &Interner, region: Region) -> fmt::Result {
    match region {
        Region::Free(free) => write!(f, "'{}", interner.try_resolve(free.0).unwrap_or("?free")),
        Region::Bound(bound) => write!(f, "{bound}"),
        Region::Var(var) => write!(f, "'?{}", u32::from(var.into_raw())),
    }
}

fn write_ty(f: &mut fmt::Formatter<'_>, interner: &Interner, ty: &Ty) -> fmt::Result {
    match ty {
        Ty::Base(name) => f.write_str(interner.try_resolve(*name).unwrap_or("?type")),
        Ty::Ref {
            region,
            mutability,
            inner,
        } => {
            f.write_str("&")?;
            write_region(f, interner, *region)?;
            f.write_str(match mutability {
                Mutability::Shared => " ",
                Mutability::Mut => " mut ",
            })?;
            write_ty(f, interner, inner)
        }
        Ty::Tuple(elements) => {
            f.write_str("(")?;
            write_list(f, interner, elements)?;
            if elements.len() == 1 {
                f.write_str(",")?;
            }
            f.write_str(")")
        }
        Ty::Adt { name, args } => {
            f.write_str(interner.try_resolve(*name).unwrap_or("?type"))?;
            if !args.is_empty() {
                f.write_str("<")?;
                write_list(f, interner, args)?;
                f.write_str(">")?;
            }
            Ok(())
        }
        Ty::Fn(fn_ty) => write_fn(f, interner, &fn_ty.params, &fn_ty.ret),
    }
}
