//! Core region types.
#![allow(
    clippy::min_ident_chars,
    reason = "f is the conventional formatter name"
)]

use la_arena::Idx;
use sb_intern::Symbol;
use std::fmt;

/// Handle to a region record inside a [`RegionGraph`](crate::RegionGraph).
///
/// Handles are only meaningful for the graph that allocated them.
pub type RegionId = Idx<RegionData>;

/// A region tied to a concrete scope known to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FreeRegion(pub Symbol);

/// A region quantified by a signature's binder, by position in that binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoundRegion(pub u32);

impl BoundRegion {
    /// Position in the binder.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BoundRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 'a .. 'z, then 'r26, 'r27, ...
        match u8::try_from(self.0) {
            Ok(index) if index < 26 => write!(f, "'{}", char::from(b'a' + index)),
            _ => write!(f, "'r{}", self.0),
        }
    }
}

/// A region as it appears inside types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Tied to a caller scope.
    Free(FreeRegion),

    /// Quantified by the enclosing signature.
    Bound(BoundRegion),

    /// Inference variable of a region graph. Never escapes a finished session.
    Var(RegionId),
}

impl Region {
    /// Returns `true` for inference variables.
    #[must_use]
    pub fn is_var(&self) -> bool {
        matches!(self, Self::Var(_))
    }

    /// Returns the variable handle, if this is one.
    #[must_use]
    pub fn as_var(&self) -> Option<RegionId> {
        match self {
            Self::Var(id) => Some(*id),
            Self::Free(_) | Self::Bound(_) => None,
        }
    }
}

impl From<ConcreteRegion> for Region {
    fn from(value: ConcreteRegion) -> Self {
        match value {
            ConcreteRegion::Free(free) => Self::Free(free),
            ConcreteRegion::Placeholder(bound) => Self::Bound(bound),
        }
    }
}

/// A region value produced by solving.
///
/// Placeholders stand in for the bound regions of a supertype while a
/// subtyping check runs; they relate to nothing but themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConcreteRegion {
    /// A caller scope.
    Free(FreeRegion),
    /// A skolemized bound region.
    Placeholder(BoundRegion),
}

/// Where an inference variable came from.
///
/// The LUB/GLB generalization step needs to know which variables stand for
/// the bound regions of the left-hand and right-hand inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionOrigin {
    /// Plain fresh variable.
    Fresh,
    /// Alpha-renamed bound region of the left-hand input.
    BoundLeft(BoundRegion),
    /// Alpha-renamed bound region of the right-hand input.
    BoundRight(BoundRegion),
    /// Created when two regions were combined during LUB/GLB.
    Combine,
}

/// What a region record stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// Inference variable.
    Var(RegionOrigin),
    /// Free region, one record per distinct name.
    Free(FreeRegion),
    /// Skolemized bound region, one record per binder index.
    Placeholder(BoundRegion),
}

/// A region record in the graph arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionData {
    /// Record kind.
    pub kind: RegionKind,
}

impl RegionData {
    /// Returns the concrete region this record denotes, if it is not a variable.
    #[must_use]
    pub fn concrete(&self) -> Option<ConcreteRegion> {
        match self.kind {
            RegionKind::Var(_) => None,
            RegionKind::Free(free) => Some(ConcreteRegion::Free(free)),
            RegionKind::Placeholder(bound) => Some(ConcreteRegion::Placeholder(bound)),
        }
    }
}

/// Subtyping constraint `lo <= hi`: `lo` must not outlive `hi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constraint {
    /// Shorter-lived side.
    pub lo: RegionId,
    /// Longer-lived side.
    pub hi: RegionId,
}
