//! Region graph, taint analysis and region solving.
//!
//! A region inference session records subtyping constraints `lo <= hi`
//! ("`lo` must not outlive `hi`") between region records held in an arena.
//! The graph answers two kinds of questions:
//!
//! - connectivity: [`RegionGraph::tainted`] returns every region related to a
//!   given one through recorded constraints, in either direction;
//! - values: [`RegionGraph::solve`] assigns each inference variable a concrete
//!   region, after which [`RegionGraph::resolve`] reads it back.
//!
//! # Architecture
//!
//! - [`Region`]: free, bound, or inference-variable region as seen by types
//! - [`RegionGraph`]: arena of [`RegionData`] records plus constraints
//! - [`FreeRegionMap`]: caller-declared ordering between free regions
//! - [`TaintSet`]: result of the taint closure
//! - [`RegionError`]: solver and closure failures
//!
//! A graph belongs to exactly one session and is dropped with it.
//!
//! # Examples
//!
//! ```rust
//! use sb_intern::Interner;
//! use sb_region::{FreeRegion, FreeRegionMap, Region, RegionGraph};
//!
//! let interner = Interner::new();
//! let scope = FreeRegion(interner.intern("body"));
//!
//! let mut graph = RegionGraph::new();
//! let var = graph.new_region();
//! let body = graph.free_region(scope);
//! graph.add_constraint(body, var);
//!
//! graph.solve(&FreeRegionMap::new()).unwrap();
//! assert_eq!(graph.resolve(var).unwrap(), Region::Free(scope));
//! ```

mod error;
mod free;
mod graph;
mod region;
mod solve;
mod taint;

pub use error::{RegionError, RegionResult};
pub use free::FreeRegionMap;
pub use graph::{RegionGraph, DEFAULT_TAINT_LIMIT};
pub use region::{
    BoundRegion, ConcreteRegion, Constraint, FreeRegion, Region, RegionData, RegionId, RegionKind,
    RegionOrigin,
};
pub use taint::TaintSet;
