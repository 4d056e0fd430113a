//! Taint closure over recorded constraints.
#![allow(
    clippy::min_ident_chars,
    reason = "short names match the constraint diagrams"
)]

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::{
    error::{RegionError, RegionResult},
    graph::RegionGraph,
    region::RegionId,
};

/// Regions connected to a root region through recorded constraints.
///
/// Members are kept in discovery order with the root first, so iteration is
/// deterministic for identical graphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaintSet {
    order: Vec<RegionId>,
    members: FxHashSet<RegionId>,
}

impl TaintSet {
    /// The region the closure started from.
    #[must_use]
    pub fn root(&self) -> RegionId {
        self.order[0]
    }

    /// Returns `true` if `region` is connected to the root.
    #[must_use]
    pub fn contains(&self, region: RegionId) -> bool {
        self.members.contains(&region)
    }

    /// Members in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.order.iter().copied()
    }

    /// Number of members, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always `false`: the root is a member.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns `true` if the root is related to nothing else.
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.order.len() == 1
    }
}

impl RegionGraph {
    /// Computes every region reachable from `root` along constraint edges
    /// taken in either direction.
    ///
    /// The closure is a work list over a visited set, so cycles and repeated
    /// constraints are harmless.
    ///
    /// # Errors
    ///
    /// [`RegionError::TaintLimitExceeded`] once the set would grow past the
    /// graph's taint limit.
    pub fn tainted(&self, root: RegionId) -> RegionResult<TaintSet> {
        let mut neighbours: FxHashMap<RegionId, Vec<RegionId>> = FxHashMap::default();
        for constraint in self.constraints() {
            neighbours.entry(constraint.lo).or_default().push(constraint.hi);
            neighbours.entry(constraint.hi).or_default().push(constraint.lo);
        }

        let mut set = TaintSet {
            order: vec![root],
            members: FxHashSet::from_iter([root]),
        };

        let mut cursor = 0;
        while let Some(&region) = set.order.get(cursor) {
            cursor += 1;
            for &next in neighbours.get(&region).into_iter().flatten() {
                if !set.members.insert(next) {
                    continue;
                }
                if set.order.len() >= self.taint_limit {
                    return Err(RegionError::TaintLimitExceeded {
                        root,
                        limit: self.taint_limit,
                    });
                }
                set.order.push(next);
            }
        }

        trace!(?root, size = set.len(), "taint closure");
        Ok(set)
    }
}
