//! Named LUB/GLB scenarios with their expected results.
//!
//! Each scenario pairs two signatures with the rendered LUB and GLB the
//! engine must produce. `None` means the bound does not exist.

use sb_ty::FnSig;

use crate::{bound, TestFixture};

/// A LUB/GLB scenario
#[derive(Debug, Clone)]
pub struct LatticeScenario {
    /// Short description used in assertion messages
    pub name: &'static str,
    /// Left-hand signature
    pub left: FnSig,
    /// Right-hand signature
    pub right: FnSig,
    /// Expected rendered LUB
    pub lub: Option<&'static str>,
    /// Expected rendered GLB
    pub glb: Option<&'static str>,
}

/// Scenario 1: one bound region against one free region
///
/// `fn(&a)` and `fn(&X)`: the LUB fixes the region to `X`, the GLB stays
/// polymorphic.
#[must_use]
pub fn bound_against_free(fx: &TestFixture) -> LatticeScenario {
    LatticeScenario {
        name: "bound against free",
        left: fx.ref_sig(1, &[bound(0)]),
        right: fx.ref_sig(0, &[fx.free("X")]),
        lub: Some("fn(&'X int)"),
        glb: Some("for<'a> fn(&'a int)"),
    }
}

/// Scenario 2: two distinct bound regions against one repeated region
#[must_use]
pub fn distinct_against_repeated(fx: &TestFixture) -> LatticeScenario {
    LatticeScenario {
        name: "distinct against repeated",
        left: fx.ref_sig(2, &[bound(0), bound(1)]),
        right: fx.ref_sig(1, &[bound(0), bound(0)]),
        lub: Some("for<'a> fn(&'a int, &'a int)"),
        glb: Some("for<'a, 'b> fn(&'a int, &'b int)"),
    }
}

/// Scenario 3: partially overlapping region patterns over three positions
#[must_use]
pub fn three_positions(fx: &TestFixture) -> LatticeScenario {
    LatticeScenario {
        name: "three positions",
        left: fx.ref_sig(2, &[bound(0), bound(1), bound(0)]),
        right: fx.ref_sig(2, &[bound(0), bound(1), bound(1)]),
        lub: Some("for<'a> fn(&'a int, &'a int, &'a int)"),
        glb: Some("for<'a, 'b, 'c> fn(&'a int, &'b int, &'c int)"),
    }
}

/// Scenario 4: identical repeated patterns
#[must_use]
pub fn repeated_against_repeated(fx: &TestFixture) -> LatticeScenario {
    LatticeScenario {
        name: "repeated against repeated",
        left: fx.ref_sig(1, &[bound(0), bound(0)]),
        right: fx.ref_sig(1, &[bound(0), bound(0)]),
        lub: Some("for<'a> fn(&'a int, &'a int)"),
        glb: Some("for<'a> fn(&'a int, &'a int)"),
    }
}

/// Scenario 5: two unrelated free regions
///
/// With no declared ordering between `A` and `Z` neither bound exists.
#[must_use]
pub fn unrelated_free(fx: &TestFixture) -> LatticeScenario {
    LatticeScenario {
        name: "unrelated free",
        left: fx.ref_sig(0, &[fx.free("A")]),
        right: fx.ref_sig(0, &[fx.free("Z")]),
        lub: None,
        glb: None,
    }
}

/// Every scenario above, in order
#[must_use]
pub fn all(fx: &TestFixture) -> Vec<LatticeScenario> {
    vec![
        bound_against_free(fx),
        distinct_against_repeated(fx),
        three_positions(fx),
        repeated_against_repeated(fx),
        unrelated_free(fx),
    ]
}
