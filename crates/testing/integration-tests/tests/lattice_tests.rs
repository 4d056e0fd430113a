//! LUB/GLB integration tests
//!
//! Runs the named scenarios end to end and checks the results against the
//! subtyping relation.

use expect_test::expect;
use integration_tests::{bound, scenarios, TestFixture};
use sb_ty::{BoundMismatch, FnSig, LatticeError, Ty};

/// Every scenario produces the expected LUB and GLB
#[test]
fn test_scenarios() {
    let fx = TestFixture::new();
    let ctx = fx.lattice();

    for scenario in scenarios::all(&fx) {
        let lub = ctx.lub(&scenario.left, &scenario.right).ok();
        let glb = ctx.glb(&scenario.left, &scenario.right).ok();
        assert_eq!(
            lub.as_ref().map(|sig| fx.render(sig)).as_deref(),
            scenario.lub,
            "LUB of {}",
            scenario.name
        );
        assert_eq!(
            glb.as_ref().map(|sig| fx.render(sig)).as_deref(),
            scenario.glb,
            "GLB of {}",
            scenario.name
        );
    }
}

/// Both inputs are subtypes of their LUB and supertypes of their GLB
#[test]
fn test_bounds_are_valid() {
    let fx = TestFixture::new();
    let ctx = fx.lattice();

    for scenario in scenarios::all(&fx) {
        if let Ok(lub) = ctx.lub(&scenario.left, &scenario.right) {
            assert!(ctx.is_subtype(&scenario.left, &lub).unwrap(), "{}: left <: LUB", scenario.name);
            assert!(ctx.is_subtype(&scenario.right, &lub).unwrap(), "{}: right <: LUB", scenario.name);
        }
        if let Ok(glb) = ctx.glb(&scenario.left, &scenario.right) {
            assert!(ctx.is_subtype(&glb, &scenario.left).unwrap(), "{}: GLB <: left", scenario.name);
            assert!(ctx.is_subtype(&glb, &scenario.right).unwrap(), "{}: GLB <: right", scenario.name);
        }
    }
}

/// Repeated runs give identical results
#[test]
fn test_results_are_deterministic() {
    let fx = TestFixture::new();
    let ctx = fx.lattice();

    for scenario in scenarios::all(&fx) {
        assert_eq!(
            ctx.lub(&scenario.left, &scenario.right),
            ctx.lub(&scenario.left, &scenario.right),
            "{}",
            scenario.name
        );
        assert_eq!(
            ctx.glb(&scenario.left, &scenario.right),
            ctx.glb(&scenario.left, &scenario.right),
            "{}",
            scenario.name
        );
    }
}

/// The no-bound case is a user error, not an internal one
#[test]
fn test_unrelated_free_regions_report_no_common_bound() {
    let fx = TestFixture::new();
    let scenario = scenarios::unrelated_free(&fx);

    let err = fx.lattice().lub(&scenario.left, &scenario.right).unwrap_err();
    assert!(matches!(
        err,
        LatticeError::NoCommonBound(BoundMismatch::UnrelatedRegions { .. })
    ));
    assert!(!err.is_internal());
}

/// Mutable references are invariant in their referent
#[test]
fn test_mutable_referent_is_invariant() {
    let mut fx = TestFixture::new();
    fx.relate("A", "Z");
    let int = fx.base("int");
    let outer = fx.free("P");
    let sig = |inner_region, mutable: bool| {
        let inner = Ty::shared(inner_region, int.clone());
        let param = if mutable {
            Ty::mutable(outer, inner)
        } else {
            Ty::shared(outer, inner)
        };
        FnSig::returning_unit(0, vec![param])
    };

    let shared = fx
        .lattice()
        .lub(&sig(fx.free("A"), false), &sig(fx.free("Z"), false))
        .unwrap();
    expect!["fn(&'P &'Z int)"].assert_eq(&fx.render(&shared));

    let mutable = fx
        .lattice()
        .lub(&sig(fx.free("A"), true), &sig(fx.free("Z"), true));
    assert!(matches!(
        mutable,
        Err(LatticeError::NoCommonBound(BoundMismatch::UnrelatedRegions { .. }))
    ));
}

/// Nested function pointers flip variance once more
#[test]
fn test_nested_function_pointer() {
    let mut fx = TestFixture::new();
    fx.relate("A", "Z");
    let int = fx.base("int");
    let takes = |region| {
        FnSig::returning_unit(
            0,
            vec![Ty::function(vec![Ty::shared(region, int.clone())], Ty::unit())],
        )
    };
    let short = takes(fx.free("A"));
    let long = takes(fx.free("Z"));
    let ctx = fx.lattice();

    let lub = ctx.lub(&short, &long).unwrap();
    expect!["fn(fn(&'A int))"].assert_eq(&fx.render(&lub));
    assert!(ctx.is_subtype(&long, &short).unwrap());
    assert!(!ctx.is_subtype(&short, &long).unwrap());
}

/// Bound regions in return position are shared with parameters
#[test]
fn test_return_position() {
    let fx = TestFixture::new();
    let int = fx.base("int");
    let identity = FnSig::new(1, vec![Ty::shared(bound(0), int.clone())], Ty::shared(bound(0), int.clone()));
    let fixed = FnSig::new(0, vec![Ty::shared(fx.free("X"), int.clone())], Ty::shared(fx.free("X"), int));
    let ctx = fx.lattice();

    let lub = ctx.lub(&identity, &fixed).unwrap();
    expect!["fn(&'X int) -> &'X int"].assert_eq(&fx.render(&lub));
    assert!(ctx.is_subtype(&identity, &lub).unwrap());
}
