//! Property tests over generated signatures and region graphs
#![allow(
    clippy::min_ident_chars,
    reason = "a and b are the two generated signatures"
)]

use integration_tests::{bound, TestFixture};
use proptest::prelude::*;
use sb_region::RegionGraph;
use sb_ty::FnSig;

/// Bound-region pattern of one signature: binder size and the region index
/// used by each parameter.
fn pattern(arity: usize) -> impl Strategy<Value = (u32, Vec<u32>)> {
    (1_u32..=3).prop_flat_map(move |binder| {
        (Just(binder), prop::collection::vec(0..binder, arity))
    })
}

fn signature_pair() -> impl Strategy<Value = ((u32, Vec<u32>), (u32, Vec<u32>))> {
    (1_usize..=4).prop_flat_map(|arity| (pattern(arity), pattern(arity)))
}

fn build(fx: &TestFixture, (binder, indices): &(u32, Vec<u32>)) -> FnSig {
    let regions: Vec<_> = indices.iter().map(|&index| bound(index)).collect();
    fx.ref_sig(*binder, &regions)
}

proptest! {
    #[test]
    fn test_lub_is_an_upper_bound((left, right) in signature_pair()) {
        let fx = TestFixture::new();
        let ctx = fx.lattice();
        let a = build(&fx, &left);
        let b = build(&fx, &right);

        let lub = ctx.lub(&a, &b).unwrap();
        prop_assert!(ctx.is_subtype(&a, &lub).unwrap());
        prop_assert!(ctx.is_subtype(&b, &lub).unwrap());
    }

    #[test]
    fn test_glb_is_a_lower_bound((left, right) in signature_pair()) {
        let fx = TestFixture::new();
        let ctx = fx.lattice();
        let a = build(&fx, &left);
        let b = build(&fx, &right);

        let glb = ctx.glb(&a, &b).unwrap();
        prop_assert!(ctx.is_subtype(&glb, &a).unwrap());
        prop_assert!(ctx.is_subtype(&glb, &b).unwrap());
    }

    #[test]
    fn test_bounds_are_deterministic((left, right) in signature_pair()) {
        let fx = TestFixture::new();
        let ctx = fx.lattice();
        let a = build(&fx, &left);
        let b = build(&fx, &right);

        prop_assert_eq!(ctx.lub(&a, &b), ctx.lub(&a, &b));
        prop_assert_eq!(ctx.glb(&a, &b), ctx.glb(&a, &b));
    }

    #[test]
    fn test_taint_is_a_connected_component(
        (count, edges) in (1_usize..12).prop_flat_map(|count| {
            (Just(count), prop::collection::vec((0..count, 0..count), 0..20))
        })
    ) {
        let mut graph = RegionGraph::new();
        let regions: Vec<_> = (0..count).map(|_| graph.new_region()).collect();
        for &(lo, hi) in &edges {
            graph.add_constraint(regions[lo], regions[hi]);
        }

        for &root in &regions {
            let taint = graph.tainted(root).unwrap();
            prop_assert!(taint.contains(root));
            for member in taint.iter() {
                let other = graph.tainted(member).unwrap();
                prop_assert_eq!(other.len(), taint.len());
                prop_assert!(other.contains(root));
            }
        }
    }
}
