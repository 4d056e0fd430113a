//! Integration test utilities for the region and coherence engines

pub mod scenarios;

use sb_coherence::{ImplId, ImplTy, LocalItems, TraitId, TraitImpl, TypeDefId};
use sb_intern::Interner;
use sb_region::{BoundRegion, FreeRegion, FreeRegionMap, Region};
use sb_ty::{FnSig, LatticeCtxt, Ty};
use std::sync::Once;
use tracing_subscriber::filter::LevelFilter;

/// Test fixture helper
pub struct TestFixture {
    /// Names of regions, types and traits
    pub interner: Interner,
    /// Declared ordering between free regions
    pub free_regions: FreeRegionMap,
    /// Items local to the compilation unit under test
    pub local: LocalItems,
    next_impl: u32,
}

impl TestFixture {
    /// Creates a new test fixture
    #[must_use]
    pub fn new() -> Self {
        init_tracing();
        Self {
            interner: Interner::new(),
            free_regions: FreeRegionMap::new(),
            local: LocalItems::new(),
            next_impl: 0,
        }
    }

    /// Lattice context over the fixture's free regions
    #[must_use]
    pub fn lattice(&self) -> LatticeCtxt<'_> {
        LatticeCtxt::new(&self.free_regions)
    }

    /// Free region named `name`
    #[must_use]
    pub fn free(&self, name: &str) -> Region {
        Region::Free(FreeRegion(self.interner.intern(name)))
    }

    /// Declares `sub <= sup`
    pub fn relate(&mut self, sub: &str, sup: &str) {
        let sub = FreeRegion(self.interner.intern(sub));
        let sup = FreeRegion(self.interner.intern(sup));
        self.free_regions.relate(sub, sup);
    }

    /// Opaque base type
    #[must_use]
    pub fn base(&self, name: &str) -> Ty {
        Ty::Base(self.interner.intern(name))
    }

    /// `fn(&'r0 int, &'r1 int, ...)` quantifying over `bound_regions`
    #[must_use]
    pub fn ref_sig(&self, bound_regions: u32, params: &[Region]) -> FnSig {
        let int = self.base("int");
        FnSig::returning_unit(
            bound_regions,
            params.iter().map(|&region| Ty::shared(region, int.clone())).collect(),
        )
    }

    /// Renders a signature with the fixture's names
    #[must_use]
    pub fn render(&self, sig: &FnSig) -> String {
        sig.display(&self.interner).to_string()
    }

    /// Trait named `name`
    #[must_use]
    pub fn trait_id(&self, name: &str) -> TraitId {
        TraitId(self.interner.intern(name))
    }

    /// Nominal type named `name` without arguments
    #[must_use]
    pub fn adt(&self, name: &str) -> ImplTy {
        ImplTy::adt(TypeDefId(self.interner.intern(name)))
    }

    /// Marks a trait as local
    pub fn local_trait(&mut self, name: &str) {
        let trait_id = self.trait_id(name);
        self.local.add_trait(trait_id);
    }

    /// Marks a type as local
    pub fn local_type(&mut self, name: &str) {
        let def = TypeDefId(self.interner.intern(name));
        self.local.add_type(def);
    }

    /// Starts an impl of `trait_name` for `self_ty` with the next free id
    pub fn impl_of(&mut self, trait_name: &str, self_ty: ImplTy) -> TraitImpl {
        let id = ImplId(self.next_impl);
        self.next_impl += 1;
        TraitImpl::new(id, self.trait_id(trait_name), self_ty)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Bound region `index` of the enclosing signature
#[must_use]
pub fn bound(index: u32) -> Region {
    Region::Bound(BoundRegion(index))
}

/// Routes `tracing` output through the test harness, once per process
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        // A subscriber installed elsewhere wins.
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(LevelFilter::DEBUG)
            .try_init()
            .unwrap_or_default();
    });
}
