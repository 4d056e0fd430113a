//! Interning for trait, type and region names.
//!
//! Name resolution hands the checker already-resolved identities. The checker
//! only ever compares them, so every name is an opaque [`Symbol`].
#![allow(
    clippy::min_ident_chars,
    reason = "f is the conventional formatter name"
)]

pub use lasso::Spur as Symbol;
use lasso::ThreadedRodeo;
use std::fmt;
use std::sync::Arc;

/// Shared, thread-safe string interner.
///
/// Cloning is cheap and every clone sees the same symbol table, so pair checks
/// running on different threads can resolve names for logging.
#[derive(Clone)]
pub struct Interner {
    inner: Arc<ThreadedRodeo>,
}

impl Interner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ThreadedRodeo::new()),
        }
    }

    /// Interns `name`, returning the existing symbol if it was seen before.
    pub fn intern(&self, name: &str) -> Symbol {
        self.inner.get_or_intern(name)
    }

    /// Looks up a symbol without interning.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.inner.get(name)
    }

    /// Resolves a symbol created by this interner.
    ///
    /// # Panics
    ///
    /// Panics if `sym` came from a different interner.
    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.inner.resolve(&sym)
    }

    /// Resolves a symbol, returning `None` for foreign symbols.
    #[must_use]
    pub fn try_resolve(&self, sym: Symbol) -> Option<&str> {
        self.inner.try_resolve(&sym)
    }

    /// Number of distinct names interned so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if nothing has been interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner").field("len", &self.len()).finish()
    }
}
