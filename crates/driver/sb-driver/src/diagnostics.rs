//! Error accumulation over a checking pass.

use sb_coherence::CoherenceError;
use sb_ty::LatticeError;
use thiserror::Error;

/// An error produced by one of the engines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// From a LUB, GLB or subtyping query
    #[error(transparent)]
    Lattice(LatticeError),

    /// From the coherence checker
    #[error(transparent)]
    Coherence(CoherenceError),
}

impl Diagnostic {
    /// Returns `true` for errors that indicate a bug rather than bad input.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        match self {
            Self::Lattice(error) => error.is_internal(),
            Self::Coherence(error) => error.is_internal(),
        }
    }
}

impl From<LatticeError> for Diagnostic {
    fn from(error: LatticeError) -> Self {
        Self::Lattice(error)
    }
}

impl From<CoherenceError> for Diagnostic {
    fn from(error: CoherenceError) -> Self {
        Self::Coherence(error)
    }
}

/// Collects user-facing errors and internal errors separately.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    errors: Vec<Diagnostic>,
    internal: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error, routing it by [`Diagnostic::is_internal`].
    pub fn push(&mut self, diagnostic: impl Into<Diagnostic>) {
        let diagnostic = diagnostic.into();
        if diagnostic.is_internal() {
            tracing::error!(%diagnostic, "internal error");
            self.internal.push(diagnostic);
        } else {
            tracing::debug!(%diagnostic, "diagnostic recorded");
            self.errors.push(diagnostic);
        }
    }

    /// Records every error of an iterator.
    pub fn extend<D: Into<Diagnostic>>(&mut self, diagnostics: impl IntoIterator<Item = D>) {
        for diagnostic in diagnostics {
            self.push(diagnostic);
        }
    }

    /// User-facing errors recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    /// Returns `true` if anything was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || !self.internal.is_empty()
    }

    /// Ends the pass.
    #[must_use]
    pub fn finish(self) -> Report {
        Report {
            errors: self.errors,
            internal: self.internal,
        }
    }
}

/// Everything a pass reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// User-facing errors, in the order they were found
    pub errors: Vec<Diagnostic>,
    /// Engine failures
    pub internal: Vec<Diagnostic>,
}

impl Report {
    /// Returns `true` if the pass found nothing to report.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.internal.is_empty()
    }
}
