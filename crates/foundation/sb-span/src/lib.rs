//! Source locations attached to declarations.
//!
//! The checker never reads source text. Spans travel with impl declarations
//! so that diagnostics can point back at the offending item.

use serde::{Deserialize, Serialize};

/// Identifier of a source file within a compilation unit.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct FileId(pub u32);

/// Half-open byte range within a file.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// First byte.
    pub start: u32,
    /// One past the last byte.
    pub end: u32,
}

impl Span {
    /// Creates a span; `start` must not exceed `end`.
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start {start} past end {end}");
        Self { start, end }
    }

    /// Returns `true` for zero-width spans.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A span together with the file it belongs to.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct FileSpan {
    /// Owning file.
    pub file: FileId,
    /// Location inside the file.
    pub span: Span,
}

impl FileSpan {
    /// Creates a file span.
    #[must_use]
    pub fn new(file: FileId, span: Span) -> Self {
        Self { file, span }
    }

    /// Zero-width span at the start of `file`, for synthesized declarations.
    #[must_use]
    pub fn detached(file: FileId) -> Self {
        Self::new(file, Span::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_span() {
        let span = Span::new(1, 9);
        assert_eq!((span.start, span.end), (1, 9));
        assert!(!span.is_empty());
    }

    #[test]
    fn test_detached_span_is_empty() {
        let span = FileSpan::detached(FileId(3));
        assert!(span.span.is_empty());
        assert_eq!(span.file, FileId(3));
    }
}
