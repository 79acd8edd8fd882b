//! Source location tracking for diagnostics.
//!
//! The parser stamps every node with a [`Span`]; the analyzer copies it into
//! each [`SemanticError`](crate::SemanticError) it reports.

use std::fmt;

/// A position in the source text.
///
/// Only the start of a construct is tracked, together with its length, which
/// is all the error messages need.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
    /// Length in bytes.
    pub len: u32,
}

impl Span {
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// A zero-length span at the start of a line.
    #[inline]
    pub fn line(line: u32) -> Self {
        Self { line, col: 1, len: 0 }
    }

    /// Whether this span points at nothing (built without position info).
    #[inline]
    pub fn is_unknown(&self) -> bool {
        self.line == 0
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            f.write_str("<unknown>")
        } else {
            write!(f, "line {}:{}", self.line, self.col)
        }
    }
}
