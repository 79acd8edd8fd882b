//! Collection of recoverable semantic errors.
//!
//! Errors are accumulated rather than returned, so a single run reports every
//! independent problem. A [`Checkpoint`] taken before evaluating a
//! sub-expression tells the caller whether that evaluation already explained
//! its own failure, which is how cascading errors are suppressed.

use crate::SemanticError;

/// Error count at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Accumulates semantic errors in report order.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    errors: Vec<SemanticError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error.
    pub fn report(&mut self, error: SemanticError) {
        tracing::debug!(%error, "semantic error");
        self.errors.push(error);
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[SemanticError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<SemanticError> {
        self.errors
    }

    /// Mark the current error count.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.errors.len())
    }

    /// Whether any error was reported after `checkpoint` was taken.
    pub fn has_errors_since(&self, checkpoint: Checkpoint) -> bool {
        self.errors.len() > checkpoint.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Span;

    #[test]
    fn checkpoint_detects_new_errors() {
        let mut diagnostics = Diagnostics::new();
        let before = diagnostics.checkpoint();
        assert!(!diagnostics.has_errors_since(before));

        diagnostics.report(SemanticError::InvalidLhs { span: Span::line(1) });
        assert!(diagnostics.has_errors_since(before));

        let after = diagnostics.checkpoint();
        assert!(!diagnostics.has_errors_since(after));
        assert_eq!(diagnostics.error_count(), 1);
    }
}
