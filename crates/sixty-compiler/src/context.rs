//! CompilationContext - state threaded through both passes.
//!
//! Holds the program name every unit path derives from and the label
//! counter. Passed by `&mut` instead of living in process-wide statics, so
//! two compilations never share numbering.

use std::fmt;

/// A jump target, unique within a compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(u32);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{:03}", self.0)
    }
}

/// Per-compilation state shared by the analyzer and the generator.
#[derive(Debug, Clone)]
pub struct CompilationContext {
    program: String,
    next_label: u32,
}

impl CompilationContext {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            next_label: 1,
        }
    }

    /// Name of the main unit.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Allocate a fresh label.
    pub fn next_label(&mut self) -> Label {
        let label = Label(self.next_label);
        self.next_label += 1;
        label
    }

    pub fn labels_issued(&self) -> u32 {
        self.next_label - 1
    }
}
