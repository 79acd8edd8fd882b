//! SixtyFortran Compiler
//!
//! A two-pass compiler backend from a parsed syntax tree to Jasmin-style
//! assembly text.
//!
//! ## Architecture
//!
//! - **Pass 1 (Analysis)**: build scopes, types and the unit plan; resolve
//!   every name, operator and call chain into side-table annotations
//! - **Pass 2 (Generation)**: lower the annotated tree into one object unit
//!   per type and routine, plus the main unit and the routine base class
//!
//! Generation only runs on an analysis without errors.
//!
//! ## Modules
//!
//! - [`analyzer`]: semantic analysis
//! - [`annotations`]: per-node analysis results
//! - [`codegen`]: code generation
//! - [`context`]: per-compilation state (program name, labels)
//! - [`emit`]: instructions, methods and object units as text
//! - [`scope`]: scope tree, slots and captures
//! - [`types`]: type registry and routine signatures
//! - [`units`]: unit planning and naming

pub mod analyzer;
pub mod annotations;
pub mod codegen;
pub mod context;
pub mod emit;
pub mod scope;
pub mod types;
pub mod units;

pub use analyzer::{Analysis, Analyzer};
pub use annotations::{Access, Annotations};
pub use codegen::CodeGenerator;
pub use context::{CompilationContext, Label};
pub use emit::ObjectUnit;
pub use scope::{ScopeEntry, ScopeTree};
pub use types::{RoutineSpec, TypeRegistry};
pub use units::{Unit, UnitTree};

// Re-export SemanticError from core for convenience
pub use sixty_core::SemanticError;

use sixty_ast::Program;

/// Result of compilation.
#[derive(Debug)]
pub struct CompilationResult {
    /// Emitted units; empty when there were errors.
    pub units: Vec<ObjectUnit>,
    /// Semantic errors, in report order.
    pub errors: Vec<SemanticError>,
}

impl CompilationResult {
    /// Check if compilation succeeded (no errors).
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The main compiler entry point.
pub struct Compiler;

impl Compiler {
    /// Analyze `program` and, if it is free of errors, generate its units.
    pub fn compile(program: &Program<'_>, ctx: &mut CompilationContext) -> CompilationResult {
        let analysis = Analyzer::new(ctx).analyze(program);
        if analysis.has_errors() {
            return CompilationResult {
                units: Vec::new(),
                errors: analysis.diagnostics.into_errors(),
            };
        }

        let units = CodeGenerator::new(&analysis, ctx).generate(program);
        CompilationResult {
            units,
            errors: Vec::new(),
        }
    }
}
