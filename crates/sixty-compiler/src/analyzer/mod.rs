//! Semantic analysis pass.
//!
//! The [`Analyzer`] walks the syntax tree once. It builds the scope tree, the
//! type registry and the unit plan. It resolves every name, operator and
//! call chain, and records the results in [`Annotations`]. Failed checks are
//! reported to [`Diagnostics`] and leave the node unannotated. Analysis
//! always runs to the end, so independent errors are reported together.
//!
//! ## Modules
//!
//! - `decl`: variable, routine and type definitions
//! - `stmt`: assignments and control flow
//! - `expr`: literals and operators
//! - `call`: call chains and binding access

mod call;
mod decl;
mod expr;
mod stmt;

use sixty_ast::{Program, Stmt};
use sixty_core::{Diagnostics, ScopeId, SemanticError, Span, UnitId, names};

use crate::annotations::Annotations;
use crate::context::CompilationContext;
use crate::scope::{EntryKind, ScopeEntry, ScopeKind, ScopeTree};
use crate::types::TypeRegistry;
use crate::units::UnitTree;

/// Everything the analyzer produced. Read-only input of the generator.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub scopes: ScopeTree,
    pub types: TypeRegistry,
    pub units: UnitTree,
    pub annotations: Annotations,
    pub diagnostics: Diagnostics,
}

impl Analysis {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.error_count()
    }
}

/// Semantic analyzer for one program.
pub struct Analyzer {
    scopes: ScopeTree,
    types: TypeRegistry,
    units: UnitTree,
    annotations: Annotations,
    diagnostics: Diagnostics,
    /// Scope the traversal is in.
    current: ScopeId,
}

impl Analyzer {
    /// Create an analyzer whose main scope holds the runtime library.
    pub fn new(ctx: &CompilationContext) -> Self {
        let units = UnitTree::new(ctx.program());
        let types = TypeRegistry::new(units.routine_base_path());
        let scopes = ScopeTree::new(ctx.program(), units.main());
        let current = scopes.root();

        let mut analyzer = Self {
            scopes,
            types,
            units,
            annotations: Annotations::new(),
            diagnostics: Diagnostics::new(),
            current,
        };
        analyzer.declare_predefined();
        analyzer
    }

    fn declare_predefined(&mut self) {
        let root = self.scopes.root();
        let predefined = *self.types.predefined();
        for (name, ty) in predefined.named_types() {
            if let Err(error) = self.scopes.declare_type(root, name, ty, Span::default()) {
                self.report(error);
            }
        }
        for (name, ty) in [(names::PRINT, predefined.print), (names::READ, predefined.read)] {
            let entry = ScopeEntry::new(name, ty, EntryKind::RoutineValue);
            if let Err(error) = self.scopes.declare(root, entry, Span::default()) {
                self.report(error);
            }
        }
    }

    /// Analyze `program` to completion.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn analyze(mut self, program: &Program<'_>) -> Analysis {
        tracing::debug!(program = %self.units.path(self.units.main()), "semantic analysis");
        self.stmts(program.stmts);
        tracing::debug!(
            errors = self.diagnostics.error_count(),
            scopes = self.scopes.len(),
            units = self.units.len(),
            "semantic analysis finished"
        );

        Analysis {
            scopes: self.scopes,
            types: self.types,
            units: self.units,
            annotations: self.annotations,
            diagnostics: self.diagnostics,
        }
    }

    // ==========================================================================
    // Traversal
    // ==========================================================================

    fn stmts(&mut self, stmts: &[Stmt<'_>]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt<'_>) {
        match stmt {
            Stmt::VarDecl(decl) => {
                self.var_decl(decl, EntryKind::Variable, None);
            }
            Stmt::AssignNew(assign) => self.assign_new(assign),
            Stmt::Assign(assign) => self.assign(assign),
            Stmt::Call(chain) => {
                self.chain(chain);
            }
            Stmt::If(if_stmt) => self.if_stmt(if_stmt),
            Stmt::Loop(block) => self.cond_block(block),
            Stmt::Routine(def) => self.routine_def(def),
            Stmt::Type(def) => self.type_def(def),
        }
    }

    // ==========================================================================
    // Helpers
    // ==========================================================================

    fn report(&mut self, error: SemanticError) {
        self.diagnostics.report(error);
    }

    fn current_unit(&self) -> UnitId {
        self.scopes.get(self.current).unit
    }

    /// Open a child scope of the current one without entering it.
    fn open_scope(&mut self, kind: ScopeKind, name: &str, unit: UnitId) -> ScopeId {
        self.scopes.open(self.current, kind, name, unit)
    }

    /// Return to the parent of the current scope.
    fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes.parent(self.current) {
            self.current = parent;
        }
    }
}
