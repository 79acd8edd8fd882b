//! Syntax tree consumed by the SixtyFortran compiler backend.
//!
//! The tree is produced by an external parser. All nodes borrow from a
//! [`bumpalo::Bump`] arena and are `Copy`; child lists are arena slices.
//! Nodes that the analyzer annotates carry a [`NodeId`](sixty_core::NodeId)
//! so analysis results can live in side tables instead of on the tree.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use sixty_ast::{AstBuilder, BinaryOp};
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let sum = b.binary(b.int(5), BinaryOp::Add, b.int(3));
//! let program = b.program(&[b.assign_new(b.named("integer"), &["x"], sum)]);
//! assert_eq!(program.stmts.len(), 1);
//! ```

pub mod builder;
pub mod decl;
pub mod expr;
pub mod ops;
pub mod stmt;
pub mod types;

pub use builder::AstBuilder;
pub use decl::*;
pub use expr::*;
pub use ops::*;
pub use stmt::*;
pub use types::*;

use sixty_core::Span;

/// An identifier with its source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}

/// A parsed program: the body of the main unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Program<'ast> {
    pub stmts: &'ast [Stmt<'ast>],
    pub span: Span,
}
