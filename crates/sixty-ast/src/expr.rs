//! Expression nodes.
//!
//! Identifiers, member accesses and calls are all expressed as a
//! [`CallChain`]: `a`, `a.b`, `a(x)` and `a.b(x).c` are chains of one or
//! more [`CallLink`]s resolved left to right.

use sixty_core::{NodeId, Span};

use crate::{BinaryOp, Ident, UnaryOp};

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    Literal(LiteralExpr<'ast>),
    Binary(&'ast BinaryExpr<'ast>),
    Unary(&'ast UnaryExpr<'ast>),
    Paren(&'ast ParenExpr<'ast>),
    /// Identifier, member access or call.
    Call(&'ast CallChain<'ast>),
}

impl<'ast> Expr<'ast> {
    pub fn id(&self) -> NodeId {
        match self {
            Self::Literal(e) => e.id,
            Self::Binary(e) => e.id,
            Self::Unary(e) => e.id,
            Self::Paren(e) => e.id,
            Self::Call(e) => e.id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Paren(e) => e.span,
            Self::Call(e) => e.span,
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr<'ast> {
    pub id: NodeId,
    pub kind: LiteralKind<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralKind<'ast> {
    Int(i32),
    Real(f64),
    Bool(bool),
    /// String contents with quotes and escapes already removed.
    String(&'ast str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    pub id: NodeId,
    pub left: &'ast Expr<'ast>,
    pub op: BinaryOp,
    pub right: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpr<'ast> {
    pub id: NodeId,
    pub op: UnaryOp,
    pub operand: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParenExpr<'ast> {
    pub id: NodeId,
    pub inner: &'ast Expr<'ast>,
    pub span: Span,
}

/// A chain of identifier and call links.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallChain<'ast> {
    pub id: NodeId,
    /// Never empty.
    pub links: &'ast [CallLink<'ast>],
    pub span: Span,
}

impl<'ast> CallChain<'ast> {
    /// The last link, whose binding an assignment targets.
    pub fn last(&self) -> Option<&CallLink<'ast>> {
        self.links.last()
    }
}

/// One link of a call chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallLink<'ast> {
    pub id: NodeId,
    pub name: Ident<'ast>,
    /// `None` for a bare identifier, `Some` (possibly empty) for a call.
    pub args: Option<&'ast [Expr<'ast>]>,
    pub span: Span,
}
