//! Statement nodes.

use sixty_core::{NodeId, Span};

use crate::{CallChain, Expr, Ident, RoutineDef, TypeDef, TypeName};

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// `integer a, b`
    VarDecl(&'ast VarDecl<'ast>),
    /// `integer a, b = expr`
    AssignNew(&'ast AssignNew<'ast>),
    /// `a.b = expr`
    Assign(&'ast Assign<'ast>),
    /// A call chain used as a statement.
    Call(&'ast CallChain<'ast>),
    /// `if ... elseif ... else ... end if`
    If(&'ast IfStmt<'ast>),
    /// `loop while cond ... end loop`
    Loop(&'ast CondBlock<'ast>),
    Routine(&'ast RoutineDef<'ast>),
    Type(&'ast TypeDef<'ast>),
}

impl<'ast> Stmt<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Stmt::VarDecl(s) => s.span,
            Stmt::AssignNew(s) => s.span,
            Stmt::Assign(s) => s.span,
            Stmt::Call(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::Loop(s) => s.span,
            Stmt::Routine(s) => s.span,
            Stmt::Type(s) => s.span,
        }
    }
}

/// Declaration of one or more default-constructed variables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarDecl<'ast> {
    pub id: NodeId,
    pub ty: TypeName<'ast>,
    pub names: &'ast [Ident<'ast>],
    pub span: Span,
}

/// Declaration of new variables with an initializer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignNew<'ast> {
    pub id: NodeId,
    pub ty: TypeName<'ast>,
    pub names: &'ast [Ident<'ast>],
    pub value: &'ast Expr<'ast>,
    pub span: Span,
}

/// Assignment to an existing binding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assign<'ast> {
    pub id: NodeId,
    pub target: &'ast CallChain<'ast>,
    pub value: &'ast Expr<'ast>,
    pub span: Span,
}

/// A condition guarding a block: one `if`/`elseif` branch or a loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CondBlock<'ast> {
    pub id: NodeId,
    pub condition: &'ast Expr<'ast>,
    pub body: &'ast [Stmt<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfStmt<'ast> {
    /// The `if` branch followed by every `elseif`. Never empty.
    pub branches: &'ast [CondBlock<'ast>],
    pub else_block: Option<ElseBlock<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElseBlock<'ast> {
    pub id: NodeId,
    pub body: &'ast [Stmt<'ast>],
    pub span: Span,
}
