//! Routine and type definitions.

use sixty_core::{NodeId, Span};

use crate::{Expr, Ident, Stmt, TypeName, VarDecl};

/// A routine definition.
///
/// ```text
/// routine name(integer a) returns integer
///     ...
///     return a
/// end name
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutineDef<'ast> {
    pub id: NodeId,
    pub name: Ident<'ast>,
    /// Name written after `end`; must match `name`.
    pub end_name: Ident<'ast>,
    pub params: &'ast [Param<'ast>],
    pub returns: Option<TypeName<'ast>>,
    pub body: &'ast [Stmt<'ast>],
    pub ret: Option<ReturnClause<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param<'ast> {
    pub ty: TypeName<'ast>,
    pub name: Ident<'ast>,
}

/// The trailing `return expr` of a routine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnClause<'ast> {
    pub value: &'ast Expr<'ast>,
    pub span: Span,
}

/// A user type definition.
///
/// Members are grouped by kind; the analyzer declares all fields and
/// routine signatures before it looks at any routine body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeDef<'ast> {
    pub id: NodeId,
    pub name: Ident<'ast>,
    pub end_name: Ident<'ast>,
    pub fields: &'ast [VarDecl<'ast>],
    pub static_fields: &'ast [StaticField<'ast>],
    pub routines: &'ast [RoutineDef<'ast>],
    pub static_routines: &'ast [RoutineDef<'ast>],
    pub span: Span,
}

/// `static integer count = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticField<'ast> {
    pub decl: VarDecl<'ast>,
    pub init: &'ast Expr<'ast>,
}
