//! Type expressions as written in declarations.

use sixty_core::Span;

use crate::Ident;

/// A type reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeName<'ast> {
    /// A predefined or user type, by name.
    Named(Ident<'ast>),
    /// A routine value type: `routine(integer, real) returns bool`.
    Routine(&'ast RoutineTypeName<'ast>),
}

impl<'ast> TypeName<'ast> {
    pub fn span(&self) -> Span {
        match self {
            TypeName::Named(ident) => ident.span,
            TypeName::Routine(r) => r.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutineTypeName<'ast> {
    pub params: &'ast [TypeName<'ast>],
    pub returns: Option<TypeName<'ast>>,
    pub span: Span,
}
