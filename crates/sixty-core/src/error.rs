//! Semantic errors reported by the analyzer.
//!
//! Every check the analyzer performs can fail locally: the construct is left
//! unannotated, an error is recorded in [`Diagnostics`](crate::Diagnostics),
//! and analysis continues. None of these errors stop the pass on their own;
//! the driver refuses to generate code when any were recorded.
//!
//! Type and argument lists are carried pre-rendered (`"integer"`,
//! `"(integer, real)"`) so this crate stays independent of the type registry.

use thiserror::Error;

use crate::Span;

/// A recoverable semantic error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    /// An identifier was declared twice in the same scope.
    #[error("at {span}: the identifier '{name}' has already been declared in the local scope")]
    DuplicateName { name: String, span: Span },

    /// A type with this name is already visible.
    #[error("at {span}: type '{name}' already exists")]
    DuplicateType { name: String, span: Span },

    /// A variable was given the name of a visible type.
    #[error("at {span}: the identifier '{name}' has already been declared as a type")]
    NameDeclaredAsType { name: String, span: Span },

    #[error("at {span}: cannot find type '{name}'")]
    TypeNotFound { name: String, span: Span },

    /// The right-hand side cannot be assigned to the left-hand side.
    #[error("at {span}: cannot convert type '{from}' to '{to}'")]
    TypeConversion { from: String, to: String, span: Span },

    /// The target of an assignment is not an assignable binding.
    #[error("at {span}: invalid left-hand side assignment")]
    InvalidLhs { span: Span },

    /// A condition did not evaluate to `bool`.
    #[error("at {span}: {found} is not a bool")]
    NotBool { found: String, span: Span },

    /// An identifier could not be resolved, either in scope or as a member of `ty`.
    #[error("at {span}: {}", identifier_message(.name, .ty))]
    IdentifierNotDeclared {
        name: String,
        ty: Option<String>,
        span: Span,
    },

    #[error("at {span}: static identifier '{name}' has not been declared for type '{ty}'")]
    StaticIdentifierNotDeclared { name: String, ty: String, span: Span },

    /// No routine matches the name and exact argument types.
    #[error("at {span}: {}", routine_message(.name, .args, .ty))]
    RoutineNotFound {
        name: String,
        args: String,
        ty: Option<String>,
        span: Span,
    },

    #[error("at {span}: routine named '{name}' that accepts {args} already exists")]
    DuplicateRoutine { name: String, args: String, span: Span },

    /// A routine declares a return type but has no return statement.
    #[error("at {span}: routine '{name}' returns type '{ty}'. No return statement found")]
    MissingReturn { name: String, ty: String, span: Span },

    /// A routine without a return type has a return statement.
    #[error("at {span}: invalid return statement. '{name}' does not return a value")]
    UnexpectedReturn { name: String, span: Span },

    #[error("at {span}: expecting '{expected}' to close routine. Got '{found}'")]
    RoutineNotClosed {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("at {span}: expecting '{expected}' to close type definition. Got '{found}'")]
    TypeNotClosed {
        expected: String,
        found: String,
        span: Span,
    },

    /// An operand or initializer produced no value and no other error explains why.
    #[error("at {span}: expression doesn't return object")]
    NoValue { span: Span },

    /// A type name was used on its own where a value is required.
    #[error("at {span}: cannot call type '{name}' without any modifiers")]
    TypeCall { name: String, span: Span },
}

fn identifier_message(name: &str, ty: &Option<String>) -> String {
    match ty {
        Some(ty) => format!("identifier '{name}' has not been declared for type '{ty}'"),
        None => format!("identifier '{name}' has not been declared"),
    }
}

fn routine_message(name: &str, args: &str, ty: &Option<String>) -> String {
    match ty {
        Some(ty) => {
            format!("no routine named '{name}' that accepts {args} exists for type '{ty}'")
        }
        None => format!("no routine named '{name}' that accepts {args} exists"),
    }
}

impl SemanticError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            SemanticError::DuplicateName { span, .. }
            | SemanticError::DuplicateType { span, .. }
            | SemanticError::NameDeclaredAsType { span, .. }
            | SemanticError::TypeNotFound { span, .. }
            | SemanticError::TypeConversion { span, .. }
            | SemanticError::InvalidLhs { span }
            | SemanticError::NotBool { span, .. }
            | SemanticError::IdentifierNotDeclared { span, .. }
            | SemanticError::StaticIdentifierNotDeclared { span, .. }
            | SemanticError::RoutineNotFound { span, .. }
            | SemanticError::DuplicateRoutine { span, .. }
            | SemanticError::MissingReturn { span, .. }
            | SemanticError::UnexpectedReturn { span, .. }
            | SemanticError::RoutineNotClosed { span, .. }
            | SemanticError::TypeNotClosed { span, .. }
            | SemanticError::NoValue { span }
            | SemanticError::TypeCall { span, .. } => *span,
        }
    }
}
