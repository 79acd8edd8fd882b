//! Reserved names shared by the analyzer and the code generator.
//!
//! Operators are ordinary routines with fixed names; the runtime library
//! classes are addressed by fixed paths.

pub const OPERATOR_ASSIGNMENT: &str = "operator_assignment";
pub const OPERATOR_PARENTHESIS: &str = "operator_parenthesis";
pub const OPERATOR_PLUS: &str = "operator_plus";
pub const OPERATOR_MINUS: &str = "operator_minus";
pub const OPERATOR_STAR: &str = "operator_star";
pub const OPERATOR_SLASH: &str = "operator_slash";
pub const OPERATOR_MOD: &str = "operator_mod";
pub const OPERATOR_EQUALS: &str = "operator_equals";
pub const OPERATOR_NOT_EQUALS: &str = "operator_not_equals";
pub const OPERATOR_LESS_THAN: &str = "operator_less_than";
pub const OPERATOR_GREATER_THAN: &str = "operator_greater_than";
pub const OPERATOR_LESS_EQUALS: &str = "operator_less_equals";
pub const OPERATOR_GREATER_EQUALS: &str = "operator_greater_equals";
pub const OPERATOR_AND: &str = "operator_and";
pub const OPERATOR_OR: &str = "operator_or";
pub const OPERATOR_NOT: &str = "operator_not";
pub const UNARY_MINUS: &str = "unary_minus";

// Predefined type names as written in source.
pub const INTEGER: &str = "integer";
pub const REAL: &str = "real";
pub const STRING: &str = "string";
pub const BOOL: &str = "bool";
pub const PRINT: &str = "print";
pub const READ: &str = "read";

/// Directory holding the runtime library classes.
pub const LIBRARY_DIR: &str = "library/";

/// Name of the callable base class every routine unit extends.
pub const ROUTINE_BASE: &str = "routine";

/// Field through which a type's instance routine reaches its instance.
pub const ENCLOSING_INSTANCE: &str = "this$type";

/// Static method that wires a type's captures and static members.
pub const STATIC_INIT: &str = "$static_init";

/// Accessor holding the 0/1 flag of a runtime `bool`.
pub const BOOL_FLAG_FIELD: &str = "value";
