//! Operators and the routines they resolve to.
//!
//! Operators have no built-in meaning: each one names a routine that the
//! operand's type must define.

use std::fmt;

use sixty_core::names;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `mod`
    Mod,
    /// `=`
    Equal,
    /// `<>`
    NotEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `and`
    And,
    /// `or`
    Or,
}

impl BinaryOp {
    /// Instance routine looked up on the left operand's type.
    pub fn routine_name(self) -> &'static str {
        match self {
            BinaryOp::Add => names::OPERATOR_PLUS,
            BinaryOp::Sub => names::OPERATOR_MINUS,
            BinaryOp::Mul => names::OPERATOR_STAR,
            BinaryOp::Div => names::OPERATOR_SLASH,
            BinaryOp::Mod => names::OPERATOR_MOD,
            BinaryOp::Equal => names::OPERATOR_EQUALS,
            BinaryOp::NotEqual => names::OPERATOR_NOT_EQUALS,
            BinaryOp::Less => names::OPERATOR_LESS_THAN,
            BinaryOp::Greater => names::OPERATOR_GREATER_THAN,
            BinaryOp::LessEqual => names::OPERATOR_LESS_EQUALS,
            BinaryOp::GreaterEqual => names::OPERATOR_GREATER_EQUALS,
            BinaryOp::And => names::OPERATOR_AND,
            BinaryOp::Or => names::OPERATOR_OR,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "mod",
            BinaryOp::Equal => "=",
            BinaryOp::NotEqual => "<>",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEqual => "<=",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `not`
    Not,
    /// `-`
    Neg,
}

impl UnaryOp {
    /// Static routine looked up on the operand's type.
    pub fn routine_name(self) -> &'static str {
        match self {
            UnaryOp::Not => names::OPERATOR_NOT,
            UnaryOp::Neg => names::UNARY_MINUS,
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Not => f.write_str("not"),
            UnaryOp::Neg => f.write_str("-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_operators_map_to_their_own_routines() {
        assert_eq!(BinaryOp::And.routine_name(), "operator_and");
        assert_eq!(BinaryOp::Or.routine_name(), "operator_or");
    }

    #[test]
    fn unary_routines() {
        assert_eq!(UnaryOp::Neg.routine_name(), "unary_minus");
        assert_eq!(UnaryOp::Not.routine_name(), "operator_not");
    }

    #[test]
    fn display() {
        assert_eq!(BinaryOp::NotEqual.to_string(), "<>");
        assert_eq!(UnaryOp::Not.to_string(), "not");
    }
}
