//! Expressions: literals and operators.
//!
//! Every operator is a routine call on its left operand's type (or a static
//! routine for unary operators), looked up with exact argument matching.

use sixty_ast::{BinaryExpr, Expr, LiteralKind, UnaryExpr};
use sixty_core::{SemanticError, TypeId};

use super::Analyzer;
use crate::annotations::OperatorCall;
use crate::types::ArgumentList;

impl Analyzer {
    /// Type of `expr`, or `None` if it yields no value or failed.
    pub(super) fn expr(&mut self, expr: &Expr<'_>) -> Option<TypeId> {
        let ty = match expr {
            Expr::Literal(literal) => {
                let p = self.types.predefined();
                Some(match literal.kind {
                    LiteralKind::Int(_) => p.integer,
                    LiteralKind::Real(_) => p.real,
                    LiteralKind::Bool(_) => p.boolean,
                    LiteralKind::String(_) => p.string,
                })
            }
            Expr::Binary(binary) => self.binary(binary),
            Expr::Unary(unary) => self.unary(unary),
            Expr::Paren(paren) => self.expr(paren.inner),
            Expr::Call(chain) => self.chain(chain),
        };
        if let Some(ty) = ty {
            self.annotations.set_expr_type(expr.id(), ty);
        }
        ty
    }

    /// An expression used where a value is required.
    ///
    /// Reports [`SemanticError::NoValue`] when it yields nothing without
    /// having already failed for another reason.
    pub(super) fn operand(&mut self, expr: &Expr<'_>) -> Option<TypeId> {
        let checkpoint = self.diagnostics.checkpoint();
        let ty = self.expr(expr);
        if ty.is_none() && !self.diagnostics.has_errors_since(checkpoint) {
            self.report(SemanticError::NoValue { span: expr.span() });
        }
        ty
    }

    fn binary(&mut self, binary: &BinaryExpr<'_>) -> Option<TypeId> {
        let left = self.operand(binary.left);
        let right = self.operand(binary.right);
        let (left, right) = (left?, right?);

        let name = binary.op.routine_name();
        let args = ArgumentList::from([right]);
        let Some(routine) = self.types.lookup_routine(left, name, &args).cloned() else {
            self.report(SemanticError::RoutineNotFound {
                name: name.to_string(),
                args: self.types.format_args(&args),
                ty: Some(self.types.name(left).to_string()),
                span: binary.span,
            });
            return None;
        };

        let returns = routine.returns;
        self.annotations.set_operator(
            binary.id,
            OperatorCall {
                owner: left,
                routine,
                is_static: false,
            },
        );
        returns
    }

    fn unary(&mut self, unary: &UnaryExpr<'_>) -> Option<TypeId> {
        let operand = self.operand(unary.operand)?;

        let name = unary.op.routine_name();
        let args = ArgumentList::from([operand]);
        let Some(routine) = self.types.lookup_static_routine(operand, name, &args).cloned() else {
            self.report(SemanticError::RoutineNotFound {
                name: name.to_string(),
                args: self.types.format_args(&args),
                ty: Some(self.types.name(operand).to_string()),
                span: unary.span,
            });
            return None;
        };

        let returns = routine.returns;
        self.annotations.set_operator(
            unary.id,
            OperatorCall {
                owner: operand,
                routine,
                is_static: true,
            },
        );
        returns
    }
}
