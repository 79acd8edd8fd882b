//! Assignments and control flow.

use sixty_ast::{Assign, CondBlock, IfStmt};
use sixty_core::{NodeId, ScopeId, SemanticError};

use super::Analyzer;
use crate::annotations::{Access, AssignInfo, LinkResolution};
use crate::scope::ScopeKind;
use crate::units::UnitKind;

impl Analyzer {
    /// `target = value` on an existing binding.
    pub(super) fn assign(&mut self, assign: &Assign<'_>) {
        let target = self.chain(assign.target);
        let value = self.operand(assign.value);
        let Some(value_ty) = value else {
            return;
        };
        let Some(info) = self.annotations.chain(assign.target.id).cloned() else {
            return;
        };
        let Some(target_ty) = target else {
            self.report(SemanticError::InvalidLhs {
                span: assign.target.span,
            });
            return;
        };

        let is_self = assign
            .target
            .last()
            .and_then(|link| self.annotations.link(link.id))
            .is_some_and(|resolution| {
                matches!(
                    resolution,
                    LinkResolution::Load {
                        access: Access::SelfRoutine,
                        ..
                    }
                )
            });
        let entry = if is_self { None } else { info.entry.as_ref() };

        if !self
            .types
            .is_assignment_compatible(entry, target_ty, value_ty)
        {
            let error = if self.types.equal(target_ty, value_ty) {
                SemanticError::InvalidLhs {
                    span: assign.target.span,
                }
            } else {
                SemanticError::TypeConversion {
                    from: self.types.name(value_ty).to_string(),
                    to: self.types.name(target_ty).to_string(),
                    span: assign.span,
                }
            };
            self.report(error);
            return;
        }

        let mode = self.assign_mode(target_ty, value_ty);
        self.annotations
            .set_assign(assign.id, AssignInfo { target_ty, mode });
    }

    pub(super) fn if_stmt(&mut self, if_stmt: &IfStmt<'_>) {
        for branch in if_stmt.branches {
            self.cond_block(branch);
        }
        if let Some(else_block) = &if_stmt.else_block {
            self.current = self.open_block(else_block.id);
            self.stmts(else_block.body);
            self.exit_scope();
        }
    }

    /// An `if`, `elseif` or `loop` block. The condition belongs to the block.
    pub(super) fn cond_block(&mut self, block: &CondBlock<'_>) {
        self.current = self.open_block(block.id);

        let boolean = self.types.predefined().boolean;
        if let Some(ty) = self.operand(block.condition)
            && !self.types.equal(ty, boolean)
        {
            self.report(SemanticError::NotBool {
                found: self.types.name(ty).to_string(),
                span: block.condition.span(),
            });
        }

        self.stmts(block.body);
        self.exit_scope();
    }

    /// Open the Block scope of `node` under the current scope.
    fn open_block(&mut self, node: NodeId) -> ScopeId {
        let name = self.scopes.next_inner_name(self.current);
        let unit = self
            .units
            .plan(self.current_unit(), name.as_str(), UnitKind::Block, None);
        let scope = self.open_scope(ScopeKind::Block, &name, unit);
        self.annotations.set_block(node, scope);
        scope
    }
}
