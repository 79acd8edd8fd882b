//! Statements and definition sites.

use sixty_ast::{Assign, AssignNew, CondBlock, IfStmt, RoutineDef, Stmt, TypeDef, VarDecl};

use super::CodeGenerator;
use crate::annotations::{AssignMode, LinkResolution};
use crate::emit::{Instruction, MemberRef};
use crate::scope::EntryKind;

impl CodeGenerator<'_> {
    pub(super) fn stmts(&mut self, stmts: &[Stmt<'_>]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt<'_>) {
        match stmt {
            Stmt::VarDecl(decl) => self.var_decl(decl),
            Stmt::AssignNew(assign) => self.assign_new(assign),
            Stmt::Assign(assign) => self.assign(assign),
            Stmt::Call(chain) => {
                self.chain(chain);
                let returns = self
                    .analysis
                    .annotations
                    .chain(chain.id)
                    .is_some_and(|info| info.ty.is_some());
                if returns {
                    self.emit(Instruction::Pop);
                }
            }
            Stmt::If(if_stmt) => self.if_stmt(if_stmt),
            Stmt::Loop(block) => self.loop_stmt(block),
            Stmt::Routine(def) => self.routine_def(def),
            Stmt::Type(def) => self.type_def(def),
        }
    }

    // ==========================================================================
    // Bindings
    // ==========================================================================

    /// Every declared name gets its own default value.
    fn var_decl(&mut self, decl: &VarDecl<'_>) {
        let Some(info) = self.analysis.annotations.decl(decl.id) else {
            return;
        };
        for entry in &info.entries {
            let Some(slot) = entry.slot else {
                continue;
            };
            self.default_value(entry.ty);
            self.emit(Instruction::AStore(slot));
        }
    }

    /// The initializer is evaluated once. With `operator_assignment` every
    /// name still gets its own value, copied from the first name; otherwise
    /// all names share the one reference.
    fn assign_new(&mut self, assign: &AssignNew<'_>) {
        let Some(info) = self.analysis.annotations.decl(assign.id) else {
            return;
        };
        let Some(mode) = &info.mode else {
            return;
        };
        let slots: Vec<u32> = info.entries.iter().filter_map(|entry| entry.slot).collect();
        let Some((&first, rest)) = slots.split_first() else {
            return;
        };
        match mode {
            AssignMode::Operator(routine) => {
                self.default_value(info.ty);
                self.emit(Instruction::AStore(first));
                self.emit(Instruction::ALoad(first));
                self.operator_assignment(info.ty, routine, assign.value);
                for &slot in rest {
                    self.default_value(info.ty);
                    self.emit(Instruction::AStore(slot));
                    self.emit(Instruction::ALoad(slot));
                    self.call_member(info.ty, routine, false, |g| {
                        g.emit(Instruction::ALoad(first))
                    });
                }
            }
            AssignMode::Store => {
                self.expr(assign.value);
                for _ in rest {
                    self.emit(Instruction::Dup);
                }
                for &slot in &slots {
                    self.emit(Instruction::AStore(slot));
                }
            }
        }
    }

    fn assign(&mut self, assign: &Assign<'_>) {
        let Some(info) = self.analysis.annotations.assign(assign.id) else {
            return;
        };
        match &info.mode {
            AssignMode::Operator(routine) => {
                self.chain(assign.target);
                self.operator_assignment(info.target_ty, routine, assign.value);
            }
            AssignMode::Store => {
                let Some(last) = assign.target.last() else {
                    return;
                };
                match self.analysis.annotations.link(last.id) {
                    Some(LinkResolution::Load { entry, access }) => {
                        self.store_prefix(*access);
                        self.expr(assign.value);
                        self.store(entry, *access);
                    }
                    Some(LinkResolution::Field { owner, entry }) => {
                        self.chain_prefix(assign.target);
                        self.expr(assign.value);
                        let member =
                            MemberRef::new(self.path(*owner), &entry.name, self.descriptor(entry.ty));
                        if entry.kind == EntryKind::StaticField {
                            self.emit(Instruction::PutStatic(member));
                        } else {
                            self.emit(Instruction::PutField(member));
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    // ==========================================================================
    // Control flow
    // ==========================================================================

    /// Each branch tests its condition and falls through to the next on
    /// false; a taken branch jumps past the rest.
    fn if_stmt(&mut self, if_stmt: &IfStmt<'_>) {
        let end = self.ctx.next_label();
        for branch in if_stmt.branches {
            let next = self.ctx.next_label();
            self.branch_unless(branch.condition, next);
            self.stmts(branch.body);
            self.emit(Instruction::Goto(end));
            self.emit(Instruction::Label(next));
        }
        if let Some(else_block) = &if_stmt.else_block {
            self.stmts(else_block.body);
        }
        self.emit(Instruction::Label(end));
    }

    fn loop_stmt(&mut self, block: &CondBlock<'_>) {
        let top = self.ctx.next_label();
        let exit = self.ctx.next_label();
        self.emit(Instruction::Label(top));
        self.branch_unless(block.condition, exit);
        self.stmts(block.body);
        self.emit(Instruction::Goto(top));
        self.emit(Instruction::Label(exit));
    }

    // ==========================================================================
    // Definitions
    // ==========================================================================

    /// Emit the routine's unit, then bind a new instance of it here.
    fn routine_def(&mut self, def: &RoutineDef<'_>) {
        let Some(info) = self.analysis.annotations.routine(def.id) else {
            return;
        };
        self.routine_unit(def, info);
        let Some(slot) = info.entry.slot else {
            return;
        };
        self.instantiate_routine(info);
        self.emit(Instruction::AStore(slot));
    }

    /// Emit the type's unit, then wire its statics here.
    fn type_def(&mut self, def: &TypeDef<'_>) {
        let Some(info) = self.analysis.annotations.type_def(def.id) else {
            return;
        };
        self.type_unit(def, info);
        self.initialize_type(info);
    }
}
