//! Expressions, call chains and member calls.

use sixty_ast::{CallChain, CallLink, Expr, LiteralExpr, LiteralKind};
use sixty_core::{TypeId, names};

use super::CodeGenerator;
use crate::annotations::{Callee, LinkResolution};
use crate::context::Label;
use crate::emit::{Instruction, MemberRef, MethodDescriptor};
use crate::scope::{EntryKind, ScopeEntry};
use crate::types::{RoutineSpec, TypeKind};

impl CodeGenerator<'_> {
    /// Push the value of `expr`. A chain ending in a call that returns
    /// nothing pushes nothing.
    pub(super) fn expr(&mut self, expr: &Expr<'_>) {
        match expr {
            Expr::Literal(literal) => self.literal(literal),
            Expr::Binary(binary) => {
                let Some(op) = self.analysis.annotations.operator(binary.id).cloned() else {
                    return;
                };
                self.expr(binary.left);
                self.call_member(op.owner, &op.routine, op.is_static, |g| g.expr(binary.right));
            }
            Expr::Unary(unary) => {
                let Some(op) = self.analysis.annotations.operator(unary.id).cloned() else {
                    return;
                };
                self.call_member(op.owner, &op.routine, op.is_static, |g| g.expr(unary.operand));
            }
            Expr::Paren(paren) => self.expr(paren.inner),
            Expr::Call(chain) => self.chain(chain),
        }
    }

    /// Construct a runtime library value from a constant.
    fn literal(&mut self, literal: &LiteralExpr<'_>) {
        let p = *self.analysis.types.predefined();
        let (ty, constant, descriptor) = match literal.kind {
            LiteralKind::Int(value) => (p.integer, Instruction::IConst(value), "I"),
            LiteralKind::Real(value) => (p.real, Instruction::Ldc2Double(value), "D"),
            LiteralKind::Bool(value) => (p.boolean, Instruction::IConst(i32::from(value)), "I"),
            LiteralKind::String(value) => (
                p.string,
                Instruction::LdcString(value.to_string()),
                "Ljava/lang/String;",
            ),
        };
        let path = self.path(ty).to_string();
        self.emit(Instruction::New(path.clone()));
        self.emit(Instruction::Dup);
        self.emit(constant);
        self.emit(Instruction::invoke_special(
            path,
            "<init>",
            MethodDescriptor::new(vec![descriptor.to_string()], None),
        ));
    }

    /// Evaluate `condition` and jump to `target` when it is false.
    pub(super) fn branch_unless(&mut self, condition: &Expr<'_>, target: Label) {
        self.expr(condition);
        let boolean = self.analysis.types.predefined().boolean;
        let path = self.path(boolean).to_string();
        self.emit(Instruction::GetField(MemberRef::new(path, names::BOOL_FLAG_FIELD, "I")));
        self.emit(Instruction::IfEq(target));
    }

    // ==========================================================================
    // Call chains
    // ==========================================================================

    pub(super) fn chain(&mut self, chain: &CallChain<'_>) {
        for link in chain.links {
            self.link(link);
        }
    }

    /// Every link but the last: the receiver of an assignment target.
    pub(super) fn chain_prefix(&mut self, chain: &CallChain<'_>) {
        let count = chain.links.len().saturating_sub(1);
        for link in &chain.links[..count] {
            self.link(link);
        }
    }

    fn link(&mut self, link: &CallLink<'_>) {
        let Some(resolution) = self.analysis.annotations.link(link.id).cloned() else {
            return;
        };
        let args = link.args.unwrap_or_default();
        match resolution {
            LinkResolution::Load { entry, access } => self.load(&entry, access),
            LinkResolution::TypeName(_) => {}
            LinkResolution::Construct(ty) => self.default_value(ty),
            LinkResolution::Field { owner, entry } => self.member_field(owner, &entry, false),
            LinkResolution::Call {
                owner,
                routine,
                callee,
            } => match callee {
                Callee::Binding { entry, access } => {
                    self.load(&entry, access);
                    self.call_member(owner, &routine, false, |g| g.args(args));
                }
                Callee::Member { is_static } => {
                    self.call_member(owner, &routine, is_static, |g| g.args(args));
                }
                Callee::FieldValue { entry, is_static } => {
                    let Some(field_owner) = entry.instance_type else {
                        return;
                    };
                    self.member_field(field_owner, &entry, is_static);
                    self.call_member(owner, &routine, false, |g| g.args(args));
                }
            },
        }
    }

    fn args(&mut self, args: &[Expr<'_>]) {
        for arg in args {
            self.expr(arg);
        }
    }

    /// Read a data member: of the value on the stack, or a static one.
    fn member_field(&mut self, owner: TypeId, entry: &ScopeEntry, is_static: bool) {
        let member = MemberRef::new(self.path(owner), &entry.name, self.descriptor(entry.ty));
        if is_static || entry.kind == EntryKind::StaticField {
            self.emit(Instruction::GetStatic(member));
        } else {
            self.emit(Instruction::GetField(member));
        }
    }

    // ==========================================================================
    // Member calls
    // ==========================================================================

    /// Call `routine` of `owner`. For an instance call the receiver is
    /// already on the stack; `args` pushes the arguments.
    ///
    /// Library routines are real methods. User routines live in
    /// routine-valued fields and are invoked through the routine base class,
    /// as are routine values themselves.
    pub(super) fn call_member(
        &mut self,
        owner: TypeId,
        routine: &RoutineSpec,
        is_static: bool,
        args: impl FnOnce(&mut Self),
    ) {
        let descriptor = self.routine_descriptor(routine);
        let path = self.path(owner).to_string();
        match self.analysis.types.kind(owner) {
            TypeKind::Library | TypeKind::Builtin => {
                args(self);
                if is_static {
                    self.emit(Instruction::invoke_static(path, &routine.name, descriptor));
                } else {
                    self.emit(Instruction::invoke_virtual(path, &routine.name, descriptor));
                }
            }
            TypeKind::User => {
                let field = MemberRef::new(path, &routine.name, self.routine_base_descriptor());
                if is_static {
                    self.emit(Instruction::GetStatic(field));
                } else {
                    self.emit(Instruction::GetField(field));
                }
                args(self);
                self.invoke_routine_value(descriptor);
            }
            TypeKind::Routine => {
                args(self);
                self.invoke_routine_value(descriptor);
            }
        }
    }

    /// With the target on the stack, copy `value` into it through its
    /// `operator_assignment`.
    pub(super) fn operator_assignment(&mut self, ty: TypeId, routine: &RoutineSpec, value: &Expr<'_>) {
        debug_assert_eq!(routine.name, names::OPERATOR_ASSIGNMENT);
        self.call_member(ty, routine, false, |g| g.expr(value));
    }
}
