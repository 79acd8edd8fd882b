//! Code generation pass.
//!
//! The [`CodeGenerator`] walks the syntax tree a second time and reads only
//! the [`Analysis`]. It keeps a stack of method frames: entering a routine or
//! type pushes a frame for the unit being emitted, and leaving it finishes
//! that unit. Blocks emit into the frame of their enclosing method.
//!
//! ## Modules
//!
//! - `scaffold`: main, routine, type and routine base units
//! - `stmt`: statements and definition sites
//! - `expr`: expressions, call chains and member calls
//!
//! Generation assumes an analysis without errors. A node the analyzer left
//! unannotated is skipped.

mod expr;
mod scaffold;
mod stmt;

use std::collections::BTreeSet;

use sixty_ast::Program;
use sixty_core::{ScopeId, TypeId, names};

use crate::analyzer::Analysis;
use crate::annotations::Access;
use crate::context::CompilationContext;
use crate::emit::{Instruction, MemberRef, MethodDescriptor, MethodEmitter, ObjectUnit};
use crate::scope::ScopeEntry;
use crate::types::{RoutineSpec, TypeKind};

/// Which method of which unit a frame emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    /// `main` of the main unit.
    Main,
    /// `operator_parenthesis` of a routine unit.
    Routine,
    /// `<init>` of a type unit.
    TypeCtor,
    /// `$static_init` of a type unit.
    TypeStatic,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    /// Path of the class the method belongs to.
    class: String,
    /// Type whose instance the method's routine is bound to.
    instance: Option<TypeId>,
    method: MethodEmitter,
}

/// Generator for one analyzed program.
pub struct CodeGenerator<'a> {
    analysis: &'a Analysis,
    ctx: &'a mut CompilationContext,
    frames: Vec<Frame>,
    /// Finished units, in completion order.
    units: Vec<ObjectUnit>,
    /// Every `operator_parenthesis` descriptor invoked or implemented
    /// through the routine base class.
    signatures: BTreeSet<MethodDescriptor>,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(analysis: &'a Analysis, ctx: &'a mut CompilationContext) -> Self {
        Self {
            analysis,
            ctx,
            frames: Vec::new(),
            units: Vec::new(),
            signatures: BTreeSet::new(),
        }
    }

    /// Emit every unit of `program`: the main unit first, the routine base
    /// class last.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate(mut self, program: &Program<'_>) -> Vec<ObjectUnit> {
        tracing::debug!(program = self.ctx.program(), "code generation");

        let main = self.main_unit(program);
        self.units.insert(0, main);
        let base = self.routine_base_unit();
        self.units.push(base);

        tracing::debug!(
            units = self.units.len(),
            labels = self.ctx.labels_issued(),
            "code generation finished"
        );
        self.units
    }

    // ==========================================================================
    // Frames
    // ==========================================================================

    fn push_frame(&mut self, kind: FrameKind, class: impl Into<String>, method: MethodEmitter) {
        self.frames.push(Frame {
            kind,
            class: class.into(),
            instance: None,
            method,
        });
    }

    /// Frame of an instance member routine of `instance`.
    fn push_member_frame(&mut self, class: impl Into<String>, instance: TypeId, method: MethodEmitter) {
        self.frames.push(Frame {
            kind: FrameKind::Routine,
            class: class.into(),
            instance: Some(instance),
            method,
        });
    }

    fn pop_frame(&mut self) -> Option<MethodEmitter> {
        self.frames.pop().map(|frame| frame.method)
    }

    fn frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    fn emit(&mut self, instruction: Instruction) {
        if let Some(frame) = self.frames.last_mut() {
            frame.method.emit(instruction);
        }
    }

    // ==========================================================================
    // Descriptors
    // ==========================================================================

    fn path(&self, ty: TypeId) -> &str {
        self.analysis.types.path(ty)
    }

    fn descriptor(&self, ty: TypeId) -> String {
        self.analysis.types.descriptor(ty)
    }

    fn routine_descriptor(&self, routine: &RoutineSpec) -> MethodDescriptor {
        MethodDescriptor::new(
            routine
                .args
                .types()
                .iter()
                .map(|&ty| self.descriptor(ty))
                .collect(),
            routine.returns.map(|ty| self.descriptor(ty)),
        )
    }

    /// Descriptor of a routine-valued field or capture.
    fn routine_base_descriptor(&self) -> String {
        format!("L{};", self.analysis.types.routine_base())
    }

    /// Invoke `operator_parenthesis` on a routine value through the base
    /// class, recording the signature for it.
    fn invoke_routine_value(&mut self, descriptor: MethodDescriptor) {
        self.signatures.insert(descriptor.clone());
        let base = self.analysis.types.routine_base().to_string();
        self.emit(Instruction::invoke_virtual(base, names::OPERATOR_PARENTHESIS, descriptor));
    }

    // ==========================================================================
    // Values and bindings
    // ==========================================================================

    /// Push a fresh default value of `ty`. Routine values default to null.
    fn default_value(&mut self, ty: TypeId) {
        if self.analysis.types.kind(ty) == TypeKind::Routine {
            self.emit(Instruction::AConstNull);
            return;
        }
        let path = self.path(ty).to_string();
        self.emit(Instruction::New(path.clone()));
        self.emit(Instruction::Dup);
        self.emit(Instruction::invoke_special(path, "<init>", MethodDescriptor::void()));
    }

    /// Push the value of `entry`, reached through `access`.
    fn load(&mut self, entry: &ScopeEntry, access: Access) {
        let descriptor = self.descriptor(entry.ty);
        match access {
            Access::Local(slot) => self.emit(Instruction::ALoad(slot)),
            Access::SelfRoutine => self.emit(Instruction::ALoad(0)),
            Access::Static(owner) => {
                let owner = self.path(owner).to_string();
                self.emit(Instruction::GetStatic(MemberRef::new(owner, &entry.name, descriptor)));
            }
            Access::Capture => {
                let Some(frame) = self.frame() else {
                    return;
                };
                let field = MemberRef::new(frame.class.clone(), &entry.name, descriptor);
                if frame.kind == FrameKind::Routine {
                    self.emit(Instruction::ALoad(0));
                    self.emit(Instruction::GetField(field));
                } else {
                    self.emit(Instruction::GetStatic(field));
                }
            }
            Access::EnclosingField => {
                let Some(owner) = self.load_enclosing_instance() else {
                    return;
                };
                let owner = self.path(owner).to_string();
                self.emit(Instruction::GetField(MemberRef::new(owner, &entry.name, descriptor)));
            }
        }
    }

    /// Push the instance the current routine is bound to, returning its type.
    fn load_enclosing_instance(&mut self) -> Option<TypeId> {
        let frame = self.frame()?;
        let (class, owner) = (frame.class.clone(), frame.instance?);
        let owner_descriptor = self.descriptor(owner);
        self.emit(Instruction::ALoad(0));
        self.emit(Instruction::GetField(MemberRef::new(
            class,
            names::ENCLOSING_INSTANCE,
            owner_descriptor,
        )));
        Some(owner)
    }

    /// Emit what must sit below the value when storing through `access`.
    fn store_prefix(&mut self, access: Access) {
        match access {
            Access::Capture if self.frame().is_some_and(|f| f.kind == FrameKind::Routine) => {
                self.emit(Instruction::ALoad(0));
            }
            Access::EnclosingField => {
                self.load_enclosing_instance();
            }
            _ => {}
        }
    }

    /// Store the value on top of the stack into `entry`.
    fn store(&mut self, entry: &ScopeEntry, access: Access) {
        let descriptor = self.descriptor(entry.ty);
        match access {
            Access::Local(slot) => self.emit(Instruction::AStore(slot)),
            Access::Static(owner) => {
                let owner = self.path(owner).to_string();
                self.emit(Instruction::PutStatic(MemberRef::new(owner, &entry.name, descriptor)));
            }
            Access::Capture => {
                let Some(frame) = self.frame() else {
                    return;
                };
                let field = MemberRef::new(frame.class.clone(), &entry.name, descriptor);
                if frame.kind == FrameKind::Routine {
                    self.emit(Instruction::PutField(field));
                } else {
                    self.emit(Instruction::PutStatic(field));
                }
            }
            Access::EnclosingField => {
                if let Some(owner) = self.frame().and_then(|frame| frame.instance) {
                    let owner = self.path(owner).to_string();
                    self.emit(Instruction::PutField(MemberRef::new(owner, &entry.name, descriptor)));
                }
            }
            // not assignable
            Access::SelfRoutine => self.emit(Instruction::Pop),
        }
    }

    /// Declare `.var` directives for every named slot of the method `scope`.
    fn declare_locals(&mut self, scope: ScopeId) {
        let locals: Vec<(u32, String, String)> = self
            .analysis
            .scopes
            .method_locals(scope)
            .into_iter()
            .filter_map(|entry| Some((entry.slot?, entry.name.clone(), self.descriptor(entry.ty))))
            .collect();
        let num_locals = self.analysis.scopes.get(scope).num_locals();
        if let Some(frame) = self.frames.last_mut() {
            for (slot, name, descriptor) in locals {
                frame.method.declare_var(slot, name, descriptor);
            }
            frame.method.set_max_locals(num_locals);
        }
    }
}

#[cfg(test)]
mod tests;
