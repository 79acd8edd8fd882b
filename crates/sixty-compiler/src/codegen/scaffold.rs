//! Whole units: the main class, routine classes, type classes and the
//! routine base class.

use sixty_ast::{Program, RoutineDef, TypeDef};
use sixty_core::{TypeId, names};

use super::{CodeGenerator, FrameKind};
use crate::annotations::{AssignMode, CaptureSource, RoutineInfo, TypeInfo};
use crate::emit::{
    AccessFlags, Instruction, MemberRef, Method, MethodDescriptor, MethodEmitter, ObjectUnit,
};
use crate::scope::{EntryKind, ScopeEntry};
use crate::types::TypeKind;

const OBJECT: &str = "java/lang/Object";
const CONSTRUCTOR: &str = "<init>";
const MAIN: &str = "main";
const ARGS_DESCRIPTOR: &str = "[Ljava/lang/String;";

impl CodeGenerator<'_> {
    // ==========================================================================
    // Main unit
    // ==========================================================================

    /// The program class: a default constructor and `main`, which creates
    /// `print` and `read` and then runs the program body.
    pub(super) fn main_unit(&mut self, program: &Program<'_>) -> ObjectUnit {
        let path = self.ctx.program().to_string();
        let mut unit = ObjectUnit::new(path.clone(), OBJECT);
        unit.add_method(default_constructor(OBJECT));

        let descriptor = MethodDescriptor::new(vec![ARGS_DESCRIPTOR.into()], None);
        let main = MethodEmitter::new(MAIN, descriptor, AccessFlags::PUBLIC | AccessFlags::STATIC);
        self.push_frame(FrameKind::Main, path, main);

        let root = self.analysis.scopes.root();
        self.declare_locals(root);
        if let Some(frame) = self.frames.last_mut() {
            frame.method.declare_var(0, "args", ARGS_DESCRIPTOR);
        }
        let predefined = *self.analysis.types.predefined();
        for (name, ty) in [(names::PRINT, predefined.print), (names::READ, predefined.read)] {
            let Some(slot) = self.analysis.scopes.get(root).entry(name).and_then(|e| e.slot) else {
                continue;
            };
            self.default_value(ty);
            self.emit(Instruction::AStore(slot));
        }

        self.stmts(program.stmts);
        self.emit(Instruction::Return);

        if let Some(main) = self.pop_frame() {
            unit.add_method(main.finish());
        }
        unit
    }

    // ==========================================================================
    // Routine units
    // ==========================================================================

    /// Emit the class implementing a routine. Nested definitions in its body
    /// are emitted before it completes.
    pub(super) fn routine_unit(&mut self, def: &RoutineDef<'_>, info: &RoutineInfo) {
        let path = self.analysis.units.path(info.unit);
        tracing::trace!(unit = %path, "emitting routine");
        let base = self.analysis.types.routine_base().to_string();
        let mut unit = ObjectUnit::new(path.clone(), base.clone());

        let enclosing = self.enclosing_type(info);
        let mut ctor_params = Vec::new();
        if let Some(owner) = enclosing {
            let descriptor = self.descriptor(owner);
            unit.add_field(names::ENCLOSING_INSTANCE, descriptor.clone(), AccessFlags::PUBLIC);
            ctor_params.push((names::ENCLOSING_INSTANCE.to_string(), descriptor));
        }
        for capture in &info.captures {
            let descriptor = self.descriptor(capture.ty);
            unit.add_field(capture.name.clone(), descriptor.clone(), AccessFlags::PUBLIC);
            ctor_params.push((capture.name.clone(), descriptor));
        }
        unit.add_method(field_constructor(&path, &base, &ctor_params));

        let descriptor = self.routine_descriptor(&info.spec);
        self.signatures.insert(descriptor.clone());
        let method = MethodEmitter::new(names::OPERATOR_PARENTHESIS, descriptor, AccessFlags::PUBLIC);
        match enclosing {
            Some(owner) => self.push_member_frame(path.clone(), owner, method),
            None => self.push_frame(FrameKind::Routine, path.clone(), method),
        }
        self.declare_locals(info.scope);
        if let Some(frame) = self.frames.last_mut() {
            frame.method.declare_var(0, "this", format!("L{path};"));
        }

        self.stmts(def.body);
        match &def.ret {
            Some(ret) if info.spec.returns.is_some() => {
                self.expr(ret.value);
                self.emit(Instruction::AReturn);
            }
            _ => self.emit(Instruction::Return),
        }

        if let Some(method) = self.pop_frame() {
            unit.add_method(method.finish());
        }
        self.units.push(unit);
    }

    /// Type whose instance an instance member routine is bound to.
    fn enclosing_type(&self, info: &RoutineInfo) -> Option<TypeId> {
        info.member_of.filter(|_| !info.is_static)
    }

    /// Push a new routine object for `info`, with its enclosing instance
    /// (the current `this`) and captures as constructor arguments.
    pub(super) fn instantiate_routine(&mut self, info: &RoutineInfo) {
        let path = self.analysis.units.path(info.unit);
        self.emit(Instruction::New(path.clone()));
        self.emit(Instruction::Dup);

        let mut params = Vec::new();
        if let Some(owner) = self.enclosing_type(info) {
            self.emit(Instruction::ALoad(0));
            params.push(self.descriptor(owner));
        }
        params.extend(self.load_captures(&info.captures));
        self.emit(Instruction::invoke_special(path, CONSTRUCTOR, MethodDescriptor::new(params, None)));
    }

    /// Load every capture source in order, returning their descriptors.
    fn load_captures(&mut self, captures: &[CaptureSource]) -> Vec<String> {
        captures
            .iter()
            .map(|capture| {
                let entry = ScopeEntry::new(capture.name.clone(), capture.ty, EntryKind::Nonlocal);
                self.load(&entry, capture.access);
                self.descriptor(capture.ty)
            })
            .collect()
    }

    // ==========================================================================
    // Type units
    // ==========================================================================

    /// Emit the class implementing a user type, and its routine classes.
    pub(super) fn type_unit(&mut self, def: &TypeDef<'_>, info: &TypeInfo) {
        let path = self.path(info.ty).to_string();
        tracing::trace!(unit = %path, "emitting type");
        let mut unit = ObjectUnit::new(path.clone(), OBJECT);

        let routines = self.member_routines(def.routines);
        let static_routines = self.member_routines(def.static_routines);
        let spec = self.analysis.types.get(info.ty);
        let fields = spec.fields.clone();
        let static_fields = spec.static_fields.clone();

        let instance = AccessFlags::PUBLIC;
        let class = AccessFlags::PUBLIC | AccessFlags::STATIC;
        for field in &fields {
            unit.add_field(field.name.clone(), self.descriptor(field.ty), instance);
        }
        for (_, routine) in &routines {
            unit.add_field(routine.entry.name.clone(), self.descriptor(routine.entry.ty), instance);
        }
        for field in &static_fields {
            unit.add_field(field.name.clone(), self.descriptor(field.ty), class);
        }
        for (_, routine) in &static_routines {
            unit.add_field(routine.entry.name.clone(), self.descriptor(routine.entry.ty), class);
        }
        for capture in &info.captures {
            unit.add_field(capture.name.clone(), self.descriptor(capture.ty), class);
        }

        for (def, routine) in routines.iter().chain(&static_routines) {
            self.routine_unit(def, routine);
        }

        // <init>: default data fields, then bind the instance routines.
        let ctor = MethodEmitter::new(CONSTRUCTOR, MethodDescriptor::void(), AccessFlags::PUBLIC);
        self.push_frame(FrameKind::TypeCtor, path.clone(), ctor);
        if let Some(frame) = self.frames.last_mut() {
            frame.method.declare_var(0, "this", format!("L{path};"));
        }
        self.emit(Instruction::ALoad(0));
        self.emit(Instruction::invoke_special(OBJECT, CONSTRUCTOR, MethodDescriptor::void()));
        for field in &fields {
            // A field of the type itself would construct forever.
            if field.ty == info.ty || self.analysis.types.kind(field.ty) == TypeKind::Routine {
                continue;
            }
            self.emit(Instruction::ALoad(0));
            self.default_value(field.ty);
            let descriptor = self.descriptor(field.ty);
            self.emit(Instruction::PutField(MemberRef::new(path.clone(), &field.name, descriptor)));
        }
        for (_, routine) in &routines {
            self.emit(Instruction::ALoad(0));
            self.instantiate_routine(routine);
            let descriptor = self.descriptor(routine.entry.ty);
            self.emit(Instruction::PutField(MemberRef::new(
                path.clone(),
                &routine.entry.name,
                descriptor,
            )));
        }
        self.emit(Instruction::Return);
        if let Some(ctor) = self.pop_frame() {
            unit.add_method(ctor.finish());
        }

        // $static_init: store the captures, bind the static routines, then
        // run the static field initializers in order.
        let capture_descriptors: Vec<String> =
            info.captures.iter().map(|c| self.descriptor(c.ty)).collect();
        let static_init = MethodEmitter::new(
            names::STATIC_INIT,
            MethodDescriptor::new(capture_descriptors.clone(), None),
            class,
        );
        self.push_frame(FrameKind::TypeStatic, path.clone(), static_init);
        if let Some(frame) = self.frames.last_mut() {
            frame.method.set_max_locals(info.captures.len() as u32);
        }
        for (slot, (capture, descriptor)) in info.captures.iter().zip(capture_descriptors).enumerate() {
            self.emit(Instruction::ALoad(slot as u32));
            self.emit(Instruction::PutStatic(MemberRef::new(path.clone(), &capture.name, descriptor)));
        }
        for (_, routine) in &static_routines {
            self.instantiate_routine(routine);
            let descriptor = self.descriptor(routine.entry.ty);
            self.emit(Instruction::PutStatic(MemberRef::new(
                path.clone(),
                &routine.entry.name,
                descriptor,
            )));
        }
        for field in def.static_fields {
            let Some(decl) = self.analysis.annotations.decl(field.decl.id) else {
                continue;
            };
            let Some(mode) = &decl.mode else {
                continue;
            };
            let members: Vec<MemberRef> = decl
                .entries
                .iter()
                .map(|entry| MemberRef::new(path.clone(), &entry.name, self.descriptor(entry.ty)))
                .collect();
            let Some((first, rest)) = members.split_first() else {
                continue;
            };
            match mode {
                AssignMode::Operator(routine) => {
                    self.default_value(decl.ty);
                    self.emit(Instruction::PutStatic(first.clone()));
                    self.emit(Instruction::GetStatic(first.clone()));
                    self.operator_assignment(decl.ty, routine, field.init);
                    for member in rest {
                        self.default_value(decl.ty);
                        self.emit(Instruction::PutStatic(member.clone()));
                        self.emit(Instruction::GetStatic(member.clone()));
                        self.call_member(decl.ty, routine, false, |g| {
                            g.emit(Instruction::GetStatic(first.clone()))
                        });
                    }
                }
                AssignMode::Store => {
                    self.expr(field.init);
                    for _ in rest {
                        self.emit(Instruction::Dup);
                    }
                    for member in &members {
                        self.emit(Instruction::PutStatic(member.clone()));
                    }
                }
            }
        }
        self.emit(Instruction::Return);
        if let Some(static_init) = self.pop_frame() {
            unit.add_method(static_init.finish());
        }

        self.units.push(unit);
    }

    /// Member routine definitions paired with their analysis.
    fn member_routines<'d, 'ast>(
        &self,
        defs: &'d [RoutineDef<'ast>],
    ) -> Vec<(&'d RoutineDef<'ast>, RoutineInfo)> {
        defs.iter()
            .filter_map(|def| Some((def, self.analysis.annotations.routine(def.id)?.clone())))
            .collect()
    }

    /// Wire a type at its definition site: pass the captures to
    /// `$static_init`.
    pub(super) fn initialize_type(&mut self, info: &TypeInfo) {
        let path = self.path(info.ty).to_string();
        let params = self.load_captures(&info.captures);
        self.emit(Instruction::invoke_static(
            path,
            names::STATIC_INIT,
            MethodDescriptor::new(params, None),
        ));
    }

    // ==========================================================================
    // Routine base unit
    // ==========================================================================

    /// The class every routine unit extends. It declares every
    /// `operator_parenthesis` signature used, each with a default body.
    pub(super) fn routine_base_unit(&self) -> ObjectUnit {
        let path = self.analysis.types.routine_base().to_string();
        let mut unit = ObjectUnit::new(path, OBJECT);
        unit.add_method(default_constructor(OBJECT));

        for descriptor in &self.signatures {
            let locals = 1 + descriptor.params.len() as u32;
            let returns = descriptor.returns.is_some();
            let mut method =
                MethodEmitter::new(names::OPERATOR_PARENTHESIS, descriptor.clone(), AccessFlags::PUBLIC);
            if returns {
                method.emit(Instruction::AConstNull);
                method.emit(Instruction::AReturn);
            } else {
                method.emit(Instruction::Return);
            }
            method.set_max_locals(locals);
            unit.add_method(method.finish());
        }
        unit
    }
}

/// `<init>()V` calling the super constructor.
fn default_constructor(super_path: &str) -> Method {
    let mut ctor = MethodEmitter::new(CONSTRUCTOR, MethodDescriptor::void(), AccessFlags::PUBLIC);
    ctor.emit(Instruction::ALoad(0));
    ctor.emit(Instruction::invoke_special(super_path, CONSTRUCTOR, MethodDescriptor::void()));
    ctor.emit(Instruction::Return);
    ctor.set_max_locals(1);
    ctor.finish()
}

/// `<init>` storing each argument into the field of the same name.
fn field_constructor(path: &str, super_path: &str, params: &[(String, String)]) -> Method {
    let descriptor = MethodDescriptor::new(params.iter().map(|(_, d)| d.clone()).collect(), None);
    let mut ctor = MethodEmitter::new(CONSTRUCTOR, descriptor, AccessFlags::PUBLIC);
    ctor.emit(Instruction::ALoad(0));
    ctor.emit(Instruction::invoke_special(super_path, CONSTRUCTOR, MethodDescriptor::void()));
    for (slot, (name, descriptor)) in params.iter().enumerate() {
        ctor.emit(Instruction::ALoad(0));
        ctor.emit(Instruction::ALoad(slot as u32 + 1));
        ctor.emit(Instruction::PutField(MemberRef::new(path, name, descriptor)));
    }
    ctor.emit(Instruction::Return);
    ctor.set_max_locals(1 + params.len() as u32);
    ctor.finish()
}
