//! Declarations: variables, routines and types.

use sixty_ast::{AssignNew, Ident, RoutineDef, TypeDef, TypeName, VarDecl};
use sixty_core::{ScopeId, SemanticError, Span, TypeId, names};

use super::Analyzer;
use crate::annotations::{AssignMode, DeclInfo, RoutineInfo, TypeInfo};
use crate::scope::{EntryKind, ScopeEntry, ScopeKind};
use crate::types::{ArgumentList, RoutineSpec, TypeKind, TypeSpec};
use crate::units::UnitKind;

/// Membership of a routine being declared inside a type.
#[derive(Debug, Clone, Copy)]
struct Member {
    ty: TypeId,
    is_static: bool,
}

/// A routine whose signature was accepted; its body is still pending.
#[derive(Debug, Clone, Copy)]
struct DeclaredRoutine {
    scope: ScopeId,
    returns: Option<TypeId>,
}

impl Analyzer {
    // ==========================================================================
    // Types in declarations
    // ==========================================================================

    /// Resolve a written type, reporting every name that is not found.
    pub(super) fn resolve_type_name(&mut self, ty: &TypeName<'_>) -> Option<TypeId> {
        match ty {
            TypeName::Named(ident) => {
                let found = self.scopes.resolve_type(self.current, ident.name);
                if found.is_none() {
                    self.report(SemanticError::TypeNotFound {
                        name: ident.name.to_string(),
                        span: ident.span,
                    });
                }
                found
            }
            TypeName::Routine(routine) => {
                let mut params = Vec::with_capacity(routine.params.len());
                let mut complete = true;
                for param in routine.params {
                    match self.resolve_type_name(param) {
                        Some(ty) => params.push(ty),
                        None => complete = false,
                    }
                }
                let returns = match &routine.returns {
                    Some(ret) => Some(self.resolve_type_name(ret)?),
                    None => None,
                };
                complete.then(|| self.types.routine_type(ArgumentList::new(params), returns))
            }
        }
    }

    // ==========================================================================
    // Variables
    // ==========================================================================

    /// Declare every name of `decl` in the current scope.
    pub(super) fn var_decl(
        &mut self,
        decl: &VarDecl<'_>,
        kind: EntryKind,
        member_of: Option<TypeId>,
    ) -> Vec<ScopeEntry> {
        let Some(ty) = self.resolve_type_name(&decl.ty) else {
            return Vec::new();
        };
        let entries = self.declare_names(decl.names, ty, kind, member_of);
        self.annotations.set_decl(
            decl.id,
            DeclInfo {
                ty,
                entries: entries.clone(),
                mode: None,
            },
        );
        entries
    }

    fn declare_names(
        &mut self,
        names: &[Ident<'_>],
        ty: TypeId,
        kind: EntryKind,
        member_of: Option<TypeId>,
    ) -> Vec<ScopeEntry> {
        let mut entries = Vec::with_capacity(names.len());
        for ident in names {
            if self.scopes.get(self.current).entry(ident.name).is_some() {
                self.report(SemanticError::DuplicateName {
                    name: ident.name.to_string(),
                    span: ident.span,
                });
                continue;
            }
            if self.scopes.resolve_type(self.current, ident.name).is_some() {
                self.report(SemanticError::NameDeclaredAsType {
                    name: ident.name.to_string(),
                    span: ident.span,
                });
                continue;
            }

            let mut entry = ScopeEntry::new(ident.name, ty, kind);
            entry.instance_type = member_of;
            match self.scopes.declare(self.current, entry, ident.span) {
                Ok(entry) => entries.push(entry),
                Err(error) => self.report(error),
            }
        }
        entries
    }

    /// `T a, b = value`: check the initializer, then declare the names.
    pub(super) fn assign_new(&mut self, assign: &AssignNew<'_>) {
        let declared = self.resolve_type_name(&assign.ty);
        let value = self.operand(assign.value);
        let (Some(ty), Some(value_ty)) = (declared, value) else {
            return;
        };
        let Some(mode) = self.initializer_mode(ty, value_ty, assign.value.span()) else {
            return;
        };

        let entries = self.declare_names(assign.names, ty, EntryKind::Variable, None);
        self.annotations.set_decl(
            assign.id,
            DeclInfo {
                ty,
                entries,
                mode: Some(mode),
            },
        );
    }

    /// How a `value_ty` initializer is written into a new `ty` binding.
    fn initializer_mode(
        &mut self,
        ty: TypeId,
        value_ty: TypeId,
        span: Span,
    ) -> Option<AssignMode> {
        // The binding being created stands in for the target entry.
        let target = ScopeEntry::new("", ty, EntryKind::Variable);
        if !self.types.is_assignment_compatible(Some(&target), ty, value_ty) {
            self.report(SemanticError::TypeConversion {
                from: self.types.name(value_ty).to_string(),
                to: self.types.name(ty).to_string(),
                span,
            });
            return None;
        }
        Some(self.assign_mode(ty, value_ty))
    }

    pub(super) fn assign_mode(&self, ty: TypeId, value_ty: TypeId) -> AssignMode {
        match self.types.lookup_routine(
            ty,
            names::OPERATOR_ASSIGNMENT,
            &ArgumentList::from([value_ty]),
        ) {
            Some(routine) => AssignMode::Operator(routine.clone()),
            None => AssignMode::Store,
        }
    }

    // ==========================================================================
    // Routines
    // ==========================================================================

    pub(super) fn routine_def(&mut self, def: &RoutineDef<'_>) {
        if let Some(declared) = self.declare_routine(def, None) {
            self.routine_body(def, declared);
        }
    }

    /// Check the signature, declare the routine value and open its scope.
    fn declare_routine(
        &mut self,
        def: &RoutineDef<'_>,
        member: Option<Member>,
    ) -> Option<DeclaredRoutine> {
        let name = def.name.name;

        let mut params = Vec::with_capacity(def.params.len());
        let mut complete = true;
        for param in def.params {
            match self.resolve_type_name(&param.ty) {
                Some(ty) => params.push(ty),
                None => complete = false,
            }
        }
        let returns = match &def.returns {
            Some(ret) => match self.resolve_type_name(ret) {
                Some(ty) => Some(ty),
                None => {
                    complete = false;
                    None
                }
            },
            None => None,
        };
        if !complete {
            return None;
        }
        let args = ArgumentList::new(params);

        if let Some(member) = member {
            let spec = self.types.get(member.ty);
            let other_kind = if member.is_static {
                &spec.routines
            } else {
                &spec.static_routines
            };
            if other_kind.iter().any(|r| r.name == name) {
                self.report(SemanticError::DuplicateRoutine {
                    name: name.to_string(),
                    args: self.types.format_args(&args),
                    span: def.name.span,
                });
                return None;
            }
        }
        if self.scopes.get(self.current).entry(name).is_some() {
            self.report(SemanticError::DuplicateName {
                name: name.to_string(),
                span: def.name.span,
            });
            return None;
        }
        if self.scopes.resolve_type(self.current, name).is_some() {
            self.report(SemanticError::NameDeclaredAsType {
                name: name.to_string(),
                span: def.name.span,
            });
            return None;
        }

        let spec = RoutineSpec::new(name, args.clone(), returns);
        let value_ty = self.types.routine_type(args, returns);
        let entry = match member {
            Some(Member { ty, is_static }) => {
                let kind = if is_static {
                    EntryKind::StaticField
                } else {
                    EntryKind::Field
                };
                ScopeEntry::new(name, value_ty, kind).member_of(ty)
            }
            None => ScopeEntry::new(name, value_ty, EntryKind::RoutineValue),
        };
        let entry = match self.scopes.declare(self.current, entry, def.name.span) {
            Ok(entry) => entry,
            Err(error) => {
                self.report(error);
                return None;
            }
        };
        if let Some(Member { ty, is_static }) = member {
            let owner = self.types.get_mut(ty);
            if is_static {
                owner.static_routines.push(spec.clone());
            } else {
                owner.routines.push(spec.clone());
            }
        }

        let unit = self
            .units
            .plan(self.current_unit(), name, UnitKind::Routine, None);
        let scope = self.open_scope(ScopeKind::Routine, name, unit);
        {
            let routine_scope = self.scopes.get_mut(scope);
            routine_scope.member_of = member.map(|m| m.ty);
            routine_scope.is_static = member.is_some_and(|m| m.is_static);
        }

        let mut param_entries = Vec::with_capacity(def.params.len());
        for (param, &ty) in def.params.iter().zip(spec.args.types()) {
            let entry = ScopeEntry::new(param.name.name, ty, EntryKind::Parameter);
            match self.scopes.declare(scope, entry, param.name.span) {
                Ok(entry) => param_entries.push(entry),
                Err(error) => self.report(error),
            }
        }

        self.annotations.set_routine(
            def.id,
            RoutineInfo {
                spec,
                entry,
                unit,
                scope,
                member_of: member.map(|m| m.ty),
                is_static: member.is_some_and(|m| m.is_static),
                params: param_entries,
                captures: Vec::new(),
            },
        );
        Some(DeclaredRoutine { scope, returns })
    }

    /// Analyze the body and return clause of a declared routine.
    fn routine_body(&mut self, def: &RoutineDef<'_>, declared: DeclaredRoutine) {
        let name = def.name.name;
        tracing::debug!(routine = name, "analyzing routine");

        self.current = declared.scope;
        self.stmts(def.body);

        match (&def.ret, declared.returns) {
            (None, None) => {}
            (None, Some(ty)) => self.report(SemanticError::MissingReturn {
                name: name.to_string(),
                ty: self.types.name(ty).to_string(),
                span: def.end_name.span,
            }),
            (Some(ret), None) => {
                self.expr(ret.value);
                self.report(SemanticError::UnexpectedReturn {
                    name: name.to_string(),
                    span: ret.span,
                });
            }
            (Some(ret), Some(ty)) => {
                if let Some(value_ty) = self.operand(ret.value)
                    && !self.types.equal(ty, value_ty)
                {
                    self.report(SemanticError::TypeConversion {
                        from: self.types.name(value_ty).to_string(),
                        to: self.types.name(ty).to_string(),
                        span: ret.span,
                    });
                }
            }
        }
        self.exit_scope();

        let captures = self.capture_sources(declared.scope);
        if let Some(info) = self.annotations.routine_mut(def.id) {
            info.captures = captures;
        }

        if def.end_name.name != name {
            self.report(SemanticError::RoutineNotClosed {
                expected: name.to_string(),
                found: def.end_name.name.to_string(),
                span: def.end_name.span,
            });
        }
    }

    // ==========================================================================
    // Types
    // ==========================================================================

    /// Define a user type.
    ///
    /// Fields, static fields and routine signatures are all declared before
    /// any routine body is analyzed, so bodies see every member.
    pub(super) fn type_def(&mut self, def: &TypeDef<'_>) {
        let name = def.name.name;
        if self.scopes.resolve_type(self.current, name).is_some() {
            self.report(SemanticError::DuplicateType {
                name: name.to_string(),
                span: def.name.span,
            });
            return;
        }
        if self.scopes.resolve_value(self.current, name).is_some() {
            self.report(SemanticError::DuplicateName {
                name: name.to_string(),
                span: def.name.span,
            });
            return;
        }

        let ty = self.types.add(TypeSpec::new(name, TypeKind::User));
        if let Err(error) = self.scopes.declare_type(self.current, name, ty, def.name.span) {
            self.report(error);
            return;
        }
        let unit = self
            .units
            .plan(self.current_unit(), name, UnitKind::Type, Some(ty));
        let path = self.units.path(unit);
        self.types.set_path(ty, path);
        tracing::debug!(r#type = name, "analyzing type");

        let scope = self.open_scope(ScopeKind::Type, name, unit);
        self.scopes.get_mut(scope).member_of = Some(ty);
        self.current = scope;
        let field_init = self.open_scope(ScopeKind::FieldInit, name, unit);
        self.scopes.get_mut(field_init).member_of = Some(ty);

        for decl in def.fields {
            let fields = self.var_decl(decl, EntryKind::Field, Some(ty));
            self.types.get_mut(ty).fields.extend(fields);
        }

        for field in def.static_fields {
            self.current = field_init;
            let value = self.operand(field.init);
            self.current = scope;

            let Some(declared) = self.resolve_type_name(&field.decl.ty) else {
                continue;
            };
            let Some(value_ty) = value else {
                continue;
            };
            let Some(mode) = self.initializer_mode(declared, value_ty, field.init.span()) else {
                continue;
            };
            let entries =
                self.declare_names(field.decl.names, declared, EntryKind::StaticField, Some(ty));
            self.types
                .get_mut(ty)
                .static_fields
                .extend(entries.iter().cloned());
            self.annotations.set_decl(
                field.decl.id,
                DeclInfo {
                    ty: declared,
                    entries,
                    mode: Some(mode),
                },
            );
        }

        let mut declared = Vec::new();
        for (routines, is_static) in [(def.routines, false), (def.static_routines, true)] {
            for routine in routines {
                if let Some(d) = self.declare_routine(routine, Some(Member { ty, is_static })) {
                    declared.push((routine, d));
                }
            }
        }
        for (routine, d) in declared {
            self.routine_body(routine, d);
        }

        self.exit_scope();
        let captures = self.capture_sources(scope);
        self.annotations.set_type(
            def.id,
            TypeInfo {
                ty,
                unit,
                scope,
                field_init,
                captures,
            },
        );

        if def.end_name.name != name {
            self.report(SemanticError::TypeNotClosed {
                expected: name.to_string(),
                found: def.end_name.name.to_string(),
                span: def.end_name.span,
            });
        }
    }
}
