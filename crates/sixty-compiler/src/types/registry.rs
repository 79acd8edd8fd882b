//! Storage and lookup for every type known to a compilation.

use rustc_hash::FxHashMap;
use sixty_core::{TypeId, names};

use super::{ArgumentList, Predefined, RoutineSpec, TypeKind, TypeSpec};
use crate::scope::{EntryKind, ScopeEntry};

/// Arena of [`TypeSpec`]s.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: Vec<TypeSpec>,
    predefined: Predefined,
    /// Path of the routine base class.
    routine_base: String,
    /// Routine-value types synthesized for member routines, keyed by owner,
    /// name and staticness.
    member_routine_types: FxHashMap<(TypeId, String, bool), TypeId>,
}

impl TypeRegistry {
    /// Create a registry holding the runtime library types.
    ///
    /// `routine_base` is the path of the class every routine unit extends.
    pub fn new(routine_base: impl Into<String>) -> Self {
        let mut types = Vec::new();
        let predefined = Predefined::install(&mut types);
        Self {
            types,
            predefined,
            routine_base: routine_base.into(),
            member_routine_types: FxHashMap::default(),
        }
    }

    pub fn predefined(&self) -> &Predefined {
        &self.predefined
    }

    pub fn routine_base(&self) -> &str {
        &self.routine_base
    }

    pub fn add(&mut self, spec: TypeSpec) -> TypeId {
        let id = TypeId::new(self.types.len() as u32);
        self.types.push(spec);
        id
    }

    pub fn get(&self, id: TypeId) -> &TypeSpec {
        &self.types[id.as_usize()]
    }

    pub fn get_mut(&mut self, id: TypeId) -> &mut TypeSpec {
        &mut self.types[id.as_usize()]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn name(&self, id: TypeId) -> &str {
        &self.get(id).name
    }

    pub fn kind(&self, id: TypeId) -> TypeKind {
        self.get(id).kind
    }

    /// Class path used to address values of `id`.
    ///
    /// Routine values are always addressed through the routine base class.
    pub fn path(&self, id: TypeId) -> &str {
        let spec = self.get(id);
        match (spec.kind, &spec.path) {
            (TypeKind::Routine, _) => &self.routine_base,
            (_, Some(path)) => path,
            (_, None) => &spec.name,
        }
    }

    /// Field/argument descriptor: `L<path>;`.
    pub fn descriptor(&self, id: TypeId) -> String {
        format!("L{};", self.path(id))
    }

    pub fn set_path(&mut self, id: TypeId, path: impl Into<String>) {
        self.get_mut(id).path = Some(path.into());
    }

    /// Create the type of a routine value with signature `(args) -> returns`.
    pub fn routine_type(&mut self, args: ArgumentList, returns: Option<TypeId>) -> TypeId {
        let mut spec = TypeSpec::new(names::ROUTINE_BASE, TypeKind::Routine);
        spec.routines.push(RoutineSpec::new(
            names::OPERATOR_PARENTHESIS,
            args,
            returns,
        ));
        self.add(spec)
    }

    // ==========================================================================
    // Equality
    // ==========================================================================

    /// Type equality: identity, or signature match for routine values.
    ///
    /// For two routine-value types, the single signature of `a` must match
    /// (arguments and return type) one of the signatures of `b`.
    pub fn equal(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        let (lhs, rhs) = (self.get(a), self.get(b));
        if lhs.kind != TypeKind::Routine || rhs.kind != TypeKind::Routine {
            return false;
        }
        let Some(signature) = lhs.routines.first() else {
            return false;
        };
        rhs.routines.iter().any(|candidate| {
            self.args_equal(&signature.args, &candidate.args)
                && match (signature.returns, candidate.returns) {
                    (None, None) => true,
                    (Some(x), Some(y)) => self.equal(x, y),
                    _ => false,
                }
        })
    }

    /// Element-wise structural equality; lengths must match.
    pub fn args_equal(&self, a: &ArgumentList, b: &ArgumentList) -> bool {
        a.len() == b.len()
            && a.types()
                .iter()
                .zip(b.types())
                .all(|(&x, &y)| self.equal(x, y))
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// First instance routine of `ty` named `name` taking exactly `args`.
    pub fn lookup_routine(&self, ty: TypeId, name: &str, args: &ArgumentList) -> Option<&RoutineSpec> {
        self.get(ty)
            .routines
            .iter()
            .find(|r| r.name == name && self.args_equal(&r.args, args))
    }

    /// First static routine of `ty` named `name` taking exactly `args`.
    pub fn lookup_static_routine(
        &self,
        ty: TypeId,
        name: &str,
        args: &ArgumentList,
    ) -> Option<&RoutineSpec> {
        self.get(ty)
            .static_routines
            .iter()
            .find(|r| r.name == name && self.args_equal(&r.args, args))
    }

    pub fn lookup_field(&self, ty: TypeId, name: &str) -> Option<&ScopeEntry> {
        self.get(ty).fields.iter().find(|f| f.name == name)
    }

    pub fn lookup_static_field(&self, ty: TypeId, name: &str) -> Option<&ScopeEntry> {
        self.get(ty).static_fields.iter().find(|f| f.name == name)
    }

    /// The routine-valued member `name` of `ty`, as a field entry.
    ///
    /// Every routine of that name contributes an `operator_parenthesis`
    /// signature to the entry's synthetic type.
    pub fn lookup_routine_value(
        &mut self,
        ty: TypeId,
        name: &str,
        is_static: bool,
    ) -> Option<ScopeEntry> {
        let key = (ty, name.to_string(), is_static);
        let value_ty = match self.member_routine_types.get(&key) {
            Some(&cached) => cached,
            None => {
                let spec = self.get(ty);
                let source = if is_static {
                    &spec.static_routines
                } else {
                    &spec.routines
                };
                let signatures: Vec<RoutineSpec> = source
                    .iter()
                    .filter(|r| r.name == name)
                    .map(|r| RoutineSpec::new(names::OPERATOR_PARENTHESIS, r.args.clone(), r.returns))
                    .collect();
                if signatures.is_empty() {
                    return None;
                }
                let mut value_spec = TypeSpec::new(names::ROUTINE_BASE, TypeKind::Routine);
                value_spec.routines = signatures;
                let id = self.add(value_spec);
                self.member_routine_types.insert(key, id);
                id
            }
        };
        let kind = if is_static {
            EntryKind::StaticField
        } else {
            EntryKind::Field
        };
        Some(ScopeEntry::new(name, value_ty, kind).member_of(ty))
    }

    /// Whether a value of `rhs` may be assigned to a binding of type `lhs`.
    ///
    /// An `operator_assignment(rhs)` on `lhs` always allows it. Otherwise the
    /// target must be a real binding and the types must be equal.
    pub fn is_assignment_compatible(
        &self,
        lhs_entry: Option<&ScopeEntry>,
        lhs: TypeId,
        rhs: TypeId,
    ) -> bool {
        if self
            .lookup_routine(lhs, names::OPERATOR_ASSIGNMENT, &ArgumentList::from([rhs]))
            .is_some()
        {
            return true;
        }
        lhs_entry.is_some() && self.equal(lhs, rhs)
    }

    /// Render an argument list as `(integer, real)`.
    pub fn format_args(&self, args: &ArgumentList) -> String {
        let names: Vec<&str> = args.types().iter().map(|&t| self.name(t)).collect();
        format!("({})", names.join(", "))
    }
}
