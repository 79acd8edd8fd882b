//! Type system: named types, routine signatures and argument lists.
//!
//! Types live in a [`TypeRegistry`] and are referred to by [`TypeId`].
//! Equality between types is identity, except for synthetic routine-value
//! types, which compare by signature (see [`TypeRegistry::equal`]).
//!
//! Lookups are exact: a call resolves only when some routine has the same
//! name and an argument list equal element-wise to the call's. There is no
//! widening and no implicit conversion.

mod predefined;
mod registry;

pub use predefined::Predefined;
pub use registry::TypeRegistry;

use sixty_core::TypeId;

use crate::scope::ScopeEntry;

/// How values of a type are represented in the generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Runtime library value class; routines are real methods on the class.
    Library,
    /// Runtime library callable (`print`, `read`); called through its own
    /// `operator_parenthesis` method.
    Builtin,
    /// Synthetic type of a routine value; called through the routine base class.
    Routine,
    /// User-defined type; routines are routine-valued fields of the instance.
    User,
}

/// A named type's complete member signature.
#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub name: String,
    pub kind: TypeKind,
    /// Output path of the class implementing the type, assigned once the
    /// unit planner has named it.
    pub path: Option<String>,
    pub routines: Vec<RoutineSpec>,
    pub static_routines: Vec<RoutineSpec>,
    pub fields: Vec<ScopeEntry>,
    pub static_fields: Vec<ScopeEntry>,
}

impl TypeSpec {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            path: None,
            routines: Vec::new(),
            static_routines: Vec::new(),
            fields: Vec::new(),
            static_fields: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// One callable signature.
///
/// Identity is name plus argument list; the return type does not take part
/// in overload matching.
#[derive(Debug, Clone)]
pub struct RoutineSpec {
    pub name: String,
    pub args: ArgumentList,
    /// `None` when the routine yields no value.
    pub returns: Option<TypeId>,
}

impl RoutineSpec {
    pub fn new(name: impl Into<String>, args: ArgumentList, returns: Option<TypeId>) -> Self {
        Self {
            name: name.into(),
            args,
            returns,
        }
    }
}

/// Ordered argument types of a call or signature.
///
/// Comparison needs the registry, since routine-value arguments compare
/// structurally; see [`TypeRegistry::args_equal`].
#[derive(Debug, Clone, Default)]
pub struct ArgumentList(Vec<TypeId>);

impl ArgumentList {
    pub fn new(types: Vec<TypeId>) -> Self {
        Self(types)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn types(&self) -> &[TypeId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<TypeId>> for ArgumentList {
    fn from(types: Vec<TypeId>) -> Self {
        Self(types)
    }
}

impl<const N: usize> From<[TypeId; N]> for ArgumentList {
    fn from(types: [TypeId; N]) -> Self {
        Self(types.to_vec())
    }
}
