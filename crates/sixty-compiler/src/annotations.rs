//! Analysis results keyed by syntax tree node.
//!
//! The analyzer never writes to the tree. Everything it decides about a node
//! (resolved type, binding, operator, scope, unit) is recorded here under
//! the node's [`NodeId`], and the generator reads it back. A node with no
//! record failed analysis; that only happens when errors were reported.

use rustc_hash::FxHashMap;
use sixty_core::{NodeId, ScopeId, TypeId, UnitId};

use crate::scope::ScopeEntry;
use crate::types::RoutineSpec;

/// How generated code reaches a binding from the current method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Local variable slot of the current method.
    Local(u32),
    /// Copied into the current unit at construction: an instance field of a
    /// routine unit, or a static field of a type unit.
    Capture,
    /// Member of the instance enclosing the current routine, read through
    /// its enclosing instance reference.
    EnclosingField,
    /// Static member of a type.
    Static(TypeId),
    /// The routine whose body is being emitted.
    SelfRoutine,
}

/// A captured binding and how the creating scope loads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSource {
    pub name: String,
    pub ty: TypeId,
    /// Access from the scope where the unit is instantiated.
    pub access: Access,
}

/// The routine an operator resolved to.
#[derive(Debug, Clone)]
pub struct OperatorCall {
    /// Type the routine was found on.
    pub owner: TypeId,
    pub routine: RoutineSpec,
    pub is_static: bool,
}

/// What a call link invokes.
#[derive(Debug, Clone)]
pub enum Callee {
    /// A routine value held in a binding: `f(x)`.
    Binding { entry: ScopeEntry, access: Access },
    /// A routine of the type produced by the previous link, or of the named
    /// type for static access: `a.f(x)`, `T.f(x)`, `T(x)`.
    Member { is_static: bool },
    /// A routine-typed data field of the previous value, or a static one of
    /// the named type: `a.callback(x)`.
    FieldValue { entry: ScopeEntry, is_static: bool },
}

/// Resolution of one call link.
#[derive(Debug, Clone)]
pub enum LinkResolution {
    /// Load a binding: `a`.
    Load { entry: ScopeEntry, access: Access },
    /// Names a type for the following static link: `T` in `T.f`.
    TypeName(TypeId),
    /// Default construction of a user type: `T()`.
    Construct(TypeId),
    /// Read a member of the previous value, or a static member: `.f`.
    Field { owner: TypeId, entry: ScopeEntry },
    /// Invoke a routine.
    Call {
        owner: TypeId,
        routine: RoutineSpec,
        callee: Callee,
    },
}

/// Result of a whole call chain.
#[derive(Debug, Clone)]
pub struct ChainInfo {
    /// `None` when the chain ends in a call that returns nothing.
    pub ty: Option<TypeId>,
    /// Binding the chain ends on, if it ends on one; assignment target.
    pub entry: Option<ScopeEntry>,
}

/// How a value is written into a binding.
#[derive(Debug, Clone)]
pub enum AssignMode {
    /// Call the target's `operator_assignment` with the value.
    Operator(RoutineSpec),
    /// Replace the reference held by the binding.
    Store,
}

/// A declaration statement's bindings.
#[derive(Debug, Clone)]
pub struct DeclInfo {
    pub ty: TypeId,
    pub entries: Vec<ScopeEntry>,
    /// How the initializer is written, for declarations that have one.
    pub mode: Option<AssignMode>,
}

#[derive(Debug, Clone)]
pub struct AssignInfo {
    pub target_ty: TypeId,
    pub mode: AssignMode,
}

/// A successfully declared routine.
#[derive(Debug, Clone)]
pub struct RoutineInfo {
    pub spec: RoutineSpec,
    /// Routine value binding in the enclosing scope.
    pub entry: ScopeEntry,
    pub unit: UnitId,
    pub scope: ScopeId,
    /// Type the routine belongs to, for member routines.
    pub member_of: Option<TypeId>,
    pub is_static: bool,
    /// Parameter bindings, in order.
    pub params: Vec<ScopeEntry>,
    /// Bindings the routine receives when it is instantiated.
    pub captures: Vec<CaptureSource>,
}

/// A successfully declared type.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub ty: TypeId,
    pub unit: UnitId,
    pub scope: ScopeId,
    /// Scope of the static field initializers.
    pub field_init: ScopeId,
    /// Bindings stored into the type's static fields at its definition site.
    pub captures: Vec<CaptureSource>,
}

/// Side tables filled by the analyzer.
#[derive(Debug, Default, Clone)]
pub struct Annotations {
    expr_types: FxHashMap<NodeId, TypeId>,
    operators: FxHashMap<NodeId, OperatorCall>,
    links: FxHashMap<NodeId, LinkResolution>,
    chains: FxHashMap<NodeId, ChainInfo>,
    blocks: FxHashMap<NodeId, ScopeId>,
    decls: FxHashMap<NodeId, DeclInfo>,
    assigns: FxHashMap<NodeId, AssignInfo>,
    routines: FxHashMap<NodeId, RoutineInfo>,
    types: FxHashMap<NodeId, TypeInfo>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Recording
    // ==========================================================================

    pub(crate) fn set_expr_type(&mut self, node: NodeId, ty: TypeId) {
        self.expr_types.insert(node, ty);
    }

    pub(crate) fn set_operator(&mut self, node: NodeId, call: OperatorCall) {
        self.operators.insert(node, call);
    }

    pub(crate) fn set_link(&mut self, node: NodeId, resolution: LinkResolution) {
        self.links.insert(node, resolution);
    }

    pub(crate) fn set_chain(&mut self, node: NodeId, info: ChainInfo) {
        self.chains.insert(node, info);
    }

    pub(crate) fn set_block(&mut self, node: NodeId, scope: ScopeId) {
        self.blocks.insert(node, scope);
    }

    pub(crate) fn set_decl(&mut self, node: NodeId, info: DeclInfo) {
        self.decls.insert(node, info);
    }

    pub(crate) fn set_assign(&mut self, node: NodeId, info: AssignInfo) {
        self.assigns.insert(node, info);
    }

    pub(crate) fn set_routine(&mut self, node: NodeId, info: RoutineInfo) {
        self.routines.insert(node, info);
    }

    pub(crate) fn routine_mut(&mut self, node: NodeId) -> Option<&mut RoutineInfo> {
        self.routines.get_mut(&node)
    }

    pub(crate) fn set_type(&mut self, node: NodeId, info: TypeInfo) {
        self.types.insert(node, info);
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    /// Resolved type of an expression; `None` if it yields no value or failed.
    pub fn expr_type(&self, node: NodeId) -> Option<TypeId> {
        self.expr_types.get(&node).copied()
    }

    pub fn operator(&self, node: NodeId) -> Option<&OperatorCall> {
        self.operators.get(&node)
    }

    pub fn link(&self, node: NodeId) -> Option<&LinkResolution> {
        self.links.get(&node)
    }

    pub fn chain(&self, node: NodeId) -> Option<&ChainInfo> {
        self.chains.get(&node)
    }

    /// Scope opened by an `if`/`elseif`/`else`/`loop` block.
    pub fn block(&self, node: NodeId) -> Option<ScopeId> {
        self.blocks.get(&node).copied()
    }

    pub fn decl(&self, node: NodeId) -> Option<&DeclInfo> {
        self.decls.get(&node)
    }

    pub fn assign(&self, node: NodeId) -> Option<&AssignInfo> {
        self.assigns.get(&node)
    }

    pub fn routine(&self, node: NodeId) -> Option<&RoutineInfo> {
        self.routines.get(&node)
    }

    pub fn type_def(&self, node: NodeId) -> Option<&TypeInfo> {
        self.types.get(&node)
    }

    /// Every declared routine, in no particular order.
    pub fn routines(&self) -> impl Iterator<Item = &RoutineInfo> {
        self.routines.values()
    }
}
