//! Lexical scopes and their bindings.
//!
//! This module provides the [`ScopeTree`], an arena of parent-linked
//! [`Scope`]s built by the analyzer. It handles:
//! - Value and type declaration with duplicate detection
//! - Local slot allocation, flattened per owning method
//! - Name resolution through the parent chain
//! - Nonlocal capture propagation across routine and type boundaries
//!
//! Every Block scope shares the slot counter of its owning method (the
//! nearest Main, Routine, Type or FieldInit ancestor), because the output
//! model has a single flat local variable space per method.

use rustc_hash::FxHashMap;
use sixty_core::{ScopeId, SemanticError, Span, TypeId, UnitId};

// ============================================================================
// Types
// ============================================================================

/// What construct opened a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Program body; the root.
    Main,
    /// Body of a user type definition.
    Type,
    Routine,
    /// Body of an `if`, `elseif`, `else` or `loop`.
    Block,
    /// Static field initializers of a type.
    FieldInit,
}

impl ScopeKind {
    /// Whether scopes of this kind own a method's local variable space.
    pub fn owns_method(self) -> bool {
        !matches!(self, ScopeKind::Block)
    }
}

/// What a binding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Variable,
    Parameter,
    /// Instance member of a user type (data or routine value).
    Field,
    /// Static member of a user type (data or routine value).
    StaticField,
    /// A binding owned by an outer scope, as seen from a capturing scope.
    Nonlocal,
    /// A routine defined outside any type.
    RoutineValue,
}

impl EntryKind {
    /// Whether bindings of this kind occupy a local variable slot.
    pub fn uses_slot(self) -> bool {
        matches!(
            self,
            EntryKind::Variable | EntryKind::Parameter | EntryKind::RoutineValue
        )
    }
}

/// A named, typed binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeEntry {
    pub name: String,
    pub ty: TypeId,
    pub kind: EntryKind,
    /// Local slot, assigned on declaration for slot-using kinds.
    pub slot: Option<u32>,
    /// Type owning a Field or StaticField.
    pub instance_type: Option<TypeId>,
}

impl ScopeEntry {
    pub fn new(name: impl Into<String>, ty: TypeId, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            ty,
            kind,
            slot: None,
            instance_type: None,
        }
    }

    pub fn member_of(mut self, owner: TypeId) -> Self {
        self.instance_type = Some(owner);
        self
    }

    pub fn is_member(&self) -> bool {
        matches!(self.kind, EntryKind::Field | EntryKind::StaticField)
    }
}

/// A binding owned by an outer scope that a scope must receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    /// The binding as seen from the capturing scope; kind is `Nonlocal`.
    pub local: ScopeEntry,
    /// The binding as declared by its owner.
    pub original: ScopeEntry,
    /// Scope that declared the binding.
    pub owner: ScopeId,
}

/// Result of value resolution.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    /// The binding as declared by its owner.
    pub entry: &'a ScopeEntry,
    pub owner: ScopeId,
}

/// A lexical scope.
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
    /// Routine or type name, or the `innerN` token of a block.
    pub name: String,
    /// Unit this scope emits into.
    pub unit: UnitId,
    /// For Type scopes, the type being defined. For Routine scopes, the type
    /// the routine is a member of.
    pub member_of: Option<TypeId>,
    /// Static member routine (Routine scopes only).
    pub is_static: bool,
    children: Vec<ScopeId>,
    entries: Vec<ScopeEntry>,
    entry_index: FxHashMap<String, usize>,
    captures: Vec<Capture>,
    capture_index: FxHashMap<String, usize>,
    types: FxHashMap<String, TypeId>,
    num_locals: u32,
    inner_count: u32,
}

impl Scope {
    fn new(id: ScopeId, parent: Option<ScopeId>, kind: ScopeKind, name: String, unit: UnitId) -> Self {
        // Slot 0 of Main holds the argument array; of a Routine, the routine object.
        let num_locals = match kind {
            ScopeKind::Main | ScopeKind::Routine => 1,
            _ => 0,
        };
        Self {
            id,
            parent,
            kind,
            name,
            unit,
            member_of: None,
            is_static: false,
            children: Vec::new(),
            entries: Vec::new(),
            entry_index: FxHashMap::default(),
            captures: Vec::new(),
            capture_index: FxHashMap::default(),
            types: FxHashMap::default(),
            num_locals,
            inner_count: 0,
        }
    }

    /// Own entries, in declaration order.
    pub fn entries(&self) -> &[ScopeEntry] {
        &self.entries
    }

    pub fn entry(&self, name: &str) -> Option<&ScopeEntry> {
        self.entry_index.get(name).map(|&i| &self.entries[i])
    }

    /// Recorded nonlocal captures, in first-use order.
    pub fn captures(&self) -> &[Capture] {
        &self.captures
    }

    pub fn capture(&self, name: &str) -> Option<&Capture> {
        self.capture_index.get(name).map(|&i| &self.captures[i])
    }

    pub fn own_type(&self, name: &str) -> Option<TypeId> {
        self.types.get(name).copied()
    }

    /// Local slots used so far (meaningful on method-owning scopes).
    pub fn num_locals(&self) -> u32 {
        self.num_locals
    }

    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    /// Whether the scope knows `name` without looking at its parent.
    pub fn knows(&self, name: &str) -> bool {
        self.entry_index.contains_key(name) || self.capture_index.contains_key(name)
    }
}

// ============================================================================
// ScopeTree
// ============================================================================

/// Arena of every scope of a program, rooted at the Main scope.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    /// Create a tree holding only the Main scope.
    pub fn new(main_name: impl Into<String>, main_unit: UnitId) -> Self {
        let root = Scope::new(ScopeId::new(0), None, ScopeKind::Main, main_name.into(), main_unit);
        Self { scopes: vec![root] }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId::new(0)
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.as_usize()]
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.as_usize()]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.get(id).parent
    }

    /// Open a child scope of `parent`.
    pub fn open(
        &mut self,
        parent: ScopeId,
        kind: ScopeKind,
        name: impl Into<String>,
        unit: UnitId,
    ) -> ScopeId {
        let id = ScopeId::new(self.scopes.len() as u32);
        self.scopes
            .push(Scope::new(id, Some(parent), kind, name.into(), unit));
        self.get_mut(parent).children.push(id);
        id
    }

    /// Next unique token for an anonymous block opened inside `scope`.
    pub fn next_inner_name(&mut self, scope: ScopeId) -> String {
        let scope = self.get_mut(scope);
        let name = format!("inner{}", scope.inner_count);
        scope.inner_count += 1;
        name
    }

    /// Nearest ancestor (or self) that owns a method's local variable space.
    pub fn owning_method(&self, mut id: ScopeId) -> ScopeId {
        loop {
            let scope = self.get(id);
            match scope.parent {
                Some(parent) if !scope.kind.owns_method() => id = parent,
                _ => return id,
            }
        }
    }

    /// Number of local slots used by the method owning `id`.
    pub fn num_locals_in_owning_method(&self, id: ScopeId) -> u32 {
        self.get(self.owning_method(id)).num_locals
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: ScopeId, mut id: ScopeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.parent(id) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    // ==========================================================================
    // Declaration
    // ==========================================================================

    /// Declare `entry` in `scope`, assigning a slot if its kind uses one.
    ///
    /// Fails if the name is already an entry or a type of this scope.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        mut entry: ScopeEntry,
        span: Span,
    ) -> Result<ScopeEntry, SemanticError> {
        let target = self.get(scope);
        if target.entry_index.contains_key(&entry.name) || target.types.contains_key(&entry.name) {
            return Err(SemanticError::DuplicateName {
                name: entry.name,
                span,
            });
        }

        if entry.kind.uses_slot() {
            let method = self.owning_method(scope);
            let method = self.get_mut(method);
            entry.slot = Some(method.num_locals);
            method.num_locals += 1;
        }

        let target = self.get_mut(scope);
        target
            .entry_index
            .insert(entry.name.clone(), target.entries.len());
        target.entries.push(entry.clone());
        Ok(entry)
    }

    /// Declare a type name in `scope`.
    pub fn declare_type(
        &mut self,
        scope: ScopeId,
        name: &str,
        ty: TypeId,
        span: Span,
    ) -> Result<(), SemanticError> {
        let target = self.get_mut(scope);
        if target.types.contains_key(name) {
            return Err(SemanticError::DuplicateType {
                name: name.to_string(),
                span,
            });
        }
        if target.entry_index.contains_key(name) {
            return Err(SemanticError::DuplicateName {
                name: name.to_string(),
                span,
            });
        }
        target.types.insert(name.to_string(), ty);
        Ok(())
    }

    // ==========================================================================
    // Resolution
    // ==========================================================================

    /// Resolve a value binding: own entries, then own captures, then parents.
    pub fn resolve_value(&self, mut scope: ScopeId, name: &str) -> Option<Resolved<'_>> {
        loop {
            let current = self.get(scope);
            if let Some(entry) = current.entry(name) {
                return Some(Resolved {
                    entry,
                    owner: scope,
                });
            }
            if let Some(capture) = current.capture(name) {
                return Some(Resolved {
                    entry: &capture.original,
                    owner: capture.owner,
                });
            }
            scope = current.parent?;
        }
    }

    /// Resolve a type name through the parent chain.
    pub fn resolve_type(&self, mut scope: ScopeId, name: &str) -> Option<TypeId> {
        loop {
            let current = self.get(scope);
            if let Some(ty) = current.own_type(name) {
                return Some(ty);
            }
            scope = current.parent?;
        }
    }

    /// Record that `scope` uses `entry`, declared by the strict ancestor `owner`.
    ///
    /// The capture is recorded on `scope` and on every ancestor up to the
    /// owner. Propagation stops early at an ancestor that already knows the
    /// name or reaches the binding without a capture (see
    /// [`Self::reaches_directly`]). Repeated calls are no-ops.
    pub fn capture_nonlocal(&mut self, scope: ScopeId, entry: &ScopeEntry, owner: ScopeId) {
        let mut current = scope;
        while current != owner {
            if self.get(current).knows(&entry.name) {
                return;
            }

            let local = ScopeEntry {
                kind: EntryKind::Nonlocal,
                slot: None,
                ..entry.clone()
            };
            let target = self.get_mut(current);
            target
                .capture_index
                .insert(entry.name.clone(), target.captures.len());
            target.captures.push(Capture {
                local,
                original: entry.clone(),
                owner,
            });

            let Some(parent) = self.parent(current) else {
                return;
            };
            if self.reaches_directly(parent, entry, owner) {
                return;
            }
            current = parent;
        }
    }

    /// Whether `scope` reaches `entry`, declared by `owner`, without
    /// capturing it: an instance routine of the type owning an instance
    /// member goes through its enclosing instance, and a routine refers to
    /// its own value as itself.
    fn reaches_directly(&self, scope: ScopeId, entry: &ScopeEntry, owner: ScopeId) -> bool {
        let scope = self.get(scope);
        if scope.kind != ScopeKind::Routine || scope.parent != Some(owner) {
            return false;
        }
        match entry.kind {
            EntryKind::Field => {
                !scope.is_static && scope.member_of.is_some() && scope.member_of == entry.instance_type
            }
            EntryKind::RoutineValue => scope.name == entry.name,
            _ => false,
        }
    }

    /// Every slot-using entry of the method owned by `method`, including those
    /// of nested blocks, ordered by slot.
    pub fn method_locals(&self, method: ScopeId) -> Vec<&ScopeEntry> {
        let mut locals = Vec::new();
        let mut pending = vec![method];
        while let Some(id) = pending.pop() {
            let scope = self.get(id);
            locals.extend(scope.entries.iter().filter(|e| e.slot.is_some()));
            pending.extend(
                scope
                    .children
                    .iter()
                    .copied()
                    .filter(|&child| self.get(child).kind == ScopeKind::Block),
            );
        }
        locals.sort_by_key(|e| e.slot);
        locals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(index: u32) -> TypeId {
        TypeId::new(index)
    }

    fn unit() -> UnitId {
        UnitId::new(0)
    }

    #[test]
    fn declare_assigns_slots_after_reserved_slot() {
        let mut tree = ScopeTree::new("demo", unit());
        let root = tree.root();
        let a = tree
            .declare(root, ScopeEntry::new("a", ty(0), EntryKind::Variable), Span::default())
            .unwrap();
        let b = tree
            .declare(root, ScopeEntry::new("b", ty(0), EntryKind::Variable), Span::default())
            .unwrap();

        assert_eq!(a.slot, Some(1));
        assert_eq!(b.slot, Some(2));
        assert_eq!(tree.get(root).num_locals(), 3);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut tree = ScopeTree::new("demo", unit());
        let root = tree.root();
        tree.declare(root, ScopeEntry::new("a", ty(0), EntryKind::Variable), Span::default())
            .unwrap();
        let err = tree
            .declare(root, ScopeEntry::new("a", ty(1), EntryKind::Variable), Span::line(3))
            .unwrap_err();
        assert!(matches!(err, SemanticError::DuplicateName { ref name, .. } if name == "a"));

        tree.declare_type(root, "point", ty(9), Span::default()).unwrap();
        assert!(
            tree.declare(root, ScopeEntry::new("point", ty(0), EntryKind::Variable), Span::default())
                .is_err()
        );
        assert!(matches!(
            tree.declare_type(root, "point", ty(10), Span::default()),
            Err(SemanticError::DuplicateType { .. })
        ));
        assert!(matches!(
            tree.declare_type(root, "a", ty(10), Span::default()),
            Err(SemanticError::DuplicateName { .. })
        ));
    }

    #[test]
    fn fields_take_no_slot() {
        let mut tree = ScopeTree::new("demo", unit());
        let t = tree.open(tree.root(), ScopeKind::Type, "point", UnitId::new(1));
        let x = tree
            .declare(t, ScopeEntry::new("x", ty(0), EntryKind::Field).member_of(ty(7)), Span::default())
            .unwrap();
        assert_eq!(x.slot, None);
        assert_eq!(tree.get(t).num_locals(), 0);
    }

    #[test]
    fn blocks_share_the_method_slot_counter() {
        let mut tree = ScopeTree::new("demo", unit());
        let r = tree.open(tree.root(), ScopeKind::Routine, "f", UnitId::new(1));
        tree.declare(r, ScopeEntry::new("p", ty(0), EntryKind::Parameter), Span::default())
            .unwrap();

        let then_block = tree.open(r, ScopeKind::Block, "inner0", UnitId::new(1));
        let nested = tree.open(then_block, ScopeKind::Block, "inner0", UnitId::new(1));
        let else_block = tree.open(r, ScopeKind::Block, "inner1", UnitId::new(1));

        let mut slots = Vec::new();
        for (scope, name) in [(then_block, "a"), (nested, "b"), (else_block, "c"), (r, "d")] {
            let entry = tree
                .declare(scope, ScopeEntry::new(name, ty(0), EntryKind::Variable), Span::default())
                .unwrap();
            slots.push(entry.slot.unwrap());
        }

        assert_eq!(slots, vec![2, 3, 4, 5]);
        assert_eq!(tree.num_locals_in_owning_method(nested), 6);
        assert_eq!(tree.owning_method(nested), r);

        let all: Vec<u32> = tree.method_locals(r).iter().filter_map(|e| e.slot).collect();
        assert_eq!(all, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn resolution_walks_parents_and_types() {
        let mut tree = ScopeTree::new("demo", unit());
        let root = tree.root();
        tree.declare(root, ScopeEntry::new("x", ty(0), EntryKind::Variable), Span::default())
            .unwrap();
        tree.declare_type(root, "integer", ty(0), Span::default()).unwrap();
        let block = tree.open(root, ScopeKind::Block, "inner0", unit());

        let resolved = tree.resolve_value(block, "x").unwrap();
        assert_eq!(resolved.owner, root);
        assert_eq!(resolved.entry.slot, Some(1));
        assert_eq!(tree.resolve_type(block, "integer"), Some(ty(0)));
        assert!(tree.resolve_value(block, "y").is_none());
    }

    #[test]
    fn capture_propagates_to_every_intermediate_scope_once() {
        let mut tree = ScopeTree::new("demo", unit());
        let root = tree.root();
        let x = tree
            .declare(root, ScopeEntry::new("x", ty(0), EntryKind::Variable), Span::default())
            .unwrap();

        let outer = tree.open(root, ScopeKind::Routine, "outer", UnitId::new(1));
        let block = tree.open(outer, ScopeKind::Block, "inner0", UnitId::new(1));
        let inner = tree.open(block, ScopeKind::Routine, "inner", UnitId::new(2));
        let sibling = tree.open(root, ScopeKind::Routine, "sibling", UnitId::new(3));

        tree.capture_nonlocal(inner, &x, root);
        tree.capture_nonlocal(inner, &x, root);

        for scope in [inner, block, outer] {
            assert_eq!(tree.get(scope).captures().len(), 1);
            let capture = &tree.get(scope).captures()[0];
            assert_eq!(capture.local.kind, EntryKind::Nonlocal);
            assert_eq!(capture.owner, root);
        }
        assert!(tree.get(root).captures().is_empty());
        assert!(tree.get(sibling).captures().is_empty());

        // a capture resolves back to the original binding
        let resolved = tree.resolve_value(inner, "x").unwrap();
        assert_eq!(resolved.owner, root);
        assert_eq!(resolved.entry.kind, EntryKind::Variable);
    }

    #[test]
    fn capture_stops_at_scope_already_recording() {
        let mut tree = ScopeTree::new("demo", unit());
        let root = tree.root();
        let x = tree
            .declare(root, ScopeEntry::new("x", ty(0), EntryKind::Variable), Span::default())
            .unwrap();
        let outer = tree.open(root, ScopeKind::Routine, "outer", UnitId::new(1));
        let first = tree.open(outer, ScopeKind::Routine, "first", UnitId::new(2));
        let second = tree.open(outer, ScopeKind::Routine, "second", UnitId::new(3));

        tree.capture_nonlocal(first, &x, root);
        tree.capture_nonlocal(second, &x, root);

        assert_eq!(tree.get(outer).captures().len(), 1);
        assert_eq!(tree.get(first).captures().len(), 1);
        assert_eq!(tree.get(second).captures().len(), 1);
    }

    #[test]
    fn instance_routine_stops_member_capture() {
        let mut tree = ScopeTree::new("demo", unit());
        let point = ty(9);
        let t = tree.open(tree.root(), ScopeKind::Type, "point", UnitId::new(1));
        tree.get_mut(t).member_of = Some(point);
        let f = tree
            .declare(t, ScopeEntry::new("f", ty(0), EntryKind::Field).member_of(point), Span::default())
            .unwrap();

        let method = tree.open(t, ScopeKind::Routine, "m", UnitId::new(2));
        tree.get_mut(method).member_of = Some(point);
        let nested = tree.open(method, ScopeKind::Routine, "n", UnitId::new(3));

        tree.capture_nonlocal(nested, &f, t);

        assert_eq!(tree.get(nested).captures().len(), 1);
        assert!(tree.get(method).captures().is_empty());
    }

    #[test]
    fn inner_names_are_unique_per_scope() {
        let mut tree = ScopeTree::new("demo", unit());
        let root = tree.root();
        assert_eq!(tree.next_inner_name(root), "inner0");
        assert_eq!(tree.next_inner_name(root), "inner1");
    }

    #[test]
    fn recursion_through_nested_routine_stops_at_the_routine() {
        let mut tree = ScopeTree::new("demo", unit());
        let root = tree.root();
        let f = tree
            .declare(root, ScopeEntry::new("f", ty(6), EntryKind::RoutineValue), Span::default())
            .unwrap();
        let body = tree.open(root, ScopeKind::Routine, "f", UnitId::new(1));
        let nested = tree.open(body, ScopeKind::Routine, "g", UnitId::new(2));

        tree.capture_nonlocal(nested, &f, root);

        assert_eq!(tree.get(nested).captures().len(), 1);
        assert!(tree.get(body).captures().is_empty());
    }
}
