//! Call chains and binding access.
//!
//! A chain such as `a.b(x).c` is resolved link by link. The head link names
//! a binding or a type; every following link is looked up on the type the
//! previous link produced, as a field when it is a bare name and as a
//! routine when it carries arguments.

use sixty_ast::{CallChain, CallLink, Expr};
use sixty_core::{ScopeId, SemanticError, TypeId, names};

use super::Analyzer;
use crate::annotations::{Access, Callee, CaptureSource, ChainInfo, LinkResolution};
use crate::scope::{EntryKind, ScopeEntry, ScopeKind};
use crate::types::{ArgumentList, RoutineSpec, TypeKind};

/// What the links resolved so far produce.
#[derive(Debug, Clone)]
enum LinkState {
    Value {
        ty: TypeId,
        entry: Option<ScopeEntry>,
    },
    /// A call that returns nothing.
    Void,
    /// A type name, only valid before a static member link.
    Static(TypeId),
}

impl LinkState {
    fn returned(routine: &RoutineSpec) -> Self {
        match routine.returns {
            Some(ty) => LinkState::Value { ty, entry: None },
            None => LinkState::Void,
        }
    }
}

/// Outcome of looking up a bare identifier.
#[derive(Debug, Clone)]
pub(super) enum Binding {
    Found(ScopeEntry, Access),
    /// Declared, but an instance member seen from a static context.
    Hidden,
    Missing,
}

impl Analyzer {
    // ==========================================================================
    // Chains
    // ==========================================================================

    /// Resolve a call chain; its value type, if it has one.
    pub(super) fn chain(&mut self, chain: &CallChain<'_>) -> Option<TypeId> {
        let info = self.resolve_chain(chain)?;
        let ty = info.ty;
        self.annotations.set_chain(chain.id, info);
        ty
    }

    fn resolve_chain(&mut self, chain: &CallChain<'_>) -> Option<ChainInfo> {
        let (head, rest) = chain.links.split_first()?;
        let mut state = self.head_link(head, !rest.is_empty())?;
        for link in rest {
            state = self.member_link(link, state)?;
        }

        match state {
            LinkState::Value { ty, entry } => Some(ChainInfo { ty: Some(ty), entry }),
            LinkState::Void => Some(ChainInfo {
                ty: None,
                entry: None,
            }),
            LinkState::Static(ty) => {
                self.report(SemanticError::TypeCall {
                    name: self.types.name(ty).to_string(),
                    span: chain.span,
                });
                None
            }
        }
    }

    fn head_link(&mut self, link: &CallLink<'_>, has_more: bool) -> Option<LinkState> {
        let name = link.name.name;
        match self.lookup_binding(name) {
            Binding::Found(entry, access) => {
                tracing::trace!(name, ?access, "resolved binding");
                let Some(args) = link.args else {
                    let ty = entry.ty;
                    self.annotations.set_link(
                        link.id,
                        LinkResolution::Load {
                            entry: entry.clone(),
                            access,
                        },
                    );
                    return Some(LinkState::Value {
                        ty,
                        entry: Some(entry),
                    });
                };

                let args = self.call_args(args)?;
                let Some(routine) = self
                    .types
                    .lookup_routine(entry.ty, names::OPERATOR_PARENTHESIS, &args)
                    .cloned()
                else {
                    self.report(SemanticError::RoutineNotFound {
                        name: name.to_string(),
                        args: self.types.format_args(&args),
                        ty: None,
                        span: link.span,
                    });
                    return None;
                };
                let state = LinkState::returned(&routine);
                self.annotations.set_link(
                    link.id,
                    LinkResolution::Call {
                        owner: entry.ty,
                        routine,
                        callee: Callee::Binding { entry, access },
                    },
                );
                Some(state)
            }
            Binding::Hidden => {
                self.report(SemanticError::IdentifierNotDeclared {
                    name: name.to_string(),
                    ty: None,
                    span: link.span,
                });
                None
            }
            Binding::Missing => match self.scopes.resolve_type(self.current, name) {
                Some(ty) => self.type_head(link, ty, has_more),
                None => {
                    self.report(SemanticError::IdentifierNotDeclared {
                        name: name.to_string(),
                        ty: None,
                        span: link.span,
                    });
                    None
                }
            },
        }
    }

    /// A head link naming a type: `T.member`, `T(args)` or `T()`.
    fn type_head(&mut self, link: &CallLink<'_>, ty: TypeId, has_more: bool) -> Option<LinkState> {
        let Some(args) = link.args else {
            if has_more {
                self.annotations.set_link(link.id, LinkResolution::TypeName(ty));
                return Some(LinkState::Static(ty));
            }
            self.report(SemanticError::TypeCall {
                name: link.name.name.to_string(),
                span: link.span,
            });
            return None;
        };

        let args = self.call_args(args)?;
        if let Some(routine) = self
            .types
            .lookup_static_routine(ty, names::OPERATOR_PARENTHESIS, &args)
            .cloned()
        {
            let state = LinkState::returned(&routine);
            self.annotations.set_link(
                link.id,
                LinkResolution::Call {
                    owner: ty,
                    routine,
                    callee: Callee::Member { is_static: true },
                },
            );
            return Some(state);
        }
        if args.is_empty() && self.types.kind(ty) == TypeKind::User {
            self.annotations.set_link(link.id, LinkResolution::Construct(ty));
            return Some(LinkState::Value { ty, entry: None });
        }

        self.report(SemanticError::RoutineNotFound {
            name: names::OPERATOR_PARENTHESIS.to_string(),
            args: self.types.format_args(&args),
            ty: Some(self.types.name(ty).to_string()),
            span: link.span,
        });
        None
    }

    /// A link after the head, resolved against the previous link's result.
    fn member_link(&mut self, link: &CallLink<'_>, state: LinkState) -> Option<LinkState> {
        let (owner, is_static) = match state {
            LinkState::Value { ty, .. } => (ty, false),
            LinkState::Static(ty) => (ty, true),
            LinkState::Void => {
                self.report(SemanticError::NoValue { span: link.span });
                return None;
            }
        };
        let name = link.name.name;

        let Some(args) = link.args else {
            let field = if is_static {
                self.types.lookup_static_field(owner, name).cloned()
            } else {
                self.types.lookup_field(owner, name).cloned()
            };
            let Some(entry) = field.or_else(|| self.types.lookup_routine_value(owner, name, is_static))
            else {
                let ty = self.types.name(owner).to_string();
                let error = if is_static {
                    SemanticError::StaticIdentifierNotDeclared {
                        name: name.to_string(),
                        ty,
                        span: link.span,
                    }
                } else {
                    SemanticError::IdentifierNotDeclared {
                        name: name.to_string(),
                        ty: Some(ty),
                        span: link.span,
                    }
                };
                self.report(error);
                return None;
            };
            let ty = entry.ty;
            self.annotations.set_link(
                link.id,
                LinkResolution::Field {
                    owner,
                    entry: entry.clone(),
                },
            );
            return Some(LinkState::Value {
                ty,
                entry: Some(entry),
            });
        };

        let args = self.call_args(args)?;
        let routine = if is_static {
            self.types.lookup_static_routine(owner, name, &args)
        } else {
            self.types.lookup_routine(owner, name, &args)
        };
        if let Some(routine) = routine.cloned() {
            let state = LinkState::returned(&routine);
            self.annotations.set_link(
                link.id,
                LinkResolution::Call {
                    owner,
                    routine,
                    callee: Callee::Member { is_static },
                },
            );
            return Some(state);
        }

        // A routine-typed data member called through its value.
        let field = if is_static {
            self.types.lookup_static_field(owner, name).cloned()
        } else {
            self.types.lookup_field(owner, name).cloned()
        };
        if let Some(entry) = field
            && let Some(routine) = self
                .types
                .lookup_routine(entry.ty, names::OPERATOR_PARENTHESIS, &args)
                .cloned()
        {
            let state = LinkState::returned(&routine);
            self.annotations.set_link(
                link.id,
                LinkResolution::Call {
                    owner: entry.ty,
                    routine,
                    callee: Callee::FieldValue { entry, is_static },
                },
            );
            return Some(state);
        }

        self.report(SemanticError::RoutineNotFound {
            name: name.to_string(),
            args: self.types.format_args(&args),
            ty: Some(self.types.name(owner).to_string()),
            span: link.span,
        });
        None
    }

    /// Evaluate call arguments; `None` if any of them failed.
    fn call_args(&mut self, args: &[Expr<'_>]) -> Option<ArgumentList> {
        let mut types = Vec::with_capacity(args.len());
        let mut complete = true;
        for arg in args {
            match self.operand(arg) {
                Some(ty) => types.push(ty),
                None => complete = false,
            }
        }
        complete.then(|| ArgumentList::new(types))
    }

    // ==========================================================================
    // Binding access
    // ==========================================================================

    /// Resolve `name` from the current scope and classify how the current
    /// method reaches it. Records nonlocal captures as a side effect.
    pub(super) fn lookup_binding(&mut self, name: &str) -> Binding {
        self.lookup_binding_from(self.current, name)
    }

    fn lookup_binding_from(&mut self, scope: ScopeId, name: &str) -> Binding {
        let Some(resolved) = self.scopes.resolve_value(scope, name) else {
            return Binding::Missing;
        };
        let (entry, owner) = (resolved.entry.clone(), resolved.owner);
        let method = self.scopes.owning_method(scope);

        if let Some(slot) = entry.slot
            && self.scopes.is_ancestor_or_self(method, owner)
        {
            return Binding::Found(entry, Access::Local(slot));
        }

        match entry.kind {
            EntryKind::StaticField => {
                return match entry.instance_type {
                    Some(ty) => Binding::Found(entry, Access::Static(ty)),
                    None => Binding::Missing,
                };
            }
            EntryKind::Field => return self.member_access(scope, method, entry, owner),
            EntryKind::RoutineValue => {
                let current = self.scopes.get(method);
                if current.kind == ScopeKind::Routine
                    && current.parent == Some(owner)
                    && current.name == entry.name
                {
                    return Binding::Found(entry, Access::SelfRoutine);
                }
            }
            _ => {}
        }

        self.scopes.capture_nonlocal(scope, &entry, owner);
        Binding::Found(entry, Access::Capture)
    }

    /// Access to an instance member declared in the Type scope `owner`.
    ///
    /// Only instance routines of the owning type, and routines nested in
    /// them, can see instance members.
    fn member_access(
        &mut self,
        scope: ScopeId,
        method: ScopeId,
        entry: ScopeEntry,
        owner: ScopeId,
    ) -> Binding {
        let mut candidate = method;
        loop {
            let current = self.scopes.get(candidate);
            let Some(parent) = current.parent else {
                return Binding::Hidden;
            };
            if parent == owner {
                if current.kind != ScopeKind::Routine || current.is_static {
                    return Binding::Hidden;
                }
                if candidate == method {
                    return Binding::Found(entry, Access::EnclosingField);
                }
                self.scopes.capture_nonlocal(scope, &entry, owner);
                return Binding::Found(entry, Access::Capture);
            }
            candidate = self.scopes.owning_method(parent);
        }
    }

    /// Where the scope enclosing `scope` loads each capture of `scope` from.
    pub(super) fn capture_sources(&mut self, scope: ScopeId) -> Vec<CaptureSource> {
        let captures: Vec<(String, TypeId)> = self
            .scopes
            .get(scope)
            .captures()
            .iter()
            .map(|c| (c.local.name.clone(), c.local.ty))
            .collect();

        let mut sources = Vec::with_capacity(captures.len());
        for (name, ty) in captures {
            match self.lookup_binding_from(self.current, &name) {
                Binding::Found(_, access) => sources.push(CaptureSource { name, ty, access }),
                Binding::Hidden | Binding::Missing => {
                    tracing::trace!(name = %name, "capture has no source in the enclosing scope");
                }
            }
        }
        sources
    }
}
