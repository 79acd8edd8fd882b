//! Arena-backed tree construction.
//!
//! [`AstBuilder`] is the only way nodes receive a [`NodeId`]; it is used by
//! parsers and by tests that assemble trees directly. Every node takes its
//! span from the builder's current line, set with [`AstBuilder::at_line`].

use std::cell::Cell;

use bumpalo::Bump;
use sixty_core::{NodeId, Span};

use crate::{
    Assign, AssignNew, BinaryExpr, BinaryOp, CallChain, CallLink, CondBlock, ElseBlock, Expr,
    Ident, IfStmt, LiteralExpr, LiteralKind, Param, ParenExpr, Program, ReturnClause, RoutineDef,
    RoutineTypeName, StaticField, Stmt, TypeDef, TypeName, UnaryExpr, UnaryOp, VarDecl,
};

/// Allocates tree nodes in an arena and numbers them.
pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
    next_id: Cell<u32>,
    line: Cell<u32>,
}

impl<'ast> AstBuilder<'ast> {
    pub fn new(arena: &'ast Bump) -> Self {
        Self {
            arena,
            next_id: Cell::new(0),
            line: Cell::new(1),
        }
    }

    /// Stamp subsequently built nodes with `line`.
    pub fn at_line(&self, line: u32) -> &Self {
        self.line.set(line);
        self
    }

    /// Number of ids handed out so far.
    pub fn node_count(&self) -> u32 {
        self.next_id.get()
    }

    fn id(&self) -> NodeId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        NodeId::new(id)
    }

    fn span(&self) -> Span {
        Span::line(self.line.get())
    }

    pub fn ident(&self, name: &str) -> Ident<'ast> {
        Ident::new(self.arena.alloc_str(name), self.span())
    }

    fn idents(&self, names: &[&str]) -> &'ast [Ident<'ast>] {
        self.arena
            .alloc_slice_fill_iter(names.iter().map(|name| self.ident(name)))
    }

    pub fn program(&self, stmts: &[Stmt<'ast>]) -> Program<'ast> {
        Program {
            stmts: self.arena.alloc_slice_copy(stmts),
            span: Span::line(1),
        }
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    fn literal(&self, kind: LiteralKind<'ast>) -> Expr<'ast> {
        Expr::Literal(LiteralExpr {
            id: self.id(),
            kind,
            span: self.span(),
        })
    }

    pub fn int(&self, value: i32) -> Expr<'ast> {
        self.literal(LiteralKind::Int(value))
    }

    pub fn real(&self, value: f64) -> Expr<'ast> {
        self.literal(LiteralKind::Real(value))
    }

    pub fn boolean(&self, value: bool) -> Expr<'ast> {
        self.literal(LiteralKind::Bool(value))
    }

    pub fn string(&self, value: &str) -> Expr<'ast> {
        self.literal(LiteralKind::String(self.arena.alloc_str(value)))
    }

    pub fn binary(&self, left: Expr<'ast>, op: BinaryOp, right: Expr<'ast>) -> Expr<'ast> {
        Expr::Binary(self.arena.alloc(BinaryExpr {
            id: self.id(),
            left: self.arena.alloc(left),
            op,
            right: self.arena.alloc(right),
            span: self.span(),
        }))
    }

    pub fn unary(&self, op: UnaryOp, operand: Expr<'ast>) -> Expr<'ast> {
        Expr::Unary(self.arena.alloc(UnaryExpr {
            id: self.id(),
            op,
            operand: self.arena.alloc(operand),
            span: self.span(),
        }))
    }

    pub fn paren(&self, inner: Expr<'ast>) -> Expr<'ast> {
        Expr::Paren(self.arena.alloc(ParenExpr {
            id: self.id(),
            inner: self.arena.alloc(inner),
            span: self.span(),
        }))
    }

    /// A bare identifier link.
    pub fn link(&self, name: &str) -> CallLink<'ast> {
        CallLink {
            id: self.id(),
            name: self.ident(name),
            args: None,
            span: self.span(),
        }
    }

    /// A call link with arguments.
    pub fn link_call(&self, name: &str, args: &[Expr<'ast>]) -> CallLink<'ast> {
        CallLink {
            id: self.id(),
            name: self.ident(name),
            args: Some(self.arena.alloc_slice_copy(args)),
            span: self.span(),
        }
    }

    pub fn chain(&self, links: &[CallLink<'ast>]) -> &'ast CallChain<'ast> {
        self.arena.alloc(CallChain {
            id: self.id(),
            links: self.arena.alloc_slice_copy(links),
            span: self.span(),
        })
    }

    /// A chain used as an expression.
    pub fn chain_expr(&self, links: &[CallLink<'ast>]) -> Expr<'ast> {
        Expr::Call(self.chain(links))
    }

    /// `name`
    pub fn var(&self, name: &str) -> Expr<'ast> {
        let link = self.link(name);
        self.chain_expr(&[link])
    }

    /// `name(args)`
    pub fn call(&self, name: &str, args: &[Expr<'ast>]) -> Expr<'ast> {
        let link = self.link_call(name, args);
        self.chain_expr(&[link])
    }

    // ==========================================================================
    // Types
    // ==========================================================================

    pub fn named(&self, name: &str) -> TypeName<'ast> {
        TypeName::Named(self.ident(name))
    }

    pub fn routine_type(
        &self,
        params: &[TypeName<'ast>],
        returns: Option<TypeName<'ast>>,
    ) -> TypeName<'ast> {
        TypeName::Routine(self.arena.alloc(RoutineTypeName {
            params: self.arena.alloc_slice_copy(params),
            returns,
            span: self.span(),
        }))
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    pub fn var_decl(&self, ty: TypeName<'ast>, names: &[&str]) -> VarDecl<'ast> {
        VarDecl {
            id: self.id(),
            ty,
            names: self.idents(names),
            span: self.span(),
        }
    }

    pub fn declare(&self, ty: TypeName<'ast>, names: &[&str]) -> Stmt<'ast> {
        Stmt::VarDecl(self.arena.alloc(self.var_decl(ty, names)))
    }

    pub fn assign_new(&self, ty: TypeName<'ast>, names: &[&str], value: Expr<'ast>) -> Stmt<'ast> {
        Stmt::AssignNew(self.arena.alloc(AssignNew {
            id: self.id(),
            ty,
            names: self.idents(names),
            value: self.arena.alloc(value),
            span: self.span(),
        }))
    }

    pub fn assign(&self, target: &'ast CallChain<'ast>, value: Expr<'ast>) -> Stmt<'ast> {
        Stmt::Assign(self.arena.alloc(Assign {
            id: self.id(),
            target,
            value: self.arena.alloc(value),
            span: self.span(),
        }))
    }

    /// `name = value`
    pub fn assign_var(&self, name: &str, value: Expr<'ast>) -> Stmt<'ast> {
        let link = self.link(name);
        let target = self.chain(&[link]);
        self.assign(target, value)
    }

    pub fn call_stmt(&self, chain: &'ast CallChain<'ast>) -> Stmt<'ast> {
        Stmt::Call(chain)
    }

    pub fn cond_block(&self, condition: Expr<'ast>, body: &[Stmt<'ast>]) -> CondBlock<'ast> {
        CondBlock {
            id: self.id(),
            condition: self.arena.alloc(condition),
            body: self.arena.alloc_slice_copy(body),
            span: self.span(),
        }
    }

    pub fn if_stmt(
        &self,
        branches: &[CondBlock<'ast>],
        else_body: Option<&[Stmt<'ast>]>,
    ) -> Stmt<'ast> {
        let else_block = else_body.map(|body| ElseBlock {
            id: self.id(),
            body: self.arena.alloc_slice_copy(body),
            span: self.span(),
        });
        Stmt::If(self.arena.alloc(IfStmt {
            branches: self.arena.alloc_slice_copy(branches),
            else_block,
            span: self.span(),
        }))
    }

    pub fn loop_stmt(&self, condition: Expr<'ast>, body: &[Stmt<'ast>]) -> Stmt<'ast> {
        Stmt::Loop(self.arena.alloc(self.cond_block(condition, body)))
    }

    // ==========================================================================
    // Definitions
    // ==========================================================================

    /// A routine closed by its own name.
    pub fn routine(
        &self,
        name: &str,
        params: &[(TypeName<'ast>, &str)],
        returns: Option<TypeName<'ast>>,
        body: &[Stmt<'ast>],
        ret: Option<Expr<'ast>>,
    ) -> &'ast RoutineDef<'ast> {
        let params = self
            .arena
            .alloc_slice_fill_iter(params.iter().map(|(ty, name)| Param {
                ty: *ty,
                name: self.ident(name),
            }));
        let ret = ret.map(|value| ReturnClause {
            value: self.arena.alloc(value),
            span: self.span(),
        });
        self.arena.alloc(RoutineDef {
            id: self.id(),
            name: self.ident(name),
            end_name: self.ident(name),
            params,
            returns,
            body: self.arena.alloc_slice_copy(body),
            ret,
            span: self.span(),
        })
    }

    /// Copy of `def` closed by `end_name` instead of its own name.
    pub fn closed_by(&self, def: &RoutineDef<'ast>, end_name: &str) -> &'ast RoutineDef<'ast> {
        self.arena.alloc(RoutineDef {
            id: self.id(),
            end_name: self.ident(end_name),
            ..*def
        })
    }

    pub fn routine_stmt(&self, def: &'ast RoutineDef<'ast>) -> Stmt<'ast> {
        Stmt::Routine(def)
    }

    pub fn static_field(
        &self,
        ty: TypeName<'ast>,
        names: &[&str],
        init: Expr<'ast>,
    ) -> StaticField<'ast> {
        StaticField {
            decl: self.var_decl(ty, names),
            init: self.arena.alloc(init),
        }
    }

    pub fn type_def(
        &self,
        name: &str,
        fields: &[VarDecl<'ast>],
        static_fields: &[StaticField<'ast>],
        routines: &[&RoutineDef<'ast>],
        static_routines: &[&RoutineDef<'ast>],
    ) -> &'ast TypeDef<'ast> {
        self.arena.alloc(TypeDef {
            id: self.id(),
            name: self.ident(name),
            end_name: self.ident(name),
            fields: self.arena.alloc_slice_copy(fields),
            static_fields: self.arena.alloc_slice_copy(static_fields),
            routines: self
                .arena
                .alloc_slice_fill_iter(routines.iter().map(|r| **r)),
            static_routines: self
                .arena
                .alloc_slice_fill_iter(static_routines.iter().map(|r| **r)),
            span: self.span(),
        })
    }

    /// Copy of `def` closed by `end_name` instead of its own name.
    pub fn type_closed_by(&self, def: &TypeDef<'ast>, end_name: &str) -> &'ast TypeDef<'ast> {
        self.arena.alloc(TypeDef {
            id: self.id(),
            end_name: self.ident(end_name),
            ..*def
        })
    }

    pub fn type_stmt(&self, def: &'ast TypeDef<'ast>) -> Stmt<'ast> {
        Stmt::Type(def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let left = b.int(1);
        let right = b.int(2);
        let sum = b.binary(left, BinaryOp::Add, right);

        assert_ne!(left.id(), right.id());
        assert_ne!(sum.id(), left.id());
        assert_eq!(b.node_count(), 3);
    }

    #[test]
    fn spans_follow_current_line() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let first = b.var("x");
        let second = b.at_line(7).var("y");

        assert_eq!(first.span().line, 1);
        assert_eq!(second.span().line, 7);
    }

    #[test]
    fn call_chain_links() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let a = b.link("a");
        let sub = b.link_call("substring", &[b.int(0), b.int(2)]);
        let Expr::Call(chain) = b.chain_expr(&[a, sub]) else {
            panic!("expected call chain");
        };

        assert_eq!(chain.links.len(), 2);
        assert!(chain.links[0].args.is_none());
        assert_eq!(chain.links[1].args.map(|a| a.len()), Some(2));
        assert_eq!(chain.last().map(|l| l.name.name), Some("substring"));
    }

    #[test]
    fn closed_by_keeps_body() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let foo = b.routine("foo", &[], None, &[b.declare(b.named("integer"), &["x"])], None);
        let bad = b.closed_by(foo, "bar");

        assert_eq!(bad.name.name, "foo");
        assert_eq!(bad.end_name.name, "bar");
        assert_eq!(bad.body.len(), 1);
        assert_ne!(bad.id, foo.id);
    }
}
