//! Call-site extraction from method bodies.
//!
//! [`CallSites`] walks a method body depth-first in declaration order and
//! yields every member-access call (`x.Method(...)`) found in these
//! statement shapes:
//!
//! - `if init; cond { ... }`: the initializer and the condition
//! - assignments, declarations with initializers and `return` statements:
//!   the right-hand side / result expressions
//! - expression statements
//! - nested blocks, loop bodies and switch clauses, as nested scopes
//!
//! Inside an expression the walk looks through selector operands, call
//! arguments, callees, operators and literals, so `r.UseCase.Get(id).Title`
//! and `wrap(r.UseCase.Get(id))` both yield the `Get` call. Function
//! literals, invoked or not, are walked as nested scopes.
//!
//! Each site carries the position of the outermost statement it was found
//! in; statements inside nested scopes keep their own position. `go` and
//! `defer` statements and loop headers are skipped.

use crate::program::MethodDecl;
use crate::syntax::{CallExpr, Expr, Position, Span, Stmt};

/// A candidate call inside a method body.
#[derive(Debug, Clone, Copy)]
pub struct CallSite<'a> {
    /// The call expression.
    pub call: &'a CallExpr,
    /// Start of the outermost statement containing the call.
    pub position: Position,
    /// The method the call appears in.
    pub method: &'a MethodDecl,
}

impl<'a> CallSite<'a> {
    /// Span of the call expression.
    #[must_use]
    pub fn span(&self) -> Span {
        self.call.span
    }

    /// Identifier chain of the callee, e.g. `["r", "UseCase", "Do"]`.
    ///
    /// Returns `None` unless the callee is a pure identifier/selector chain.
    #[must_use]
    pub fn target_chain(&self) -> Option<Vec<&'a str>> {
        let mut parts = Vec::new();
        let mut expr = self.call.callee.unparen();
        loop {
            match expr {
                Expr::Selector(sel) => {
                    parts.push(sel.field.name.as_str());
                    expr = sel.operand.unparen();
                }
                Expr::Ident(id) => {
                    parts.push(id.name.as_str());
                    break;
                }
                _ => return None,
            }
        }
        parts.reverse();
        Some(parts)
    }
}

enum Pending<'a> {
    Stmts(std::slice::Iter<'a, Stmt>),
    Stmt(&'a Stmt, Option<Position>),
    Expr(&'a Expr, Position),
}

/// Lazy, single-pass iterator over the call sites of one method.
pub struct CallSites<'a> {
    method: &'a MethodDecl,
    stack: Vec<Pending<'a>>,
}

impl<'a> CallSites<'a> {
    /// Starts extraction at the top of the method body.
    #[must_use]
    pub fn new(method: &'a MethodDecl) -> Self {
        Self {
            method,
            stack: vec![Pending::Stmts(method.body.stmts.iter())],
        }
    }

    fn expand_stmt(&mut self, stmt: &'a Stmt, inherited: Option<Position>) {
        let at = inherited.unwrap_or_else(|| stmt.span().start);

        // Pushed in reverse so that pops follow declaration order.
        match stmt {
            Stmt::If(s) => {
                if let Some(otherwise) = &s.otherwise {
                    self.stack.push(Pending::Stmt(otherwise, None));
                }
                self.stack.push(Pending::Stmts(s.then.stmts.iter()));
                if let Some(cond) = &s.cond {
                    self.stack.push(Pending::Expr(cond, at));
                }
                if let Some(init) = &s.init {
                    self.stack.push(Pending::Stmt(init, Some(at)));
                }
            }
            Stmt::Assign(s) => {
                for expr in s.rhs.iter().rev() {
                    self.stack.push(Pending::Expr(expr, at));
                }
            }
            Stmt::Return(s) => {
                for expr in s.results.iter().rev() {
                    self.stack.push(Pending::Expr(expr, at));
                }
            }
            Stmt::Expr(s) => self.stack.push(Pending::Expr(&s.expr, at)),
            Stmt::Block(b) => self.stack.push(Pending::Stmts(b.stmts.iter())),
            Stmt::For(s) => self.stack.push(Pending::Stmts(s.body.stmts.iter())),
            Stmt::Switch(s) => {
                for clause in s.clauses.iter().rev() {
                    self.stack.push(Pending::Stmts(clause.stmts.iter()));
                }
            }
            Stmt::Other(_) => {}
        }
    }

    fn expand_expr(&mut self, expr: &'a Expr, at: Position) -> Option<CallSite<'a>> {
        match expr {
            Expr::Call(call) => {
                for arg in call.args.iter().rev() {
                    self.stack.push(Pending::Expr(arg, at));
                }
                if let Expr::Selector(sel) = call.callee.unparen() {
                    self.stack.push(Pending::Expr(&sel.operand, at));
                    return Some(CallSite {
                        call,
                        position: at,
                        method: self.method,
                    });
                }
                self.stack.push(Pending::Expr(&call.callee, at));
            }
            Expr::Selector(sel) => self.stack.push(Pending::Expr(&sel.operand, at)),
            Expr::Paren(p) => self.stack.push(Pending::Expr(&p.inner, at)),
            Expr::Binary(b) => {
                self.stack.push(Pending::Expr(&b.right, at));
                self.stack.push(Pending::Expr(&b.left, at));
            }
            Expr::Compound(c) => {
                for part in c.parts.iter().rev() {
                    self.stack.push(Pending::Expr(part, at));
                }
            }
            Expr::FuncLit(lit) => self.stack.push(Pending::Stmts(lit.body.stmts.iter())),
            Expr::Ident(_) | Expr::Other(_) => {}
        }
        None
    }
}

impl<'a> Iterator for CallSites<'a> {
    type Item = CallSite<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(work) = self.stack.pop() {
            match work {
                Pending::Stmts(mut iter) => {
                    if let Some(stmt) = iter.next() {
                        self.stack.push(Pending::Stmts(iter));
                        self.stack.push(Pending::Stmt(stmt, None));
                    }
                }
                Pending::Stmt(stmt, inherited) => self.expand_stmt(stmt, inherited),
                Pending::Expr(expr, at) => {
                    if let Some(site) = self.expand_expr(expr, at) {
                        return Some(site);
                    }
                }
            }
        }
        None
    }
}
