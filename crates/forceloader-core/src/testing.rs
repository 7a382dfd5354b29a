//! Builders for hand-written syntax trees in unit tests.
//!
//! Offsets are synthetic (`line * 1000 + column`), which keeps them ordered
//! and unique without needing real source text.

use crate::program::{MethodDecl, Receiver, TypeRef};
use crate::syntax::{
    AssignStmt, BinaryExpr, Block, CallExpr, Expr, ExprStmt, FuncLit, Ident, IfStmt, ParenExpr,
    Position, ReturnStmt, SelectorExpr, Span, Stmt,
};

pub(crate) fn pos(line: usize, column: usize) -> Position {
    Position::new(line, column, line * 1000 + column)
}

pub(crate) fn span(line: usize, column: usize, len: usize) -> Span {
    Span::new(pos(line, column), pos(line, column + len))
}

fn extend(start: Span, end: Span) -> Span {
    Span::new(start.start, end.end)
}

pub(crate) fn ident(name: &str, line: usize, column: usize) -> Expr {
    Expr::Ident(Ident {
        name: name.into(),
        span: span(line, column, name.len()),
    })
}

/// `a.b.c` starting at `line:column`.
pub(crate) fn chain(path: &str, line: usize, column: usize) -> Expr {
    let mut parts = path.split('.');
    let first = parts.next().unwrap_or_default();
    let mut expr = ident(first, line, column);
    for part in parts {
        let operand_span = expr.span();
        let field_col = operand_span.end.column + 1;
        let field = Ident {
            name: part.into(),
            span: span(line, field_col, part.len()),
        };
        expr = Expr::Selector(SelectorExpr {
            span: extend(operand_span, field.span),
            operand: Box::new(expr),
            field,
        });
    }
    expr
}

/// `callee()` with the argument list right after the callee.
pub(crate) fn call(callee: Expr) -> Expr {
    let callee_span = callee.span();
    let open = callee_span.end;
    let close = Position::new(open.line, open.column + 2, open.offset + 2);
    Expr::Call(CallExpr {
        callee: Box::new(callee),
        args: Vec::new(),
        args_offset: open.offset,
        span: Span::new(callee_span.start, close),
    })
}

pub(crate) fn paren(inner: Expr) -> Expr {
    let s = inner.span();
    Expr::Paren(ParenExpr {
        inner: Box::new(inner),
        span: Span::new(
            Position::new(s.start.line, s.start.column - 1, s.start.offset - 1),
            Position::new(s.end.line, s.end.column + 1, s.end.offset + 1),
        ),
    })
}

pub(crate) fn func_lit(stmts: Vec<Stmt>, line: usize, column: usize) -> Expr {
    let end_line = stmts.last().map_or(line, |s| s.span().end.line + 1);
    let body = Block {
        stmts,
        span: Span::new(pos(line, column + 7), pos(end_line, 2)),
    };
    Expr::FuncLit(FuncLit {
        span: Span::new(pos(line, column), body.span.end),
        body,
    })
}

pub(crate) fn binary(left: Expr, op: &str, right: Expr) -> Expr {
    Expr::Binary(BinaryExpr {
        span: extend(left.span(), right.span()),
        left: Box::new(left),
        op: op.into(),
        right: Box::new(right),
    })
}

pub(crate) fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expr(ExprStmt {
        span: expr.span(),
        expr,
    })
}

/// `lhs := rhs...` with the statement starting at `line:column`.
pub(crate) fn assign(rhs: Vec<Expr>, line: usize, column: usize) -> Stmt {
    let end = rhs.last().map_or(pos(line, column + 1), |e| e.span().end);
    Stmt::Assign(AssignStmt {
        rhs,
        span: Span::new(pos(line, column), end),
    })
}

pub(crate) fn ret(results: Vec<Expr>, line: usize, column: usize) -> Stmt {
    let end = results.last().map_or(pos(line, column + 6), |e| e.span().end);
    Stmt::Return(ReturnStmt {
        results,
        span: Span::new(pos(line, column), end),
    })
}

pub(crate) fn if_stmt(
    init: Option<Stmt>,
    cond: Option<Expr>,
    then: Vec<Stmt>,
    line: usize,
    column: usize,
) -> Stmt {
    let end_line = then.last().map_or(line, |s| s.span().end.line + 1);
    Stmt::If(IfStmt {
        init: init.map(Box::new),
        cond,
        then: Block {
            stmts: then,
            span: Span::new(pos(line, column + 30), pos(end_line, column + 1)),
        },
        otherwise: None,
        span: Span::new(pos(line, column), pos(end_line, column + 1)),
    })
}

pub(crate) fn block(stmts: Vec<Stmt>, line: usize, column: usize) -> Stmt {
    let end_line = stmts.last().map_or(line, |s| s.span().end.line + 1);
    Stmt::Block(Block {
        stmts,
        span: Span::new(pos(line, column), pos(end_line, column + 1)),
    })
}

/// `func (binding *ty) name() { stmts }`
pub(crate) fn method(binding: &str, ty: TypeRef, name: &str, stmts: Vec<Stmt>) -> MethodDecl {
    let end_line = stmts.last().map_or(1, |s| s.span().end.line + 1);
    MethodDecl {
        name: name.into(),
        receiver: Receiver {
            binding: Some(binding.into()),
            ty,
        },
        body: Block {
            stmts,
            span: Span::new(pos(1, 40), pos(end_line, 2)),
        },
        span: Span::new(pos(1, 1), pos(end_line, 2)),
    }
}
