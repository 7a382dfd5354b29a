//! Syntax model shared by frontends and the detection engine.
//!
//! Method bodies are lowered into the [`Stmt`] and [`Expr`] tagged unions.
//! Only the shapes the engine inspects get their own variant; everything
//! else collapses into `Other` and is skipped.

use serde::{Deserialize, Serialize};

/// A point in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in bytes).
    pub column: usize,
    /// Byte offset from the start of the file.
    pub offset: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// A half-open byte range with line/column endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start of the range.
    pub start: Position,
    /// End of the range (exclusive).
    pub end: Position,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    /// Returns true if the span covers no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `other` lies entirely within this span.
    #[must_use]
    pub fn covers(&self, other: &Span) -> bool {
        self.start.offset <= other.start.offset && other.end.offset <= self.end.offset
    }
}

/// A sequence of statements, as found in a function body or nested block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    /// Statements in declaration order.
    pub stmts: Vec<Stmt>,
    /// Span of the block including braces.
    pub span: Span,
}

/// Statement shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `if [init;] cond { ... } [else ...]`
    If(IfStmt),
    /// `a, b = x, y`, `a := x` and `var a = x`.
    Assign(AssignStmt),
    /// A bare expression used as a statement.
    Expr(ExprStmt),
    /// `return x, y`
    Return(ReturnStmt),
    /// A nested `{ ... }` block.
    Block(Block),
    /// `for ... { ... }`
    For(ForStmt),
    /// `switch`/`select` with clause bodies.
    Switch(SwitchStmt),
    /// Anything the engine does not look into.
    Other(Span),
}

impl Stmt {
    /// Span of the statement.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::If(s) => s.span,
            Self::Assign(s) => s.span,
            Self::Expr(s) => s.span,
            Self::Return(s) => s.span,
            Self::Block(b) => b.span,
            Self::For(s) => s.span,
            Self::Switch(s) => s.span,
            Self::Other(span) => *span,
        }
    }
}

/// `if` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    /// Optional initializer (`if v, err := f(); ...`).
    pub init: Option<Box<Stmt>>,
    /// Condition expression.
    pub cond: Option<Expr>,
    /// Consequence block.
    pub then: Block,
    /// `else` branch: either a block or another `if`.
    pub otherwise: Option<Box<Stmt>>,
    /// Span of the whole statement.
    pub span: Span,
}

/// Assignment or declaration with initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    /// Right-hand side expressions.
    pub rhs: Vec<Expr>,
    /// Span of the whole statement.
    pub span: Span,
}

/// Expression statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    /// The wrapped expression.
    pub expr: Expr,
    /// Span of the statement.
    pub span: Span,
}

/// `return` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    /// Returned expressions.
    pub results: Vec<Expr>,
    /// Span of the statement.
    pub span: Span,
}

/// `for` loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    /// Loop body.
    pub body: Block,
    /// Span of the statement.
    pub span: Span,
}

/// `switch` or `select` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    /// One block per `case`/`default` clause.
    pub clauses: Vec<Block>,
    /// Span of the statement.
    pub span: Span,
}

/// Expression shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `callee(args...)`
    Call(CallExpr),
    /// `operand.field`
    Selector(SelectorExpr),
    /// A bare identifier.
    Ident(Ident),
    /// `(expr)`
    Paren(ParenExpr),
    /// `func(...) { ... }`
    FuncLit(FuncLit),
    /// `left op right`
    Binary(BinaryExpr),
    /// Any other expression with sub-expressions (composite literals,
    /// unary operators, index expressions, ...).
    Compound(CompoundExpr),
    /// Anything else.
    Other(Span),
}

impl Expr {
    /// Span of the expression.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Call(e) => e.span,
            Self::Selector(e) => e.span,
            Self::Ident(e) => e.span,
            Self::Paren(e) => e.span,
            Self::FuncLit(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Compound(e) => e.span,
            Self::Other(span) => *span,
        }
    }

    /// Strips any number of enclosing parentheses.
    #[must_use]
    pub fn unparen(&self) -> &Expr {
        let mut expr = self;
        while let Self::Paren(p) = expr {
            expr = &p.inner;
        }
        expr
    }
}

/// Call expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    /// The called expression.
    pub callee: Box<Expr>,
    /// Argument expressions.
    pub args: Vec<Expr>,
    /// Byte offset of the opening parenthesis of the argument list.
    pub args_offset: usize,
    /// Span of the whole call.
    pub span: Span,
}

/// Member access.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorExpr {
    /// Left-hand side.
    pub operand: Box<Expr>,
    /// Selected member.
    pub field: Ident,
    /// Span of the whole expression.
    pub span: Span,
}

/// Identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    /// Identifier text.
    pub name: String,
    /// Span of the identifier.
    pub span: Span,
}

/// Parenthesized expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ParenExpr {
    /// Wrapped expression.
    pub inner: Box<Expr>,
    /// Span including parentheses.
    pub span: Span,
}

/// Function literal.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncLit {
    /// Literal body.
    pub body: Block,
    /// Span of the literal.
    pub span: Span,
}

/// Binary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    /// Left operand.
    pub left: Box<Expr>,
    /// Operator text.
    pub op: String,
    /// Right operand.
    pub right: Box<Expr>,
    /// Span of the expression.
    pub span: Span,
}

/// An expression the engine only looks through.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundExpr {
    /// Sub-expressions in source order.
    pub parts: Vec<Expr>,
    /// Span of the expression.
    pub span: Span,
}

/// Coarse node kind for the flat node sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyntaxKind {
    /// Member access (`a.b`).
    Selector,
    /// Call expression.
    Call,
    /// Any other node.
    Other,
}

/// One entry of a file's pre-order node sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxNode {
    /// Coarse kind.
    pub kind: SyntaxKind,
    /// Source range.
    pub span: Span,
}

/// A comment token; comments are not attached to syntax nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Raw text including the comment marker.
    pub text: String,
    /// Source range.
    pub span: Span,
}

/// Position-ordered nodes and comments of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLayout {
    /// Every non-comment node in pre-order; start offsets are non-decreasing.
    pub nodes: Vec<SyntaxNode>,
    /// Comments in source order.
    pub comments: Vec<Comment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize) -> Span {
        Span::new(Position::new(1, start + 1, start), Position::new(1, end + 1, end))
    }

    #[test]
    fn span_covers_nested_range() {
        assert!(span(0, 10).covers(&span(2, 5)));
        assert!(span(0, 10).covers(&span(0, 10)));
        assert!(!span(2, 5).covers(&span(0, 10)));
    }

    #[test]
    fn unparen_strips_all_levels() {
        let ident = Expr::Ident(Ident {
            name: "r".into(),
            span: span(2, 3),
        });
        let wrapped = Expr::Paren(ParenExpr {
            inner: Box::new(Expr::Paren(ParenExpr {
                inner: Box::new(ident.clone()),
                span: span(1, 4),
            })),
            span: span(0, 5),
        });
        assert_eq!(wrapped.unparen(), &ident);
    }
}
