//! Lowering of Go function bodies into the engine's statement/expression model.

use forceloader_core::syntax::{
    AssignStmt, BinaryExpr, Block, CallExpr, CompoundExpr, Expr, ExprStmt, ForStmt, FuncLit, Ident, IfStmt,
    ParenExpr, ReturnStmt, SelectorExpr, Stmt, SwitchStmt,
};
use tree_sitter::Node;

use crate::span_of;

const CASE_KINDS: &[&str] = &[
    "expression_case",
    "type_case",
    "communication_case",
    "default_case",
];

/// Lowers nodes of one source file.
pub(crate) struct Lowerer<'s> {
    src: &'s [u8],
}

impl<'s> Lowerer<'s> {
    pub(crate) fn new(src: &'s [u8]) -> Self {
        Self { src }
    }

    fn text(&self, node: &Node<'_>) -> &'s str {
        node.utf8_text(self.src).unwrap_or_default()
    }

    /// Lowers a `block` node; a missing block lowers to an empty one.
    pub(crate) fn block(&self, node: Option<Node<'_>>) -> Block {
        match node {
            Some(node) => Block {
                stmts: self.statements(node),
                span: span_of(&node),
            },
            None => Block::default(),
        }
    }

    /// Statements directly inside `node`, skipping field-tagged children
    /// (case values, communication clauses) and flattening `statement_list`.
    fn statements(&self, node: Node<'_>) -> Vec<Stmt> {
        let mut out = Vec::new();
        let mut cursor = node.walk();
        if !cursor.goto_first_child() {
            return out;
        }
        loop {
            let child = cursor.node();
            if child.is_named() && cursor.field_name().is_none() {
                match child.kind() {
                    "comment" | "empty_statement" => {}
                    "statement_list" => out.extend(self.statements(child)),
                    _ => out.push(self.stmt(child)),
                }
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        out
    }

    pub(crate) fn stmt(&self, node: Node<'_>) -> Stmt {
        let span = span_of(&node);
        match node.kind() {
            "expression_statement" => match node.named_child(0) {
                Some(expr) => Stmt::Expr(ExprStmt {
                    expr: self.expr(expr),
                    span,
                }),
                None => Stmt::Other(span),
            },
            "short_var_declaration" | "assignment_statement" => Stmt::Assign(AssignStmt {
                rhs: self.expr_list(node.child_by_field_name("right")),
                span,
            }),
            "var_declaration" => {
                let mut rhs = Vec::new();
                self.var_values(node, &mut rhs);
                Stmt::Assign(AssignStmt { rhs, span })
            }
            "return_statement" => Stmt::Return(ReturnStmt {
                results: self.expr_list(node.named_child(0)),
                span,
            }),
            "if_statement" => Stmt::If(IfStmt {
                init: node
                    .child_by_field_name("initializer")
                    .map(|n| Box::new(self.stmt(n))),
                cond: node.child_by_field_name("condition").map(|n| self.expr(n)),
                then: self.block(node.child_by_field_name("consequence")),
                otherwise: node
                    .child_by_field_name("alternative")
                    .map(|n| Box::new(self.stmt(n))),
                span,
            }),
            "block" => Stmt::Block(self.block(Some(node))),
            "for_statement" => Stmt::For(ForStmt {
                body: self.block(node.child_by_field_name("body")),
                span,
            }),
            "expression_switch_statement" | "type_switch_statement" | "select_statement" => {
                let mut cursor = node.walk();
                let clauses = node
                    .named_children(&mut cursor)
                    .filter(|c| CASE_KINDS.contains(&c.kind()))
                    .map(|c| Block {
                        stmts: self.statements(c),
                        span: span_of(&c),
                    })
                    .collect();
                Stmt::Switch(SwitchStmt { clauses, span })
            }
            _ => Stmt::Other(span),
        }
    }

    /// Collects the initializer values of every `var_spec` below a declaration.
    fn var_values(&self, node: Node<'_>, out: &mut Vec<Expr>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "var_spec" => out.extend(self.expr_list(child.child_by_field_name("value"))),
                "var_spec_list" => self.var_values(child, out),
                _ => {}
            }
        }
    }

    fn expr_list(&self, node: Option<Node<'_>>) -> Vec<Expr> {
        let Some(node) = node else {
            return Vec::new();
        };
        if node.kind() != "expression_list" {
            return vec![self.expr(node)];
        }
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|c| c.kind() != "comment")
            .map(|c| self.expr(c))
            .collect()
    }

    fn expr_field(&self, node: &Node<'_>, field: &str) -> Expr {
        match node.child_by_field_name(field) {
            Some(child) => self.expr(child),
            None => Expr::Other(span_of(node)),
        }
    }

    pub(crate) fn expr(&self, node: Node<'_>) -> Expr {
        let span = span_of(&node);
        match node.kind() {
            "call_expression" => {
                let arguments = node.child_by_field_name("arguments");
                let args = arguments.map_or_else(Vec::new, |list| {
                    let mut cursor = list.walk();
                    list.named_children(&mut cursor)
                        .filter(|c| c.kind() != "comment")
                        .map(|c| self.expr(c))
                        .collect()
                });
                Expr::Call(CallExpr {
                    callee: Box::new(self.expr_field(&node, "function")),
                    args,
                    args_offset: arguments.map_or(span.end.offset, |a| a.start_byte()),
                    span,
                })
            }
            "selector_expression" => {
                let field = node.child_by_field_name("field");
                Expr::Selector(SelectorExpr {
                    operand: Box::new(self.expr_field(&node, "operand")),
                    field: Ident {
                        name: field.map(|f| self.text(&f)).unwrap_or_default().to_string(),
                        span: field.map_or(span, |f| span_of(&f)),
                    },
                    span,
                })
            }
            "identifier" | "field_identifier" | "package_identifier" => Expr::Ident(Ident {
                name: self.text(&node).to_string(),
                span,
            }),
            "parenthesized_expression" => match node.named_child(0) {
                Some(inner) => Expr::Paren(ParenExpr {
                    inner: Box::new(self.expr(inner)),
                    span,
                }),
                None => Expr::Other(span),
            },
            "func_literal" => Expr::FuncLit(FuncLit {
                body: self.block(node.child_by_field_name("body")),
                span,
            }),
            "binary_expression" => Expr::Binary(BinaryExpr {
                left: Box::new(self.expr_field(&node, "left")),
                op: node
                    .child_by_field_name("operator")
                    .map(|op| self.text(&op))
                    .unwrap_or_default()
                    .to_string(),
                right: Box::new(self.expr_field(&node, "right")),
                span,
            }),
            _ => {
                let mut cursor = node.walk();
                let parts: Vec<Expr> = node
                    .named_children(&mut cursor)
                    .filter(|c| c.kind() != "comment")
                    .map(|c| self.expr(c))
                    .filter(|e| !matches!(e, Expr::Other(_)))
                    .collect();
                if parts.is_empty() {
                    Expr::Other(span)
                } else {
                    Expr::Compound(CompoundExpr { parts, span })
                }
            }
        }
    }
}
