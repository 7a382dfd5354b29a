//! Flat node and comment sequences for a parsed file.

use forceloader_core::syntax::{Comment, SourceLayout, SyntaxKind, SyntaxNode};
use tree_sitter::Node;

use crate::span_of;

/// Collects every named node below `root` in pre-order, and every comment.
pub(crate) fn collect(root: Node<'_>, src: &[u8]) -> SourceLayout {
    let mut layout = SourceLayout::default();
    let mut cursor = root.walk();

    // Skip the root itself: it starts on line 1 and would make a leading
    // comment look like trailing code.
    if !cursor.goto_first_child() {
        return layout;
    }

    loop {
        let node = cursor.node();
        if node.kind() == "comment" {
            layout.comments.push(Comment {
                text: node.utf8_text(src).unwrap_or_default().to_string(),
                span: span_of(&node),
            });
        } else if node.is_named() {
            layout.nodes.push(SyntaxNode {
                kind: kind_of(&node),
                span: span_of(&node),
            });
        }

        if cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() || cursor.node() == root {
                return layout;
            }
        }
    }
}

fn kind_of(node: &Node<'_>) -> SyntaxKind {
    match node.kind() {
        "selector_expression" => SyntaxKind::Selector,
        "call_expression" => SyntaxKind::Call,
        _ => SyntaxKind::Other,
    }
}
