//! Recovers the source text of a call's callee from the file layout.
//!
//! Given the byte offset of a call's argument list, [`resolve_origin`]
//! brackets it between two consecutive nodes of the pre-order sequence,
//! then walks back through the ancestors of the earlier node looking for
//! member-access nodes that end right before the argument list. The
//! outermost one wins. Callers render its span with
//! [`CompilationUnit::render`](crate::CompilationUnit::render), so a chain
//! split across lines still reads `r.UseCase.Do`.

use crate::syntax::{Span, SyntaxKind, SyntaxNode};

/// Returns the span of the member-access chain ending at `target`, if any.
#[must_use]
pub fn resolve_origin(nodes: &[SyntaxNode], source: &str, target: usize) -> Option<Span> {
    let last = nodes
        .partition_point(|n| n.span.start.offset < target)
        .checked_sub(1)?;
    let anchor = nodes[last].span;

    let mut best = None;
    for node in nodes[..=last].iter().rev() {
        if !node.span.covers(&anchor) {
            continue;
        }
        if node.span.end.offset > target {
            break;
        }
        if node.kind == SyntaxKind::Selector && ends_before(source, node.span.end.offset, target) {
            best = Some(node);
        }
    }

    best.map(|node| node.span)
}

fn ends_before(source: &str, end: usize, target: usize) -> bool {
    source
        .get(end..target)
        .is_some_and(|gap| gap.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Position;

    fn origin<'s>(nodes: &[SyntaxNode], source: &'s str, target: usize) -> Option<&'s str> {
        resolve_origin(nodes, source, target).map(|span| &source[span.start.offset..span.end.offset])
    }

    /// Builds a node covering the `nth` occurrence of `needle`.
    fn node(source: &str, kind: SyntaxKind, needle: &str, nth: usize) -> SyntaxNode {
        let start = source
            .match_indices(needle)
            .nth(nth)
            .map(|(i, _)| i)
            .expect("needle in source");
        node_at(source, kind, start, start + needle.len())
    }

    fn node_at(source: &str, kind: SyntaxKind, start: usize, end: usize) -> SyntaxNode {
        let at = |offset: usize| {
            let before = &source[..offset];
            let line = before.matches('\n').count() + 1;
            let column = offset - before.rfind('\n').map_or(0, |i| i + 1) + 1;
            Position::new(line, column, offset)
        };
        SyntaxNode {
            kind,
            span: Span::new(at(start), at(end)),
        }
    }

    #[test]
    fn resolves_chain_split_across_lines() {
        let source = "\tv := r.UseCase.\n\t\tDo(ctx)\n";
        let chain_start = source.find("r.UseCase").unwrap();
        let do_end = source.find("Do").unwrap() + 2;
        let open = source.find('(').unwrap();
        let close = source.find(')').unwrap() + 1;

        let nodes = vec![
            node_at(source, SyntaxKind::Other, 1, close),
            node(source, SyntaxKind::Other, "v", 0),
            node_at(source, SyntaxKind::Call, chain_start, close),
            node_at(source, SyntaxKind::Selector, chain_start, do_end),
            node(source, SyntaxKind::Selector, "r.UseCase", 0),
            node(source, SyntaxKind::Other, "r", 0),
            node(source, SyntaxKind::Other, "UseCase", 0),
            node(source, SyntaxKind::Other, "Do", 0),
            node_at(source, SyntaxKind::Other, open, close),
            node(source, SyntaxKind::Other, "ctx", 0),
        ];

        assert_eq!(
            origin(&nodes, source, open),
            Some("r.UseCase.\n\t\tDo")
        );
    }

    #[test]
    fn picks_the_right_call_on_a_busy_line() {
        let source = "a.B(x.Y())";
        let nodes = vec![
            node_at(source, SyntaxKind::Call, 0, 10),
            node(source, SyntaxKind::Selector, "a.B", 0),
            node(source, SyntaxKind::Other, "a", 0),
            node(source, SyntaxKind::Other, "B", 0),
            node_at(source, SyntaxKind::Other, 3, 10),
            node_at(source, SyntaxKind::Call, 4, 9),
            node(source, SyntaxKind::Selector, "x.Y", 0),
            node(source, SyntaxKind::Other, "x", 0),
            node(source, SyntaxKind::Other, "Y", 0),
            node_at(source, SyntaxKind::Other, 7, 9),
        ];

        assert_eq!(origin(&nodes, source, 3), Some("a.B"));
        assert_eq!(origin(&nodes, source, 7), Some("x.Y"));
    }

    #[test]
    fn returns_none_for_non_selector_callee() {
        let source = "handler()(ctx)";
        let nodes = vec![
            node_at(source, SyntaxKind::Call, 0, 14),
            node_at(source, SyntaxKind::Call, 0, 9),
            node(source, SyntaxKind::Other, "handler", 0),
            node(source, SyntaxKind::Other, "()", 0),
            node_at(source, SyntaxKind::Other, 9, 14),
            node(source, SyntaxKind::Other, "ctx", 0),
        ];
        assert_eq!(resolve_origin(&nodes, source, 9), None);
        assert_eq!(resolve_origin(&nodes, source, 7), None);
    }

    #[test]
    fn returns_none_before_first_node() {
        assert_eq!(resolve_origin(&[], "", 0), None);
        let source = "  a.B()";
        let nodes = vec![node(source, SyntaxKind::Selector, "a.B", 0)];
        assert_eq!(resolve_origin(&nodes, source, 1), None);
    }
}
