//! Comment placement relative to code.

use crate::syntax::{Comment, SyntaxNode};

/// A comment and whether it is the only thing on its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedComment<'a> {
    /// The comment.
    pub comment: &'a Comment,
    /// True when no node starts on the comment's line.
    pub standalone: bool,
}

impl PlacedComment<'_> {
    /// Line the comment starts on.
    #[must_use]
    pub fn line(&self) -> usize {
        self.comment.span.start.line
    }

    /// Column the comment starts at.
    #[must_use]
    pub fn column(&self) -> usize {
        self.comment.span.start.column
    }
}

/// Classifies every comment in a single merge pass over nodes and comments.
///
/// Both slices must be ordered by start offset.
#[must_use]
pub fn place_comments<'a>(nodes: &[SyntaxNode], comments: &'a [Comment]) -> Vec<PlacedComment<'a>> {
    let mut placed = Vec::with_capacity(comments.len());
    let mut next = 0;

    for comment in comments {
        let line = comment.span.start.line;
        while next < nodes.len() && nodes[next].span.start.line < line {
            next += 1;
        }
        let standalone = nodes
            .get(next)
            .map_or(true, |n| n.span.start.line != line);
        placed.push(PlacedComment {
            comment,
            standalone,
        });
    }

    placed
}
