//! # forceloader-go
//!
//! Tree-sitter based Go frontend for forceloader.
//!
//! [`GoFrontend`] turns each `.go` file into a
//! [`forceloader_core::CompilationUnit`]: imports, struct declarations,
//! method bodies lowered into the engine's statement model, and the
//! flat node/comment layout used for `nolint` handling and diagnostics.
//! Package import paths come from the nearest `go.mod`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod decls;
mod frontend;
mod layout;
mod lower;
pub mod module;

pub use frontend::GoFrontend;

use forceloader_core::syntax::{Position, Span};
use tree_sitter::Node;

pub(crate) fn span_of(node: &Node<'_>) -> Span {
    let start = node.start_position();
    let end = node.end_position();
    Span::new(
        Position::new(start.row + 1, start.column + 1, node.start_byte()),
        Position::new(end.row + 1, end.column + 1, node.end_byte()),
    )
}

#[cfg(test)]
pub(crate) fn parse_tree(source: &str) -> Option<tree_sitter::Tree> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .ok()?;
    parser.parse(source, None)
}
