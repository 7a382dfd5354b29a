//! `nolint` directive handling.
//!
//! A violation is suppressed by a `nolint` comment naming the analyzer:
//!
//! ```go
//! //nolint:forceloader
//! v, err := r.UseCase.Do(ctx)
//!
//! v, err := r.UseCase.Do(ctx) //nolint:forceloader,errcheck
//! ```
//!
//! The comment must sit on the flagged statement's line, or alone on the
//! line directly above it. [`SuppressionMode::SameColumn`] additionally
//! requires a preceding-line comment to start in the statement's column.

use crate::attach::{place_comments, PlacedComment};
use crate::config::SuppressionMode;
use crate::syntax::{Position, SourceLayout};

/// Returns the analyzer names listed by a `nolint` comment, or `None` if
/// the comment is not a directive.
///
/// The comment marker is stripped, the remainder is split on `:` and the
/// second part is read as a comma-separated list.
#[must_use]
pub fn directive_names(text: &str) -> Option<Vec<&str>> {
    if !text.contains("nolint") {
        return None;
    }
    let body = text
        .strip_prefix("//")
        .or_else(|| text.strip_prefix("/*").map(|t| t.strip_suffix("*/").unwrap_or(t)))
        .unwrap_or(text)
        .trim();

    let list = body.split(':').map(str::trim).nth(1)?;
    Some(list.split(',').map(str::trim).collect())
}

/// Returns true if `text` is a `nolint` directive naming `analyzer`.
#[must_use]
pub fn is_directive_for(text: &str, analyzer: &str) -> bool {
    directive_names(text).is_some_and(|names| names.contains(&analyzer))
}

/// Answers "is the statement at this position suppressed?" for one file.
#[derive(Debug)]
pub struct SuppressionMatcher<'a> {
    directives: Vec<PlacedComment<'a>>,
    mode: SuppressionMode,
}

impl<'a> SuppressionMatcher<'a> {
    /// Collects the directives for `analyzer` in `layout`.
    #[must_use]
    pub fn new(layout: &'a SourceLayout, mode: SuppressionMode, analyzer: &str) -> Self {
        let directives: Vec<_> = place_comments(&layout.nodes, &layout.comments)
            .into_iter()
            .filter(|c| is_directive_for(&c.comment.text, analyzer))
            .collect();
        tracing::trace!("Found {} suppression directive(s)", directives.len());
        Self { directives, mode }
    }

    /// Number of directives naming the analyzer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// Returns true if the file has no directive naming the analyzer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Returns true if a directive covers a statement starting at `at`.
    #[must_use]
    pub fn is_suppressed(&self, at: Position) -> bool {
        let from = self
            .directives
            .partition_point(|c| c.line() + 1 < at.line);
        self.directives[from..]
            .iter()
            .take_while(|c| c.line() <= at.line)
            .any(|c| self.covers(c, at))
    }

    fn covers(&self, directive: &PlacedComment<'_>, at: Position) -> bool {
        if directive.line() == at.line {
            return true;
        }
        directive.line() + 1 == at.line
            && directive.standalone
            && match self.mode {
                SuppressionMode::Attached => true,
                SuppressionMode::SameColumn => directive.column() == at.column,
            }
    }
}
