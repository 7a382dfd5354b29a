//! Diagnostic emission.

use std::path::Path;

use crate::syntax::Span;
use crate::types::{Location, Severity, Suggestion, Violation};
use crate::{ANALYZER_NAME, RULE_CODE};

/// Renders the diagnostic message.
#[must_use]
pub fn message(access_path: &str, context: &str) -> String {
    format!("{access_path} cannot be used in {context}")
}

/// Collects one violation per reported call site, in report order.
#[derive(Debug)]
pub struct Reporter {
    severity: Severity,
    violations: Vec<Violation>,
}

impl Reporter {
    /// Creates a reporter emitting violations at `severity`.
    #[must_use]
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            violations: Vec::new(),
        }
    }

    /// Appends a violation for the call spanning `span` in `file`.
    pub fn report(&mut self, file: &Path, span: &Span, access_path: &str, context: &str) {
        let violation = Violation::new(
            RULE_CODE,
            ANALYZER_NAME,
            self.severity,
            Location::from_span(file.to_path_buf(), span),
            message(access_path, context),
        )
        .with_suggestion(Suggestion::new(
            "Resolvers should fetch through a loader instead of calling the use case layer directly",
        ));
        tracing::debug!("{}", violation);
        self.violations.push(violation);
    }

    /// Number of violations reported so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Consumes the reporter.
    #[must_use]
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}
