//! # forceloader-core
//!
//! Detection engine for the forceloader analyzer: GraphQL resolver types
//! must fetch through loaders instead of calling the use case layer.
//!
//! The engine works on a language-neutral [`Program`] produced by a
//! [`LanguageFrontend`]:
//!
//! - [`Policy`] classifies resolver types and the restricted surface
//! - [`CallSites`] extracts candidate calls from resolver method bodies
//! - [`resolve_origin`] recovers the access path shown in diagnostics
//! - [`SuppressionMatcher`] honours `//nolint:forceloader` comments
//! - [`AnalysisRun`] ties one run together; [`Analyzer`] adds file discovery
//!
//! ## Example
//!
//! ```ignore
//! use forceloader_core::{Analyzer, Config};
//! use forceloader_go::GoFrontend;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./graph")
//!     .frontend(GoFrontend::new())
//!     .config(Config::default())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod attach;
mod config;
mod extract;
mod frontend;
mod origin;
mod reporter;
mod run;
mod suppression;
mod types;

pub mod policy;
pub mod program;
pub mod syntax;

#[cfg(test)]
mod testing;

/// Name `nolint` directives refer to.
pub const ANALYZER_NAME: &str = "forceloader";

/// Code attached to every violation.
pub const RULE_CODE: &str = "FL001";

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use attach::{place_comments, PlacedComment};
pub use config::{
    split_list, AnalyzerConfig, Config, ConfigError, FieldSuffixConfig, PackagePathConfig,
    PolicyKind, SuppressionMode,
};
pub use extract::{CallSite, CallSites};
pub use frontend::{FrontendBox, FrontendError, LanguageFrontend};
pub use origin::resolve_origin;
pub use policy::{
    policy_for, AccessPath, FieldSuffixPolicy, MethodScope, PackagePathPolicy, Policy, PolicyBox,
    ResolverSet, RestrictedAccess, RestrictedSurface,
};
pub use program::{CompilationUnit, Program, QualifiedName, TypeRef};
pub use reporter::{message, Reporter};
pub use run::AnalysisRun;
pub use suppression::{directive_names, is_directive_for, SuppressionMatcher};
pub use types::{LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic};
