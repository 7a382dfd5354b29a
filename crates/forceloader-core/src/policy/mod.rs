//! Classification policies.
//!
//! A [`Policy`] decides which types are resolvers, what the restricted
//! surface is, and whether a given call site reaches into it. Two policies
//! ship with forceloader:
//!
//! | Policy | Resolver types | Restricted surface |
//! |--------|----------------|--------------------|
//! | [`FieldSuffixPolicy`] (default) | name ends with `Resolver` and embeds a type named `Resolver` | fields of `Resolver` whose type name ends with `UseCase` |
//! | [`PackagePathPolicy`] | embeds the configured marker type | calls into the configured packages |
//!
//! Exactly one policy is active per run.

mod field_suffix;
mod package_path;

pub use field_suffix::FieldSuffixPolicy;
pub use package_path::PackagePathPolicy;

use std::collections::{BTreeMap, BTreeSet};

use crate::config::{Config, PolicyKind};
use crate::extract::CallSite;
use crate::program::{CompilationUnit, MethodDecl, Program, QualifiedName, TypeRef};

/// Qualified names of every type classified as a resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverSet {
    members: BTreeSet<QualifiedName>,
}

impl ResolverSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resolver type.
    pub fn insert(&mut self, name: QualifiedName) -> bool {
        self.members.insert(name)
    }

    /// Returns true if `name` is a resolver type.
    #[must_use]
    pub fn contains(&self, name: &QualifiedName) -> bool {
        self.members.contains(name)
    }

    /// Number of resolver types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if no resolver type was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates resolver types in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &QualifiedName> {
        self.members.iter()
    }
}

impl FromIterator<QualifiedName> for ResolverSet {
    fn from_iter<I: IntoIterator<Item = QualifiedName>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

/// What resolvers must not call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestrictedSurface {
    /// Restricted field names mapped to their declared type.
    Fields(BTreeMap<String, TypeRef>),
    /// Restricted package paths.
    Packages(BTreeSet<String>),
}

impl RestrictedSurface {
    /// Number of restricted members.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Fields(f) => f.len(),
            Self::Packages(p) => p.len(),
        }
    }

    /// Returns true if nothing is restricted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How the diagnostic subject is obtained for a violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPath {
    /// The policy already knows the subject (`UseCase.Do`).
    Exact(String),
    /// Recover the subject from source via origin resolution; use
    /// `fallback` when that is not possible.
    Resolve {
        /// Resolved callee name.
        fallback: String,
    },
}

/// A call site that reaches into the restricted surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictedAccess {
    /// Diagnostic subject.
    pub access_path: AccessPath,
    /// Name the violation is reported against.
    pub context: String,
}

/// The method currently being checked.
#[derive(Debug, Clone, Copy)]
pub struct MethodScope<'p> {
    /// Whole program, for symbol lookups.
    pub program: &'p Program,
    /// Unit declaring the method.
    pub unit: &'p CompilationUnit,
    /// The method.
    pub method: &'p MethodDecl,
}

impl MethodScope<'_> {
    /// Qualified name of the receiver type.
    #[must_use]
    pub fn receiver_type(&self) -> QualifiedName {
        self.unit.qualify(&self.method.receiver.ty)
    }

    /// Receiver binding identifier, if the method names one.
    #[must_use]
    pub fn receiver_binding(&self) -> Option<&str> {
        self.method
            .receiver
            .binding
            .as_deref()
            .filter(|b| *b != "_")
    }
}

/// A classification strategy.
pub trait Policy: Send + Sync {
    /// Kebab-case policy name.
    fn name(&self) -> &'static str;

    /// One-line description.
    fn description(&self) -> &'static str {
        ""
    }

    /// Scans every type declaration and returns the resolver types.
    fn classify_resolvers(&self, program: &Program) -> ResolverSet;

    /// Computes the restricted surface.
    fn classify_restricted_surface(&self, program: &Program) -> RestrictedSurface;

    /// Returns true if the resolver method should not be checked at all.
    fn is_exempt(&self, _scope: &MethodScope<'_>) -> bool {
        false
    }

    /// Decides whether `site` reaches into `surface`.
    fn filter(
        &self,
        scope: &MethodScope<'_>,
        surface: &RestrictedSurface,
        site: &CallSite<'_>,
    ) -> Option<RestrictedAccess>;
}

/// Type alias for boxed policies.
pub type PolicyBox = Box<dyn Policy>;

/// Builds the policy selected by `config`.
#[must_use]
pub fn policy_for(config: &Config) -> PolicyBox {
    match config.policy {
        PolicyKind::FieldSuffix => Box::new(FieldSuffixPolicy::from_config(&config.field_suffix)),
        PolicyKind::PackagePath => Box::new(PackagePathPolicy::from_config(&config.package_path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_for_follows_config() {
        let mut config = Config::default();
        let policy = policy_for(&config);
        assert_eq!(policy.name(), "field-suffix");
        assert!(policy.description().contains("UseCase"));

        config.policy = PolicyKind::PackagePath;
        let policy = policy_for(&config);
        assert_eq!(policy.name(), "package-path");
        assert!(policy.description().contains("restricted packages"));
    }

    #[test]
    fn resolver_set_is_sorted_and_deduplicated() {
        let set: ResolverSet = [
            QualifiedName::new("b", "userResolver"),
            QualifiedName::new("a", "userResolver"),
            QualifiedName::new("a", "userResolver"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["a.userResolver", "b.userResolver"]
        );
    }
}
