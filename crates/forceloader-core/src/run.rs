//! One analysis run over a loaded program.
//!
//! [`AnalysisRun`] owns every piece of per-run state. Construction performs
//! both classification passes over the whole program; [`AnalysisRun::check`]
//! then walks each resolver method and reports unsuppressed violations.
//! Nothing is shared between runs.

use tracing::{debug, info, trace};

use crate::analyzer::AnalyzerError;
use crate::config::{Config, SuppressionMode};
use crate::extract::CallSites;
use crate::origin::resolve_origin;
use crate::policy::{policy_for, AccessPath, MethodScope, PolicyBox, ResolverSet, RestrictedSurface};
use crate::program::{CompilationUnit, Program};
use crate::reporter::Reporter;
use crate::suppression::SuppressionMatcher;
use crate::types::{Severity, Violation};
use crate::ANALYZER_NAME;

/// Classification results plus the settings needed to check methods.
pub struct AnalysisRun<'p> {
    program: &'p Program,
    policy: PolicyBox,
    resolvers: ResolverSet,
    surface: RestrictedSurface,
    suppression: SuppressionMode,
    severity: Severity,
}

impl<'p> AnalysisRun<'p> {
    /// Validates `config` and classifies `program` with the configured policy.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Initialization`] if the policy is missing
    /// required settings.
    pub fn new(program: &'p Program, config: &Config) -> Result<Self, AnalyzerError> {
        config
            .validate()
            .map_err(|e| AnalyzerError::Initialization(e.to_string()))?;
        Ok(Self::with_policy(
            program,
            policy_for(config),
            config.suppression,
            config.severity,
        ))
    }

    /// Classifies `program` with an explicit policy.
    #[must_use]
    pub fn with_policy(
        program: &'p Program,
        policy: PolicyBox,
        suppression: SuppressionMode,
        severity: Severity,
    ) -> Self {
        let resolvers = policy.classify_resolvers(program);
        let surface = policy.classify_restricted_surface(program);
        info!(
            "Policy {}: {} resolver type(s), {} restricted member(s)",
            policy.name(),
            resolvers.len(),
            surface.len()
        );
        debug!("Policy {}: {}", policy.name(), policy.description());
        for name in resolvers.iter() {
            debug!("Resolver type: {}", name);
        }

        Self {
            program,
            policy,
            resolvers,
            surface,
            suppression,
            severity,
        }
    }

    /// Types classified as resolvers.
    #[must_use]
    pub fn resolvers(&self) -> &ResolverSet {
        &self.resolvers
    }

    /// Checks every resolver method and returns the violations in report order.
    #[must_use]
    pub fn check(&self) -> Vec<Violation> {
        let mut reporter = Reporter::new(self.severity);
        for unit in self.program.units() {
            self.check_unit(unit, &mut reporter);
        }
        reporter.into_violations()
    }

    fn check_unit(&self, unit: &'p CompilationUnit, reporter: &mut Reporter) {
        let matcher = unit
            .layout
            .as_ref()
            .map(|layout| SuppressionMatcher::new(layout, self.suppression, ANALYZER_NAME));
        if matcher.is_none() {
            debug!(
                "No layout for {}, suppression and origin lookup disabled",
                unit.path.display()
            );
        }

        for method in &unit.methods {
            let scope = MethodScope {
                program: self.program,
                unit,
                method,
            };
            if !self.resolvers.contains(&scope.receiver_type()) {
                continue;
            }
            if self.policy.is_exempt(&scope) {
                trace!("Exempt: {}", unit.method_name(method));
                continue;
            }

            for site in CallSites::new(method) {
                let Some(access) = self.policy.filter(&scope, &self.surface, &site) else {
                    continue;
                };
                if matcher
                    .as_ref()
                    .is_some_and(|m| m.is_suppressed(site.position))
                {
                    debug!(
                        "Suppressed at {}:{}",
                        unit.path.display(),
                        site.position.line
                    );
                    continue;
                }

                let subject = match access.access_path {
                    AccessPath::Exact(path) => path,
                    AccessPath::Resolve { fallback } => unit
                        .layout
                        .as_ref()
                        .and_then(|l| resolve_origin(&l.nodes, &unit.source, site.call.args_offset))
                        .map_or(fallback, |span| unit.render(&span)),
                };
                reporter.report(&unit.path, &site.span(), &subject, &access.context);
            }
        }
    }
}
