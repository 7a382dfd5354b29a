//! Package-path based classification.
//!
//! A resolver is any struct embedding the configured marker type (e.g.
//! `example.com/app/graph.Resolver`). A violation is any call that resolves
//! to a function or method declared in one of the restricted packages,
//! whether reached through an import (`usecase.Do(...)`) or through a
//! field chain off the receiver (`r.UseCase.Do(...)`).

use std::collections::{BTreeSet, HashSet};

use super::{AccessPath, MethodScope, Policy, ResolverSet, RestrictedAccess, RestrictedSurface};
use crate::config::PackagePathConfig;
use crate::extract::CallSite;
use crate::program::{CompilationUnit, Program, TypeRef};
use crate::syntax::Expr;

/// Package-path policy.
#[derive(Debug, Clone)]
pub struct PackagePathPolicy {
    marker: String,
    packages: BTreeSet<String>,
    ignore: HashSet<String>,
}

impl PackagePathPolicy {
    /// Creates the policy from its config section.
    #[must_use]
    pub fn from_config(config: &PackagePathConfig) -> Self {
        Self {
            marker: config.resolver_marker_type.trim_start_matches('*').to_string(),
            packages: config.restricted_packages.iter().cloned().collect(),
            ignore: config.ignore_resolver_markers.iter().cloned().collect(),
        }
    }

    /// Static type of `expr` when it is the receiver or a field chain off it.
    fn type_of<'p>(
        &self,
        scope: &MethodScope<'p>,
        expr: &Expr,
    ) -> Option<(&'p CompilationUnit, TypeRef)> {
        match expr.unparen() {
            Expr::Ident(id) if Some(id.name.as_str()) == scope.receiver_binding() => {
                Some((scope.unit, scope.method.receiver.ty.clone()))
            }
            Expr::Selector(sel) => {
                let (unit, ty) = self.type_of(scope, &sel.operand)?;
                let found = scope.program.resolve_field(unit, &ty, &sel.field.name)?;
                Some((found.unit, found.field.ty.clone()))
            }
            _ => None,
        }
    }
}

impl Policy for PackagePathPolicy {
    fn name(&self) -> &'static str {
        "package-path"
    }

    fn description(&self) -> &'static str {
        "Resolvers embed the marker type and must not call into restricted packages"
    }

    fn classify_resolvers(&self, program: &Program) -> ResolverSet {
        if self.ignore.contains(&self.marker) {
            return ResolverSet::new();
        }

        let mut resolvers = ResolverSet::new();
        for (unit, decl) in program.type_decls() {
            if !decl.is_aggregate || decl.fields.is_empty() {
                continue;
            }
            let name = unit.qualify(&TypeRef::named(decl.name.clone()));
            if self.ignore.contains(&name.to_string()) {
                tracing::debug!("Skipping ignored resolver candidate {}", name);
                continue;
            }
            if decl
                .embedded_fields()
                .any(|f| unit.qualify(&f.ty).to_string() == self.marker)
            {
                resolvers.insert(name);
            }
        }
        resolvers
    }

    fn classify_restricted_surface(&self, _program: &Program) -> RestrictedSurface {
        RestrictedSurface::Packages(self.packages.clone())
    }

    fn is_exempt(&self, scope: &MethodScope<'_>) -> bool {
        self.ignore.contains(&scope.receiver_type().to_string())
    }

    fn filter(
        &self,
        scope: &MethodScope<'_>,
        surface: &RestrictedSurface,
        site: &CallSite<'_>,
    ) -> Option<RestrictedAccess> {
        let RestrictedSurface::Packages(packages) = surface else {
            return None;
        };
        let Expr::Selector(sel) = site.call.callee.unparen() else {
            return None;
        };

        // usecase.Do(...) through an import
        if let Expr::Ident(pkg) = sel.operand.unparen() {
            if Some(pkg.name.as_str()) != scope.receiver_binding() {
                let path = scope.unit.import_path(&pkg.name)?;
                return packages.contains(path).then(|| RestrictedAccess {
                    access_path: AccessPath::Resolve {
                        fallback: format!("{path}.{}", sel.field.name),
                    },
                    context: scope.unit.method_name(scope.method),
                });
            }
        }

        // r.UseCase.Do(...) through the receiver
        let (unit, ty) = self.type_of(scope, &sel.operand)?;
        let owner = unit.qualify(&ty);
        if !packages.contains(&owner.package) {
            return None;
        }
        Some(RestrictedAccess {
            access_path: AccessPath::Resolve {
                fallback: format!("{owner}.{}", sel.field.name),
            },
            context: scope.unit.method_name(scope.method),
        })
    }
}
