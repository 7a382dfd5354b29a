//! Name/embedding based classification.
//!
//! Resolver types are recognized by name (`userResolver`) and by embedding
//! the root `Resolver` struct. The restricted surface is the set of
//! `Resolver` fields whose declared type ends with `UseCase`; a violation
//! is a call of the form `r.SomeUseCase.Method(...)` on the receiver.

use std::collections::{BTreeMap, HashSet};

use super::{AccessPath, MethodScope, Policy, ResolverSet, RestrictedAccess, RestrictedSurface};
use crate::config::FieldSuffixConfig;
use crate::extract::CallSite;
use crate::program::{Program, TypeRef};

/// Name of the root resolver struct resolvers embed.
pub const ROOT_RESOLVER: &str = "Resolver";

/// Field-suffix policy.
#[derive(Debug, Clone)]
pub struct FieldSuffixPolicy {
    resolver_suffix: String,
    field_suffix: String,
    ignore: HashSet<String>,
}

impl FieldSuffixPolicy {
    /// Creates the policy from its config section.
    #[must_use]
    pub fn from_config(config: &FieldSuffixConfig) -> Self {
        Self {
            resolver_suffix: config.resolver_suffix.clone(),
            field_suffix: config.restricted_field_suffix.clone(),
            ignore: config.ignore_resolver_names.iter().cloned().collect(),
        }
    }

    fn is_ignored(&self, ty: &TypeRef) -> bool {
        self.ignore.contains(&ty.name) || self.ignore.contains(&ty.base())
    }
}

impl Default for FieldSuffixPolicy {
    fn default() -> Self {
        Self::from_config(&FieldSuffixConfig::default())
    }
}

impl Policy for FieldSuffixPolicy {
    fn name(&self) -> &'static str {
        "field-suffix"
    }

    fn description(&self) -> &'static str {
        "Resolvers embed the root Resolver; its *UseCase fields must not be called directly"
    }

    fn classify_resolvers(&self, program: &Program) -> ResolverSet {
        program
            .type_decls()
            .filter(|(_, decl)| decl.is_aggregate && !decl.fields.is_empty())
            .filter(|(_, decl)| decl.name.ends_with(&self.resolver_suffix))
            .filter(|(_, decl)| decl.embedded_fields().any(|f| f.ty.name == ROOT_RESOLVER))
            .map(|(unit, decl)| unit.qualify(&TypeRef::named(decl.name.clone())))
            .collect()
    }

    fn classify_restricted_surface(&self, program: &Program) -> RestrictedSurface {
        let mut fields = BTreeMap::new();
        for (_, decl) in program
            .type_decls()
            .filter(|(_, decl)| decl.name == ROOT_RESOLVER)
        {
            for field in decl.fields.iter().filter(|f| !f.embedded) {
                if field.ty.name.ends_with(&self.field_suffix) {
                    fields
                        .entry(field.name.clone())
                        .or_insert_with(|| field.ty.clone());
                }
            }
        }
        RestrictedSurface::Fields(fields)
    }

    fn is_exempt(&self, scope: &MethodScope<'_>) -> bool {
        self.is_ignored(&scope.method.receiver.ty)
    }

    fn filter(
        &self,
        scope: &MethodScope<'_>,
        surface: &RestrictedSurface,
        site: &CallSite<'_>,
    ) -> Option<RestrictedAccess> {
        let RestrictedSurface::Fields(fields) = surface else {
            return None;
        };
        let chain = site.target_chain()?;
        let [recv, field, method] = chain[..] else {
            return None;
        };
        if Some(recv) != scope.receiver_binding() {
            return None;
        }

        let ty = fields.get(field)?;
        if self.is_ignored(ty) {
            return None;
        }

        Some(RestrictedAccess {
            access_path: AccessPath::Exact(format!("{field}.{method}")),
            context: ty.base(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::CallSites;
    use crate::program::{CompilationUnit, FieldDecl, Import, MethodDecl, TypeDecl};
    use crate::syntax::Span;
    use crate::testing::*;
    use std::path::PathBuf;

    fn field(name: &str, ty: TypeRef, embedded: bool) -> FieldDecl {
        FieldDecl {
            name: name.into(),
            ty,
            embedded,
            span: Span::default(),
        }
    }

    fn strukt(name: &str, fields: Vec<FieldDecl>) -> TypeDecl {
        TypeDecl {
            name: name.into(),
            fields,
            is_aggregate: true,
            span: Span::default(),
        }
    }

    fn program(methods: Vec<MethodDecl>) -> Program {
        Program::new(vec![CompilationUnit {
            path: PathBuf::from("graph/resolver.go"),
            package: "app/graph".into(),
            package_name: "graph".into(),
            source: String::new(),
            imports: vec![Import {
                alias: None,
                path: "app/usecase".into(),
            }],
            types: vec![
                strukt(
                    "Resolver",
                    vec![
                        field("Loader", TypeRef::qualified("loader", "Loader"), false),
                        field("UseCase", TypeRef::qualified("usecase", "UseCase"), false),
                        field("AdminUseCase", TypeRef::qualified("usecase", "AdminUseCase"), false),
                    ],
                ),
                strukt(
                    "userResolver",
                    vec![field("Resolver", TypeRef::named("Resolver").pointer(), true)],
                ),
                strukt(
                    "queryResolver",
                    vec![field("Resolver", TypeRef::named("Resolver").pointer(), true)],
                ),
                strukt(
                    "orphanResolver",
                    vec![field("Resolver", TypeRef::named("Resolver"), false)],
                ),
                strukt("emptyResolver", vec![]),
                strukt("Service", vec![field("Resolver", TypeRef::named("Resolver"), true)]),
            ],
            methods,
            layout: None,
        }])
    }

    fn violations(policy: &FieldSuffixPolicy, program: &Program) -> Vec<RestrictedAccess> {
        let surface = policy.classify_restricted_surface(program);
        let unit = &program.units()[0];
        unit.methods
            .iter()
            .flat_map(|method| {
                let scope = MethodScope {
                    program,
                    unit,
                    method,
                };
                if policy.is_exempt(&scope) {
                    return Vec::new();
                }
                CallSites::new(method)
                    .filter_map(|site| policy.filter(&scope, &surface, &site))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn classifies_only_embedding_resolvers() {
        let program = program(vec![]);
        let resolvers = FieldSuffixPolicy::default().classify_resolvers(&program);
        let names: Vec<String> = resolvers.iter().map(|q| q.name.clone()).collect();
        assert_eq!(names, vec!["queryResolver", "userResolver"]);
    }

    #[test]
    fn restricted_surface_uses_field_type_suffix() {
        let program = program(vec![]);
        let surface = FieldSuffixPolicy::default().classify_restricted_surface(&program);
        let RestrictedSurface::Fields(fields) = surface else {
            panic!("expected field surface");
        };
        assert_eq!(
            fields.keys().cloned().collect::<Vec<_>>(),
            vec!["AdminUseCase", "UseCase"]
        );
    }

    #[test]
    fn flags_receiver_field_method_call() {
        let m = method(
            "r",
            TypeRef::named("userResolver").pointer(),
            "Name",
            vec![expr_stmt(call(chain("r.UseCase.Do", 2, 2)))],
        );
        let found = violations(&FieldSuffixPolicy::default(), &program(vec![m]));
        assert_eq!(
            found,
            vec![RestrictedAccess {
                access_path: AccessPath::Exact("UseCase.Do".into()),
                context: "usecase.UseCase".into(),
            }]
        );
    }

    #[test]
    fn ignores_loader_and_foreign_receivers() {
        let m = method(
            "r",
            TypeRef::named("userResolver").pointer(),
            "Name",
            vec![
                expr_stmt(call(chain("r.Loader.Load", 2, 2))),
                expr_stmt(call(chain("other.UseCase.Do", 3, 2))),
                expr_stmt(call(chain("r.Resolver.UseCase.Do", 4, 2))),
            ],
        );
        assert!(violations(&FieldSuffixPolicy::default(), &program(vec![m])).is_empty());
    }

    #[test]
    fn ignore_list_exempts_resolver_types() {
        let m = method(
            "r",
            TypeRef::named("queryResolver").pointer(),
            "Users",
            vec![expr_stmt(call(chain("r.UseCase.Do", 2, 2)))],
        );
        let program = program(vec![m]);
        assert!(violations(&FieldSuffixPolicy::default(), &program).is_empty());

        let open = FieldSuffixPolicy::from_config(&FieldSuffixConfig {
            ignore_resolver_names: vec![],
            ..FieldSuffixConfig::default()
        });
        assert_eq!(violations(&open, &program).len(), 1);
    }

    #[test]
    fn ignore_list_exempts_field_types() {
        let m = method(
            "r",
            TypeRef::named("userResolver").pointer(),
            "Name",
            vec![
                expr_stmt(call(chain("r.AdminUseCase.Do", 2, 2))),
                expr_stmt(call(chain("r.UseCase.Do", 3, 2))),
            ],
        );
        let policy = FieldSuffixPolicy::from_config(&FieldSuffixConfig {
            ignore_resolver_names: vec!["AdminUseCase".into()],
            ..FieldSuffixConfig::default()
        });
        let found = violations(&policy, &program(vec![m]));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].access_path, AccessPath::Exact("UseCase.Do".into()));
    }
}
