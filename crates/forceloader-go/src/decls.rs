//! Top-level declarations: package clause, imports, types and methods.

use forceloader_core::program::{FieldDecl, Import, MethodDecl, Receiver, TypeDecl, TypeRef};
use tree_sitter::Node;

use crate::lower::Lowerer;
use crate::span_of;

/// Declarations found at the top level of one file.
#[derive(Debug, Default)]
pub(crate) struct FileDecls {
    pub package_name: String,
    pub imports: Vec<Import>,
    pub types: Vec<TypeDecl>,
    pub methods: Vec<MethodDecl>,
}

pub(crate) fn collect(root: Node<'_>, src: &[u8]) -> FileDecls {
    let lower = Lowerer::new(src);
    let mut decls = FileDecls::default();

    let mut cursor = root.walk();
    for node in root.named_children(&mut cursor) {
        match node.kind() {
            "package_clause" => {
                if let Some(name) = node.named_child(0) {
                    decls.package_name = text(&name, src).to_string();
                }
            }
            "import_declaration" => imports(node, src, &mut decls.imports),
            "type_declaration" => type_specs(node, src, &mut decls.types),
            "method_declaration" => {
                if let Some(method) = method(node, src, &lower) {
                    decls.methods.push(method);
                }
            }
            _ => {}
        }
    }

    decls
}

fn text<'s>(node: &Node<'_>, src: &'s [u8]) -> &'s str {
    node.utf8_text(src).unwrap_or_default()
}

fn imports(node: Node<'_>, src: &[u8], out: &mut Vec<Import>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => {
                let Some(path) = child.child_by_field_name("path") else {
                    continue;
                };
                out.push(Import {
                    alias: child
                        .child_by_field_name("name")
                        .map(|n| text(&n, src).to_string()),
                    path: text(&path, src).trim_matches(|c| c == '"' || c == '`').to_string(),
                });
            }
            "import_spec_list" => imports(child, src, out),
            _ => {}
        }
    }
}

fn type_specs(node: Node<'_>, src: &[u8], out: &mut Vec<TypeDecl>) {
    let mut cursor = node.walk();
    for spec in node.named_children(&mut cursor) {
        if spec.kind() != "type_spec" {
            continue;
        }
        let Some(name) = spec.child_by_field_name("name") else {
            continue;
        };
        let body = spec.child_by_field_name("type");
        let is_aggregate = body.is_some_and(|b| b.kind() == "struct_type");
        let fields = body
            .filter(|_| is_aggregate)
            .map(|b| struct_fields(b, src))
            .unwrap_or_default();

        out.push(TypeDecl {
            name: text(&name, src).to_string(),
            fields,
            is_aggregate,
            span: span_of(&spec),
        });
    }
}

fn struct_fields(node: Node<'_>, src: &[u8]) -> Vec<FieldDecl> {
    let mut fields = Vec::new();
    let mut outer = node.walk();
    let Some(list) = node
        .named_children(&mut outer)
        .find(|c| c.kind() == "field_declaration_list")
    else {
        return fields;
    };

    let mut cursor = list.walk();
    for decl in list.named_children(&mut cursor) {
        if decl.kind() != "field_declaration" {
            continue;
        }
        let Some(ty_node) = decl.child_by_field_name("type") else {
            continue;
        };
        let mut ty = type_ref(ty_node, src);

        let mut names_cursor = decl.walk();
        let names: Vec<_> = decl
            .children_by_field_name("name", &mut names_cursor)
            .collect();

        if names.is_empty() {
            // Embedded: `Resolver` or `*Resolver`, the star is a bare token.
            let mut tokens = decl.walk();
            ty.pointer |= decl.children(&mut tokens).any(|c| c.kind() == "*");
            fields.push(FieldDecl {
                name: ty.name.clone(),
                ty,
                embedded: true,
                span: span_of(&decl),
            });
        } else {
            fields.extend(names.into_iter().map(|name| FieldDecl {
                name: text(&name, src).to_string(),
                ty: ty.clone(),
                embedded: false,
                span: span_of(&decl),
            }));
        }
    }
    fields
}

/// Converts a type node into a reference; unsupported shapes keep their text.
fn type_ref(node: Node<'_>, src: &[u8]) -> TypeRef {
    match node.kind() {
        "type_identifier" => TypeRef::named(text(&node, src)),
        "qualified_type" => match (
            node.child_by_field_name("package"),
            node.child_by_field_name("name"),
        ) {
            (Some(pkg), Some(name)) => TypeRef::qualified(text(&pkg, src), text(&name, src)),
            _ => TypeRef::named(text(&node, src)),
        },
        "pointer_type" => match node.named_child(0) {
            Some(inner) => type_ref(inner, src).pointer(),
            None => TypeRef::named(text(&node, src)),
        },
        "generic_type" | "parenthesized_type" => match node
            .child_by_field_name("type")
            .or_else(|| node.named_child(0))
        {
            Some(inner) => type_ref(inner, src),
            None => TypeRef::named(text(&node, src)),
        },
        _ => TypeRef::named(text(&node, src)),
    }
}

fn method(node: Node<'_>, src: &[u8], lower: &Lowerer<'_>) -> Option<MethodDecl> {
    let name = node.child_by_field_name("name")?;
    let params = node.child_by_field_name("receiver")?;

    let mut cursor = params.walk();
    let param = params
        .named_children(&mut cursor)
        .find(|c| c.kind() == "parameter_declaration")?;
    let receiver = Receiver {
        binding: param
            .child_by_field_name("name")
            .map(|n| text(&n, src).to_string()),
        ty: type_ref(param.child_by_field_name("type")?, src),
    };

    Some(MethodDecl {
        name: text(&name, src).to_string(),
        receiver,
        body: lower.block(node.child_by_field_name("body")),
        span: span_of(&node),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_tree;

    const RESOLVER: &str = r#"package graph

import (
	"example.com/app/loader"
	uc "example.com/app/usecase"
	_ "example.com/app/driver"
)

type Resolver struct {
	Loader         loader.Loader
	UseCase, Other uc.UseCase
}

type queryResolver struct{ *Resolver }

type userResolver struct {
	Resolver
	cache map[string]int
}

type Mode int

func (r *queryResolver) Users() {}

func (userResolver) Name() {}

func helper() {}
"#;

    fn decls() -> FileDecls {
        let tree = parse_tree(RESOLVER).expect("tree");
        collect(tree.root_node(), RESOLVER.as_bytes())
    }

    #[test]
    fn collects_package_and_imports() {
        let d = decls();
        assert_eq!(d.package_name, "graph");
        assert_eq!(
            d.imports
                .iter()
                .map(|i| (i.alias.as_deref(), i.path.as_str()))
                .collect::<Vec<_>>(),
            vec![
                (None, "example.com/app/loader"),
                (Some("uc"), "example.com/app/usecase"),
                (Some("_"), "example.com/app/driver"),
            ]
        );
    }

    #[test]
    fn collects_struct_fields() {
        let d = decls();
        let names: Vec<(&str, bool)> = d
            .types
            .iter()
            .map(|t| (t.name.as_str(), t.is_aggregate))
            .collect();
        assert_eq!(
            names,
            vec![
                ("Resolver", true),
                ("queryResolver", true),
                ("userResolver", true),
                ("Mode", false),
            ]
        );

        let resolver = &d.types[0];
        assert_eq!(
            resolver
                .fields
                .iter()
                .map(|f| format!("{} {}", f.name, f.ty))
                .collect::<Vec<_>>(),
            vec!["Loader loader.Loader", "UseCase uc.UseCase", "Other uc.UseCase"]
        );

        let embedded = &d.types[1].fields[0];
        assert!(embedded.embedded);
        assert_eq!(embedded.ty.to_string(), "*Resolver");

        let plain = &d.types[2].fields;
        assert!(plain[0].embedded && !plain[0].ty.pointer);
        assert!(!plain[1].embedded);
    }

    #[test]
    fn collects_methods_only() {
        let d = decls();
        let methods: Vec<(&str, Option<&str>, String)> = d
            .methods
            .iter()
            .map(|m| {
                (
                    m.name.as_str(),
                    m.receiver.binding.as_deref(),
                    m.receiver.ty.to_string(),
                )
            })
            .collect();
        assert_eq!(
            methods,
            vec![
                ("Users", Some("r"), "*queryResolver".to_string()),
                ("Name", None, "userResolver".to_string()),
            ]
        );
    }
}
