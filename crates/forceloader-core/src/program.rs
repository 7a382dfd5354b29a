//! Program model: compilation units, declarations and the symbol table.
//!
//! A [`Program`] is produced once per run by a [`crate::LanguageFrontend`]
//! and is read-only afterwards.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::path::PathBuf;

use crate::syntax::{Block, SourceLayout, Span};

/// A type name as written at a use site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Package qualifier as written (`usecase` in `usecase.UseCase`).
    pub qualifier: Option<String>,
    /// Type name.
    pub name: String,
    /// Wrapped in one level of pointer indirection.
    pub pointer: bool,
}

impl TypeRef {
    /// Creates an unqualified, non-pointer type reference.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            qualifier: None,
            name: name.into(),
            pointer: false,
        }
    }

    /// Creates a package-qualified type reference.
    #[must_use]
    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qualifier: Some(qualifier.into()),
            name: name.into(),
            pointer: false,
        }
    }

    /// Marks the reference as a pointer.
    #[must_use]
    pub fn pointer(mut self) -> Self {
        self.pointer = true;
        self
    }

    /// Renders the reference without the pointer marker.
    #[must_use]
    pub fn base(&self) -> String {
        match &self.qualifier {
            Some(q) => format!("{q}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pointer {
            write!(f, "*")?;
        }
        write!(f, "{}", self.base())
    }
}

/// A fully qualified type name: `<package path>.<Name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    /// Package import path.
    pub package: String,
    /// Type name.
    pub name: String,
}

impl QualifiedName {
    /// Creates a qualified name.
    #[must_use]
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.package, self.name)
    }
}

/// A struct field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Field name; for embedded fields this is the type name.
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
    /// Embedded (anonymous) field.
    pub embedded: bool,
    /// Source range.
    pub span: Span,
}

/// A named type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    /// Type name.
    pub name: String,
    /// Fields in declaration order (empty for non-aggregates).
    pub fields: Vec<FieldDecl>,
    /// True for struct types.
    pub is_aggregate: bool,
    /// Source range.
    pub span: Span,
}

impl TypeDecl {
    /// Fields with the `embedded` flag set.
    pub fn embedded_fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.fields.iter().filter(|f| f.embedded)
    }

    /// Finds a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Method receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receiver {
    /// Binding identifier, absent for `func (T) M()` or `_`.
    pub binding: Option<String>,
    /// Receiver type.
    pub ty: TypeRef,
}

/// A method declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    /// Method name.
    pub name: String,
    /// Receiver.
    pub receiver: Receiver,
    /// Method body.
    pub body: Block,
    /// Source range.
    pub span: Span,
}

/// An import declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Explicit alias, if any.
    pub alias: Option<String>,
    /// Imported package path.
    pub path: String,
}

impl Import {
    /// The name the package is referred to by inside the importing file.
    #[must_use]
    pub fn local_name(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self.path.rsplit('/').next().unwrap_or(&self.path),
        }
    }
}

/// One parsed source file.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    /// Path relative to the analysis root.
    pub path: PathBuf,
    /// Import path of the package this file belongs to.
    pub package: String,
    /// Declared package name.
    pub package_name: String,
    /// File contents.
    pub source: String,
    /// Imports.
    pub imports: Vec<Import>,
    /// Top-level type declarations.
    pub types: Vec<TypeDecl>,
    /// Method declarations.
    pub methods: Vec<MethodDecl>,
    /// Node/comment layout, `None` when the frontend could not produce a clean tree.
    pub layout: Option<SourceLayout>,
}

impl CompilationUnit {
    /// Resolves a file-local package name to its import path.
    #[must_use]
    pub fn import_path(&self, local: &str) -> Option<&str> {
        self.imports
            .iter()
            .filter(|i| !matches!(i.alias.as_deref(), Some("_" | ".")))
            .find(|i| i.local_name() == local)
            .map(|i| i.path.as_str())
    }

    /// Qualifies a type reference written in this file.
    ///
    /// Unknown qualifiers are kept verbatim as an opaque package.
    #[must_use]
    pub fn qualify(&self, ty: &TypeRef) -> QualifiedName {
        let package = match &ty.qualifier {
            Some(q) => self.import_path(q).unwrap_or(q.as_str()).to_string(),
            None => self.package.clone(),
        };
        QualifiedName::new(package, ty.name.clone())
    }

    /// Source text of a span with all whitespace removed.
    ///
    /// Intended for member-access chains, which may be split across lines.
    #[must_use]
    pub fn render(&self, span: &Span) -> String {
        self.source
            .get(span.start.offset..span.end.offset)
            .unwrap_or_default()
            .split_whitespace()
            .collect::<String>()
    }

    /// Fully qualified method name, e.g. `(*example.com/app/graph.queryResolver).Users`.
    #[must_use]
    pub fn method_name(&self, method: &MethodDecl) -> String {
        let recv = self.qualify(&method.receiver.ty);
        let star = if method.receiver.ty.pointer { "*" } else { "" };
        format!("({star}{recv}).{}", method.name)
    }
}

/// A field found through [`Program::resolve_field`].
#[derive(Debug, Clone, Copy)]
pub struct ResolvedField<'p> {
    /// Unit declaring the owning type.
    pub unit: &'p CompilationUnit,
    /// The field itself.
    pub field: &'p FieldDecl,
}

/// The whole program: every compilation unit plus a type index.
#[derive(Debug, Default)]
pub struct Program {
    units: Vec<CompilationUnit>,
    index: HashMap<QualifiedName, (usize, usize)>,
}

impl Program {
    /// Builds the program and its symbol table.
    #[must_use]
    pub fn new(units: Vec<CompilationUnit>) -> Self {
        let mut index = HashMap::new();
        for (u, unit) in units.iter().enumerate() {
            for (t, decl) in unit.types.iter().enumerate() {
                let key = QualifiedName::new(unit.package.clone(), decl.name.clone());
                if index.contains_key(&key) {
                    tracing::debug!("Duplicate type declaration {} in {}", key, unit.path.display());
                    continue;
                }
                index.insert(key, (u, t));
            }
        }
        Self { units, index }
    }

    /// All compilation units.
    #[must_use]
    pub fn units(&self) -> &[CompilationUnit] {
        &self.units
    }

    /// Number of compilation units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns true if the program has no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Every type declaration with its unit.
    pub fn type_decls(&self) -> impl Iterator<Item = (&CompilationUnit, &TypeDecl)> {
        self.units
            .iter()
            .flat_map(|u| u.types.iter().map(move |t| (u, t)))
    }

    /// Looks up a type by qualified name.
    #[must_use]
    pub fn lookup(&self, name: &QualifiedName) -> Option<(&CompilationUnit, &TypeDecl)> {
        let &(u, t) = self.index.get(name)?;
        let unit = &self.units[u];
        Some((unit, &unit.types[t]))
    }

    /// Finds `field` on the type `ty` written in `unit`, following
    /// embedded-field promotion breadth-first (shallowest depth wins).
    #[must_use]
    pub fn resolve_field<'p>(
        &'p self,
        unit: &'p CompilationUnit,
        ty: &TypeRef,
        field: &str,
    ) -> Option<ResolvedField<'p>> {
        let mut queue = VecDeque::from([unit.qualify(ty)]);
        let mut seen = HashSet::new();

        while let Some(name) = queue.pop_front() {
            if !seen.insert(name.clone()) {
                continue;
            }
            let Some((owner_unit, owner)) = self.lookup(&name) else {
                continue;
            };
            if let Some(found) = owner.field(field) {
                return Some(ResolvedField {
                    unit: owner_unit,
                    field: found,
                });
            }
            queue.extend(owner.embedded_fields().map(|f| owner_unit.qualify(&f.ty)));
        }

        None
    }
}
