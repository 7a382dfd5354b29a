//! Go frontend using Tree-sitter.

use std::path::Path;

use forceloader_core::program::CompilationUnit;
use forceloader_core::{FrontendError, LanguageFrontend};
use tree_sitter::{Language, Parser};

use crate::{decls, layout, module};

/// Parses Go source files into compilation units.
pub struct GoFrontend {
    language: Language,
}

impl GoFrontend {
    /// Creates a new Go frontend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
        }
    }
}

impl Default for GoFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageFrontend for GoFrontend {
    fn language_id(&self) -> &'static str {
        "go"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".go"]
    }

    fn accepts(&self, path: &Path) -> bool {
        !path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with("_test.go"))
    }

    fn parse(
        &self,
        root: &Path,
        path: &Path,
        source: &str,
    ) -> Result<CompilationUnit, FrontendError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| FrontendError::Language {
                language: "go",
                message: e.to_string(),
            })?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| FrontendError::Parse {
                path: path.to_path_buf(),
            })?;
        let root_node = tree.root_node();
        let src = source.as_bytes();

        let decls = decls::collect(root_node, src);
        let layout = if root_node.has_error() {
            tracing::warn!(
                "Syntax errors in {}, nolint comments and origin lookup are ignored for this file",
                path.display()
            );
            None
        } else {
            Some(layout::collect(root_node, src))
        };

        let dir = path.parent().unwrap_or(root);
        let package = module::package_path(root, dir, &decls.package_name);
        tracing::trace!("{} -> package {}", path.display(), package);

        Ok(CompilationUnit {
            path: path.strip_prefix(root).unwrap_or(path).to_path_buf(),
            package,
            package_name: decls.package_name,
            source: source.to_string(),
            imports: decls.imports,
            types: decls.types,
            methods: decls.methods,
            layout,
        })
    }
}
