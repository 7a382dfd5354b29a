//! Package import paths from `go.mod` or directory layout.

use std::path::{Component, Path};

/// Reads the module path from the contents of a `go.mod` file.
#[must_use]
pub fn module_path(gomod: &str) -> Option<&str> {
    gomod.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let path = rest.split("//").next().unwrap_or(rest).trim().trim_matches('"');
        (!path.is_empty()).then_some(path)
    })
}

/// Finds the nearest directory at or above `dir` whose `go.mod` declares
/// a module, and returns it with the module path.
#[must_use]
pub fn find_module(dir: &Path) -> Option<(&Path, String)> {
    dir.ancestors().find_map(|ancestor| {
        let gomod = std::fs::read_to_string(ancestor.join("go.mod")).ok()?;
        match module_path(&gomod) {
            Some(module) => Some((ancestor, module.to_string())),
            None => {
                tracing::debug!("No module line in {}", ancestor.join("go.mod").display());
                None
            }
        }
    })
}

/// Import path of the package in `dir`.
///
/// The nearest `go.mod` at or above `dir` decides the module prefix. Without
/// one, the path is the directory relative to `root` (GOPATH-style
/// `src/` roots); a file directly in `root` falls back to `package_name`.
#[must_use]
pub fn package_path(root: &Path, dir: &Path, package_name: &str) -> String {
    if let Some((module_root, module)) = find_module(dir) {
        let rel = slash_path(dir.strip_prefix(module_root).unwrap_or(Path::new("")));
        return if rel.is_empty() {
            module
        } else {
            format!("{module}/{rel}")
        };
    }

    let rel = slash_path(dir.strip_prefix(root).unwrap_or(Path::new("")));
    if rel.is_empty() {
        package_name.to_string()
    } else {
        rel
    }
}

fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
