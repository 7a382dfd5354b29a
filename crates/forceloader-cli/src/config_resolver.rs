//! Locates the `forceloader.toml` that applies to a checked path.
//!
//! An explicit `--config` always wins. Otherwise the search starts at the
//! checked directory and climbs to the root of its Go module (the nearest
//! directory with a `go.mod`), so `forceloader check ./graph` picks up the
//! config kept next to `go.mod`. Outside a module only the checked
//! directory is searched. The global file in `~/.forceloader/` comes last.

use std::path::{Component, Path, PathBuf};

use forceloader_go::module::find_module;

/// File names looked up in each searched directory, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["forceloader.toml", ".forceloader.toml"];

/// Where the active configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Passed with `--config` or `$FORCELOADER_CONFIG`.
    Explicit(PathBuf),
    /// Found in the checked directory or between it and the module root.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found; built-in defaults apply.
    Default,
}

impl ConfigSource {
    /// The config file to load, `None` for defaults.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Short label for log output.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Explicit(_) => "explicit",
            Self::Project(_) => "project",
            Self::Global(_) => "global",
            Self::Default => "default",
        }
    }
}

/// Resolves the config for `target`, a directory or a single `.go` file.
#[must_use]
pub fn resolve(target: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_with(target, explicit, global_dir().as_deref())
}

fn resolve_with(target: &Path, explicit: Option<&Path>, global: Option<&Path>) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    if let Some(found) = search_dirs(target).iter().find_map(|dir| config_in(dir)) {
        return ConfigSource::Project(found);
    }

    global
        .and_then(|dir| {
            let file = dir.join("config.toml");
            file.is_file().then_some(file)
        })
        .map_or(ConfigSource::Default, ConfigSource::Global)
}

/// Directories searched for a project config, nearest first.
fn search_dirs(target: &Path) -> Vec<PathBuf> {
    let start = absolute(target);
    let start = if start.is_file() {
        start.parent().map(Path::to_path_buf).unwrap_or(start)
    } else {
        start
    };

    let Some((module_root, module)) = find_module(&start) else {
        return vec![start];
    };
    tracing::debug!("{} is inside module {}", start.display(), module);
    start
        .ancestors()
        .take_while(|dir| dir.starts_with(module_root))
        .map(Path::to_path_buf)
        .collect()
}

fn config_in(dir: &Path) -> Option<PathBuf> {
    let found = CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())?;
    tracing::debug!("Config file: {}", found.display());
    Some(found)
}

fn absolute(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };
    joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// `$FORCELOADER_CONFIG_DIR`, else `~/.forceloader`.
#[must_use]
pub fn global_dir() -> Option<PathBuf> {
    std::env::var_os("FORCELOADER_CONFIG_DIR")
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|home| home.join(".forceloader")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// A module at `<tmp>/app` with a `graph/model` package.
    fn module_tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let app = tmp.path().join("app");
        fs::create_dir_all(app.join("graph/model")).unwrap();
        fs::write(app.join("go.mod"), "module example.com/app\n").unwrap();
        tmp
    }

    #[test]
    fn config_next_to_go_mod_applies_to_subpackages() {
        let tmp = module_tree();
        let app = tmp.path().join("app");
        fs::write(app.join("forceloader.toml"), "").unwrap();

        assert_eq!(
            resolve_with(&app.join("graph/model"), None, None),
            ConfigSource::Project(app.join("forceloader.toml"))
        );
    }

    #[test]
    fn nearest_directory_wins_inside_a_module() {
        let tmp = module_tree();
        let app = tmp.path().join("app");
        fs::write(app.join("forceloader.toml"), "").unwrap();
        fs::write(app.join("graph/.forceloader.toml"), "").unwrap();

        assert_eq!(
            resolve_with(&app.join("graph/model"), None, None),
            ConfigSource::Project(app.join("graph/.forceloader.toml"))
        );
    }

    #[test]
    fn search_stops_at_the_module_root() {
        let tmp = module_tree();
        fs::write(tmp.path().join("forceloader.toml"), "").unwrap();

        let source = resolve_with(&tmp.path().join("app/graph"), None, None);
        assert_eq!(source, ConfigSource::Default);
        assert_eq!(source.path(), None);
    }

    #[test]
    fn outside_a_module_only_the_target_is_searched() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src/a");
        fs::create_dir_all(&src).unwrap();
        fs::write(tmp.path().join("forceloader.toml"), "").unwrap();

        assert_eq!(resolve_with(&src, None, None), ConfigSource::Default);

        fs::write(src.join("forceloader.toml"), "").unwrap();
        assert_eq!(
            resolve_with(&src, None, None),
            ConfigSource::Project(src.join("forceloader.toml"))
        );
    }

    #[test]
    fn single_file_target_searches_from_its_package() {
        let tmp = module_tree();
        let app = tmp.path().join("app");
        fs::write(app.join("forceloader.toml"), "").unwrap();
        let file = app.join("graph/schema.resolvers.go");
        fs::write(&file, "package graph\n").unwrap();

        assert_eq!(
            resolve_with(&file, None, None),
            ConfigSource::Project(app.join("forceloader.toml"))
        );
    }

    #[test]
    fn explicit_path_is_taken_as_is() {
        let tmp = module_tree();
        fs::write(tmp.path().join("app/forceloader.toml"), "").unwrap();
        let explicit = Path::new("/etc/forceloader/ci.toml");

        let source = resolve_with(&tmp.path().join("app"), Some(explicit), None);
        assert_eq!(source, ConfigSource::Explicit(explicit.to_path_buf()));
        assert_eq!(source.label(), "explicit");
    }

    #[test]
    fn global_config_is_the_last_resort() {
        let tmp = module_tree();
        let global = TempDir::new().unwrap();
        let app = tmp.path().join("app");

        assert_eq!(
            resolve_with(&app, None, Some(global.path())),
            ConfigSource::Default
        );

        fs::write(global.path().join("config.toml"), "").unwrap();
        assert_eq!(
            resolve_with(&app, None, Some(global.path())),
            ConfigSource::Global(global.path().join("config.toml"))
        );

        fs::write(app.join("forceloader.toml"), "").unwrap();
        assert!(matches!(
            resolve_with(&app, None, Some(global.path())),
            ConfigSource::Project(_)
        ));
    }
}
