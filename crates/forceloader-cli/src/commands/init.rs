//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# forceloader configuration

# "field-suffix" or "package-path"
policy = "field-suffix"
severity = "error"
# "attached" or "same-column"
suppression = "attached"

[analyzer]
# root = "."
exclude = [
    "**/vendor/**",
    "**/testdata/**",
]
respect_gitignore = true

[field_suffix]
resolver_suffix = "Resolver"
restricted_field_suffix = "UseCase"
ignore_resolver_names = ["queryResolver", "mutationResolver"]

# [package_path]
# resolver_marker_type = "example.com/app/graph.Resolver"
# restricted_packages = ["example.com/app/usecase"]
# ignore_resolver_markers = []
"#;

const CONFIG_FILE: &str = "forceloader.toml";

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_FILE), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to match your resolver and use case layout");
    println!("  2. Run: forceloader check ./graph");

    Ok(())
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    std::fs::write(path, DEFAULT_CONFIG)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use forceloader_core::{Config, PolicyKind};
    use tempfile::TempDir;

    #[test]
    fn template_is_a_valid_config() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.policy, PolicyKind::FieldSuffix);
        assert_eq!(
            config.field_suffix.ignore_resolver_names,
            vec!["queryResolver", "mutationResolver"]
        );
        config.validate().unwrap();
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        std::fs::write(&path, "policy = \"package-path\"\n").unwrap();

        assert!(write_config(&path, false).is_err());
        assert!(std::fs::read_to_string(&path).unwrap().contains("package-path"));

        write_config(&path, true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("field-suffix"));
    }
}
