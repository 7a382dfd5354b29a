//! Check command implementation.

use anyhow::{Context, Result};
use forceloader_core::{Analyzer, Config, PolicyKind, SuppressionMode};
use forceloader_go::GoFrontend;
use std::path::PathBuf;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Command-line inputs of `forceloader check`.
#[derive(Debug)]
pub struct CheckArgs {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub policy: Option<PolicyKind>,
    pub suppression: Option<SuppressionMode>,
    pub options: Vec<(String, String)>,
    pub exclude: Vec<String>,
    pub strict: bool,
}

/// Runs the check command. Returns `true` when error-level violations were found.
pub fn run(args: &CheckArgs, source: &ConfigSource) -> Result<bool> {
    let config = load_config(args, source)?;

    let analyzer = Analyzer::builder()
        .root(&args.path)
        .frontend(GoFrontend::new())
        .config(config)
        .excludes(args.exclude.iter().cloned())
        .fail_on_parse_error(args.strict)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {:?} with the {:?} policy",
        analyzer.root(),
        analyzer.config().policy
    );

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, args.format, analyzer.root())?;

    Ok(result.has_errors())
}

fn load_config(args: &CheckArgs, source: &ConfigSource) -> Result<Config> {
    let mut config = match source {
        ConfigSource::Default => Config::default(),
        other => {
            let p = other.path().context("resolved config has no path")?;
            tracing::info!("Using {} config: {}", other.label(), p.display());
            Config::from_file(p)
                .with_context(|| format!("Failed to load config: {}", p.display()))?
        }
    };

    if let Some(policy) = args.policy {
        config.policy = policy;
    }
    if let Some(suppression) = args.suppression {
        config.suppression = suppression;
    }
    for (key, value) in &args.options {
        config
            .apply_option(key, value)
            .with_context(|| format!("Invalid option {key}={value}"))?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(options: &[(&str, &str)]) -> CheckArgs {
        CheckArgs {
            path: PathBuf::from("."),
            format: OutputFormat::Compact,
            policy: None,
            suppression: None,
            options: options
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            exclude: Vec::new(),
            strict: false,
        }
    }

    #[test]
    fn options_override_config_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("forceloader.toml");
        fs::write(
            &file,
            r#"
policy = "field-suffix"

[field_suffix]
restricted_field_suffix = "Service"
"#,
        )
        .unwrap();

        let mut check = args(&[
            ("restrictedFieldSuffix", "UseCase"),
            ("ignoreResolverNames", "queryResolver"),
        ]);
        check.suppression = Some(SuppressionMode::SameColumn);

        let config = load_config(&check, &ConfigSource::Project(file)).unwrap();
        assert_eq!(config.field_suffix.restricted_field_suffix, "UseCase");
        assert_eq!(config.field_suffix.ignore_resolver_names, vec!["queryResolver"]);
        assert_eq!(config.suppression, SuppressionMode::SameColumn);
    }

    #[test]
    fn policy_flag_wins_over_default() {
        let mut check = args(&[]);
        check.policy = Some(PolicyKind::PackagePath);
        let config = load_config(&check, &ConfigSource::Default).unwrap();
        assert_eq!(config.policy, PolicyKind::PackagePath);
    }

    #[test]
    fn unknown_option_is_an_error() {
        let err = load_config(&args(&[("maxDepth", "3")]), &ConfigSource::Default).unwrap_err();
        assert!(err.to_string().contains("maxDepth=3"));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let source = ConfigSource::Explicit(PathBuf::from("/nonexistent/forceloader.toml"));
        assert!(load_config(&args(&[]), &source).is_err());
    }
}
