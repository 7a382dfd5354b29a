//! Configuration types for forceloader.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::types::Severity;

/// Top-level configuration for forceloader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Classification policy active for the run.
    #[serde(default)]
    pub policy: PolicyKind,

    /// Severity assigned to every reported violation.
    #[serde(default)]
    pub severity: Severity,

    /// Positional rule for `nolint` comments on the preceding line.
    #[serde(default)]
    pub suppression: SuppressionMode,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Settings for the field-suffix policy.
    #[serde(default)]
    pub field_suffix: FieldSuffixConfig,

    /// Settings for the package-path policy.
    #[serde(default)]
    pub package_path: PackagePathConfig,
}

/// Which classification strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// Resolver types by name suffix, restricted surface by field type suffix.
    #[default]
    FieldSuffix,
    /// Resolver types by embedded marker, restricted surface by package path.
    PackagePath,
}

impl FromStr for PolicyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "field-suffix" => Ok(Self::FieldSuffix),
            "package-path" => Ok(Self::PackagePath),
            other => Err(ConfigError::Validation(format!("unknown policy '{other}'"))),
        }
    }
}

/// How a `nolint` comment on the line above a call is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuppressionMode {
    /// The comment must be alone on its line.
    #[default]
    Attached,
    /// As `Attached`, and the comment must start in the statement's column.
    SameColumn,
}

impl FromStr for SuppressionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "attached" => Ok(Self::Attached),
            "same-column" => Ok(Self::SameColumn),
            other => Err(ConfigError::Validation(format!(
                "unknown suppression mode '{other}'"
            ))),
        }
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis, matched against paths relative to the root.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: default_exclude(),
            respect_gitignore: true,
        }
    }
}

/// Settings for [`crate::FieldSuffixPolicy`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSuffixConfig {
    /// Suffix a type name must end with to be considered a resolver.
    #[serde(default = "default_resolver_suffix")]
    pub resolver_suffix: String,

    /// Suffix of the declared type of restricted `Resolver` fields.
    #[serde(default = "default_field_suffix")]
    pub restricted_field_suffix: String,

    /// Resolver type names (and field type names) exempted from checking.
    #[serde(default = "default_ignore_resolver_names")]
    pub ignore_resolver_names: Vec<String>,
}

impl Default for FieldSuffixConfig {
    fn default() -> Self {
        Self {
            resolver_suffix: default_resolver_suffix(),
            restricted_field_suffix: default_field_suffix(),
            ignore_resolver_names: default_ignore_resolver_names(),
        }
    }
}

/// Settings for [`crate::PackagePathPolicy`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackagePathConfig {
    /// Qualified name of the embedded marker type, e.g. `example.com/app/graph.Resolver`.
    #[serde(default)]
    pub resolver_marker_type: String,

    /// Package paths resolvers must not call into.
    #[serde(default)]
    pub restricted_packages: Vec<String>,

    /// Qualified type names exempted from resolver classification.
    #[serde(default)]
    pub ignore_resolver_markers: Vec<String>,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

fn default_exclude() -> Vec<String> {
    vec!["**/vendor/**".to_string(), "**/testdata/**".to_string()]
}

fn default_resolver_suffix() -> String {
    "Resolver".to_string()
}

fn default_field_suffix() -> String {
    "UseCase".to_string()
}

fn default_ignore_resolver_names() -> Vec<String> {
    vec!["queryResolver".to_string(), "mutationResolver".to_string()]
}

/// Splits a comma-separated option value, dropping empty entries.
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Applies a string-typed analyzer option.
    ///
    /// Recognized keys: `policy`, `suppression`, `resolverSuffix`,
    /// `resolverMarkerType`, `restrictedPackages`, `ignoreResolverMarkers`,
    /// `restrictedFieldSuffix` and `ignoreResolverNames`. List values are
    /// comma-separated.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys or invalid enum values.
    pub fn apply_option(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key.trim() {
            "policy" => self.policy = value.parse()?,
            "suppression" => self.suppression = value.parse()?,
            "resolverSuffix" => self.field_suffix.resolver_suffix = value.trim().to_string(),
            "restrictedFieldSuffix" => {
                self.field_suffix.restricted_field_suffix = value.trim().to_string();
            }
            "ignoreResolverNames" => self.field_suffix.ignore_resolver_names = split_list(value),
            "resolverMarkerType" => {
                self.package_path.resolver_marker_type = value.trim().to_string();
            }
            "restrictedPackages" => self.package_path.restricted_packages = split_list(value),
            "ignoreResolverMarkers" => {
                self.package_path.ignore_resolver_markers = split_list(value);
            }
            other => return Err(ConfigError::UnknownOption(other.to_string())),
        }
        Ok(())
    }

    /// Checks that the active policy has everything it needs.
    ///
    /// # Errors
    ///
    /// Returns a validation error describing the first missing setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.policy {
            PolicyKind::FieldSuffix => {
                if self.field_suffix.restricted_field_suffix.is_empty() {
                    return Err(ConfigError::Validation(
                        "field_suffix.restricted_field_suffix must not be empty".into(),
                    ));
                }
                if self.field_suffix.resolver_suffix.is_empty() {
                    return Err(ConfigError::Validation(
                        "field_suffix.resolver_suffix must not be empty".into(),
                    ));
                }
            }
            PolicyKind::PackagePath => {
                if self.package_path.resolver_marker_type.is_empty() {
                    return Err(ConfigError::Validation(
                        "package_path.resolver_marker_type is required by the package-path policy"
                            .into(),
                    ));
                }
                if self.package_path.restricted_packages.is_empty() {
                    return Err(ConfigError::Validation(
                        "package_path.restricted_packages is required by the package-path policy"
                            .into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Error parsing config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Unrecognized analyzer option key.
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    /// Config is structurally invalid.
    #[error("Invalid config: {0}")]
    Validation(String),
}
