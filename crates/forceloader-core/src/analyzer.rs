//! Loads a source tree into a [`Program`] and runs the analysis over it.

use crate::config::{Config, ConfigError};
use crate::frontend::{FrontendBox, FrontendError, LanguageFrontend};
use crate::program::Program;
use crate::run::AnalysisRun;
use crate::types::LintResult;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error walking the source tree.
    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] ignore::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A file could not be parsed and parse errors are fatal.
    #[error("Frontend error in {path}: {source}")]
    Frontend {
        /// Path to the file.
        path: PathBuf,
        /// Underlying frontend error.
        source: FrontendError,
    },

    /// The analyzer is missing required settings; no diagnostics are produced.
    #[error("Initialization failed: {0}")]
    Initialization(String),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    frontends: Vec<FrontendBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Registers a language frontend.
    #[must_use]
    pub fn frontend<F: LanguageFrontend + 'static>(mut self, frontend: F) -> Self {
        self.frontends.push(Box::new(frontend));
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete for the selected
    /// policy, no frontend is registered, or an exclude pattern is invalid.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        config
            .validate()
            .map_err(|e| AnalyzerError::Initialization(e.to_string()))?;

        if self.frontends.is_empty() {
            return Err(AnalyzerError::Initialization(
                "no language frontend registered".into(),
            ));
        }

        let root = self.root.unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        let exclude = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Analyzer {
            root,
            frontends: self.frontends,
            exclude,
            config,
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// Discovers, parses and checks every supported file under a root.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    frontends: Vec<FrontendBox>,
    exclude: Vec<glob::Pattern>,
    config: Config,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Loads, classifies and checks the whole tree.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, a file cannot be read, or
    /// a file cannot be parsed while parse errors are fatal.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let program = self.load()?;
        let run = AnalysisRun::new(&program, &self.config)?;

        let mut result = LintResult::new();
        result.files_checked = program.len();
        result.violations = run.check();
        result.sort();

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Parses every discovered file into a [`Program`].
    ///
    /// Files that fail to parse are skipped with a warning unless parse
    /// errors are fatal.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery or reading fails, or on a fatal parse error.
    pub fn load(&self) -> Result<Program, AnalyzerError> {
        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let mut units = Vec::with_capacity(files.len());
        for path in &files {
            let Some(frontend) = self.frontend_for(path) else {
                continue;
            };
            debug!("Parsing {} as {}", path.display(), frontend.language_id());

            let source = std::fs::read_to_string(path)?;
            match frontend.parse(&self.root, path, &source) {
                Ok(unit) => units.push(unit),
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Frontend {
                            path: path.clone(),
                            source: e,
                        });
                    }
                }
            }
        }

        Ok(Program::new(units))
    }

    fn frontend_for(&self, path: &Path) -> Option<&dyn LanguageFrontend> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))?;
        self.frontends
            .iter()
            .find(|f| f.extensions().contains(&ext.as_str()) && f.accepts(path))
            .map(|f| &**f)
    }

    /// Discovers all source files handled by a registered frontend.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(self.config.analyzer.respect_gitignore);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || self.frontend_for(path).is_none() {
                continue;
            }
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }
            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks a path, relative to the root, against the exclude patterns.
    fn should_exclude(&self, path: &Path) -> bool {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        let rel_str = rel.to_string_lossy();

        self.exclude.iter().any(|pattern| {
            if pattern.matches(&rel_str) {
                return true;
            }
            // "**/vendor/**" also excludes a top-level vendor directory
            let clean = pattern.as_str().replace("**/", "").replace("/**", "");
            !clean.is_empty()
                && !clean.contains('*')
                && rel
                    .parent()
                    .is_some_and(|dir| dir.components().any(|c| c.as_os_str() == clean.as_str()))
        })
    }
}
