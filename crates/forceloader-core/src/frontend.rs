//! Frontend abstraction.
//!
//! A frontend turns source text into a [`CompilationUnit`]. Implement
//! [`LanguageFrontend`] to teach forceloader a new language.

use std::path::{Path, PathBuf};

use crate::program::CompilationUnit;

/// Errors raised by a frontend for a single file.
#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    /// The grammar could not be loaded.
    #[error("failed to load {language} grammar: {message}")]
    Language {
        /// Language identifier.
        language: &'static str,
        /// Underlying error message.
        message: String,
    },

    /// The file could not be parsed at all.
    #[error("failed to parse {path}")]
    Parse {
        /// Path of the file.
        path: PathBuf,
    },
}

/// Trait for language-specific parsing into the program model.
pub trait LanguageFrontend: Send + Sync {
    /// Language identifier (e.g., `"go"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this frontend handles (e.g., `&[".go"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Returns false for files that have a supported extension but should
    /// still be skipped (generated code, test files, ...).
    fn accepts(&self, _path: &Path) -> bool {
        true
    }

    /// Parses one file.
    ///
    /// * `root` - analysis root, used to derive package paths
    /// * `path` - absolute path of the file
    /// * `source` - file contents
    ///
    /// # Errors
    ///
    /// Returns an error if no usable tree could be produced.
    fn parse(&self, root: &Path, path: &Path, source: &str)
        -> Result<CompilationUnit, FrontendError>;
}

/// Type alias for boxed frontends.
pub type FrontendBox = Box<dyn LanguageFrontend>;
