//! Error handling for the thriftgen generation library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. Every variant is fatal to a
//! generation run; callers only ever need to report them.
//!
//! # Examples
//!
//! ```
//! use thriftgen::core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     // Operations that might fail...
//!     Ok(())
//! }
//! ```

use std::error::Error as StdError;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for thriftgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Load,
    Render,
    Io,
}

/// Main error type for thriftgen operations
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing run configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A description fragment could not be read or parsed
    #[error("Failed to load description fragment {}: {message}", .source_path.display())]
    Load {
        source_path: PathBuf,
        message: String,
    },

    /// The template engine failed on a specific template
    #[error("Failed to render template {}: {message}", .template.display())]
    Render { template: PathBuf, message: String },

    /// Directory or file creation failure under the output root
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new fragment load error
    pub fn load<P: Into<PathBuf>, S: Into<String>>(source_path: P, msg: S) -> Self {
        Self::Load {
            source_path: source_path.into(),
            message: msg.into(),
        }
    }

    /// Create a new render error for the template at `template` (relative to the template root)
    pub fn render<P: Into<PathBuf>, S: Into<String>>(template: P, msg: S) -> Self {
        Self::Render {
            template: template.into(),
            message: msg.into(),
        }
    }

    /// Create a new I/O error attributed to `path`
    pub fn io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Load { .. } => ErrorKind::Load,
            Self::Render { .. } => ErrorKind::Render,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// The fragment, template or output path this error is about, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Config(_) => None,
            Self::Load { source_path, .. } => Some(source_path.as_path()),
            Self::Render { template, .. } => Some(template.as_path()),
            Self::Io { path, .. } => Some(path.as_path()),
        }
    }
}

/// Flatten an error and all of its sources into one line.
///
/// Tera reports the interesting part of a failure (the undefined variable,
/// the parse position) in the source chain, not in the top-level message.
pub fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        current = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_config_creation() {
        let error = Error::config("switch name must not be empty");
        assert_eq!(error.kind(), ErrorKind::Config);
        assert!(error.path().is_none());
        assert_eq!(
            error.to_string(),
            "Configuration error: switch name must not be empty"
        );
    }

    #[test]
    fn test_error_load_names_fragment() {
        let error = Error::load("air/ports.yml", "expected a mapping");
        assert_eq!(error.kind(), ErrorKind::Load);
        assert_eq!(error.path(), Some(Path::new("air/ports.yml")));
        assert!(error.to_string().contains("air/ports.yml"));
        assert!(error.to_string().contains("expected a mapping"));
    }

    #[test]
    fn test_error_render_names_template() {
        let error = Error::render("pd/pd.thrift", "Variable `air` not found");
        assert_eq!(error.kind(), ErrorKind::Render);
        assert_eq!(
            error.to_string(),
            "Failed to render template pd/pd.thrift: Variable `air` not found"
        );
    }

    #[test]
    fn test_error_io_keeps_source() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let error = Error::io("thrift/pd", io_error);
        assert_eq!(error.kind(), ErrorKind::Io);
        assert!(error.source().is_some());
        assert!(error.to_string().contains("thrift/pd"));
        assert!(error.to_string().contains("denied"));
    }

    #[test]
    fn test_error_chain_includes_causes() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "missing");
        let error = Error::io("out", io_error);
        let chain = error_chain(&error);
        assert!(chain.starts_with("I/O error on out"));
        assert!(chain.ends_with(": missing"));
    }
}
