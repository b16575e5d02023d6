//! Run configuration shared by the description builder and the template processor

use std::path::PathBuf;

use crate::core::error::{Error, Result};

/// Default directory holding the template tree
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// Default directory receiving the generated thrift files
pub const DEFAULT_OUTPUT_DIR: &str = "thrift";

/// Default switch name, used as the generation prefix
pub const DEFAULT_SWITCH_NAME: &str = "ichiban";

/// Marker that introduces a directive line inside a template
pub const DEFAULT_LINE_PREFIX: &str = "::";

/// Explicit configuration for one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Root of the template tree to mirror
    pub template_dir: PathBuf,
    /// Root of the generated tree; created on demand
    pub output_dir: PathBuf,
    /// Switch instance name, exposed to templates as `switch_prefix`
    pub name: String,
    /// Directive marker handed to the renderer
    pub line_prefix: String,
    /// Log per-file progress at info level
    pub verbose: bool,
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::config("switch name must not be empty"));
        }
        if self.line_prefix.trim().is_empty() {
            return Err(Error::config("template line prefix must not be empty"));
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            name: DEFAULT_SWITCH_NAME.to_string(),
            line_prefix: DEFAULT_LINE_PREFIX.to_string(),
            verbose: false,
        }
    }
}
