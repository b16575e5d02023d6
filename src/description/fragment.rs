//! Description fragment loading
//!
//! A fragment is one YAML source file (JSON works too, being a YAML subset).
//! A file may carry several `---` separated documents; each non-empty document
//! must be a mapping and is merged in the order it appears. YAML merge keys
//! (`<<`) are resolved within each document before merging.

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result};

/// One loaded description source, ready to merge
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Where the fragment came from, used in error messages
    pub source: PathBuf,
    /// Top-level mappings in document order
    pub documents: Vec<Map<String, JsonValue>>,
}

impl Fragment {
    /// Parse fragment content that has already been read from `source`.
    pub fn parse(source: &Path, content: &str) -> Result<Self> {
        let mut documents = Vec::new();

        for (index, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
            let mut value = serde_yaml::Value::deserialize(document).map_err(|e| {
                Error::load(source, format!("invalid YAML in document {}: {e}", index + 1))
            })?;
            value.apply_merge().map_err(|e| {
                Error::load(source, format!("invalid merge key in document {}: {e}", index + 1))
            })?;

            match value {
                serde_yaml::Value::Null => continue,
                serde_yaml::Value::Mapping(_) => {}
                other => {
                    return Err(Error::load(
                        source,
                        format!(
                            "document {} must be a mapping at the top level, found {}",
                            index + 1,
                            yaml_type_name(&other)
                        ),
                    ));
                }
            }

            let converted = serde_json::to_value(&value).map_err(|e| {
                Error::load(
                    source,
                    format!("document {} cannot be exposed to templates: {e}", index + 1),
                )
            })?;
            match converted {
                JsonValue::Object(map) => documents.push(map),
                _ => {
                    return Err(Error::load(
                        source,
                        format!("document {} did not convert to a mapping", index + 1),
                    ));
                }
            }
        }

        Ok(Self {
            source: source.to_path_buf(),
            documents,
        })
    }
}

fn yaml_type_name(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

/// Turns a source identifier into a parsed [`Fragment`]
pub trait FragmentLoader {
    fn load(&self, source: &Path) -> Result<Fragment>;
}

/// Loads fragments from local files
pub struct FileFragmentLoader;

impl FileFragmentLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileFragmentLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentLoader for FileFragmentLoader {
    fn load(&self, source: &Path) -> Result<Fragment> {
        let content = fs::read_to_string(source)
            .map_err(|e| Error::load(source, format!("cannot read file: {e}")))?;
        Fragment::parse(source, &content)
    }
}
