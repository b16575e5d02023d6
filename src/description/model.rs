//! Merged in-memory switch description

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use super::fragment::Fragment;

/// The merged description of one switch.
///
/// Built once from an ordered list of fragments and never mutated afterwards.
/// Merge order is part of the contract: mappings merge key by key at every
/// depth, and for any other value the later fragment wins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchDescription {
    name: String,
    content: Map<String, JsonValue>,
}

impl SwitchDescription {
    /// Merge `fragments` in order into an empty description, then assign `name`.
    pub fn from_fragments(name: &str, fragments: &[Fragment]) -> Self {
        let mut content = Map::new();
        for fragment in fragments {
            for document in &fragment.documents {
                debug!(
                    source = %fragment.source.display(),
                    keys = document.len(),
                    "Merging description document"
                );
                merge_mappings(&mut content, document, "");
            }
        }

        Self {
            name: name.to_string(),
            content,
        }
    }

    /// Switch name, used as the generation prefix
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Accumulated description data
    pub fn content(&self) -> &Map<String, JsonValue> {
        &self.content
    }

    /// Look up a top-level description entry
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.content.get(key)
    }
}

/// Merge `overlay` into `base`. Nested mappings merge recursively; anything else is replaced.
pub fn merge_mappings(
    base: &mut Map<String, JsonValue>,
    overlay: &Map<String, JsonValue>,
    path: &str,
) {
    for (key, incoming) in overlay {
        let key_path = if path.is_empty() {
            key.clone()
        } else {
            format!("{path}.{key}")
        };

        let Some(existing) = base.get_mut(key) else {
            base.insert(key.clone(), incoming.clone());
            continue;
        };

        match (existing, incoming) {
            (JsonValue::Object(existing), JsonValue::Object(incoming)) => {
                merge_mappings(existing, incoming, &key_path);
            }
            (existing, incoming) => {
                if *existing != *incoming {
                    debug!(key = %key_path, "Description entry overridden by later fragment");
                }
                *existing = incoming.clone();
            }
        }
    }
}
