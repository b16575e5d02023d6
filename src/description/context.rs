//! Render context derived from a switch description

use serde_json::{Map, Value as JsonValue};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use super::fragment::FragmentLoader;
use super::model::SwitchDescription;
use crate::core::error::{Error, Result};

/// Context key under which templates see the switch description
pub const DESCRIPTION_KEY: &str = "air";

/// Context key under which templates see the switch name prefix
pub const SWITCH_PREFIX_KEY: &str = "switch_prefix";

/// Named values handed, unchanged, to every template render call of a run
#[derive(Debug, Clone)]
pub struct RenderContext {
    description: Arc<SwitchDescription>,
    variables: Map<String, JsonValue>,
}

impl RenderContext {
    /// Derive the context from a fully merged description.
    pub fn from_description(description: Arc<SwitchDescription>) -> Self {
        let mut variables = Map::new();
        variables.insert(
            DESCRIPTION_KEY.to_string(),
            serde_json::json!({
                "name": description.name(),
                "content": description.content(),
            }),
        );
        variables.insert(
            SWITCH_PREFIX_KEY.to_string(),
            JsonValue::String(description.name().to_string()),
        );

        Self {
            description,
            variables,
        }
    }

    pub fn description(&self) -> &SwitchDescription {
        &self.description
    }

    pub fn switch_prefix(&self) -> &str {
        self.description.name()
    }

    /// All context entries, keyed by the name templates use
    pub fn variables(&self) -> &Map<String, JsonValue> {
        &self.variables
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.variables.get(key)
    }
}

/// Load `sources` in order with `loader`, merge them under `name` and derive the render context.
///
/// Nothing is returned unless every fragment loaded; the context is only
/// derived after the last merge.
pub fn build_render_context(
    sources: &[PathBuf],
    name: &str,
    loader: &dyn FragmentLoader,
) -> Result<RenderContext> {
    if sources.is_empty() {
        return Err(Error::config("at least one description source is required"));
    }
    if name.is_empty() {
        return Err(Error::config("switch name must not be empty"));
    }

    let fragments = sources
        .iter()
        .map(|source| {
            debug!(source = %source.display(), "Loading description fragment");
            loader.load(source)
        })
        .collect::<Result<Vec<_>>>()?;

    let description = Arc::new(SwitchDescription::from_fragments(name, &fragments));
    info!(
        switch = %description.name(),
        fragments = fragments.len(),
        entries = description.content().len(),
        "Built switch description"
    );

    Ok(RenderContext::from_description(description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::description::fragment::Fragment;
    use serde_json::json;
    use std::collections::HashMap;
    use std::path::Path;

    /// Serves fragment content from memory
    struct MemoryLoader(HashMap<PathBuf, String>);

    impl MemoryLoader {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(path, content)| (PathBuf::from(path), content.to_string()))
                    .collect(),
            )
        }
    }

    impl FragmentLoader for MemoryLoader {
        fn load(&self, source: &Path) -> Result<Fragment> {
            let content = self
                .0
                .get(source)
                .ok_or_else(|| Error::load(source, "no such fragment"))?;
            Fragment::parse(source, content)
        }
    }

    #[test]
    fn test_context_exposes_description_and_prefix() {
        let loader = MemoryLoader::new(&[("switch.yml", "ports: 64\n")]);
        let context =
            build_render_context(&[PathBuf::from("switch.yml")], "leaf1", &loader).unwrap();

        assert_eq!(context.description().name(), "leaf1");
        assert_eq!(context.switch_prefix(), "leaf1");
        assert_eq!(context.get(SWITCH_PREFIX_KEY), Some(&json!("leaf1")));
        assert_eq!(context.get(DESCRIPTION_KEY).unwrap()["name"], json!("leaf1"));
        assert_eq!(
            context.get(DESCRIPTION_KEY).unwrap()["content"]["ports"],
            json!(64)
        );
        assert_eq!(context.description().get("ports"), Some(&json!(64)));
    }

    #[test]
    fn test_sources_merge_in_given_order() {
        let loader = MemoryLoader::new(&[("a.yml", "speed: 10G\n"), ("b.yml", "speed: 40G\n")]);

        let ab = build_render_context(
            &[PathBuf::from("a.yml"), PathBuf::from("b.yml")],
            "s",
            &loader,
        )
        .unwrap();
        let ba = build_render_context(
            &[PathBuf::from("b.yml"), PathBuf::from("a.yml")],
            "s",
            &loader,
        )
        .unwrap();

        assert_eq!(ab.description().get("speed"), Some(&json!("40G")));
        assert_eq!(ba.description().get("speed"), Some(&json!("10G")));
    }

    #[test]
    fn test_same_inputs_give_equal_context() {
        let loader = MemoryLoader::new(&[("a.yml", "x: {y: 1, z: [1, 2]}\n")]);
        let sources = [PathBuf::from("a.yml")];

        let first = build_render_context(&sources, "s", &loader).unwrap();
        let second = build_render_context(&sources, "s", &loader).unwrap();
        assert_eq!(first.variables(), second.variables());
    }

    #[test]
    fn test_empty_sources_is_config_error() {
        let loader = MemoryLoader::new(&[]);
        let err = build_render_context(&[], "s", &loader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_empty_name_is_config_error() {
        let loader = MemoryLoader::new(&[("a.yml", "a: 1\n")]);
        let err = build_render_context(&[PathBuf::from("a.yml")], "", &loader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_whitespace_name_is_kept_verbatim() {
        let loader = MemoryLoader::new(&[("a.yml", "a: 1\n")]);
        let context = build_render_context(&[PathBuf::from("a.yml")], " ", &loader).unwrap();
        assert_eq!(context.switch_prefix(), " ");
        assert_eq!(context.get(DESCRIPTION_KEY).unwrap()["name"], json!(" "));
    }

    #[test]
    fn test_unloadable_fragment_is_load_error() {
        let loader = MemoryLoader::new(&[("a.yml", "a: 1\n"), ("bad.yml", "- not a map\n")]);
        let err = build_render_context(
            &[PathBuf::from("a.yml"), PathBuf::from("bad.yml")],
            "s",
            &loader,
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Load);
        assert_eq!(err.path(), Some(Path::new("bad.yml")));
    }
}
