//! Template rendering collaborator
//!
//! The processor only needs "render this template into this sink"; the tera
//! implementation below adds the directive-line syntax and resolves includes
//! against the template root.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path};
use tera::{Context, Tera};
use tracing::debug;

use crate::core::error::{Error, Result, error_chain};
use crate::description::RenderContext;

/// Top-level tera constructs, scanned left to right.
///
/// Comments, raw blocks and expressions are matched only to be skipped; the
/// body of a statement tag is captured in group 1.
static TEMPLATE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)\{#.*?#\}|\{%-?\s*raw\s*-?%\}.*?\{%-?\s*endraw\s*-?%\}|\{\{.*?\}\}|\{%(.*?)%\}",
    )
    .unwrap()
});

/// `include`, `extends` or `import` at the start of a statement tag body
static TEMPLATE_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^-?\s*(?:include|extends|import)\s+(?:"([^"]+)"|'([^']+)'|`([^`]+)`)"#)
        .unwrap()
});

/// Renders one template into a sink
pub trait TemplateRenderer {
    /// Render `template` (relative to `search_root`) with `context` into `sink`.
    ///
    /// Lines whose first non-blank characters are `line_prefix` hold
    /// directives rather than literal output.
    fn render(
        &self,
        sink: &mut dyn Write,
        template: &Path,
        context: &RenderContext,
        search_root: &Path,
        line_prefix: &str,
    ) -> Result<()>;
}

/// Tera-based template renderer
pub struct TeraTemplateRenderer;

impl TeraTemplateRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TeraTemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for TeraTemplateRenderer {
    fn render(
        &self,
        sink: &mut dyn Write,
        template: &Path,
        context: &RenderContext,
        search_root: &Path,
        line_prefix: &str,
    ) -> Result<()> {
        let name = template_name(template);
        let sources = load_with_dependencies(&name, search_root, line_prefix)
            .map_err(|e| Error::render(template, e))?;

        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(sources.iter())
            .map_err(|e| Error::render(template, error_chain(&e)))?;

        let tera_context = Context::from_value(serde_json::Value::Object(
            context.variables().clone(),
        ))
        .map_err(|e| Error::render(template, error_chain(&e)))?;

        tera.render_to(&name, &tera_context, sink)
            .map_err(|e| Error::render(template, error_chain(&e)))
    }
}

/// Tera template name for a path relative to the template root, always `/` separated
fn template_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Rewrite directive lines into tera statement tags.
///
/// A directive line's remainder becomes `{% ... %}` and the line itself,
/// newline included, produces no output. Every other line is kept verbatim.
pub fn translate_line_prefix(source: &str, line_prefix: &str) -> String {
    let mut translated = String::with_capacity(source.len());

    for line in source.split_inclusive('\n') {
        let Some(statement) = line
            .trim_start_matches([' ', '\t'])
            .strip_prefix(line_prefix)
        else {
            translated.push_str(line);
            continue;
        };

        let statement = statement.trim();
        if !statement.is_empty() {
            translated.push_str("{% ");
            translated.push_str(statement);
            translated.push_str(" %}");
        }
    }

    translated
}

/// Templates named by `include`, `extends` and `import` statements of `source`.
///
/// References inside comments, raw blocks and string literals of other tags
/// are not statements and are not reported.
fn template_references(source: &str) -> Vec<String> {
    TEMPLATE_TAG
        .captures_iter(source)
        .filter_map(|tag| tag.get(1))
        .filter_map(|body| TEMPLATE_REFERENCE.captures(body.as_str()))
        .filter_map(|reference| {
            reference
                .iter()
                .skip(1)
                .flatten()
                .next()
                .map(|m| m.as_str().to_string())
        })
        .collect()
}

/// Load `name` and every template it transitively references from `search_root`.
///
/// Missing references are left out so tera can report them, or skip them for
/// `ignore missing` includes.
fn load_with_dependencies(
    name: &str,
    search_root: &Path,
    line_prefix: &str,
) -> std::result::Result<BTreeMap<String, String>, String> {
    let mut loaded = BTreeMap::new();
    let mut pending = VecDeque::from([name.to_string()]);

    while let Some(current) = pending.pop_front() {
        if loaded.contains_key(&current) {
            continue;
        }

        let path = search_root.join(&current);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound && current != name => {
                debug!(template = %current, "Referenced template not found under template root");
                continue;
            }
            Err(e) => return Err(format!("cannot read {}: {e}", path.display())),
        };

        let source = translate_line_prefix(&raw, line_prefix);
        for referenced in template_references(&source) {
            if !loaded.contains_key(&referenced) {
                pending.push_back(referenced);
            }
        }

        loaded.insert(current, source);
    }

    Ok(loaded)
}
