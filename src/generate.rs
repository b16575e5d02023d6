//! End-to-end generation run

use std::path::PathBuf;

use crate::core::{GeneratorConfig, Result};
use crate::description::{FileFragmentLoader, build_render_context};
use crate::templates::{GenerationReport, TemplateTreeProcessor, TeraTemplateRenderer};

/// Generates the thrift tree for one switch.
///
/// Builds the render context from `sources` (merged in the order given) and
/// renders every template under `config.template_dir` into the mirrored path
/// under `config.output_dir`.
///
/// # Errors
/// - `Config` if the configuration is invalid or `sources` is empty
/// - `Load` if a description fragment cannot be read or parsed
/// - `Render` naming the first template that failed to render
/// - `Io` if the template tree cannot be walked or an output cannot be written
///
/// # Examples
/// ```no_run
/// use std::path::PathBuf;
/// use thriftgen::{GeneratorConfig, generate};
///
/// # fn example() -> thriftgen::Result<()> {
/// let config = GeneratorConfig {
///     name: "leaf1".to_string(),
///     ..Default::default()
/// };
/// let report = generate(&config, &[PathBuf::from("switch.yml")])?;
/// println!("rendered {} files", report.rendered.len());
/// # Ok(())
/// # }
/// ```
pub fn generate(config: &GeneratorConfig, sources: &[PathBuf]) -> Result<GenerationReport> {
    config.validate()?;

    let context = build_render_context(sources, &config.name, &FileFragmentLoader::new())?;

    TemplateTreeProcessor::new(TeraTemplateRenderer::new(), config).process(
        &config.template_dir,
        &config.output_dir,
        &context,
    )
}
