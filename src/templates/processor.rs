//! Template tree processor
//!
//! Mirrors the template tree into the output tree: every non-ignored file is
//! rendered to the same relative path under the output root. The walk is
//! strictly sequential and stops at the first error; files already written
//! stay in place.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::renderer::TemplateRenderer;
use super::rules::IgnoreRule;
use super::walker::{Discovered, TemplateEntry, TemplateWalker};
use crate::core::config::GeneratorConfig;
use crate::core::error::{Error, Result};
use crate::description::RenderContext;

/// Outcome of a completed run, as paths relative to the template root in walk order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub rendered: Vec<PathBuf>,
    pub ignored: Vec<PathBuf>,
}

/// Walks a template tree and renders each template into the mirrored output location
pub struct TemplateTreeProcessor<R: TemplateRenderer> {
    renderer: R,
    ignore: IgnoreRule,
    line_prefix: String,
    verbose: bool,
}

impl<R: TemplateRenderer> TemplateTreeProcessor<R> {
    pub fn new(renderer: R, config: &GeneratorConfig) -> Self {
        Self {
            renderer,
            ignore: IgnoreRule::new(),
            line_prefix: config.line_prefix.clone(),
            verbose: config.verbose,
        }
    }

    #[cfg(test)]
    fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Render every non-ignored file under `template_root` into `output_root`.
    pub fn process(
        &self,
        template_root: &Path,
        output_root: &Path,
        context: &RenderContext,
    ) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();
        let mut written = WrittenOutputs::default();

        for discovered in TemplateWalker::new(template_root, output_root, &self.ignore)? {
            match discovered? {
                Discovered::Ignored(relative_path) => {
                    debug!(path = %relative_path.display(), "Ignoring non-template file");
                    report.ignored.push(relative_path);
                }
                Discovered::Template(entry) => {
                    self.process_entry(&entry, template_root, context, &mut written)?;
                    report.rendered.push(entry.relative_path);
                }
            }
        }

        info!(
            rendered = report.rendered.len(),
            ignored = report.ignored.len(),
            output = %output_root.display(),
            "Template tree processed"
        );
        Ok(report)
    }

    fn process_entry(
        &self,
        entry: &TemplateEntry,
        template_root: &Path,
        context: &RenderContext,
        written: &mut WrittenOutputs,
    ) -> Result<()> {
        if self.verbose {
            info!(
                template = %entry.source_path.display(),
                target = %entry.output_path.display(),
                "Rendering template"
            );
        } else {
            debug!(
                template = %entry.source_path.display(),
                target = %entry.output_path.display(),
                "Rendering template"
            );
        }

        // Render fully before touching the destination so a failing template
        // never leaves a truncated file behind.
        let mut rendered = Vec::new();
        self.renderer.render(
            &mut rendered,
            &entry.relative_path,
            context,
            template_root,
            &self.line_prefix,
        )?;

        if let Some(parent) = entry.output_path.parent() {
            ensure_directory(parent)?;
        }

        written.claim(&entry.output_path)?;

        let mut file =
            fs::File::create(&entry.output_path).map_err(|e| Error::io(&entry.output_path, e))?;
        file.write_all(&rendered)
            .and_then(|()| file.flush())
            .map_err(|e| Error::io(&entry.output_path, e))?;

        written.record(&file);
        Ok(())
    }
}

/// Create `path` and its ancestors.
///
/// "Already exists" is success only when the thing that exists is a
/// directory; every other failure is returned.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }

    match fs::create_dir_all(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Output directory ready");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Destinations that already received output during this run
#[derive(Default)]
struct WrittenOutputs {
    paths: HashSet<PathBuf>,
    #[cfg(unix)]
    files: HashSet<(u64, u64)>,
}

impl WrittenOutputs {
    /// Fail if `path` would overwrite output produced earlier in the run
    fn claim(&mut self, path: &Path) -> Result<()> {
        if !self.paths.insert(path.to_path_buf()) || self.is_known_file(path) {
            return Err(Error::io(
                path,
                io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "output path collides with a file already generated in this run",
                ),
            ));
        }
        Ok(())
    }

    #[cfg(unix)]
    fn is_known_file(&self, path: &Path) -> bool {
        use std::os::unix::fs::MetadataExt;

        fs::metadata(path)
            .map(|m| self.files.contains(&(m.dev(), m.ino())))
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    fn is_known_file(&self, _path: &Path) -> bool {
        false
    }

    #[cfg(unix)]
    fn record(&mut self, file: &fs::File) {
        use std::os::unix::fs::MetadataExt;

        if let Ok(m) = file.metadata() {
            self.files.insert((m.dev(), m.ino()));
        }
    }

    #[cfg(not(unix))]
    fn record(&mut self, _file: &fs::File) {}
}
