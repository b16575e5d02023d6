//! Template tree discovery
//!
//! Walks the template root in lexical order and yields every file, either as
//! a [`TemplateEntry`] with its mirrored output path or as an ignored name.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use super::rules::IgnoreRule;
use crate::core::error::{Error, Result};

/// One template file found under the template root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    /// Absolute (or root-joined) path of the template file
    pub source_path: PathBuf,
    /// Path relative to the template root; doubles as the template's identifier
    pub relative_path: PathBuf,
    /// `output_root` joined with `relative_path`
    pub output_path: PathBuf,
}

/// What the walk found at one file position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovered {
    Template(TemplateEntry),
    /// Relative path of a file rejected by the ignore rule
    Ignored(PathBuf),
}

/// Lazily walks a template tree; each item is produced right before it is consumed
pub struct TemplateWalker<'a> {
    template_root: PathBuf,
    output_root: PathBuf,
    rule: &'a IgnoreRule,
    inner: walkdir::IntoIter,
}

impl<'a> TemplateWalker<'a> {
    pub fn new(template_root: &Path, output_root: &Path, rule: &'a IgnoreRule) -> Result<Self> {
        let metadata = fs::metadata(template_root).map_err(|e| Error::io(template_root, e))?;
        if !metadata.is_dir() {
            return Err(Error::io(
                template_root,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "template root is not a directory",
                ),
            ));
        }

        let inner = WalkDir::new(template_root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        Ok(Self {
            template_root: template_root.to_path_buf(),
            output_root: output_root.to_path_buf(),
            rule,
            inner,
        })
    }

    fn classify(&self, entry: walkdir::DirEntry) -> Result<Option<Discovered>> {
        if !is_template_file(&entry) {
            return Ok(None);
        }

        let relative_path = entry
            .path()
            .strip_prefix(&self.template_root)
            .map_err(|e| {
                Error::io(
                    entry.path(),
                    io::Error::new(io::ErrorKind::InvalidData, e.to_string()),
                )
            })?
            .to_path_buf();

        if self.rule.is_ignored(entry.file_name()) {
            return Ok(Some(Discovered::Ignored(relative_path)));
        }

        Ok(Some(Discovered::Template(TemplateEntry {
            source_path: entry.path().to_path_buf(),
            output_path: self.output_root.join(&relative_path),
            relative_path,
        })))
    }
}

impl Iterator for TemplateWalker<'_> {
    type Item = Result<Discovered>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.template_root.clone());
                    return Some(Err(Error::io(path, io::Error::from(e))));
                }
            };

            match self.classify(entry) {
                Ok(Some(discovered)) => return Some(Ok(discovered)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Regular files and symlinks that resolve to regular files
fn is_template_file(entry: &walkdir::DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    if entry.path_is_symlink() {
        let resolves_to_file = fs::metadata(entry.path())
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !resolves_to_file {
            debug!(path = %entry.path().display(), "Skipping symlink that is not a file");
        }
        return resolves_to_file;
    }
    false
}
