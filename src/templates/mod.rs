//! Template tree processing: discovery, filtering, rendering and output.

pub mod processor;
pub mod renderer;
pub mod rules;
pub mod walker;

pub use processor::{GenerationReport, TemplateTreeProcessor, ensure_directory};
pub use renderer::{TemplateRenderer, TeraTemplateRenderer, translate_line_prefix};
pub use rules::IgnoreRule;
pub use walker::{Discovered, TemplateEntry, TemplateWalker};
