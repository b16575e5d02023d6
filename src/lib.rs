//! thriftgen
//!
//! Generates a tree of thrift interface files for a switch by rendering a
//! mirrored tree of templates against the switch's merged description.

#![deny(unsafe_code)]

pub mod core;
pub mod description;
pub mod generate;
pub mod templates;

pub use crate::{
    core::{Error, ErrorKind, GeneratorConfig, Result},
    description::{RenderContext, SwitchDescription, build_render_context},
    generate::generate,
    templates::{GenerationReport, TemplateRenderer, TemplateTreeProcessor},
};
