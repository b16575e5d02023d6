//! Configuration and error types shared by every stage of a run.

pub mod config;
pub mod error;

pub use config::GeneratorConfig;
pub use error::{Error, ErrorKind, Result};
