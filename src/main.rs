//! thriftgen CLI entrypoint
//! Parses command-line arguments and runs one generation pass.
#![deny(unsafe_code)]

use std::path::PathBuf;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use thriftgen::core::config::{
    DEFAULT_LINE_PREFIX, DEFAULT_OUTPUT_DIR, DEFAULT_SWITCH_NAME, DEFAULT_TEMPLATE_DIR,
};
use thriftgen::{GeneratorConfig, generate};

/// Produce thrift interface files from a switch description
#[derive(Parser, Debug)]
#[command(name = "thriftgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Description sources to load, merged in the order given
    #[arg(required = true, num_args = 1.., value_name = "SOURCES")]
    sources: Vec<PathBuf>,

    /// Where to find templates
    #[arg(
        short = 't',
        long = "template-dir",
        alias = "template_dir",
        default_value = DEFAULT_TEMPLATE_DIR
    )]
    template_dir: PathBuf,

    /// Where to put results
    #[arg(short = 'o', long = "output", default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Name of switch instance
    #[arg(short = 'n', long = "name", default_value = DEFAULT_SWITCH_NAME)]
    name: String,

    /// Marker introducing directive lines in templates
    #[arg(long = "line-prefix", default_value = DEFAULT_LINE_PREFIX)]
    line_prefix: String,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = GeneratorConfig {
        template_dir: cli.template_dir,
        output_dir: cli.output,
        name: cli.name,
        line_prefix: cli.line_prefix,
        verbose: cli.verbose,
    };

    info!(
        switch = %config.name,
        templates = %config.template_dir.display(),
        output = %config.output_dir.display(),
        "Generating thrift files"
    );

    let report = generate(&config, &cli.sources)
        .with_context(|| format!("Failed to generate thrift files for switch '{}'", config.name))?;

    info!(
        rendered = report.rendered.len(),
        ignored = report.ignored.len(),
        "Generation complete"
    );
    Ok(())
}
