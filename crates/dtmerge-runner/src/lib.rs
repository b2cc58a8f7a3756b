//! # dtmerge-runner
//!
//! Command-line front end for merging ASCII grid DTM tiles.
//!
//! The runner either merges one input directory given on the command line,
//! or runs an interactive session that asks for directories and offers to
//! merge another set after each run. Every merge starts from fresh state.

pub mod config;
pub mod prompt;

pub use config::RunnerConfig;
pub use prompt::{strip_quotes, DirectoryKind, Prompter};

use dtmerge_dem::{merge_directory, DemError, DirectoryMerge, MergeOptions};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Errors that can occur while running merges.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("DTM error: {0}")]
    DemError(#[from] DemError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Input closed before an answer was given")]
    InputClosed,
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `default_level`. Logs go to stderr so they
/// do not interleave with prompts on stdout.
pub fn init_logging(default_level: &str) -> Result<(), RunnerError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| RunnerError::ConfigError(format!("invalid log level '{}': {}", default_level, e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| RunnerError::ConfigError(format!("failed to initialise logging: {}", e)))
}

/// Merge one input directory into one output directory.
pub fn run_once(input_dir: &Path, output_dir: &Path, options: &MergeOptions) -> Result<DirectoryMerge, RunnerError> {
    if !output_dir.is_dir() {
        return Err(RunnerError::ConfigError(format!(
            "output directory {} does not exist",
            output_dir.display()
        )));
    }

    info!(
        input = %input_dir.display(),
        output = %output_dir.display(),
        "Starting merge"
    );
    let merged = merge_directory(input_dir, output_dir, options)?;
    info!(
        path = %merged.output_path.display(),
        datasets = merged.report.datasets,
        load_s = merged.load_time.as_secs_f64(),
        merge_s = merged.report.merge_time.as_secs_f64(),
        export_s = merged.export_time.as_secs_f64(),
        "Merge complete"
    );
    Ok(merged)
}

/// Run merges until the user chooses to quit.
///
/// `input_dir` and `output_dir`, when given, are used for the first merge
/// only; later merges always prompt. A failed merge is reported and the user
/// is offered another attempt. Returns the number of successful merges.
pub fn run_interactive<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    options: &MergeOptions,
    mut input_dir: Option<PathBuf>,
    mut output_dir: Option<PathBuf>,
) -> Result<usize, RunnerError> {
    let mut completed = 0;

    loop {
        let input = match input_dir.take() {
            Some(dir) => dir,
            None => prompter.ask_directory(DirectoryKind::Input)?,
        };
        let output = match output_dir.take() {
            Some(dir) => dir,
            None => prompter.ask_directory(DirectoryKind::Output)?,
        };

        match run_once(&input, &output, options) {
            Ok(_) => completed += 1,
            Err(e) => error!("Merge failed: {}", e),
        }

        if !prompter.ask_repeat()? {
            return Ok(completed);
        }
    }
}
