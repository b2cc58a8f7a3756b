//! `dtmerge` - merge adjacent ASCII grid DTM tiles into one raster.

use clap::Parser;
use dtmerge_dem::HeaderConvention;
use dtmerge_runner::{init_logging, run_interactive, run_once, Prompter, RunnerConfig, RunnerError};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "dtmerge")]
#[command(about = "Merge adjacent ASCII grid DTM tiles into a single raster")]
struct Args {
    /// Directory holding the tiles to merge (prompted for if omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory to write the merged tile to (prompted for if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Separator between header names and values and between samples
    #[arg(long)]
    separator: Option<char>,

    /// Header field-name convention: center or corner
    #[arg(long)]
    convention: Option<HeaderConvention>,

    /// Extension of tile files to merge
    #[arg(long)]
    extension: Option<String>,

    /// Name of the merged output file
    #[arg(long)]
    output_name: Option<String>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Defaults, then the config file, then command-line flags.
    fn resolve_config(&self) -> Result<RunnerConfig, RunnerError> {
        let mut config = match &self.config {
            Some(path) => RunnerConfig::from_file(path)?,
            None => RunnerConfig::default(),
        };

        if let Some(separator) = self.separator {
            config.separator = separator;
        }
        if let Some(convention) = self.convention {
            config.convention = convention;
        }
        if let Some(extension) = &self.extension {
            config.extension = extension.clone();
        }
        if let Some(name) = &self.output_name {
            config.output_file_name = name.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

fn run(args: Args) -> Result<(), RunnerError> {
    let config = args.resolve_config()?;
    let options = config.merge_options();

    match (args.input, args.output) {
        (Some(input), Some(output)) => {
            let merged = run_once(&input, &output, &options)?;
            println!("{}", merged.output_path.display());
        }
        (input, output) => {
            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout());
            run_interactive(&mut prompter, &options, input, output)?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_level) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
