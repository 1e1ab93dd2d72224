//! Arguments and terminal helpers shared by both tools.

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use letterloc::pipeline::{write_summary, PipelineConfig};
use letterloc::ErrorMode;

pub type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Root of the xml/, txt/ and csv/ directories
    #[arg(long, value_name = "DIR", env = "LETTERLOC_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory for rendered maps
    #[arg(long, value_name = "DIR", env = "LETTERLOC_OUTPUT_DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Skip malformed documents and failed lookups instead of aborting
    #[arg(long)]
    pub lenient: bool,

    /// Write a JSON run summary ("-" for stdout)
    #[arg(long, value_name = "FILE")]
    pub summary: Option<PathBuf>,
}

impl CommonArgs {
    pub fn config(&self) -> PipelineConfig {
        PipelineConfig::new()
            .with_data_dir(&self.data_dir)
            .with_output_dir(&self.output_dir)
    }

    pub fn error_mode(&self) -> ErrorMode {
        if self.lenient {
            ErrorMode::Lenient
        } else {
            ErrorMode::Strict
        }
    }

    pub fn emit_summary<T: Serialize>(&self, summary: &T) -> CliResult<()> {
        match self.summary.as_deref() {
            Some(path) if path == Path::new("-") => {
                println!("{}", serde_json::to_string_pretty(summary)?);
            }
            Some(path) => {
                write_summary(summary, path)?;
                println!("{} {}", "Summary saved to".green(), path.display());
            }
            None => {}
        }
        Ok(())
    }
}

pub fn progress_bar(len: usize, message: &str) -> CliResult<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    Ok(pb)
}

pub fn step(message: &str) {
    println!("{} {}", "[INFO]".cyan().bold(), message);
}

pub fn exit_on_error(result: CliResult<()>) {
    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}
