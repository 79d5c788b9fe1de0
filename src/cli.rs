//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::BinningMode;
use clap::Parser;
use std::path::PathBuf;

/// histoplot - combine polar histogram files into one figure
///
/// Reads every `histo_*.dat` file directly inside DIR, sums the radial,
/// angular and 2D polar histograms, normalizes them and draws a polar
/// heatmap next to the radial and angular distributions.
///
/// Examples:
///   histoplot ./runs/output
///   histoplot ./runs/output --nr 40 --nth 36 -o combined.svg
///   histoplot ./runs/output --binning first-file --summary summary.json
///   histoplot --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory containing the histogram files
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Output figure path
    ///
    /// Defaults to histos_acumulados.svg in the current directory.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Number of radial bins in each file
    #[arg(long, value_name = "N", env = "HISTOPLOT_NR")]
    pub nr: Option<usize>,

    /// Number of angular bins in each file
    #[arg(long, value_name = "N", env = "HISTOPLOT_NTH")]
    pub nth: Option<usize>,

    /// How 2D bin edges are derived across files
    ///
    /// per-file recomputes the grid extent from every file;
    /// first-file fixes it from the first file.
    #[arg(long, value_name = "MODE")]
    pub binning: Option<BinningMode>,

    /// File name pattern to match inside DIR
    #[arg(long, value_name = "GLOB")]
    pub pattern: Option<String>,

    /// Also write a JSON summary of the aggregated data
    #[arg(long, value_name = "FILE")]
    pub summary: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .histoplot.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Do not show a progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Generate a default .histoplot.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        let Some(ref dir) = self.dir else {
            return Err("Usage: histoplot <DIR>".to_string());
        };

        if !dir.exists() {
            return Err(format!("Directory does not exist: {}", dir.display()));
        }
        if !dir.is_dir() {
            return Err(format!("Not a directory: {}", dir.display()));
        }

        if self.nr == Some(0) || self.nth == Some(0) {
            return Err("--nr and --nth must be at least 1".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
