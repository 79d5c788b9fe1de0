//! histoplot - combined polar histogram plots
//!
//! A CLI tool that reads the `histo_*.dat` files written by a simulation
//! run, sums their radial, angular and 2D polar histograms, normalizes
//! them and renders one figure with all three distributions.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Usage error, no input files found, or a parse/render failure

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod parser;
mod report;
mod scanner;

use analysis::Accumulator;
use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE};
use indicatif::{ProgressBar, ProgressStyle};
use report::{RenderStyle, RunSummary};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(log_level(&args, &config));

    info!("histoplot v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    match run(&args, &config) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .histoplot.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize bin counts, binning mode, pattern and figure style.");
    Ok(())
}

/// Pick the log level from CLI flags and the config file.
fn log_level(args: &Args, config: &Config) -> tracing::Level {
    if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    }
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config {
        Some(ref config_path) => Config::load(config_path)?,
        None => Config::load_default()?.unwrap_or_default(),
    };

    config.merge_with_args(args);
    config.validate()?;
    Ok(config)
}

/// Run discovery, aggregation and rendering. Returns the exit code.
fn run(args: &Args, config: &Config) -> Result<i32> {
    let start_time = Instant::now();

    let dir = args
        .dir
        .as_deref()
        .context("Input directory is required")?;
    let pattern = config.scanner.pattern.as_str();
    let layout = config.histogram.layout();

    // Step 1: Discover input files
    let files = scanner::discover_histograms(dir, pattern)?;
    if files.is_empty() {
        eprintln!("No {} files found in {}", pattern, dir.display());
        return Ok(1);
    }

    println!("📊 Processing {} files...", files.len());
    info!(
        "Layout: nr={}, nth={}, binning={}",
        layout.nr, layout.nth, config.histogram.binning
    );

    // Step 2: Parse and accumulate
    let progress = progress_bar(files.len() as u64, config.general.progress)?;
    let mut accumulator = Accumulator::new(layout, config.histogram.binning);

    for path in &files {
        let file = progress.suspend(|| parser::parse_histogram_file(path, &layout))?;
        accumulator.add(&file);
        progress.inc(1);
    }
    progress.finish_and_clear();

    // Step 3: Normalize
    let histogram = accumulator.finish()?;
    info!("Aggregated {} files", histogram.files_processed());

    let degenerate = histogram.degenerate_components();
    if !degenerate.is_empty() {
        warn!(
            "Accumulators summed to zero, normalized values are NaN: {}",
            degenerate.join(", ")
        );
    }
    if histogram.dropped_samples > 0 {
        info!(
            "{} 2D samples fell outside the grid and were dropped",
            histogram.dropped_samples
        );
    }

    // Step 4: Render
    let style = RenderStyle::from(&config.render);
    let output = PathBuf::from(&config.general.output);
    report::render_plot(&histogram, &style, &output)?;

    if let Some(ref summary_path) = args.summary {
        let summary = RunSummary::from_histogram(&histogram, dir);
        report::write_json_summary(&summary, summary_path)?;
        println!("   Summary saved to: {}", summary_path.display());
    }

    println!(
        "\n✅ Done in {:.1}s! Figure saved to: {}",
        start_time.elapsed().as_secs_f64(),
        output.display()
    );

    Ok(0)
}

/// Progress bar over input files, hidden when disabled.
fn progress_bar(len: u64, enabled: bool) -> Result<ProgressBar> {
    if !enabled {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}
