//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.histoplot.toml` files.

use crate::models::{BinningMode, HistogramLayout};
use crate::scanner::DEFAULT_PATTERN;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".histoplot.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Histogram layout and binning.
    #[serde(default)]
    pub histogram: HistogramConfig,

    /// Input discovery settings.
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Figure settings.
    #[serde(default)]
    pub render: RenderConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Output figure path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Show a progress bar while reading files.
    #[serde(default = "default_true")]
    pub progress: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
            progress: true,
        }
    }
}

fn default_output() -> String {
    "histos_acumulados.svg".to_string()
}

fn default_true() -> bool {
    true
}

/// Positional layout of the input files and 2D binning policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramConfig {
    /// Number of radial bins.
    #[serde(default = "default_nr")]
    pub nr: usize,

    /// Number of angular bins.
    #[serde(default = "default_nth")]
    pub nth: usize,

    /// Lines starting with this character are skipped.
    #[serde(default = "default_comment_marker")]
    pub comment_marker: char,

    /// How 2D bin edges are derived across files.
    #[serde(default)]
    pub binning: BinningMode,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            nr: default_nr(),
            nth: default_nth(),
            comment_marker: default_comment_marker(),
            binning: BinningMode::default(),
        }
    }
}

fn default_nr() -> usize {
    50
}

fn default_nth() -> usize {
    72
}

fn default_comment_marker() -> char {
    '#'
}

impl HistogramConfig {
    pub fn layout(&self) -> HistogramLayout {
        HistogramLayout {
            nr: self.nr,
            nth: self.nth,
            comment_marker: self.comment_marker,
        }
    }
}

/// Input discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// File name pattern; `*` matches any run of characters.
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
        }
    }
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

/// Figure settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Figure width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Figure height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Font family for captions and labels.
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Caption font size.
    #[serde(default = "default_caption_size")]
    pub caption_size: u32,

    /// Axis label font size.
    #[serde(default = "default_label_size")]
    pub label_size: u32,

    /// Factor applied to radii for display (meters to centimeters).
    #[serde(default = "default_radial_scale")]
    pub radial_scale: f64,

    /// Unit shown on radial axes.
    #[serde(default = "default_radial_unit")]
    pub radial_unit: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            font_family: default_font_family(),
            caption_size: default_caption_size(),
            label_size: default_label_size(),
            radial_scale: default_radial_scale(),
            radial_unit: default_radial_unit(),
        }
    }
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    600
}

fn default_font_family() -> String {
    "serif".to_string()
}

fn default_caption_size() -> u32 {
    18
}

fn default_label_size() -> u32 {
    14
}

fn default_radial_scale() -> f64 {
    100.0
}

fn default_radial_unit() -> String {
    "cm".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the working directory.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if args.verbose {
            self.general.verbose = true;
        }
        if args.no_progress || args.quiet {
            self.general.progress = false;
        }

        if let Some(nr) = args.nr {
            self.histogram.nr = nr;
        }
        if let Some(nth) = args.nth {
            self.histogram.nth = nth;
        }
        if let Some(binning) = args.binning {
            self.histogram.binning = binning;
        }

        if let Some(ref pattern) = args.pattern {
            self.scanner.pattern = pattern.clone();
        }
    }

    /// Check values that cannot be expressed through serde defaults.
    pub fn validate(&self) -> Result<()> {
        if self.histogram.nr == 0 || self.histogram.nth == 0 {
            anyhow::bail!("nr and nth must both be at least 1");
        }
        if self.scanner.pattern.is_empty() {
            anyhow::bail!("scanner pattern must not be empty");
        }
        if self.render.width == 0 || self.render.height == 0 {
            anyhow::bail!("figure width and height must be positive");
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.histogram.nr, 50);
        assert_eq!(config.histogram.nth, 72);
        assert_eq!(config.histogram.binning, BinningMode::PerFile);
        assert_eq!(config.scanner.pattern, "histo_*.dat");
        assert_eq!(config.render.radial_scale, 100.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "combined.svg"
verbose = true

[histogram]
nr = 20
comment_marker = "%"
binning = "first-file"

[render]
radial_unit = "m"
radial_scale = 1.0
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "combined.svg");
        assert!(config.general.verbose);
        assert!(config.general.progress);
        assert_eq!(config.histogram.nr, 20);
        assert_eq!(config.histogram.nth, 72);
        assert_eq!(config.histogram.comment_marker, '%');
        assert_eq!(config.histogram.binning, BinningMode::FirstFile);
        assert_eq!(config.render.radial_unit, "m");
        assert_eq!(config.render.width, 1200);
    }

    #[test]
    fn test_merge_only_overrides_explicit_args() {
        let mut config: Config = toml::from_str("[histogram]\nnr = 20\nnth = 36\n").unwrap();
        let args = Args::parse_from(["histoplot", "data", "--nth", "12", "--binning", "first-file"]);

        config.merge_with_args(&args);

        assert_eq!(config.histogram.nr, 20);
        assert_eq!(config.histogram.nth, 12);
        assert_eq!(config.histogram.binning, BinningMode::FirstFile);
        assert_eq!(config.general.output, "histos_acumulados.svg");
        assert_eq!(config.histogram.layout(), HistogramLayout::new(20, 12));
    }

    #[test]
    fn test_quiet_disables_progress() {
        let mut config = Config::default();
        let args = Args::parse_from(["histoplot", "data", "--quiet"]);
        config.merge_with_args(&args);
        assert!(!config.general.progress);
    }

    #[test]
    fn test_validate_rejects_empty_layout() {
        let mut config = Config::default();
        config.histogram.nth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[histogram]"));
        assert!(toml_str.contains("[scanner]"));
        assert!(toml_str.contains("[render]"));
        assert!(toml_str.contains("per-file"));

        let round: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(round.histogram.nr, 50);
    }
}
