//! Command-line parsing for the bowtie channel characterizer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the solver/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::SpectrumKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bowtie", version, about = "Bowtie channel response characterization")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a full analysis: build the grid and spectra, solve every channel,
    /// print the table, and optionally plot/export.
    Analyze(AnalyzeArgs),
    /// Re-render a spread plot from a previously exported analysis JSON.
    Plot(PlotArgs),
}

/// Options for a full analysis run.
#[derive(Debug, Parser, Clone)]
#[command(allow_negative_numbers = true)]
pub struct AnalyzeArgs {
    /// Energy grid resolution (bins per decade).
    #[arg(long, default_value_t = 256)]
    pub channels_per_decade: u32,

    /// Lower grid/analysis energy (MeV).
    #[arg(long, default_value_t = 0.01)]
    pub min_energy: f64,

    /// Upper grid/analysis energy (MeV).
    #[arg(long, default_value_t = 1e5)]
    pub max_energy: f64,

    /// Spectral family to fold through the channels.
    #[arg(long, value_enum, default_value_t = SpectrumKind::PowerLaw)]
    pub spectrum: SpectrumKind,

    /// Lowest spectral index in the family.
    #[arg(long, default_value_t = -3.5)]
    pub gamma_min: f64,

    /// Highest spectral index in the family.
    #[arg(long, default_value_t = -1.5)]
    pub gamma_max: f64,

    /// Number of spectral indices in the family.
    #[arg(long, default_value_t = 100)]
    pub gamma_steps: usize,

    /// Cutoff energy E0 (MeV), used by the cutoff family only.
    #[arg(long, default_value_t = 10.0)]
    pub cutoff_energy: f64,

    /// Divide by integral spectra (threshold channels) instead of
    /// differential ones.
    #[arg(long)]
    pub integral: bool,

    /// Width of the spread band that defines the energy margins.
    #[arg(long, default_value_t = 3.0)]
    pub sigma: f64,

    /// Number of synthetic channels to solve.
    #[arg(short = 'n', long, default_value_t = 7)]
    pub channels: usize,

    /// Lower edge of the synthetic instrument (MeV).
    #[arg(long, default_value_t = 0.1)]
    pub channel_lo: f64,

    /// Upper edge of the synthetic instrument (MeV).
    #[arg(long, default_value_t = 10.0)]
    pub channel_hi: f64,

    /// Multiplicative log-normal noise amplitude on channel responses.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed for the noise perturbation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Render an ASCII spread plot for the named channel (e.g. `E3`).
    #[arg(long, value_name = "CHANNEL")]
    pub plot: Option<String>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export per-channel results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the full analysis (settings + per-channel results + spread
    /// curves) to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for plotting a saved analysis.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Analysis JSON file produced by `bowtie analyze --export-json`.
    #[arg(long, value_name = "JSON")]
    pub analysis: PathBuf,

    /// Channel to plot; defaults to the first channel with a spread curve.
    #[arg(long, value_name = "CHANNEL")]
    pub channel: Option<String>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
