//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed across module boundaries without ceremony
//! - exported to JSON for downstream tooling
//! - compared bit-for-bit in determinism tests

use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::grid::EnergyGrid;

/// Shape family of the model spectra folded through a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpectrumKind {
    /// Plain power law `E^gamma`.
    PowerLaw,
    /// Power law with an exponential cutoff below `E0`.
    Cutoff,
}

impl SpectrumKind {
    pub fn label(&self) -> &'static str {
        match self {
            SpectrumKind::PowerLaw => "power law",
            SpectrumKind::Cutoff => "cutoff power law",
        }
    }
}

/// One model spectrum tabulated on the shared energy grid.
///
/// `differential[i]` is the flux density at `midpoint[i]`; `integral[i]`,
/// when present, is the flux above `bin_low[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpectrum {
    pub gamma: f64,
    pub differential: Vec<f64>,
    pub integral: Option<Vec<f64>>,
}

/// A detector channel's energy response tabulated on the shared grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelResponse {
    pub name: String,
    pub grid: Arc<EnergyGrid>,
    pub response: Vec<f64>,
}

/// Inputs to the bowtie solve for one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOptions {
    /// Lower edge of the analysis window, MeV.
    pub emin: f64,
    /// Upper edge of the analysis window, MeV.
    pub emax: f64,
    /// Width of the spread band that defines the energy margins.
    pub sigma: f64,
    /// Divide the folded rate by the integral spectrum instead of the
    /// differential one.
    pub integral_mode: bool,
    /// Report the relative spread at the crossing.
    pub want_stddev: bool,
    /// Return the retained spread samples for plotting/export.
    pub want_spread_curve: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            emin: 0.01,
            emax: 1e5,
            sigma: 3.0,
            integral_mode: false,
            want_stddev: false,
            want_spread_curve: false,
        }
    }
}

/// The normalized spread sampled over the retained window, for plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadCurve {
    pub energy: Vec<f64>,
    pub spread_norm: Vec<f64>,
}

/// Result of a bowtie solve for one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowtieResult {
    /// Geometric factor at the crossing, cm2 sr MeV (cm2 sr in integral mode).
    pub geometric_factor: f64,
    /// Grid midpoint at the crossing, MeV.
    pub effective_energy: f64,
    /// Energy below the crossing where the spread exits the sigma band,
    /// MeV; `0.0` when the band never closes on that side.
    pub energy_margin_low: f64,
    /// Same, above the crossing.
    pub energy_margin_high: f64,
    /// Relative spread of the geometric factor at the crossing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gf_stddev: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread_curve: Option<SpreadCurve>,
}

/// Everything a full analysis run needs, assembled from CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub channels_per_decade: u32,
    pub min_energy: f64,
    pub max_energy: f64,
    pub spectrum_kind: SpectrumKind,
    pub gamma_min: f64,
    pub gamma_max: f64,
    pub gamma_steps: usize,
    pub cutoff_energy: f64,
    pub integral_mode: bool,
    pub sigma: f64,
    pub channel_count: usize,
    pub channel_lo: f64,
    pub channel_hi: f64,
    pub noise: f64,
    pub seed: u64,
}
