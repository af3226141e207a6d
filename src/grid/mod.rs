//! Logarithmic energy grid construction.
//!
//! Every spectrum and channel response in an analysis is tabulated on one
//! shared grid, so alignment is by construction and folding needs no
//! re-binning. The grid is geometric: a fixed number of bins per decade,
//! with bin edges snapped to the decade lattice so the same
//! `(channels_per_decade, min_energy)` pair always produces the same bins.

use crate::error::AppError;

/// Immutable log-spaced energy binning, in MeV.
///
/// Bins are contiguous (`bin_high[i] == bin_low[i + 1]`) and strictly
/// increasing; `midpoint[i]` is the geometric center of bin `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyGrid {
    pub step_count: usize,
    pub midpoint: Vec<f64>,
    pub bin_low: Vec<f64>,
    pub bin_high: Vec<f64>,
    pub bin_width: Vec<f64>,
}

impl EnergyGrid {
    /// First index whose midpoint is `>= energy` (left insertion point).
    /// Returns `step_count` when every midpoint is below `energy`.
    pub fn searchsorted(&self, energy: f64) -> usize {
        self.midpoint.partition_point(|&m| m < energy)
    }
}

/// Build a grid spanning `[min_energy, max_energy]` with
/// `channels_per_decade` bins per decade.
///
/// The lower edge is snapped down to the decade lattice
/// (`floor(log10(min_energy) * cpd) / cpd`), likewise the upper edge, so the
/// realized span can start slightly below `min_energy`.
pub fn build_energy_grid(
    channels_per_decade: u32,
    min_energy: f64,
    max_energy: f64,
) -> Result<EnergyGrid, AppError> {
    if channels_per_decade == 0 {
        return Err(AppError::config("channels_per_decade must be >= 1"));
    }
    if !(min_energy.is_finite() && max_energy.is_finite() && min_energy > 0.0) {
        return Err(AppError::config(format!(
            "Invalid energy bounds: min={min_energy}, max={max_energy} (must be finite and > 0)."
        )));
    }
    if max_energy <= min_energy {
        return Err(AppError::config(format!(
            "Invalid energy bounds: max={max_energy} must exceed min={min_energy}."
        )));
    }

    let cpd = channels_per_decade as f64;
    let log_step = 1.0 / cpd;
    let emin_start = (min_energy.log10() * cpd).floor() / cpd;
    let emax_stop = (max_energy.log10() * cpd).floor() / cpd;
    let step_count = ((emax_stop - emin_start) * cpd).round() as usize + 1;

    let base = 10f64.powf(emin_start);
    let mut bin_low = Vec::with_capacity(step_count);
    let mut bin_high = Vec::with_capacity(step_count);
    let mut midpoint = Vec::with_capacity(step_count);
    let mut bin_width = Vec::with_capacity(step_count);

    for i in 0..step_count {
        let i = i as f64;
        let low = base * 10f64.powf(log_step * i);
        let high = base * 10f64.powf(log_step * (i + 1.0));
        bin_low.push(low);
        bin_high.push(high);
        midpoint.push(base * 10f64.powf(log_step * (i + 0.5)));
        bin_width.push(high - low);
    }

    Ok(EnergyGrid {
        step_count,
        midpoint,
        bin_low,
        bin_high,
        bin_width,
    })
}
