//! The bowtie crossing-point solver.
//!
//! Given one channel and a family of model spectra:
//!
//! - fold every spectrum through the channel (parallel, order-preserving)
//! - form the per-spectrum geometric-factor estimate at each grid column
//! - keep columns where the family actually produces signal
//! - find the column where the estimates agree best (the crossing)
//! - bracket the crossing with sigma margins via interpolation + bisection
//!
//! The crossing column's geometric mean is the reported geometric factor and
//! its grid midpoint is the effective energy; the effective energy is always
//! grid-aligned, never an interpolated root.

use rayon::prelude::*;

use crate::domain::{BowtieResult, ChannelResponse, ModelSpectrum, SolveOptions, SpreadCurve};
use crate::error::AppError;
use crate::grid::EnergyGrid;
use crate::math::{LinearInterp, bisect, geometric_mean, mean, population_stddev};
use crate::solve::fold_checked;

/// Solve the bowtie for one channel.
pub fn solve_bowtie(
    channel: &ChannelResponse,
    spectra: &[ModelSpectrum],
    opts: &SolveOptions,
) -> Result<BowtieResult, AppError> {
    if spectra.len() < 2 {
        return Err(AppError::config(format!(
            "Bowtie needs at least 2 model spectra (got {}).",
            spectra.len()
        )));
    }
    if !(opts.sigma.is_finite() && opts.sigma > 0.0) {
        return Err(AppError::config(format!(
            "Sigma must be finite and > 0 (got {}).",
            opts.sigma
        )));
    }
    if !(opts.emin.is_finite() && opts.emax.is_finite() && opts.emax > opts.emin) {
        return Err(AppError::config(format!(
            "Invalid analysis window: [{}, {}] MeV.",
            opts.emin, opts.emax
        )));
    }

    let grid = channel.grid.as_ref();
    let i_lo = grid.searchsorted(opts.emin);
    let i_hi = grid.searchsorted(opts.emax);

    // Fold phase: one geometric-factor row per spectrum. Inputs are
    // read-only and `collect` preserves spectrum order, so this is
    // deterministic regardless of scheduling.
    let rows: Vec<Vec<f64>> = spectra
        .par_iter()
        .map(|spectrum| gf_row(grid, channel, spectrum, opts, i_lo, i_hi))
        .collect::<Result<_, _>>()?;

    // Column statistics. A column survives only if the family's arithmetic
    // mean there is strictly positive; everything outside the window is zero
    // and drops out here.
    let mut energies = Vec::new();
    let mut geomean = Vec::new();
    let mut spread = Vec::new();
    let mut column = vec![0.0; rows.len()];
    for i in 0..grid.step_count {
        for (k, row) in rows.iter().enumerate() {
            column[k] = row[i];
        }
        if !(mean(&column) > 0.0) {
            continue;
        }
        let gm = geometric_mean(&column);
        energies.push(grid.midpoint[i]);
        geomean.push(gm);
        spread.push(population_stddev(&column) / gm);
    }
    if energies.is_empty() {
        return Err(AppError::no_data("No usable signal in the analysis window."));
    }

    let mut spread_min = f64::INFINITY;
    for &s in &spread {
        if s < spread_min {
            spread_min = s;
        }
    }
    if !(spread_min.is_finite() && spread_min > 0.0) {
        return Err(AppError::numeric(
            "Degenerate spread over the analysis window; the spectral family may be too narrow.",
        ));
    }
    let spread_norm: Vec<f64> = spread.iter().map(|&s| s / spread_min).collect();

    // First minimum is the crossing (ties break toward lower energy).
    let mut cross = 0;
    for (i, &s) in spread_norm.iter().enumerate() {
        if s < spread_norm[cross] {
            cross = i;
        }
    }

    let (margin_low, margin_high) = sigma_margins(&energies, &spread_norm, cross, opts.sigma);

    let geometric_factor = geomean[cross];
    let effective_energy = energies[cross];
    let gf_stddev = opts.want_stddev.then(|| spread[cross]);
    let spread_curve = opts.want_spread_curve.then(|| SpreadCurve {
        energy: energies,
        spread_norm,
    });

    Ok(BowtieResult {
        geometric_factor,
        effective_energy,
        energy_margin_low: margin_low,
        energy_margin_high: margin_high,
        gf_stddev,
        spread_curve,
    })
}

fn gf_row(
    grid: &EnergyGrid,
    channel: &ChannelResponse,
    spectrum: &ModelSpectrum,
    opts: &SolveOptions,
    i_lo: usize,
    i_hi: usize,
) -> Result<Vec<f64>, AppError> {
    // The fold is always taken over the differential flux; integral mode
    // only changes what the folded count rate is divided by.
    let folded = fold_checked(
        Some(grid),
        Some(&spectrum.differential),
        Some(&channel.response),
    )?;

    let denominator: &[f64] = if opts.integral_mode {
        spectrum.integral.as_deref().ok_or_else(|| {
            AppError::numeric(format!(
                "Integral-mode solve requires integral spectra (gamma {} has none).",
                spectrum.gamma
            ))
        })?
    } else {
        &spectrum.differential
    };

    let mut row = vec![0.0; grid.step_count];
    for i in i_lo..i_hi {
        row[i] = folded / denominator[i];
    }
    Ok(row)
}

/// Energies where the normalized spread exits the `1 + sigma` band on each
/// side of the crossing, found by bisection on each side independently.
/// A side where the band never closes reports `0.0`.
fn sigma_margins(energies: &[f64], spread_norm: &[f64], cross: usize, sigma: f64) -> (f64, f64) {
    if energies.len() < 2 {
        return (0.0, 0.0);
    }
    let band: Vec<f64> = spread_norm.iter().map(|&s| s - 1.0 - sigma).collect();
    let Ok(f) = LinearInterp::new(energies, &band) else {
        return (0.0, 0.0);
    };

    let e_cross = energies[cross];
    let low = bisect(|e| f.eval(e), energies[0], e_cross).unwrap_or(0.0);
    let high = bisect(|e| f.eval(e), e_cross, energies[energies.len() - 1]).unwrap_or(0.0);
    (low, high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::data::boxcar_channel;
    use crate::grid::build_energy_grid;
    use crate::spectra::generate_power_law_spectra;

    fn standard_setup() -> (Arc<EnergyGrid>, Vec<ModelSpectrum>, ChannelResponse) {
        let grid = Arc::new(build_energy_grid(256, 0.01, 1000.0).unwrap());
        let spectra = generate_power_law_spectra(&grid, -3.5, -1.5, 100, false).unwrap();
        let channel = boxcar_channel(&grid, "E1", 1.5, 2.0).unwrap();
        (grid, spectra, channel)
    }

    #[test]
    fn boxcar_channel_recovers_unit_geometric_factor() {
        let (_, spectra, channel) = standard_setup();
        let opts = SolveOptions {
            emin: 0.01,
            emax: 1000.0,
            sigma: 3.0,
            integral_mode: false,
            want_stddev: true,
            want_spread_curve: false,
        };
        let result = solve_bowtie(&channel, &spectra, &opts).unwrap();

        assert!(
            result.effective_energy > 1.5 && result.effective_energy < 2.0,
            "effective energy {} outside the channel band",
            result.effective_energy
        );
        assert!(
            (result.geometric_factor - 1.0).abs() < 0.05,
            "geometric factor {} far from 1",
            result.geometric_factor
        );
        let sd = result.gf_stddev.unwrap();
        assert!(sd.is_finite() && sd >= 0.0);
        // Margins are band-boundary energies bracketing the crossing
        // (or zero on a side where the band never closes).
        if result.energy_margin_low > 0.0 {
            assert!(result.energy_margin_low < result.effective_energy);
        }
        if result.energy_margin_high > 0.0 {
            assert!(result.energy_margin_high > result.effective_energy);
        }
    }

    #[test]
    fn growing_sigma_never_shrinks_the_band() {
        let (_, spectra, channel) = standard_setup();
        let mut prev_width = 0.0;
        for sigma in [1.0, 2.0, 4.0, 8.0] {
            let opts = SolveOptions {
                sigma,
                ..SolveOptions::default()
            };
            let result = solve_bowtie(&channel, &spectra, &opts).unwrap();
            if result.energy_margin_low == 0.0 || result.energy_margin_high == 0.0 {
                // Band ran off the retained window on one side; wider sigmas
                // can only do the same.
                break;
            }
            let width = result.energy_margin_high - result.energy_margin_low;
            assert!(
                width >= prev_width,
                "band width shrank from {prev_width} to {width} at sigma {sigma}"
            );
            prev_width = width;
        }
    }

    #[test]
    fn identical_inputs_give_bit_identical_results() {
        let (_, spectra, channel) = standard_setup();
        let opts = SolveOptions {
            want_stddev: true,
            want_spread_curve: true,
            ..SolveOptions::default()
        };
        let a = solve_bowtie(&channel, &spectra, &opts).unwrap();
        let b = solve_bowtie(&channel, &spectra, &opts).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn spread_curve_is_opt_in_and_does_not_change_numbers() {
        let (_, spectra, channel) = standard_setup();
        let bare = solve_bowtie(&channel, &spectra, &SolveOptions::default()).unwrap();
        assert!(bare.spread_curve.is_none());
        assert!(bare.gf_stddev.is_none());

        let opts = SolveOptions {
            want_spread_curve: true,
            ..SolveOptions::default()
        };
        let with_curve = solve_bowtie(&channel, &spectra, &opts).unwrap();
        let curve = with_curve.spread_curve.as_ref().unwrap();
        assert_eq!(curve.energy.len(), curve.spread_norm.len());
        assert!(!curve.energy.is_empty());
        assert_eq!(with_curve.geometric_factor, bare.geometric_factor);
        assert_eq!(with_curve.effective_energy, bare.effective_energy);
    }

    #[test]
    fn integral_mode_without_integral_spectra_is_numeric_error() {
        let (_, spectra, channel) = standard_setup();
        let opts = SolveOptions {
            integral_mode: true,
            ..SolveOptions::default()
        };
        let err = solve_bowtie(&channel, &spectra, &opts).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn window_above_the_grid_has_no_usable_signal() {
        let (_, spectra, channel) = standard_setup();
        let opts = SolveOptions {
            emin: 2000.0,
            emax: 3000.0,
            ..SolveOptions::default()
        };
        let err = solve_bowtie(&channel, &spectra, &opts).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn bad_arguments_are_config_errors() {
        let (_, spectra, channel) = standard_setup();
        let one = &spectra[..1];
        assert_eq!(
            solve_bowtie(&channel, one, &SolveOptions::default())
                .unwrap_err()
                .exit_code(),
            2
        );
        let opts = SolveOptions {
            sigma: 0.0,
            ..SolveOptions::default()
        };
        assert_eq!(
            solve_bowtie(&channel, &spectra, &opts).unwrap_err().exit_code(),
            2
        );
        let opts = SolveOptions {
            emin: 10.0,
            emax: 1.0,
            ..SolveOptions::default()
        };
        assert_eq!(
            solve_bowtie(&channel, &spectra, &opts).unwrap_err().exit_code(),
            2
        );
    }
}
