//! The shared analysis pipeline behind the CLI front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! grid -> spectral family -> synthetic instrument -> noise -> per-channel solve
//!
//! The CLI can then focus on presentation (printing, plotting, exports).

use std::sync::Arc;

use rayon::prelude::*;

use crate::data::{apply_noise, integral_instrument, synthetic_instrument};
use crate::domain::{AnalysisConfig, SolveOptions};
use crate::error::AppError;
use crate::grid::{EnergyGrid, build_energy_grid};
use crate::io::ChannelRecord;
use crate::solve::solve_bowtie;
use crate::spectra::generate_family;

/// All computed outputs of a single `bowtie analyze` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub grid: Arc<EnergyGrid>,
    pub channels: Vec<ChannelRecord>,
    /// Channels that failed to solve, with the reason. A channel failing is
    /// not fatal for the run; only all of them failing is.
    pub skipped: Vec<(String, String)>,
}

/// Execute the full analysis pipeline and return the computed outputs.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    // 1) Energy grid.
    let grid = Arc::new(build_energy_grid(
        config.channels_per_decade,
        config.min_energy,
        config.max_energy,
    )?);

    // 2) Spectral family. Integral spectra are only tabulated when the solve
    // divides by them.
    let spectra = generate_family(
        &grid,
        config.spectrum_kind,
        config.gamma_min,
        config.gamma_max,
        config.gamma_steps,
        config.cutoff_energy,
        config.integral_mode,
    )?;

    // 3) Synthetic instrument: threshold channels in integral mode, boxcar
    // channels otherwise.
    let mut instrument = if config.integral_mode {
        integral_instrument(&grid, config.channel_count, config.channel_lo, config.channel_hi)?
    } else {
        synthetic_instrument(&grid, config.channel_count, config.channel_lo, config.channel_hi)?
    };
    apply_noise(&mut instrument, config.noise, config.seed)?;

    // 4) Solve every channel in parallel. `collect` preserves channel order,
    // so the table comes out in instrument order regardless of scheduling.
    let opts = SolveOptions {
        emin: config.min_energy,
        emax: config.max_energy,
        sigma: config.sigma,
        integral_mode: config.integral_mode,
        want_stddev: true,
        want_spread_curve: true,
    };
    let outcomes: Vec<_> = instrument
        .par_iter()
        .map(|channel| (channel.name.clone(), solve_bowtie(channel, &spectra, &opts)))
        .collect();

    let mut channels = Vec::new();
    let mut skipped = Vec::new();
    for (name, outcome) in outcomes {
        match outcome {
            Ok(result) => channels.push(ChannelRecord { name, result }),
            Err(err) => skipped.push((name, err.to_string())),
        }
    }
    if channels.is_empty() {
        return Err(AppError::no_data(
            "No channel produced a usable bowtie crossing.",
        ));
    }

    Ok(RunOutput {
        grid,
        channels,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SpectrumKind;

    fn small_config() -> AnalysisConfig {
        AnalysisConfig {
            channels_per_decade: 128,
            min_energy: 0.01,
            max_energy: 1000.0,
            spectrum_kind: SpectrumKind::PowerLaw,
            gamma_min: -3.5,
            gamma_max: -1.5,
            gamma_steps: 40,
            cutoff_energy: 10.0,
            integral_mode: false,
            sigma: 3.0,
            channel_count: 3,
            channel_lo: 0.1,
            channel_hi: 10.0,
            noise: 0.0,
            seed: 42,
        }
    }

    #[test]
    fn clean_boxcars_solve_to_unit_geometric_factors() {
        let run = run_analysis(&small_config()).unwrap();
        assert_eq!(run.channels.len(), 3);
        assert!(run.skipped.is_empty());
        for c in &run.channels {
            assert!(
                (c.result.geometric_factor - 1.0).abs() < 0.05,
                "{}: G = {}",
                c.name,
                c.result.geometric_factor
            );
            assert!(c.result.spread_curve.is_some());
            assert!(c.result.gf_stddev.is_some());
        }
    }

    #[test]
    fn effective_energies_follow_the_instrument_order() {
        let run = run_analysis(&small_config()).unwrap();
        let energies: Vec<f64> = run
            .channels
            .iter()
            .map(|c| c.result.effective_energy)
            .collect();
        for pair in energies.windows(2) {
            assert!(pair[0] < pair[1], "not ascending: {energies:?}");
        }
    }

    #[test]
    fn integral_mode_solves_threshold_channels() {
        let config = AnalysisConfig {
            integral_mode: true,
            ..small_config()
        };
        let run = run_analysis(&config).unwrap();
        assert_eq!(run.channels.len(), 3);
        for c in &run.channels {
            assert!(c.name.starts_with('I'));
            assert!(c.result.geometric_factor.is_finite());
            assert!(c.result.geometric_factor > 0.0);
        }
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let config = AnalysisConfig {
            noise: 0.1,
            ..small_config()
        };
        let a = run_analysis(&config).unwrap();
        let b = run_analysis(&config).unwrap();
        assert_eq!(a.channels, b.channels);
        assert_eq!(a.skipped, b.skipped);
    }
}
