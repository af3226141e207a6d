//! Model spectrum generation.
//!
//! A bowtie analysis folds a whole family of plausible spectra through one
//! channel; the family is a ramp of spectral indices tabulated on the shared
//! energy grid. Supported shapes:
//!
//! - plain power law `E^gamma` (optionally with its closed-form integral)
//! - power law with an exponential cutoff below `E0` (differential only)

use crate::domain::{ModelSpectrum, SpectrumKind};
use crate::error::AppError;
use crate::grid::EnergyGrid;

/// Flux floor used at and below the cutoff energy, where the closed form
/// degenerates.
const CUTOFF_FLOOR: f64 = 1e-30;

/// Tolerance for detecting a spectral index that lands exactly on -1,
/// where the integral power law has no closed form.
const GAMMA_POLE_EPS: f64 = 1e-12;

/// Generate `steps` linearly spaced points between `min` and `max` (inclusive).
pub fn linear_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && max > min) {
        return Err(AppError::config(format!(
            "Invalid gamma range: min={min}, max={max} (must be finite and max>min)."
        )));
    }
    if steps < 2 {
        return Err(AppError::config("Gamma steps must be >= 2."));
    }

    let step = (max - min) / (steps as f64 - 1.0);
    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push(min + step * i as f64);
    }
    // Land exactly on the requested endpoint despite accumulated rounding.
    out[steps - 1] = max;
    Ok(out)
}

/// Generate a family of plain power-law spectra, normalization 1.
///
/// With `with_integral`, each spectrum also carries the closed-form integral
/// flux above each bin's lower edge; a ramp index landing exactly on -1 is
/// rejected because that closed form is undefined.
pub fn generate_power_law_spectra(
    grid: &EnergyGrid,
    gamma_min: f64,
    gamma_max: f64,
    steps: usize,
    with_integral: bool,
) -> Result<Vec<ModelSpectrum>, AppError> {
    let gammas = linear_space(gamma_min, gamma_max, steps)?;

    let mut out = Vec::with_capacity(gammas.len());
    for gamma in gammas {
        let differential: Vec<f64> = grid.midpoint.iter().map(|&e| e.powf(gamma)).collect();

        let integral = if with_integral {
            if (gamma + 1.0).abs() < GAMMA_POLE_EPS {
                return Err(AppError::config(
                    "Integral power law is undefined at gamma = -1; adjust the gamma range or step count.",
                ));
            }
            Some(
                grid.bin_low
                    .iter()
                    .map(|&e| -e.powf(gamma + 1.0) / (gamma + 1.0))
                    .collect(),
            )
        } else {
            None
        };

        out.push(ModelSpectrum {
            gamma,
            differential,
            integral,
        });
    }
    Ok(out)
}

/// Generate a family of exponentially cutoff power-law spectra.
///
/// Above the cutoff the flux is `E^gamma * exp(-E0 / (E - E0))`; at and below
/// the first midpoint `>= E0` it is floored to a tiny positive value.
pub fn generate_cutoff_spectra(
    grid: &EnergyGrid,
    gamma_min: f64,
    gamma_max: f64,
    steps: usize,
    cutoff_energy: f64,
) -> Result<Vec<ModelSpectrum>, AppError> {
    if !(cutoff_energy.is_finite() && cutoff_energy > 0.0) {
        return Err(AppError::config(format!(
            "Cutoff energy must be finite and > 0 (got {cutoff_energy})."
        )));
    }
    let gammas = linear_space(gamma_min, gamma_max, steps)?;
    let cut = grid.searchsorted(cutoff_energy);

    let mut out = Vec::with_capacity(gammas.len());
    for gamma in gammas {
        let differential: Vec<f64> = grid
            .midpoint
            .iter()
            .enumerate()
            .map(|(i, &e)| {
                if i <= cut {
                    CUTOFF_FLOOR
                } else {
                    e.powf(gamma) * (-cutoff_energy / (e - cutoff_energy)).exp()
                }
            })
            .collect();

        out.push(ModelSpectrum {
            gamma,
            differential,
            integral: None,
        });
    }
    Ok(out)
}

/// Generate the spectral family for one run.
///
/// The cutoff shape has no closed-form integral; asking for both is a
/// configuration error rather than silently wrong data.
pub fn generate_family(
    grid: &EnergyGrid,
    kind: SpectrumKind,
    gamma_min: f64,
    gamma_max: f64,
    steps: usize,
    cutoff_energy: f64,
    with_integral: bool,
) -> Result<Vec<ModelSpectrum>, AppError> {
    match kind {
        SpectrumKind::PowerLaw => {
            generate_power_law_spectra(grid, gamma_min, gamma_max, steps, with_integral)
        }
        SpectrumKind::Cutoff => {
            if with_integral {
                return Err(AppError::config(
                    "Integral form is not available for cutoff power-law spectra.",
                ));
            }
            generate_cutoff_spectra(grid, gamma_min, gamma_max, steps, cutoff_energy)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::build_energy_grid;

    #[test]
    fn linear_space_includes_endpoints() {
        let v = linear_space(-3.5, -1.5, 100).unwrap();
        assert_eq!(v.len(), 100);
        assert_eq!(v[0], -3.5);
        assert_eq!(v[99], -1.5);
        for w in v.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn linear_space_rejects_bad_ranges() {
        assert_eq!(linear_space(-1.0, -2.0, 10).unwrap_err().exit_code(), 2);
        assert_eq!(linear_space(-2.0, -1.0, 1).unwrap_err().exit_code(), 2);
        assert_eq!(
            linear_space(f64::NAN, -1.0, 10).unwrap_err().exit_code(),
            2
        );
    }

    #[test]
    fn power_law_matches_midpoints() {
        let grid = build_energy_grid(8, 0.1, 10.0).unwrap();
        let spectra = generate_power_law_spectra(&grid, -2.0, -1.5, 2, false).unwrap();
        assert_eq!(spectra.len(), 2);
        let s = &spectra[0];
        assert_eq!(s.gamma, -2.0);
        assert!(s.integral.is_none());
        for (i, &e) in grid.midpoint.iter().enumerate() {
            let expected = e.powf(-2.0);
            assert!((s.differential[i] - expected).abs() <= 1e-15 * expected.abs());
        }
    }

    #[test]
    fn integral_form_uses_bin_lower_edges() {
        let grid = build_energy_grid(8, 0.1, 10.0).unwrap();
        let spectra = generate_power_law_spectra(&grid, -2.0, -1.5, 2, true).unwrap();
        let s = &spectra[0];
        let integral = s.integral.as_ref().unwrap();
        assert_eq!(integral.len(), grid.step_count);
        for (i, &e) in grid.bin_low.iter().enumerate() {
            // gamma = -2: integral above e of E^-2 is 1/e.
            assert!((integral[i] - 1.0 / e).abs() < 1e-12 / e);
        }
    }

    #[test]
    fn integral_form_rejects_gamma_pole() {
        let grid = build_energy_grid(8, 0.1, 10.0).unwrap();
        // Ramp of 3 steps over [-2, 0] lands exactly on -1.
        let err = generate_power_law_spectra(&grid, -2.0, 0.0, 3, true).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn cutoff_is_floored_below_e0() {
        let grid = build_energy_grid(16, 0.1, 100.0).unwrap();
        let e0 = 5.0;
        let spectra = generate_cutoff_spectra(&grid, -2.0, -1.5, 2, e0).unwrap();
        let s = &spectra[0];
        let cut = grid.searchsorted(e0);
        for i in 0..=cut {
            assert_eq!(s.differential[i], 1e-30);
        }
        for i in (cut + 1)..grid.step_count {
            let e = grid.midpoint[i];
            let expected = e.powf(-2.0) * (-e0 / (e - e0)).exp();
            assert!((s.differential[i] - expected).abs() <= 1e-15);
            assert!(s.differential[i] > 1e-30);
        }
    }

    #[test]
    fn cutoff_with_integral_is_an_error() {
        let grid = build_energy_grid(8, 0.1, 10.0).unwrap();
        let err =
            generate_family(&grid, SpectrumKind::Cutoff, -2.0, -1.5, 2, 5.0, true).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
