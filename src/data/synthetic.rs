//! Synthetic detector channels for driving an analysis end to end.
//!
//! Real response functions come from instrument simulation, which lives
//! outside this tool; these stand-ins have known geometric factors, so the
//! solver's output can be checked against ground truth:
//!
//! - `boxcar_channel`: flat `1/width` response over an energy band
//!   (unit geometric factor)
//! - `integral_channel`: unit response from a threshold upward
//! - `synthetic_instrument`: a log-spaced stack of boxcar channels
//! - `integral_instrument`: a log-spaced stack of threshold channels
//! - `apply_noise`: deterministic multiplicative log-normal perturbation

use std::sync::Arc;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::ChannelResponse;
use crate::error::AppError;
use crate::grid::EnergyGrid;

/// A flat channel covering `[emin, emax]`, normalized so its geometric
/// factor is 1 (response `1/width` over the closed bin window).
pub fn boxcar_channel(
    grid: &Arc<EnergyGrid>,
    name: impl Into<String>,
    emin: f64,
    emax: f64,
) -> Result<ChannelResponse, AppError> {
    if !(emin.is_finite() && emax.is_finite() && emax > emin) {
        return Err(AppError::config(format!(
            "Invalid channel band: [{emin}, {emax}] MeV."
        )));
    }

    let i_lo = grid.searchsorted(emin);
    let i_hi = grid.searchsorted(emax);
    if i_hi >= grid.step_count || i_lo > i_hi {
        return Err(AppError::config(format!(
            "Channel band [{emin}, {emax}] MeV does not fit inside the energy grid."
        )));
    }

    let width = grid.bin_high[i_hi] - grid.bin_low[i_lo];
    let mut response = vec![0.0; grid.step_count];
    for r in &mut response[i_lo..=i_hi] {
        *r = 1.0 / width;
    }

    Ok(ChannelResponse {
        name: name.into(),
        grid: Arc::clone(grid),
        response,
    })
}

/// A unit-response channel counting everything above `emin`.
pub fn integral_channel(
    grid: &Arc<EnergyGrid>,
    name: impl Into<String>,
    emin: f64,
) -> Result<ChannelResponse, AppError> {
    if !emin.is_finite() {
        return Err(AppError::config(format!(
            "Invalid channel threshold: {emin} MeV."
        )));
    }
    let i_lo = grid.searchsorted(emin);
    if i_lo >= grid.step_count {
        return Err(AppError::config(format!(
            "Channel threshold {emin} MeV is above the energy grid."
        )));
    }

    let mut response = vec![0.0; grid.step_count];
    for r in &mut response[i_lo..] {
        *r = 1.0;
    }

    Ok(ChannelResponse {
        name: name.into(),
        grid: Arc::clone(grid),
        response,
    })
}

/// `count` contiguous boxcar channels with log-spaced edges spanning
/// `[lo, hi]`, named `E1..En`.
pub fn synthetic_instrument(
    grid: &Arc<EnergyGrid>,
    count: usize,
    lo: f64,
    hi: f64,
) -> Result<Vec<ChannelResponse>, AppError> {
    if count == 0 {
        return Err(AppError::config("Channel count must be >= 1."));
    }
    if !(lo.is_finite() && hi.is_finite() && lo > 0.0 && hi > lo) {
        return Err(AppError::config(format!(
            "Invalid instrument span: [{lo}, {hi}] MeV."
        )));
    }

    let ln_lo = lo.ln();
    let ln_hi = hi.ln();
    let step = (ln_hi - ln_lo) / count as f64;

    let mut channels = Vec::with_capacity(count);
    for j in 0..count {
        let e_low = (ln_lo + step * j as f64).exp();
        let e_high = (ln_lo + step * (j + 1) as f64).exp();
        channels.push(boxcar_channel(grid, format!("E{}", j + 1), e_low, e_high)?);
    }
    Ok(channels)
}

/// `count` threshold channels with log-spaced thresholds spanning `[lo, hi]`,
/// named `I1..In`. A single channel sits at `lo`.
pub fn integral_instrument(
    grid: &Arc<EnergyGrid>,
    count: usize,
    lo: f64,
    hi: f64,
) -> Result<Vec<ChannelResponse>, AppError> {
    if count == 0 {
        return Err(AppError::config("Channel count must be >= 1."));
    }
    if !(lo.is_finite() && hi.is_finite() && lo > 0.0 && hi > lo) {
        return Err(AppError::config(format!(
            "Invalid instrument span: [{lo}, {hi}] MeV."
        )));
    }

    let ln_lo = lo.ln();
    let ln_hi = hi.ln();
    let mut channels = Vec::with_capacity(count);
    for j in 0..count {
        let threshold = if count == 1 {
            lo
        } else {
            (ln_lo + (ln_hi - ln_lo) * j as f64 / (count - 1) as f64).exp()
        };
        channels.push(integral_channel(grid, format!("I{}", j + 1), threshold)?);
    }
    Ok(channels)
}

/// Perturb every nonzero response bin by a multiplicative log-normal factor
/// `exp(N(0, amplitude))`. Deterministic for a fixed seed; `amplitude = 0`
/// leaves the channels untouched.
pub fn apply_noise(
    channels: &mut [ChannelResponse],
    amplitude: f64,
    seed: u64,
) -> Result<(), AppError> {
    if !(amplitude.is_finite() && amplitude >= 0.0) {
        return Err(AppError::config(format!(
            "Noise amplitude must be finite and >= 0 (got {amplitude})."
        )));
    }
    if amplitude == 0.0 {
        return Ok(());
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, amplitude)
        .map_err(|e| AppError::numeric(format!("Noise distribution error: {e}")))?;

    for channel in channels {
        for r in &mut channel.response {
            if *r != 0.0 {
                let z: f64 = normal.sample(&mut rng);
                *r *= z.exp();
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::build_energy_grid;
    use crate::solve::fold;

    fn grid() -> Arc<EnergyGrid> {
        Arc::new(build_energy_grid(256, 0.01, 1000.0).unwrap())
    }

    #[test]
    fn boxcar_folds_a_flat_spectrum_to_about_one() {
        let grid = grid();
        let channel = boxcar_channel(&grid, "E1", 1.5, 2.0).unwrap();
        let flat = vec![1.0; grid.step_count];
        let v = fold(Some(&grid), Some(&flat), Some(&channel.response));
        assert!((v - 1.0).abs() < 0.02, "got {v}");
    }

    #[test]
    fn boxcar_is_zero_outside_its_band() {
        let grid = grid();
        let channel = boxcar_channel(&grid, "E1", 1.5, 2.0).unwrap();
        for (i, &r) in channel.response.iter().enumerate() {
            let e = grid.midpoint[i];
            if e < 1.4 || e > 2.1 {
                assert_eq!(r, 0.0, "nonzero response at {e} MeV");
            }
        }
        assert!(channel.response.iter().any(|&r| r > 0.0));
    }

    #[test]
    fn boxcar_rejects_out_of_grid_bands() {
        let grid = grid();
        assert_eq!(
            boxcar_channel(&grid, "E1", 2.0, 1.5).unwrap_err().exit_code(),
            2
        );
        assert_eq!(
            boxcar_channel(&grid, "E1", 1e6, 2e6).unwrap_err().exit_code(),
            2
        );
    }

    #[test]
    fn integral_channel_is_a_step() {
        let grid = grid();
        let channel = integral_channel(&grid, "I1", 5.0).unwrap();
        let i_lo = grid.searchsorted(5.0);
        for (i, &r) in channel.response.iter().enumerate() {
            if i < i_lo {
                assert_eq!(r, 0.0);
            } else {
                assert_eq!(r, 1.0);
            }
        }
    }

    #[test]
    fn instrument_channels_are_contiguous_and_named() {
        let grid = grid();
        let channels = synthetic_instrument(&grid, 7, 0.1, 10.0).unwrap();
        assert_eq!(channels.len(), 7);
        for (j, c) in channels.iter().enumerate() {
            assert_eq!(c.name, format!("E{}", j + 1));
        }
    }

    #[test]
    fn integral_instrument_thresholds_ascend() {
        let grid = grid();
        let channels = integral_instrument(&grid, 5, 0.1, 10.0).unwrap();
        assert_eq!(channels.len(), 5);
        assert_eq!(channels[0].name, "I1");
        assert_eq!(channels[4].name, "I5");
        // Higher thresholds leave fewer bins responding.
        let counts: Vec<usize> = channels
            .iter()
            .map(|c| c.response.iter().filter(|&&r| r > 0.0).count())
            .collect();
        for pair in counts.windows(2) {
            assert!(pair[0] > pair[1], "counts not descending: {counts:?}");
        }
    }

    #[test]
    fn noise_is_deterministic_for_a_fixed_seed() {
        let grid = grid();
        let mut a = synthetic_instrument(&grid, 3, 0.1, 10.0).unwrap();
        let mut b = synthetic_instrument(&grid, 3, 0.1, 10.0).unwrap();
        apply_noise(&mut a, 0.1, 42).unwrap();
        apply_noise(&mut b, 0.1, 42).unwrap();
        assert_eq!(a, b);

        let mut c = synthetic_instrument(&grid, 3, 0.1, 10.0).unwrap();
        apply_noise(&mut c, 0.1, 43).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn zero_amplitude_noise_is_identity() {
        let grid = grid();
        let clean = synthetic_instrument(&grid, 3, 0.1, 10.0).unwrap();
        let mut noisy = clean.clone();
        apply_noise(&mut noisy, 0.0, 42).unwrap();
        assert_eq!(clean, noisy);
    }
}
