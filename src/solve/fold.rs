//! Folding a model spectrum through a channel response.
//!
//! Folding is the trapezoidal integral of `spectrum * response` over the
//! grid midpoints. Two surfaces are exposed:
//!
//! - `fold`: the permissive form with documented sentinel returns (`NaN`
//!   for a missing grid, `0.0` for missing or misaligned arrays), kept for
//!   callers that treat a bad channel as "counts nothing"
//! - `fold_checked`: the strict form used inside the pipeline, where a
//!   misalignment is a bug and must surface as an error

use crate::error::AppError;
use crate::grid::EnergyGrid;
use crate::math::trapezoid;

/// Fold `spectrum` through `response` over `grid`.
///
/// Returns `NaN` when `grid` is absent, `0.0` when either array is absent
/// or the lengths disagree (with each other or with the grid).
pub fn fold(grid: Option<&EnergyGrid>, spectrum: Option<&[f64]>, response: Option<&[f64]>) -> f64 {
    let Some(grid) = grid else {
        return f64::NAN;
    };
    let (Some(spectrum), Some(response)) = (spectrum, response) else {
        return 0.0;
    };
    if spectrum.len() != response.len() || spectrum.len() != grid.step_count {
        return 0.0;
    }

    let product: Vec<f64> = spectrum
        .iter()
        .zip(response.iter())
        .map(|(&s, &r)| s * r)
        .collect();
    trapezoid(&product, &grid.midpoint)
}

/// Strict fold: absence or misalignment is an error, never a sentinel.
pub fn fold_checked(
    grid: Option<&EnergyGrid>,
    spectrum: Option<&[f64]>,
    response: Option<&[f64]>,
) -> Result<f64, AppError> {
    let Some(grid) = grid else {
        return Err(AppError::numeric("Fold called without an energy grid."));
    };
    let (Some(spectrum), Some(response)) = (spectrum, response) else {
        return Err(AppError::numeric(
            "Fold called without a spectrum or a response.",
        ));
    };
    if spectrum.len() != response.len() || spectrum.len() != grid.step_count {
        return Err(AppError::numeric(format!(
            "Fold length mismatch: spectrum={}, response={}, grid={}.",
            spectrum.len(),
            response.len(),
            grid.step_count
        )));
    }
    Ok(fold(Some(grid), Some(spectrum), Some(response)))
}
