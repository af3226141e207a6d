//! Summary statistics used by the spread computation.
//!
//! The spread statistic compares a dispersion measure against a central value
//! that lives naturally in log space, so alongside the arithmetic mean we
//! provide a geometric mean (mean of logs, exponentiated) and the population
//! standard deviation (divisor `n`, not `n - 1`).

/// Arithmetic mean. Empty input yields `NaN`.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Geometric mean via the log domain. Empty input yields `NaN`;
/// non-positive entries produce `NaN`/`0` through `ln`, never a panic.
pub fn geometric_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let log_mean = values.iter().map(|&v| v.ln()).sum::<f64>() / values.len() as f64;
    log_mean.exp()
}

/// Population standard deviation (divisor `n`). Empty input yields `NaN`.
pub fn population_stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let var = values.iter().map(|&v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}
