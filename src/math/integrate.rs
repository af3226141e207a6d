//! Trapezoidal integration over tabulated samples.

/// Integrate `y` over `x` with the composite trapezoid rule.
///
/// `x` must be sorted ascending. Slices shorter than two samples integrate
/// to `0.0`; if the lengths differ, the extra tail is ignored.
pub fn trapezoid(y: &[f64], x: &[f64]) -> f64 {
    let n = y.len().min(x.len());
    if n < 2 {
        return 0.0;
    }

    let mut acc = 0.0;
    for i in 0..n - 1 {
        acc += 0.5 * (y[i] + y[i + 1]) * (x[i + 1] - x[i]);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_function_over_unit_interval() {
        let x = [0.0, 0.25, 0.5, 0.75, 1.0];
        let y = [3.0; 5];
        assert!((trapezoid(&y, &x) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn linear_function_is_exact() {
        // ∫_0^2 2t dt = 4; the trapezoid rule is exact for linear integrands.
        let x = [0.0, 0.5, 1.3, 2.0];
        let y: Vec<f64> = x.iter().map(|&t| 2.0 * t).collect();
        assert!((trapezoid(&y, &x) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn short_input_is_zero() {
        assert_eq!(trapezoid(&[1.0], &[1.0]), 0.0);
        assert_eq!(trapezoid(&[], &[]), 0.0);
    }

    #[test]
    fn uneven_spacing() {
        // ∫_1^4 dt over uneven knots = 3.
        let x = [1.0, 1.1, 2.5, 4.0];
        let y = [1.0; 4];
        assert!((trapezoid(&y, &x) - 3.0).abs() < 1e-12);
    }
}
