//! Ordinary least-squares line fitting.
//!
//! Two solvers are provided because the estimators need different failure
//! behavior:
//!
//! - [`fit_least_squares`] is total: it is called thousands of times on
//!   resampled or simulated data, where a degenerate sample must not abort
//!   the whole run.
//! - [`fit_normal_equations`] solves `(XᵀX)θ = Xᵀy` explicitly and reports a
//!   singular design matrix as an error.

use serde::{Deserialize, Serialize};

use crate::NumericalInstabilityError;

/// Fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LineFit {
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[derive(Debug, Clone, Copy)]
struct Moments {
    n: f64,
    mean_x: f64,
    mean_y: f64,
    sxx: f64,
    sxy: f64,
    sum_x2: f64,
}

impl Moments {
    #[expect(clippy::cast_precision_loss)]
    fn new(x: &[f64], y: &[f64]) -> Self {
        assert_eq!(x.len(), y.len(), "x and y must have the same length");
        assert!(!x.is_empty(), "at least one point is required");

        let n = x.len() as f64;
        let mean_x = x.iter().sum::<f64>() / n;
        let mean_y = y.iter().sum::<f64>() / n;
        let (sxx, sxy, sum_x2) = x.iter().zip(y).fold((0.0, 0.0, 0.0), |acc, (&x, &y)| {
            let dx = x - mean_x;
            (acc.0 + dx * dx, acc.1 + dx * (y - mean_y), acc.2 + x * x)
        });
        Self {
            n,
            mean_x,
            mean_y,
            sxx,
            sxy,
            sum_x2,
        }
    }
}

/// Fits a line by ordinary least squares on centered data.
///
/// When every `x` is identical the slope is not identifiable; the
/// minimum-norm least-squares solution is returned instead, which is a zero
/// slope through the mean of `y`.
///
/// # Panics
///
/// Panics if `x` and `y` differ in length or are empty.
///
/// ```
/// # use coefscope_engine::regression::fit_least_squares;
/// let fit = fit_least_squares(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0]);
/// assert!((fit.slope - 2.0).abs() < 1e-12);
/// assert!((fit.intercept - 1.0).abs() < 1e-12);
///
/// let flat = fit_least_squares(&[4.0, 4.0], &[1.0, 3.0]);
/// assert_eq!(flat.slope, 0.0);
/// assert_eq!(flat.intercept, 2.0);
/// ```
#[must_use]
pub fn fit_least_squares(x: &[f64], y: &[f64]) -> LineFit {
    let m = Moments::new(x, y);
    let slope = if m.sxx > 0.0 { m.sxy / m.sxx } else { 0.0 };
    LineFit {
        slope,
        intercept: m.mean_y - slope * m.mean_x,
    }
}

/// Fits a line by solving the normal equations `θ = (XᵀX)⁻¹Xᵀy` for the
/// design matrix with columns `[x, 1]`.
///
/// `XᵀX` is considered singular when its determinant is not larger than the
/// rounding error expected for its entries. That happens for a single point
/// and whenever all `x` are identical.
///
/// # Panics
///
/// Panics if `x` and `y` differ in length or are empty.
///
/// ```
/// # use coefscope_engine::{regression::fit_normal_equations, NumericalInstabilityError};
/// let fit = fit_normal_equations(&[0.0, 5.0, 10.0], &[5.0, 20.0, 35.0]).unwrap();
/// assert!((fit.slope - 3.0).abs() < 1e-12);
///
/// let err = fit_normal_equations(&[0.0], &[5.0]).unwrap_err();
/// assert!(matches!(err, NumericalInstabilityError::SingularDesignMatrix { .. }));
/// ```
pub fn fit_normal_equations(x: &[f64], y: &[f64]) -> Result<LineFit, NumericalInstabilityError> {
    let m = Moments::new(x, y);

    // det(XᵀX) = n·Σx² − (Σx)² = n·Sxx; the centered form avoids cancellation.
    let determinant = m.n * m.sxx;
    if determinant.is_nan() || determinant <= f64::EPSILON * m.n * m.sum_x2 {
        return Err(NumericalInstabilityError::SingularDesignMatrix { determinant });
    }

    // (XᵀX)⁻¹ = 1/det · [[n, −Σx], [−Σx, Σx²]]
    let sum_x = m.mean_x * m.n;
    let sum_y = m.mean_y * m.n;
    let sum_xy = m.sxy + m.n * m.mean_x * m.mean_y;
    let inv = [
        [m.n / determinant, -sum_x / determinant],
        [-sum_x / determinant, m.sum_x2 / determinant],
    ];
    let xty = [sum_xy, sum_y];
    Ok(LineFit {
        slope: inv[0][0] * xty[0] + inv[0][1] * xty[1],
        intercept: inv[1][0] * xty[0] + inv[1][1] * xty[1],
    })
}

/// Sum of squared residuals of `fit` over the points.
#[must_use]
pub fn sum_squared_residuals(x: &[f64], y: &[f64], fit: &LineFit) -> f64 {
    x.iter()
        .zip(y)
        .map(|(&x, &y)| (y - fit.predict(x)).powi(2))
        .sum()
}

/// Unbiased residual variance `SSR / (n − 2)`.
///
/// Two parameters are estimated from the data, so at least three points are
/// needed.
#[expect(clippy::cast_precision_loss)]
pub fn residual_variance(
    x: &[f64],
    y: &[f64],
    fit: &LineFit,
) -> Result<f64, NumericalInstabilityError> {
    let n_samples = x.len();
    if n_samples <= 2 {
        return Err(NumericalInstabilityError::NoResidualDegreesOfFreedom { n_samples });
    }
    Ok(sum_squared_residuals(x, y, fit) / (n_samples - 2) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::linspace;

    fn exact_line(n: usize) -> (Vec<f64>, Vec<f64>) {
        let x = linspace(0.0, 10.0, n);
        let y = x.iter().map(|x| 3.0 * x + 5.0).collect();
        (x, y)
    }

    #[test]
    fn test_both_solvers_recover_exact_line() {
        let (x, y) = exact_line(100);
        let ls = fit_least_squares(&x, &y);
        let ne = fit_normal_equations(&x, &y).unwrap();
        for fit in [ls, ne] {
            assert!((fit.slope - 3.0).abs() < 1e-10, "{fit:?}");
            assert!((fit.intercept - 5.0).abs() < 1e-10, "{fit:?}");
        }
    }

    #[test]
    fn test_solvers_agree_on_noisy_data() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [1.1, 2.9, 5.2, 6.8, 9.1, 11.0];
        let ls = fit_least_squares(&x, &y);
        let ne = fit_normal_equations(&x, &y).unwrap();
        assert!((ls.slope - ne.slope).abs() < 1e-12);
        assert!((ls.intercept - ne.intercept).abs() < 1e-12);
    }

    #[test]
    fn test_identical_x_is_singular() {
        let x = [2.5; 20];
        let y = (0..20).map(f64::from).collect::<Vec<_>>();
        assert!(matches!(
            fit_normal_equations(&x, &y),
            Err(NumericalInstabilityError::SingularDesignMatrix { .. })
        ));
        assert_eq!(fit_least_squares(&x, &y).slope, 0.0);
    }

    #[test]
    fn test_single_point() {
        assert!(fit_normal_equations(&[0.0], &[5.0]).is_err());
        let fit = fit_least_squares(&[0.0], &[5.0]);
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 5.0);
    }

    #[test]
    fn test_residual_variance_needs_three_points() {
        let fit = LineFit {
            slope: 1.0,
            intercept: 0.0,
        };
        for n in 0..=2 {
            let x = vec![1.0; n];
            assert_eq!(
                residual_variance(&x, &x, &fit),
                Err(NumericalInstabilityError::NoResidualDegreesOfFreedom { n_samples: n })
            );
        }
    }

    #[test]
    fn test_residual_variance_of_known_residuals() {
        let fit = LineFit {
            slope: 0.0,
            intercept: 0.0,
        };
        // residuals 1, -1, 1, -1 => SSR = 4, n - 2 = 2
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, -1.0, 1.0, -1.0];
        assert_eq!(residual_variance(&x, &y, &fit), Ok(2.0));
    }
}
