use rand::{Rng as _, RngCore};
use serde::{Deserialize, Serialize};

use super::{EstimateSequence, EstimationContext, Estimator, Method};
use crate::{AnalysisError, regression};

/// How x and y are drawn when building a resample.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "lowercase")]
pub enum Resampling {
    /// x and y are resampled with two independent sets of indices, so a
    /// resampled x is generally not paired with its own y.
    #[default]
    #[display("unpaired")]
    Unpaired,
    /// One set of indices selects whole `(x, y)` pairs.
    #[display("paired")]
    Paired,
}

/// Resampling estimator.
///
/// Every round draws a resample of the observations' size with replacement
/// and records the least-squares slope fitted to it. By default the columns
/// are resampled independently (see [`Resampling::Unpaired`]), which destroys
/// the x-y relationship and centers the estimates near zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct BootstrapEstimator {
    pub resampling: Resampling,
}

impl BootstrapEstimator {
    #[must_use]
    pub fn new(resampling: Resampling) -> Self {
        Self { resampling }
    }
}

impl Estimator for BootstrapEstimator {
    fn method(&self) -> Method {
        Method::Bootstrap
    }

    fn estimate(
        &self,
        ctx: &EstimationContext<'_>,
        rng: &mut dyn RngCore,
        on_progress: &mut dyn FnMut(usize),
    ) -> Result<EstimateSequence, AnalysisError> {
        let x = ctx.observations.x();
        let y = ctx.observations.y();
        let n = ctx.observations.len();

        let mut x_resampled = vec![0.0; n];
        let mut y_resampled = vec![0.0; n];
        let mut slopes = Vec::with_capacity(ctx.n_iterations);
        for i in 0..ctx.n_iterations {
            match self.resampling {
                Resampling::Unpaired => {
                    for value in &mut x_resampled {
                        *value = x[rng.random_range(0..n)];
                    }
                    for value in &mut y_resampled {
                        *value = y[rng.random_range(0..n)];
                    }
                }
                Resampling::Paired => {
                    for (xr, yr) in x_resampled.iter_mut().zip(&mut y_resampled) {
                        let idx = rng.random_range(0..n);
                        *xr = x[idx];
                        *yr = y[idx];
                    }
                }
            }
            slopes.push(regression::fit_least_squares(&x_resampled, &y_resampled).slope);
            on_progress(i + 1);
        }

        Ok(EstimateSequence::new(Method::Bootstrap, slopes))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::{ModelParams, NullLogger, Observations};

    fn run(observations: &Observations, n_iterations: usize, seed: u64) -> Vec<f64> {
        run_with(Resampling::Unpaired, observations, n_iterations, seed)
    }

    fn run_with(
        resampling: Resampling,
        observations: &Observations,
        n_iterations: usize,
        seed: u64,
    ) -> Vec<f64> {
        let model = ModelParams::default();
        let ctx = EstimationContext {
            observations,
            model: &model,
            n_iterations,
            logger: &NullLogger,
        };
        BootstrapEstimator::new(resampling)
            .estimate(&ctx, &mut Pcg64::seed_from_u64(seed), &mut |_| {})
            .unwrap()
            .values()
            .to_vec()
    }

    #[test]
    fn test_length_and_progress() {
        let observations = Observations::new(vec![0.0, 1.0, 2.0, 3.0], vec![1.0, 2.0, 2.5, 4.0]);
        let model = ModelParams::default();
        let ctx = EstimationContext {
            observations: &observations,
            model: &model,
            n_iterations: 25,
            logger: &NullLogger,
        };
        let mut calls = vec![];
        let seq = BootstrapEstimator::default()
            .estimate(&ctx, &mut Pcg64::seed_from_u64(0), &mut |done| {
                calls.push(done);
            })
            .unwrap();
        assert_eq!(seq.len(), 25);
        assert_eq!(seq.method(), Method::Bootstrap);
        assert_eq!(calls, (1..=25).collect::<Vec<_>>());
    }

    #[test]
    fn test_single_observation_does_not_fail() {
        let observations = Observations::new(vec![0.0], vec![5.0]);
        let slopes = run(&observations, 10, 0);
        assert_eq!(slopes, vec![0.0; 10]);
    }

    #[test]
    fn test_constant_y_gives_zero_slopes() {
        let observations = Observations::new(vec![0.0, 2.0, 4.0, 6.0, 8.0], vec![7.0; 5]);
        let slopes = run(&observations, 50, 1);
        assert!(slopes.iter().all(|&s| s == 0.0), "{slopes:?}");
    }

    #[test]
    fn test_unpaired_resampling_breaks_correspondence() {
        // A perfectly linear dataset: paired resampling would always recover
        // slope 1, independent resampling of x and y does not.
        let x = (0..50).map(f64::from).collect::<Vec<_>>();
        let observations = Observations::new(x.clone(), x);
        let slopes = run(&observations, 200, 2);
        let mean = coefscope_stats::descriptive::mean(&slopes).unwrap();
        assert!(slopes.iter().any(|s| (s - 1.0).abs() > 0.1));
        assert!(mean.abs() < 0.2, "mean slope {mean}");
    }

    #[test]
    fn test_paired_resampling_keeps_exact_line() {
        let x = (0..50).map(f64::from).collect::<Vec<_>>();
        let y = x.iter().map(|x| 2.0 * x - 1.0).collect();
        let observations = Observations::new(x, y);
        let slopes = run_with(Resampling::Paired, &observations, 100, 4);
        assert!(slopes.iter().all(|s| (s - 2.0).abs() < 1e-9), "{slopes:?}");
    }

    #[test]
    fn test_resampling_parses_from_str() {
        assert_eq!("unpaired".parse::<Resampling>().ok(), Some(Resampling::Unpaired));
        assert_eq!("Paired".parse::<Resampling>().ok(), Some(Resampling::Paired));
        assert_eq!(Resampling::Paired.to_string(), "paired");
    }

    #[test]
    fn test_deterministic_for_seed() {
        let observations = Observations::new(vec![0.0, 1.0, 2.0], vec![0.5, 1.0, 3.0]);
        assert_eq!(run(&observations, 20, 9), run(&observations, 20, 9));
    }
}
