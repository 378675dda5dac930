use rand::{Rng as _, RngCore};

use super::{EstimateSequence, EstimationContext, Estimator, Method};
use crate::{AnalysisError, data::X_MAX, regression};

/// Simulation estimator.
///
/// Every round simulates a brand new dataset from the generative model:
/// x values uniform over `[0, 10)`, then one fresh noise draw per point.
/// The observed dataset is only used for its size.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonteCarloEstimator;

impl Estimator for MonteCarloEstimator {
    fn method(&self) -> Method {
        Method::MonteCarlo
    }

    fn estimate(
        &self,
        ctx: &EstimationContext<'_>,
        rng: &mut dyn RngCore,
        on_progress: &mut dyn FnMut(usize),
    ) -> Result<EstimateSequence, AnalysisError> {
        let n = ctx.observations.len();
        let noise = ctx.model.noise_distribution()?;

        let mut x = vec![0.0; n];
        let mut y = vec![0.0; n];
        let mut slopes = Vec::with_capacity(ctx.n_iterations);
        for i in 0..ctx.n_iterations {
            for value in &mut x {
                *value = rng.random_range(0.0..X_MAX);
            }
            for (y, &x) in y.iter_mut().zip(&x) {
                *y = ctx.model.mean_response(x) + rng.sample(noise);
            }
            slopes.push(regression::fit_least_squares(&x, &y).slope);
            on_progress(i + 1);
        }

        Ok(EstimateSequence::new(Method::MonteCarlo, slopes))
    }
}
