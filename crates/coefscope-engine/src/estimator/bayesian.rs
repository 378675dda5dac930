use rand::{Rng as _, RngCore};
use rand_distr::Normal;

use super::{EstimateSequence, EstimationContext, Estimator, Method};
use crate::{AnalysisError, NumericalInstabilityError, regression};

/// Closed-form probabilistic estimator.
///
/// Fits the observations once through the normal equations, estimates the
/// residual variance `σ² = SSR / (n − 2)` and draws every estimate from
/// `N(fitted slope, σ)`.
///
/// This samples an approximation of the least-squares slope's sampling
/// distribution; there is no prior and no posterior update involved. Note
/// that the spread is the residual standard deviation itself, not the
/// standard error of the slope.
#[derive(Debug, Default, Clone, Copy)]
pub struct BayesianEstimator;

impl Estimator for BayesianEstimator {
    fn method(&self) -> Method {
        Method::Bayesian
    }

    fn estimate(
        &self,
        ctx: &EstimationContext<'_>,
        rng: &mut dyn RngCore,
        on_progress: &mut dyn FnMut(usize),
    ) -> Result<EstimateSequence, AnalysisError> {
        let x = ctx.observations.x();
        let y = ctx.observations.y();

        let fit = regression::fit_normal_equations(x, y)?;
        let sigma_sq = regression::residual_variance(x, y, &fit)?;
        let std_dev = sigma_sq.sqrt();
        ctx.logger.debug(format_args!(
            "normal equations: slope = {:.6}, intercept = {:.6}, sigma^2 = {sigma_sq:.6e}",
            fit.slope, fit.intercept
        ));

        let distr = Normal::new(fit.slope, std_dev)
            .map_err(|_| NumericalInstabilityError::InvalidSpread { std_dev })?;
        let slopes = (0..ctx.n_iterations)
            .map(|_| rng.sample(distr))
            .collect::<Vec<_>>();
        on_progress(ctx.n_iterations);

        Ok(EstimateSequence::new(Method::Bayesian, slopes))
    }
}
