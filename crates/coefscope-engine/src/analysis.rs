use rand::SeedableRng as _;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::{
    AnalysisError, AnalysisParams, ComparisonTable, EstimateSet, HistogramBundle, Logger, Method,
    NullLogger, Observations,
    estimator::{
        BayesianEstimator, BootstrapEstimator, EstimationContext, Estimator, MonteCarloEstimator,
    },
};

/// Progress of a running analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// The method currently running.
    pub method: Method,
    /// Iterations completed by `method`.
    pub completed: usize,
    /// Iterations per method.
    pub n_iterations: usize,
}

impl Progress {
    /// Overall completion over all methods, between 0.0 and 1.0.
    ///
    /// ```
    /// # use coefscope_engine::{Method, Progress};
    /// let progress = Progress { method: Method::MonteCarlo, completed: 50, n_iterations: 100 };
    /// assert_eq!(progress.fraction(), 0.5);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fraction(&self) -> f64 {
        let total = self.n_iterations * Method::ALL.len();
        if total == 0 {
            return 1.0;
        }
        let done = self.method.index() * self.n_iterations + self.completed;
        done as f64 / total as f64
    }
}

/// Everything a renderer needs from one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub params: AnalysisParams,
    pub observations: Observations,
    pub estimates: EstimateSet,
    pub table: ComparisonTable,
    pub histogram: HistogramBundle,
}

impl AnalysisReport {
    /// The true slope, used as the reference marker.
    #[must_use]
    pub fn true_slope(&self) -> f64 {
        self.params.model.slope
    }
}

/// One analysis run.
///
/// The run owns a single random stream seeded from [`AnalysisParams::seed`].
/// The dataset is generated first, then the estimators run in
/// [`Method::ALL`] order, so identical parameters always give identical
/// reports.
pub struct Analysis<'a> {
    params: AnalysisParams,
    logger: &'a dyn Logger,
}

impl Analysis<'static> {
    #[must_use]
    pub fn new(params: AnalysisParams) -> Self {
        Self {
            params,
            logger: &NullLogger,
        }
    }
}

impl Analysis<'_> {
    #[must_use]
    pub fn with_logger<'b>(self, logger: &'b dyn Logger) -> Analysis<'b> {
        Analysis {
            params: self.params,
            logger,
        }
    }

    pub fn run(&self) -> Result<AnalysisReport, AnalysisError> {
        self.run_with_progress(|_| {})
    }

    /// Runs the analysis, calling `on_progress` as estimators advance.
    pub fn run_with_progress<F>(&self, mut on_progress: F) -> Result<AnalysisReport, AnalysisError>
    where
        F: FnMut(Progress),
    {
        let params = &self.params;
        let logger = self.logger;
        params.validate()?;

        logger.info(format_args!("Starting analysis"));
        logger.debug(format_args!(
            "parameters: slope = {}, intercept = {}, noise = {}, samples = {}, iterations = {}, seed = {}, resampling = {}",
            params.model.slope,
            params.model.intercept,
            params.model.noise,
            params.n_samples,
            params.n_iterations,
            params.seed,
            params.resampling,
        ));

        let mut rng = Pcg64::seed_from_u64(params.seed);
        let observations = Observations::generate(&params.model, params.n_samples, &mut rng)?;

        let ctx = EstimationContext {
            observations: &observations,
            model: &params.model,
            n_iterations: params.n_iterations,
            logger,
        };
        let mut run_estimator = |estimator: &dyn Estimator| {
            let method = estimator.method();
            logger.info(format_args!("Running {method} analysis..."));
            estimator.estimate(&ctx, &mut rng, &mut |completed| {
                on_progress(Progress {
                    method,
                    completed,
                    n_iterations: params.n_iterations,
                });
            })
        };
        let sequences = [
            run_estimator(&BootstrapEstimator::new(params.resampling))?,
            run_estimator(&MonteCarloEstimator)?,
            run_estimator(&BayesianEstimator)?,
        ];
        let estimates = EstimateSet::new(sequences);

        let table = ComparisonTable::build(&estimates, params.model.slope)?;
        let histogram = HistogramBundle::build(&estimates)?;
        log_histogram(logger, &histogram);

        logger.info(format_args!("Analysis complete"));
        Ok(AnalysisReport {
            params: *params,
            observations,
            estimates,
            table,
            histogram,
        })
    }
}

fn log_histogram(logger: &dyn Logger, histogram: &HistogramBundle) {
    for h in histogram.histograms() {
        logger.debug(format_args!(
            "{} max frequency: {}",
            h.method,
            h.max_count()
        ));
    }
    let (x_min, x_max) = histogram.x_range();
    logger.debug(format_args!("x-axis range: [{x_min:.4}, {x_max:.4}]"));
    logger.debug(format_args!("y-axis maximum: {:.2}", histogram.y_max()));
}
