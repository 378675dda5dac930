//! Estimation engine comparing three ways of estimating a regression slope.
//!
//! A single [`Analysis`] run generates one ground-truth linear dataset and
//! produces three sequences of slope estimates:
//!
//! - [`Method::Bootstrap`]: refits on resamples of the observed data
//! - [`Method::MonteCarlo`]: refits on freshly simulated datasets
//! - [`Method::Bayesian`]: draws from the closed-form sampling distribution of
//!   the least-squares slope
//!
//! The sequences are then summarized into a [`ComparisonTable`] and counted
//! into a [`HistogramBundle`] whose bins are shared across the methods, so a
//! renderer can put the three distributions on identical axes.
//!
//! # Examples
//!
//! ```
//! use coefscope_engine::{Analysis, AnalysisParams, Method};
//!
//! let params = AnalysisParams {
//!     n_iterations: 200,
//!     ..AnalysisParams::default()
//! };
//! let report = Analysis::new(params).run().unwrap();
//!
//! assert_eq!(report.estimates.get(Method::Bootstrap).len(), 200);
//! assert_eq!(report.histogram.bin_edges().len(), 31);
//! for row in report.table.rows() {
//!     assert_eq!(row.true_value, 3.0);
//! }
//! ```

pub use self::{
    analysis::{Analysis, AnalysisReport, Progress},
    binning::HistogramBundle,
    data::Observations,
    estimator::{EstimateSequence, EstimateSet, Method},
    logger::{Logger, NullLogger, RecordingLogger},
    params::{AnalysisParams, ModelParams},
    regression::LineFit,
    summary::{ComparisonRow, ComparisonTable},
};

pub mod analysis;
pub mod binning;
pub mod data;
pub mod estimator;
pub mod logger;
pub mod params;
pub mod regression;
pub mod summary;

/// A least-squares computation could not produce a meaningful value.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum NumericalInstabilityError {
    #[display("design matrix is singular (det(XᵀX) = {determinant:e})")]
    SingularDesignMatrix { determinant: f64 },
    #[display("residual variance needs more than 2 samples, got {n_samples}")]
    NoResidualDegreesOfFreedom { n_samples: usize },
    #[display("estimated standard deviation is not usable: {std_dev}")]
    InvalidSpread { std_dev: f64 },
    #[display("estimates span no finite range ({min} to {max})")]
    DegenerateBinRange { min: f64, max: f64 },
}

/// Analysis parameters rejected before any estimation starts.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("number of iterations must be at least 1")]
    ZeroIterations,
    #[display("number of samples must be at least 1")]
    ZeroSamples,
    #[display("noise level must be a finite non-negative number, got {noise}")]
    InvalidNoise { noise: f64 },
    #[display("parameter '{name}' must be finite, got {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum AnalysisError {
    #[display("invalid configuration: {_0}")]
    Config(ConfigError),
    #[display("numerical instability: {_0}")]
    NumericalInstability(NumericalInstabilityError),
}
