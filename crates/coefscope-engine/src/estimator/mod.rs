//! The three slope estimators compared by an analysis run.
//!
//! Every estimator turns the run's observations (or the generative model
//! itself) into a sequence of `n_iterations` slope estimates, drawing all of
//! its randomness from the run's single random stream.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::{AnalysisError, Logger, ModelParams, Observations};

pub use self::{
    bayesian::BayesianEstimator,
    bootstrap::{BootstrapEstimator, Resampling},
    monte_carlo::MonteCarloEstimator,
};

mod bayesian;
mod bootstrap;
mod monte_carlo;

/// Identifies one of the estimation methods.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum Method {
    /// Refit on resamples drawn with replacement from the observations.
    #[display("Bootstrap")]
    Bootstrap,
    /// Refit on freshly simulated datasets from the generative model.
    #[display("Monte Carlo")]
    #[serde(rename = "Monte Carlo")]
    MonteCarlo,
    /// Sample from the closed-form distribution of the least-squares slope.
    #[display("Bayesian")]
    Bayesian,
}

impl Method {
    /// All methods, in the order an analysis run executes them.
    pub const ALL: [Self; 3] = [Self::Bootstrap, Self::MonteCarlo, Self::Bayesian];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Bootstrap => 0,
            Self::MonteCarlo => 1,
            Self::Bayesian => 2,
        }
    }
}

/// Inputs shared by all estimators within one run.
#[derive(Clone, Copy)]
pub struct EstimationContext<'a> {
    /// The run's ground-truth dataset.
    pub observations: &'a Observations,
    /// The generative model the observations were drawn from.
    pub model: &'a ModelParams,
    pub n_iterations: usize,
    pub logger: &'a dyn Logger,
}

/// A procedure producing slope estimates.
pub trait Estimator {
    fn method(&self) -> Method;

    /// Produces exactly `ctx.n_iterations` slope estimates.
    ///
    /// `on_progress` is called with the number of completed iterations.
    fn estimate(
        &self,
        ctx: &EstimationContext<'_>,
        rng: &mut dyn RngCore,
        on_progress: &mut dyn FnMut(usize),
    ) -> Result<EstimateSequence, AnalysisError>;
}

/// Slope estimates produced by one method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateSequence {
    method: Method,
    values: Vec<f64>,
}

impl EstimateSequence {
    #[must_use]
    pub fn new(method: Method, values: Vec<f64>) -> Self {
        Self { method, values }
    }

    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One estimate sequence per method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateSet {
    sequences: [EstimateSequence; 3],
}

impl EstimateSet {
    /// # Panics
    ///
    /// Panics if the sequences are not given in [`Method::ALL`] order or
    /// differ in length.
    #[must_use]
    pub fn new(sequences: [EstimateSequence; 3]) -> Self {
        for (seq, method) in sequences.iter().zip(Method::ALL) {
            assert_eq!(seq.method(), method, "sequences must follow Method::ALL");
        }
        assert!(
            sequences.iter().all(|s| s.len() == sequences[0].len()),
            "all estimate sequences must have the same length"
        );
        Self { sequences }
    }

    #[must_use]
    pub fn get(&self, method: Method) -> &[f64] {
        self.sequences[method.index()].values()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EstimateSequence> {
        self.sequences.iter()
    }

    /// Every estimate of every method.
    pub fn all_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.sequences.iter().flat_map(|s| s.values().iter().copied())
    }

    /// Length shared by all sequences.
    #[must_use]
    pub fn n_iterations(&self) -> usize {
        self.sequences[0].len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names() {
        let names = Method::ALL.map(|m| m.to_string());
        assert_eq!(names, ["Bootstrap", "Monte Carlo", "Bayesian"]);
        assert_eq!(
            serde_json::to_string(&Method::MonteCarlo).unwrap(),
            "\"Monte Carlo\""
        );
    }

    #[test]
    fn test_method_index_matches_order() {
        for (i, method) in Method::ALL.into_iter().enumerate() {
            assert_eq!(method.index(), i);
        }
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_estimate_set_rejects_unequal_lengths() {
        let _ = EstimateSet::new([
            EstimateSequence::new(Method::Bootstrap, vec![1.0]),
            EstimateSequence::new(Method::MonteCarlo, vec![1.0]),
            EstimateSequence::new(Method::Bayesian, vec![1.0, 2.0]),
        ]);
    }
}
