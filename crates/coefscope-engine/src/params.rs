use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, estimator::Resampling};

/// The generative model `y = slope * x + intercept + N(0, noise)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// True slope coefficient (θ1).
    pub slope: f64,
    /// True intercept (θ0).
    pub intercept: f64,
    /// Standard deviation of the Gaussian noise added to every `y`.
    pub noise: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            slope: 3.0,
            intercept: 5.0,
            noise: 2.0,
        }
    }
}

impl ModelParams {
    /// The noiseless response at `x`.
    #[must_use]
    pub fn mean_response(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Distribution of the additive noise term.
    ///
    /// Fails for a negative or non-finite noise level.
    pub fn noise_distribution(&self) -> Result<Normal<f64>, ConfigError> {
        let invalid = ConfigError::InvalidNoise { noise: self.noise };
        if !self.noise.is_finite() || self.noise < 0.0 {
            return Err(invalid);
        }
        Normal::new(0.0, self.noise).map_err(|_| invalid)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("slope", self.slope), ("intercept", self.intercept)] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteParameter { name, value });
            }
        }
        self.noise_distribution()?;
        Ok(())
    }
}

/// Everything one analysis run depends on.
///
/// Two runs with equal parameters produce identical reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    pub model: ModelParams,
    /// Size of the observed dataset and of every resample / simulated dataset.
    pub n_samples: usize,
    /// Length of every estimate sequence.
    pub n_iterations: usize,
    /// Seed of the run's single random stream.
    pub seed: u64,
    /// How the bootstrap estimator draws its resamples.
    #[serde(default)]
    pub resampling: Resampling,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            model: ModelParams::default(),
            n_samples: 100,
            n_iterations: 1000,
            seed: 42,
            resampling: Resampling::Unpaired,
        }
    }
}

impl AnalysisParams {
    /// Checks the parameters at the boundary of the engine.
    ///
    /// Only conditions that would make the computation meaningless are
    /// rejected; the ranges offered by a user interface are not enforced.
    ///
    /// ```
    /// # use coefscope_engine::{AnalysisParams, ConfigError};
    /// let params = AnalysisParams { n_iterations: 0, ..AnalysisParams::default() };
    /// assert_eq!(params.validate(), Err(ConfigError::ZeroIterations));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.n_samples == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        self.model.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(AnalysisParams::default().validate(), Ok(()));
    }

    #[test]
    fn test_values_outside_ui_ranges_are_accepted() {
        let params = AnalysisParams {
            model: ModelParams {
                slope: -250.0,
                intercept: 1e6,
                noise: 42.0,
            },
            n_samples: 3,
            n_iterations: 1,
            seed: 0,
            resampling: Resampling::Paired,
        };
        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn test_zero_samples_rejected() {
        let params = AnalysisParams {
            n_samples: 0,
            ..AnalysisParams::default()
        };
        assert_eq!(params.validate(), Err(ConfigError::ZeroSamples));
    }

    #[test]
    fn test_invalid_noise_rejected() {
        for noise in [-0.1, f64::NAN, f64::INFINITY] {
            let model = ModelParams {
                noise,
                ..ModelParams::default()
            };
            assert!(matches!(
                model.validate(),
                Err(ConfigError::InvalidNoise { .. })
            ));
        }
    }

    #[test]
    fn test_non_finite_slope_rejected() {
        let model = ModelParams {
            slope: f64::NAN,
            ..ModelParams::default()
        };
        assert!(matches!(
            model.validate(),
            Err(ConfigError::NonFiniteParameter { name: "slope", .. })
        ));
    }

    #[test]
    fn test_noise_distribution_rejects_invalid_noise() {
        for noise in [-1.0, -0.0001, f64::NAN, f64::NEG_INFINITY] {
            let model = ModelParams {
                noise,
                ..ModelParams::default()
            };
            assert!(
                matches!(
                    model.noise_distribution(),
                    Err(ConfigError::InvalidNoise { .. })
                ),
                "noise {noise}"
            );
        }
    }

    #[test]
    fn test_zero_noise_distribution_is_allowed() {
        let model = ModelParams {
            noise: 0.0,
            ..ModelParams::default()
        };
        assert!(model.noise_distribution().is_ok());
    }
}
