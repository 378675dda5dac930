use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, ModelParams};

/// Upper bound of the x domain; x values always lie in `[0, X_MAX]`.
pub const X_MAX: f64 = 10.0;

/// An ordered set of `(x, y)` observations.
///
/// Created once per analysis run and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observations {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Observations {
    /// # Panics
    ///
    /// Panics if `x` and `y` differ in length.
    #[must_use]
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        assert_eq!(x.len(), y.len(), "x and y must have the same length");
        Self { x, y }
    }

    /// Generates the ground-truth dataset of a run.
    ///
    /// `x` holds `n_samples` evenly spaced points over `[0, 10]` and every `y`
    /// gets an independent noise draw, taken from `rng` in index order.
    ///
    /// A single sample (`x = [0.0]`) is allowed here even though it cannot
    /// support a line fit; the closed-form estimator reports that case.
    ///
    /// ```
    /// # use coefscope_engine::{ModelParams, Observations};
    /// # use rand::SeedableRng as _;
    /// let model = ModelParams { slope: 2.0, intercept: 1.0, noise: 0.0 };
    /// let mut rng = rand_pcg::Pcg64::seed_from_u64(0);
    /// let data = Observations::generate(&model, 3, &mut rng).unwrap();
    /// assert_eq!(data.x(), &[0.0, 5.0, 10.0]);
    /// assert_eq!(data.y(), &[1.0, 11.0, 21.0]);
    /// ```
    pub fn generate<R>(
        model: &ModelParams,
        n_samples: usize,
        rng: &mut R,
    ) -> Result<Self, ConfigError>
    where
        R: Rng + ?Sized,
    {
        let noise = model.noise_distribution()?;
        let x = linspace(0.0, X_MAX, n_samples);
        let y = x
            .iter()
            .map(|&x| model.mean_response(x) + rng.sample(noise))
            .collect();
        Ok(Self { x, y })
    }

    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// `n` evenly spaced values from `start` to `stop`, both included.
///
/// A single value is `start`; zero values yield an empty vector.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut values = (0..n - 1)
                .map(|i| start + step * i as f64)
                .collect::<Vec<_>>();
            values.push(stop);
            values
        }
    }
}
