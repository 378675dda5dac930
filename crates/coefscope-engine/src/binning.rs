use coefscope_stats::histogram::{BinEdges, Histogram};
use serde::{Deserialize, Serialize};

use crate::{AnalysisError, ConfigError, EstimateSet, Method, NumericalInstabilityError};

/// Number of histogram bins per method.
pub const NUM_BINS: usize = 30;
/// Margin added on both sides of the combined estimate range.
pub const RANGE_PADDING: f64 = 0.1;
/// Headroom factor applied to the largest bin count for the y axis.
pub const Y_MAX_HEADROOM: f64 = 1.1;

/// Bin counts of one method against the shared edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodHistogram {
    pub method: Method,
    pub counts: Vec<u64>,
}

impl MethodHistogram {
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Histograms of all methods on identical axes.
///
/// All methods share the same [`NUM_BINS`] bins spanning the combined range
/// of every estimate, padded by [`RANGE_PADDING`], and the same y axis
/// maximum, so the distributions can be compared side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBundle {
    bin_edges: Vec<f64>,
    histograms: Vec<MethodHistogram>,
    y_max: f64,
}

impl HistogramBundle {
    /// Bins every method's estimates against shared edges.
    ///
    /// Fails if there are no estimates, or if the estimate range is not
    /// finite so that no increasing edges exist.
    ///
    /// ```
    /// # use coefscope_engine::{EstimateSequence, EstimateSet, HistogramBundle, Method};
    /// let estimates = EstimateSet::new([
    ///     EstimateSequence::new(Method::Bootstrap, vec![1.0, 1.0, 2.0]),
    ///     EstimateSequence::new(Method::MonteCarlo, vec![1.5, 1.5, 1.5]),
    ///     EstimateSequence::new(Method::Bayesian, vec![2.0, 1.0, 1.2]),
    /// ]);
    /// let bundle = HistogramBundle::build(&estimates).unwrap();
    /// let (lo, hi) = bundle.x_range();
    /// assert!((lo - 0.9).abs() < 1e-12 && (hi - 2.1).abs() < 1e-12);
    /// assert_eq!(bundle.counts(Method::MonteCarlo).iter().sum::<u64>(), 3);
    /// assert!((bundle.y_max() - 3.3).abs() < 1e-12);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn build(estimates: &EstimateSet) -> Result<Self, AnalysisError> {
        if estimates.n_iterations() == 0 {
            return Err(ConfigError::ZeroIterations.into());
        }
        let (min, max) = estimates
            .all_values()
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .ok_or(ConfigError::ZeroIterations)?;

        let edges = BinEdges::linspace(min - RANGE_PADDING, max + RANGE_PADDING, NUM_BINS);
        if !edges.is_strictly_increasing() {
            return Err(NumericalInstabilityError::DegenerateBinRange { min, max }.into());
        }
        let histograms = estimates
            .iter()
            .map(|seq| MethodHistogram {
                method: seq.method(),
                counts: Histogram::new(seq.values().iter().copied(), &edges).counts(),
            })
            .collect::<Vec<_>>();
        let max_count = histograms
            .iter()
            .map(MethodHistogram::max_count)
            .max()
            .unwrap_or(0);

        Ok(Self {
            bin_edges: edges.as_slice().to_vec(),
            histograms,
            y_max: max_count as f64 * Y_MAX_HEADROOM,
        })
    }

    /// The `NUM_BINS + 1` shared bin edges.
    #[must_use]
    pub fn bin_edges(&self) -> &[f64] {
        &self.bin_edges
    }

    /// Padded x axis range `(first edge, last edge)`.
    #[must_use]
    pub fn x_range(&self) -> (f64, f64) {
        (self.bin_edges[0], self.bin_edges[self.bin_edges.len() - 1])
    }

    #[must_use]
    pub fn histograms(&self) -> &[MethodHistogram] {
        &self.histograms
    }

    #[must_use]
    pub fn histogram(&self, method: Method) -> &MethodHistogram {
        &self.histograms[method.index()]
    }

    #[must_use]
    pub fn counts(&self, method: Method) -> &[u64] {
        &self.histogram(method).counts
    }

    /// Shared y axis maximum, 10% above the largest single-bin count.
    #[must_use]
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Index of the bin containing `value`, if it lies within the edges.
    ///
    /// Used to place the reference marker for the true slope.
    #[must_use]
    pub fn bin_of(&self, value: f64) -> Option<usize> {
        let last = self.bin_edges.len().checked_sub(2)?;
        self.bin_edges
            .windows(2)
            .position(|w| w[0] <= value && value < w[1])
            .or_else(|| (value == self.bin_edges[last + 1]).then_some(last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EstimateSequence;

    fn bundle(values: [Vec<f64>; 3]) -> HistogramBundle {
        let [a, b, c] = values;
        HistogramBundle::build(&EstimateSet::new([
            EstimateSequence::new(Method::Bootstrap, a),
            EstimateSequence::new(Method::MonteCarlo, b),
            EstimateSequence::new(Method::Bayesian, c),
        ]))
        .unwrap()
    }

    #[test]
    fn test_shared_edges_span_padded_range() {
        let bundle = bundle([vec![2.0, 3.0], vec![2.5, 4.0], vec![1.0, 3.5]]);
        let edges = bundle.bin_edges();
        assert_eq!(edges.len(), NUM_BINS + 1);
        assert_eq!(edges[0], 1.0 - RANGE_PADDING);
        assert_eq!(edges[NUM_BINS], 4.0 + RANGE_PADDING);
        assert!(edges.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_identical_estimates_still_have_increasing_edges() {
        let bundle = bundle([vec![3.0; 4], vec![3.0; 4], vec![3.0; 4]]);
        assert!(bundle.bin_edges().windows(2).all(|w| w[0] < w[1]));
        for method in Method::ALL {
            assert_eq!(bundle.counts(method).iter().sum::<u64>(), 4);
        }
        assert!((bundle.y_max() - 4.4).abs() < 1e-12);
    }

    #[test]
    fn test_y_max_covers_every_bin() {
        let bundle = bundle([
            vec![0.0, 0.1, 0.2, 0.3],
            vec![0.5, 0.5, 0.5, 0.9],
            vec![1.0, 0.0, 0.7, 0.7],
        ]);
        let largest = bundle
            .histograms()
            .iter()
            .flat_map(|h| h.counts.iter().copied())
            .max()
            .unwrap();
        assert_eq!(largest, 3);
        #[expect(clippy::cast_precision_loss)]
        let all_covered = bundle
            .histograms()
            .iter()
            .flat_map(|h| h.counts.iter())
            .all(|&c| c as f64 <= bundle.y_max());
        assert!(all_covered);
    }

    #[test]
    fn test_every_estimate_is_counted() {
        let values = (0..300).map(|i| f64::from(i).cos()).collect::<Vec<_>>();
        let bundle = bundle([values.clone(), values.clone(), values]);
        for h in bundle.histograms() {
            assert_eq!(h.counts.len(), NUM_BINS);
            assert_eq!(h.counts.iter().sum::<u64>(), 300);
        }
    }

    #[test]
    fn test_empty_estimates_are_rejected() {
        let result = HistogramBundle::build(&EstimateSet::new([
            EstimateSequence::new(Method::Bootstrap, vec![]),
            EstimateSequence::new(Method::MonteCarlo, vec![]),
            EstimateSequence::new(Method::Bayesian, vec![]),
        ]));
        assert_eq!(result, Err(AnalysisError::Config(ConfigError::ZeroIterations)));
    }

    #[test]
    fn test_infinite_estimate_has_no_usable_edges() {
        let result = HistogramBundle::build(&EstimateSet::new([
            EstimateSequence::new(Method::Bootstrap, vec![1.0]),
            EstimateSequence::new(Method::MonteCarlo, vec![f64::INFINITY]),
            EstimateSequence::new(Method::Bayesian, vec![2.0]),
        ]));
        assert!(matches!(
            result,
            Err(AnalysisError::NumericalInstability(
                NumericalInstabilityError::DegenerateBinRange { .. }
            ))
        ));
    }

    #[test]
    fn test_bin_of_true_value() {
        let bundle = bundle([vec![2.0, 4.0], vec![3.0, 3.0], vec![3.0, 3.0]]);
        let (lo, hi) = bundle.x_range();
        assert_eq!(bundle.bin_of(lo), Some(0));
        assert_eq!(bundle.bin_of(hi), Some(NUM_BINS - 1));
        assert_eq!(bundle.bin_of(3.01), Some(NUM_BINS / 2));
        assert_eq!(bundle.bin_of(10.0), None);
    }
}
