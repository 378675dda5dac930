use coefscope_stats::descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, EstimateSet, Method};

/// Column headers of a [`ComparisonTable`], in order.
pub const COLUMNS: [&str; 4] = ["Method", "Mean", "Std", "True Value"];

/// Summary of one method's estimates against the true slope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    #[serde(rename = "Method")]
    pub method: Method,
    #[serde(rename = "Mean")]
    pub mean: f64,
    /// Population standard deviation of the estimates.
    #[serde(rename = "Std")]
    pub std: f64,
    #[serde(rename = "True Value")]
    pub true_value: f64,
}

impl ComparisonRow {
    /// Difference between the mean estimate and the true value.
    #[must_use]
    pub fn bias(&self) -> f64 {
        self.mean - self.true_value
    }
}

/// One row per method, in [`Method::ALL`] order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonTable {
    rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    /// Summarizes every estimate sequence against `true_slope`.
    ///
    /// Fails only for empty sequences, which a validated run never produces.
    pub fn build(estimates: &EstimateSet, true_slope: f64) -> Result<Self, ConfigError> {
        if estimates.n_iterations() == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        let rows = estimates
            .iter()
            .map(|seq| {
                let stats = DescriptiveStats::new(seq.values().iter().copied())
                    .ok_or(ConfigError::ZeroIterations)?;
                Ok(ComparisonRow {
                    method: seq.method(),
                    mean: stats.mean,
                    std: stats.std_dev,
                    true_value: true_slope,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rows })
    }

    #[must_use]
    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, method: Method) -> &ComparisonRow {
        &self.rows[method.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EstimateSequence;

    fn estimates(values: [Vec<f64>; 3]) -> EstimateSet {
        let [a, b, c] = values;
        EstimateSet::new([
            EstimateSequence::new(Method::Bootstrap, a),
            EstimateSequence::new(Method::MonteCarlo, b),
            EstimateSequence::new(Method::Bayesian, c),
        ])
    }

    #[test]
    fn test_rows_follow_method_order() {
        let table =
            ComparisonTable::build(&estimates([vec![1.0], vec![2.0], vec![3.0]]), 2.0).unwrap();
        let methods = table.rows().iter().map(|r| r.method).collect::<Vec<_>>();
        assert_eq!(methods, Method::ALL);
        assert_eq!(table.row(Method::Bayesian).mean, 3.0);
        assert_eq!(table.row(Method::Bootstrap).bias(), -1.0);
    }

    #[test]
    fn test_population_std_and_constant_true_value() {
        let table = ComparisonTable::build(
            &estimates([vec![1.0, 3.0], vec![2.0, 2.0], vec![0.0, 4.0]]),
            3.5,
        )
        .unwrap();
        assert_eq!(table.row(Method::Bootstrap).std, 1.0);
        assert_eq!(table.row(Method::MonteCarlo).std, 0.0);
        assert_eq!(table.row(Method::Bayesian).std, 2.0);
        assert!(table.rows().iter().all(|r| r.true_value == 3.5));
    }

    #[test]
    fn test_empty_sequences_are_rejected() {
        let result = ComparisonTable::build(&estimates([vec![], vec![], vec![]]), 1.0);
        assert_eq!(result, Err(ConfigError::ZeroIterations));
    }

    #[test]
    fn test_serialized_column_names() {
        let table =
            ComparisonTable::build(&estimates([vec![1.0], vec![1.0], vec![1.0]]), 1.0).unwrap();
        let json = serde_json::to_value(&table).unwrap();
        let row = json[1].as_object().unwrap();
        let mut keys = row.keys().map(String::as_str).collect::<Vec<_>>();
        keys.sort_unstable();
        let mut expected = COLUMNS.to_vec();
        expected.sort_unstable();
        assert_eq!(keys, expected);
        assert_eq!(row["Method"], "Monte Carlo");
    }
}
