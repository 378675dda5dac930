use std::ops::Range;

/// Boundaries of equal-width histogram bins.
///
/// `n` bins are described by `n + 1` edges. Every bin is half-open
/// (`[start, end)`) except the last one, which also includes its right edge,
/// so a value equal to the maximum edge is still counted.
///
/// Sharing one `BinEdges` between several [`Histogram`]s keeps their bins
/// directly comparable.
#[derive(Debug, Clone, PartialEq)]
pub struct BinEdges {
    edges: Vec<f64>,
}

impl BinEdges {
    /// Creates `num_bins + 1` evenly spaced edges from `min` to `max`.
    ///
    /// The first edge is exactly `min` and the last edge is exactly `max`;
    /// inner edges are computed from their index rather than accumulated, so
    /// floating-point error does not build up across bins.
    ///
    /// # Examples
    ///
    /// ```
    /// # use coefscope_stats::histogram::BinEdges;
    /// let edges = BinEdges::linspace(-1.0, 1.0, 4);
    /// assert_eq!(edges.as_slice(), &[-1.0, -0.5, 0.0, 0.5, 1.0]);
    /// assert_eq!(edges.num_bins(), 4);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn linspace(min: f64, max: f64, num_bins: usize) -> Self {
        if num_bins == 0 {
            return Self { edges: vec![min] };
        }
        let step = (max - min) / num_bins as f64;
        let mut edges = (0..num_bins)
            .map(|i| min + step * i as f64)
            .collect::<Vec<_>>();
        edges.push(max);
        Self { edges }
    }

    /// All edges in ascending order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.edges
    }

    #[must_use]
    pub fn num_bins(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.edges[0]
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    /// Returns `true` if every edge is strictly greater than its predecessor.
    #[must_use]
    pub fn is_strictly_increasing(&self) -> bool {
        self.edges.windows(2).all(|w| w[0] < w[1])
    }

    /// Returns the index of the bin containing `value`.
    ///
    /// Returns `None` for values outside `[min, max]` and for NaN.
    ///
    /// # Examples
    ///
    /// ```
    /// # use coefscope_stats::histogram::BinEdges;
    /// let edges = BinEdges::linspace(0.0, 3.0, 3);
    /// assert_eq!(edges.bin_index(0.0), Some(0));
    /// assert_eq!(edges.bin_index(1.0), Some(1));
    /// assert_eq!(edges.bin_index(3.0), Some(2));
    /// assert_eq!(edges.bin_index(3.5), None);
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    #[must_use]
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        let num_bins = self.num_bins();
        if num_bins == 0 || !(self.min()..=self.max()).contains(&value) {
            return None;
        }
        let width = (self.max() - self.min()) / num_bins as f64;
        let mut idx = if width > 0.0 {
            (((value - self.min()) / width).floor() as usize).min(num_bins - 1)
        } else {
            0
        };
        // Correct the estimate against the stored edges so the result agrees
        // with them exactly at bin boundaries.
        while idx > 0 && value < self.edges[idx] {
            idx -= 1;
        }
        while idx + 1 < num_bins && value >= self.edges[idx + 1] {
            idx += 1;
        }
        Some(idx)
    }
}

/// A histogram representation of a dataset's distribution.
///
/// The histogram counts the values falling into each bin of a given
/// [`BinEdges`]. Values outside the edges are not counted.
#[derive(Debug, Clone)]
pub struct Histogram {
    /// The bins comprising the histogram, in ascending order.
    pub bins: Vec<HistogramBin>,
}

/// A single bin in a histogram.
///
/// Each bin represents a range of values and the count of data points falling within that range.
#[derive(Debug, Clone)]
pub struct HistogramBin {
    /// The range of values covered by this bin (inclusive start, exclusive end;
    /// the last bin of a histogram also includes its end).
    pub range: Range<f64>,
    /// The number of values that fall within this bin's range.
    pub count: u64,
}

impl Histogram {
    /// Counts `values` into the bins described by `edges`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use coefscope_stats::histogram::{BinEdges, Histogram};
    /// let edges = BinEdges::linspace(0.0, 4.0, 4);
    /// let histogram = Histogram::new([0.5, 1.0, 1.5, 4.0, 7.0], &edges);
    /// assert_eq!(histogram.counts(), vec![1, 2, 0, 1]);
    /// assert_eq!(histogram.max_count(), 2);
    /// ```
    #[must_use]
    pub fn new<I>(values: I, edges: &BinEdges) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut bins = edges
            .as_slice()
            .windows(2)
            .map(|w| HistogramBin {
                range: w[0]..w[1],
                count: 0,
            })
            .collect::<Vec<_>>();

        for value in values {
            if let Some(idx) = edges.bin_index(value) {
                bins[idx].count += 1;
            }
        }

        Self { bins }
    }

    /// Per-bin counts in bin order.
    #[must_use]
    pub fn counts(&self) -> Vec<u64> {
        self.bins.iter().map(|bin| bin.count).collect()
    }

    /// The largest single-bin count, or 0 for a histogram without bins.
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints_are_exact() {
        let edges = BinEdges::linspace(2.7, 3.3, 30);
        assert_eq!(edges.as_slice().len(), 31);
        assert_eq!(edges.min(), 2.7);
        assert_eq!(edges.max(), 3.3);
        assert!(edges.is_strictly_increasing());
    }

    #[test]
    fn test_zero_bins() {
        let edges = BinEdges::linspace(0.0, 1.0, 0);
        assert_eq!(edges.num_bins(), 0);
        assert_eq!(edges.bin_index(0.5), None);
        let histogram = Histogram::new([0.5], &edges);
        assert!(histogram.bins.is_empty());
        assert_eq!(histogram.max_count(), 0);
    }

    #[test]
    fn test_values_on_edges() {
        let edges = BinEdges::linspace(0.0, 1.0, 10);
        for (i, &edge) in edges.as_slice().iter().enumerate().take(10) {
            assert_eq!(edges.bin_index(edge), Some(i), "edge {edge}");
        }
        assert_eq!(edges.bin_index(1.0), Some(9));
    }

    #[test]
    fn test_out_of_range_and_nan_are_ignored() {
        let edges = BinEdges::linspace(0.0, 1.0, 2);
        let histogram = Histogram::new([-0.1, 1.1, f64::NAN, 0.25], &edges);
        assert_eq!(histogram.counts(), vec![1, 0]);
        assert_eq!(histogram.counts().iter().sum::<u64>(), 1);
    }

    #[test]
    fn test_bins_follow_edges() {
        let edges = BinEdges::linspace(-3.0, 3.0, 6);
        let histogram = Histogram::new([], &edges);
        assert_eq!(histogram.bins.len(), 6);
        for (bin, w) in histogram.bins.iter().zip(edges.as_slice().windows(2)) {
            assert_eq!(bin.range.start, w[0]);
            assert_eq!(bin.range.end, w[1]);
        }
    }

    #[test]
    fn test_every_value_in_range_is_counted() {
        let values = (0..1000).map(|i| f64::from(i).sin() * 5.0).collect::<Vec<_>>();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let edges = BinEdges::linspace(min, max, 30);
        let histogram = Histogram::new(values.iter().copied(), &edges);
        assert_eq!(histogram.counts().iter().sum::<u64>(), 1000);
    }
}
