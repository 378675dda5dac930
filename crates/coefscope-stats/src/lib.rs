//! Statistical utilities for the coefscope project.
//!
//! This crate provides the small set of statistical tools the estimation engine
//! needs to summarize and compare sequences of estimates:
//!
//! - **Descriptive statistics**: mean, median, population variance and standard deviation
//! - **Histogram generation**: equal-width bins over an explicit range, so that several
//!   datasets can be counted against the very same bin edges
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`histogram`]: Fixed-edge histogram construction
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use coefscope_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Counting two datasets against shared bin edges
//!
//! ```
//! use coefscope_stats::histogram::{BinEdges, Histogram};
//!
//! let edges = BinEdges::linspace(0.0, 10.0, 5);
//! let a = Histogram::new([1.0, 2.5, 9.0], &edges);
//! let b = Histogram::new([5.0, 5.5, 10.0], &edges);
//! assert_eq!(a.counts(), vec![2, 0, 0, 0, 1]);
//! assert_eq!(b.counts(), vec![0, 0, 2, 0, 1]);
//! ```

pub mod descriptive;
pub mod histogram;
