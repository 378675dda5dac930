//! Non-interactive output of an analysis report.

use std::io::{self, Write};

use clap::ArgAction;
use coefscope_engine::{
    AnalysisParams, AnalysisReport, ComparisonTable, HistogramBundle, Logger, Method,
    summary::COLUMNS,
};
use serde::Serialize;

/// Width in characters of the longest histogram bar.
const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::Args)]
pub(crate) struct RenderArg {
    /// Do not show the comparison table
    #[arg(
        long = "hide-summary",
        global = true,
        env = "SHOW_SUMMARY",
        action = ArgAction::SetFalse
    )]
    pub(crate) show_summary: bool,
    /// Do not show the histograms
    #[arg(
        long = "hide-histograms",
        global = true,
        env = "SHOW_VISUALIZATION",
        action = ArgAction::SetFalse
    )]
    pub(crate) show_histograms: bool,
}

impl Default for RenderArg {
    fn default() -> Self {
        Self {
            show_summary: true,
            show_histograms: true,
        }
    }
}

#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::FromStr,
)]
pub(crate) enum OutputFormat {
    #[default]
    #[display("text")]
    Text,
    #[display("json")]
    Json,
}

/// Writes analysis reports in one format, honoring the section switches.
pub(crate) struct Renderer<'a> {
    format: OutputFormat,
    options: RenderArg,
    logger: &'a dyn Logger,
}

impl<'a> Renderer<'a> {
    pub(crate) fn new(format: OutputFormat, options: RenderArg, logger: &'a dyn Logger) -> Self {
        Self {
            format,
            options,
            logger,
        }
    }

    pub(crate) fn render<W>(&self, report: &AnalysisReport, out: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        let RenderArg {
            show_summary,
            show_histograms,
        } = self.options;
        self.logger.debug(format_args!(
            "rendering {} output (summary: {show_summary}, histograms: {show_histograms})",
            self.format
        ));
        match self.format {
            OutputFormat::Text => render_text(report, self.options, out)?,
            OutputFormat::Json => render_json(report, self.options, out)?,
        }
        if show_histograms {
            let (x_min, x_max) = report.histogram.x_range();
            self.logger.debug(format_args!(
                "histogram axes: x [{x_min:.4}, {x_max:.4}], y max {:.2}",
                report.histogram.y_max()
            ));
        }
        self.logger.info(format_args!("Report rendered"));
        Ok(())
    }
}

fn render_text<W>(report: &AnalysisReport, options: RenderArg, out: &mut W) -> io::Result<()>
where
    W: Write,
{
    write_params(&report.params, out)?;
    if options.show_summary {
        writeln!(out)?;
        write_table(&report.table, out)?;
    }
    if options.show_histograms {
        for method in Method::ALL {
            writeln!(out)?;
            write_histogram(&report.histogram, method, report.true_slope(), out)?;
        }
    }
    Ok(())
}

fn write_params<W>(params: &AnalysisParams, out: &mut W) -> io::Result<()>
where
    W: Write,
{
    let AnalysisParams {
        model,
        n_samples,
        n_iterations,
        seed,
        resampling,
    } = params;
    writeln!(
        out,
        "y = {} * x + {} + N(0, {}), {n_samples} samples, {n_iterations} iterations, seed {seed}, {resampling} bootstrap",
        model.slope, model.intercept, model.noise
    )
}

fn write_table<W>(table: &ComparisonTable, out: &mut W) -> io::Result<()>
where
    W: Write,
{
    let [method, mean, std, true_value] = COLUMNS;
    writeln!(out, "{method:<12} {mean:>10} {std:>10} {true_value:>10}")?;
    for row in table.rows() {
        writeln!(
            out,
            "{:<12} {:>10.4} {:>10.4} {:>10.4}",
            row.method.to_string(),
            row.mean,
            row.std,
            row.true_value
        )?;
    }
    Ok(())
}

#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn write_histogram<W>(
    histogram: &HistogramBundle,
    method: Method,
    true_slope: f64,
    out: &mut W,
) -> io::Result<()>
where
    W: Write,
{
    let y_max = histogram.y_max();
    let marker_bin = histogram.bin_of(true_slope);
    writeln!(out, "{method} (y max {y_max:.1})")?;
    for (i, (edges, &count)) in histogram
        .bin_edges()
        .windows(2)
        .zip(histogram.counts(method))
        .enumerate()
    {
        let len = if y_max > 0.0 {
            (count as f64 / y_max * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let marker = if marker_bin == Some(i) { " <- true" } else { "" };
        writeln!(
            out,
            "{:>9.4} {:>9.4} |{:<BAR_WIDTH$}| {count}{marker}",
            edges[0],
            edges[1],
            "#".repeat(len)
        )?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    params: &'a AnalysisParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a ComparisonTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    histogram: Option<&'a HistogramBundle>,
}

fn render_json<W>(report: &AnalysisReport, options: RenderArg, out: &mut W) -> io::Result<()>
where
    W: Write,
{
    let json = JsonReport {
        params: &report.params,
        summary: options.show_summary.then_some(&report.table),
        histogram: options.show_histograms.then_some(&report.histogram),
    };
    serde_json::to_writer_pretty(&mut *out, &json)?;
    writeln!(out)
}
