use std::io::{self, Write as _};

use anyhow::Context as _;
use coefscope_engine::{Analysis, AnalysisParams};

use crate::{
    logging::TracingLogger,
    render::{OutputFormat, RenderArg, Renderer},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct RunArg {
    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,
}

pub(crate) fn run(arg: &RunArg, params: AnalysisParams, render: RenderArg) -> anyhow::Result<()> {
    let RunArg { format } = arg;
    let logger = TracingLogger;

    let report = Analysis::new(params)
        .with_logger(&logger)
        .run()
        .context("analysis failed")?;

    let mut stdout = io::stdout().lock();
    Renderer::new(*format, render, &logger)
        .render(&report, &mut stdout)
        .context("failed to write the report")?;
    stdout.flush()?;

    Ok(())
}
