use clap::{Parser, Subcommand};
use coefscope_engine::{AnalysisParams, ModelParams, estimator::Resampling};

use crate::{logging::LoggingArg, render::RenderArg};

use self::run::RunArg;

mod run;
mod view;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
    #[clap(flatten)]
    params: ParamsArg,
    #[clap(flatten)]
    logging: LoggingArg,
    #[clap(flatten)]
    render: RenderArg,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run one analysis and print the results
    Run(#[clap(flatten)] RunArg),
    /// Explore the estimators interactively
    View,
}

/// Parameters of the analysis, shared by every mode.
#[derive(Debug, Clone, Copy, clap::Args)]
pub(crate) struct ParamsArg {
    /// True slope of the generating line
    #[arg(long, global = true, default_value_t = 3.0, allow_negative_numbers = true)]
    slope: f64,
    /// True intercept of the generating line
    #[arg(long, global = true, default_value_t = 5.0, allow_negative_numbers = true)]
    intercept: f64,
    /// Standard deviation of the Gaussian noise
    #[arg(long, global = true, default_value_t = 2.0)]
    noise: f64,
    /// Number of observations
    #[arg(long, global = true, default_value_t = 100)]
    samples: usize,
    /// Number of estimates per method
    #[arg(long, global = true, default_value_t = 1000)]
    iterations: usize,
    /// Seed of the random number generator
    #[arg(long, global = true, default_value_t = 42)]
    seed: u64,
    /// Bootstrap resampling scheme (unpaired, paired)
    #[arg(long, global = true, default_value = "unpaired")]
    resampling: Resampling,
}

impl ParamsArg {
    pub(crate) fn to_params(self) -> AnalysisParams {
        let Self {
            slope,
            intercept,
            noise,
            samples,
            iterations,
            seed,
            resampling,
        } = self;
        AnalysisParams {
            model: ModelParams {
                slope,
                intercept,
                noise,
            },
            n_samples: samples,
            n_iterations: iterations,
            seed,
            resampling,
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let CommandArgs {
        mode,
        params,
        logging,
        render,
    } = args;
    let params = params.to_params();
    match mode.unwrap_or(Mode::Run(RunArg::default())) {
        Mode::Run(arg) => {
            logging.init(true)?;
            run::run(&arg, params, render)?;
        }
        Mode::View => {
            logging.init(false)?;
            view::run(params, render)?;
        }
    }
    Ok(())
}
