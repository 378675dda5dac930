use coefscope_engine::AnalysisParams;

use crate::render::RenderArg;

use self::app::ViewApp;

mod app;
mod screen;

pub(crate) fn run(params: AnalysisParams, render: RenderArg) -> anyhow::Result<()> {
    tracing::info!("starting interactive view");
    let mut app = ViewApp::new(params, render);
    ratatui::run(|terminal| app.run(terminal))?;
    tracing::info!("interactive view closed");
    Ok(())
}
