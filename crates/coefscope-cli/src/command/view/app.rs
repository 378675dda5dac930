use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use coefscope_engine::{Analysis, AnalysisError, AnalysisParams, AnalysisReport};
use ratatui::{DefaultTerminal, Frame};

use crate::{logging::TracingLogger, render::RenderArg};

use super::screen;

/// A parameter adjustable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Param {
    Slope,
    Intercept,
    Noise,
    Samples,
    Iterations,
}

impl Param {
    pub(crate) const ALL: [Self; 5] = [
        Self::Slope,
        Self::Intercept,
        Self::Noise,
        Self::Samples,
        Self::Iterations,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Slope => "True Slope",
            Self::Intercept => "True Intercept",
            Self::Noise => "Noise Level",
            Self::Samples => "Sample Size",
            Self::Iterations => "Iterations",
        }
    }

    pub(crate) fn value(self, params: &AnalysisParams) -> String {
        match self {
            Self::Slope => format!("{:.1}", params.model.slope),
            Self::Intercept => format!("{:.1}", params.model.intercept),
            Self::Noise => format!("{:.1}", params.model.noise),
            Self::Samples => params.n_samples.to_string(),
            Self::Iterations => params.n_iterations.to_string(),
        }
    }

    /// Moves the parameter by `steps` increments, clamped to its range.
    pub(crate) fn adjust(self, params: &mut AnalysisParams, steps: isize) {
        match self {
            Self::Slope => step_f64(&mut params.model.slope, steps, 1.0, 10.0),
            Self::Intercept => step_f64(&mut params.model.intercept, steps, 0.0, 10.0),
            Self::Noise => step_f64(&mut params.model.noise, steps, 0.0, 10.0),
            Self::Samples => step_usize(&mut params.n_samples, steps, 10, 50, 1000),
            Self::Iterations => step_usize(&mut params.n_iterations, steps, 100, 100, 5000),
        }
    }
}

#[expect(clippy::cast_precision_loss)]
fn step_f64(value: &mut f64, steps: isize, min: f64, max: f64) {
    // work in tenths so repeated steps do not accumulate rounding error
    let tenths = (*value * 10.0).round() + steps as f64;
    *value = (tenths / 10.0).clamp(min, max);
}

fn step_usize(value: &mut usize, steps: isize, step: usize, min: usize, max: usize) {
    let delta = steps.saturating_mul(isize::try_from(step).unwrap_or(isize::MAX));
    *value = value.saturating_add_signed(delta).clamp(min, max);
}

#[derive(Debug)]
pub(crate) struct ViewApp {
    params: AnalysisParams,
    render: RenderArg,
    selected: usize,
    outcome: Result<AnalysisReport, AnalysisError>,
    should_exit: bool,
}

impl ViewApp {
    pub(crate) fn new(params: AnalysisParams, render: RenderArg) -> Self {
        let outcome = analyze(params);
        Self {
            params,
            render,
            selected: 0,
            outcome,
            should_exit: false,
        }
    }

    pub(crate) fn params(&self) -> &AnalysisParams {
        &self.params
    }

    pub(crate) fn render_options(&self) -> RenderArg {
        self.render
    }

    pub(crate) fn selected(&self) -> Param {
        Param::ALL[self.selected]
    }

    pub(crate) fn outcome(&self) -> Result<&AnalysisReport, &AnalysisError> {
        self.outcome.as_ref()
    }

    pub(crate) fn run(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        while !self.should_exit {
            terminal.draw(|f| self.draw(f))?;
            self.handle_events()?;
        }
        Ok(())
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        screen::draw(self, frame);
    }

    fn handle_events(&mut self) -> anyhow::Result<()> {
        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.handle_key_event(key_event);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_exit = true,
            KeyCode::Up => {
                self.selected = self.selected.checked_sub(1).unwrap_or(Param::ALL.len() - 1);
            }
            KeyCode::Down => self.selected = (self.selected + 1) % Param::ALL.len(),
            KeyCode::Left => self.update(|app| app.selected().adjust(&mut app.params, -1)),
            KeyCode::Right => self.update(|app| app.selected().adjust(&mut app.params, 1)),
            KeyCode::Char('r') => self.update(|app| {
                app.params.seed = app.params.seed.wrapping_add(1);
            }),
            _ => {}
        }
    }

    fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let before = self.params;
        f(self);
        if self.params != before {
            self.outcome = analyze(self.params);
        }
    }
}

fn analyze(params: AnalysisParams) -> Result<AnalysisReport, AnalysisError> {
    let outcome = Analysis::new(params).with_logger(&TracingLogger).run();
    if let Err(e) = &outcome {
        tracing::warn!("analysis failed: {e}");
    }
    outcome
}
