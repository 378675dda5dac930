use coefscope_engine::{AnalysisParams, AnalysisReport, Method, Observations, summary::COLUMNS};
use coefscope_stats::descriptive::DescriptiveStats;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect, Spacing},
    style::{Color, Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Text},
    widgets::{
        Bar, BarChart, Block, List, ListItem, ListState, Paragraph, Row, StatefulWidget, Table,
        Widget,
    },
};

use super::app::{Param, ViewApp};

pub(super) fn draw(app: &ViewApp, frame: &mut Frame) {
    let options = app.render_options();

    let [main_area, help_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
    let [top_area, chart_area] =
        Layout::vertical([Constraint::Length(9), Constraint::Fill(1)])
            .spacing(Spacing::Overlap(1))
            .areas(main_area);
    let [params_pane, summary_pane] =
        Layout::horizontal([Constraint::Length(34), Constraint::Fill(1)])
            .spacing(Spacing::Overlap(1))
            .areas(top_area);

    frame.render_widget(
        ParamSelector {
            params: app.params(),
            selected: app.selected(),
        },
        params_pane,
    );

    match app.outcome() {
        Ok(report) => {
            if options.show_summary {
                frame.render_widget(Summary { report }, summary_pane);
            } else {
                let observations = &report.observations;
                frame.render_widget(DataSummary { observations }, summary_pane);
            }
            if options.show_histograms {
                let panes: [Rect; 3] = Layout::horizontal([Constraint::Fill(1); 3])
                    .spacing(Spacing::Overlap(1))
                    .areas(chart_area);
                for (method, pane) in Method::ALL.into_iter().zip(panes) {
                    frame.render_widget(MethodHistogram { report, method }, pane);
                }
            }
        }
        Err(err) => {
            let message = Paragraph::new(format!("Analysis failed: {err}"))
                .style(Style::default().fg(Color::Red))
                .block(
                    Block::bordered()
                        .merge_borders(MergeStrategy::Exact)
                        .title("Error"),
                );
            frame.render_widget(message, summary_pane);
        }
    }

    let help_text = Text::from("↑/↓: Select | ←/→: Adjust | r: Reseed | q/Esc: Quit")
        .style(Style::default().fg(Color::DarkGray))
        .centered();
    frame.render_widget(help_text, help_area);
}

struct ParamSelector<'a> {
    params: &'a AnalysisParams,
    selected: Param,
}

impl Widget for ParamSelector<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let items = Param::ALL
            .iter()
            .map(|p| ListItem::new(format!("{:<15} {:>8}", p.label(), p.value(self.params))))
            .collect::<Vec<_>>();

        let list = List::new(items)
            .block(
                Block::bordered()
                    .title(format!("Parameters (seed {})", self.params.seed))
                    .merge_borders(MergeStrategy::Exact),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ");

        let mut list_state = ListState::default();
        list_state.select(Param::ALL.iter().position(|&p| p == self.selected));

        StatefulWidget::render(list, area, buf, &mut list_state);
    }
}

struct Summary<'a> {
    report: &'a AnalysisReport,
}

impl Widget for Summary<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let rows = self.report.table.rows().iter().map(|row| {
            Row::new([
                row.method.to_string(),
                format!("{:.4}", row.mean),
                format!("{:.4}", row.std),
                format!("{:.4}", row.true_value),
            ])
        });
        let table = Table::new(rows, [Constraint::Length(12); 4])
            .header(Row::new(COLUMNS).style(Style::default().add_modifier(Modifier::BOLD)))
            .block(
                Block::bordered()
                    .merge_borders(MergeStrategy::Exact)
                    .title("Summary"),
            );
        Widget::render(table, area, buf);
    }
}

struct DataSummary<'a> {
    observations: &'a Observations,
}

impl Widget for DataSummary<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let mut text = vec![Line::raw(format!("  Samples: {}", self.observations.len()))];
        if let Some(stats) = DescriptiveStats::new(self.observations.y().iter().copied()) {
            text.extend([
                Line::raw(format!("  y mean:  {:10.4}", stats.mean)),
                Line::raw(format!("  y std:   {:10.4}", stats.std_dev)),
                Line::raw(format!("  y range: {:10.4} .. {:.4}", stats.min, stats.max)),
            ]);
        }
        let paragraph = Paragraph::new(text).block(
            Block::bordered()
                .merge_borders(MergeStrategy::Exact)
                .title("Observations"),
        );
        Widget::render(paragraph, area, buf);
    }
}

struct MethodHistogram<'a> {
    report: &'a AnalysisReport,
    method: Method,
}

impl Widget for MethodHistogram<'_> {
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let histogram = &self.report.histogram;
        let marker_bin = histogram.bin_of(self.report.true_slope());
        let bars = histogram
            .counts(self.method)
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                let color = if marker_bin == Some(i) {
                    Color::Red
                } else {
                    Color::Cyan
                };
                Bar::default()
                    .value(count)
                    .text_value(String::new())
                    .style(Style::default().fg(color))
            })
            .collect::<Vec<_>>();

        let (x_min, x_max) = histogram.x_range();
        let row = self.report.table.row(self.method);
        let block = Block::bordered()
            .merge_borders(MergeStrategy::Exact)
            .title(self.method.to_string())
            .title_bottom(Line::from(format!("{x_min:.3} .. {x_max:.3}")).centered())
            .title_bottom(Line::from(format!("mean {:.4}", row.mean)).right_aligned());

        let chart = BarChart::new(bars)
            .block(block)
            .bar_width(1)
            .bar_gap(0)
            .max(histogram.y_max().ceil() as u64);

        Widget::render(chart, area, buf);
    }
}
