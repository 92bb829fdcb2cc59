//! Dashboard chart components
//!
//! Renders the transient response chart and the residual chart

use super::super::state::DashboardState;
use crate::chart::{ChartState, ChartTables, bounds};
use crate::consts::cli_consts::chart;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::{
    Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph,
};

/// Render both charts side by side, each at the fixed chart width when there is room.
pub fn render_charts_section(f: &mut Frame, area: Rect, state: &DashboardState) {
    let tables = match &state.chart {
        ChartState::Loaded(tables) => tables,
        ChartState::NotLoaded => {
            render_placeholder(f, area, "Loading chart data...", Color::DarkGray);
            return;
        }
        ChartState::Failed(reason) => {
            render_placeholder(
                f,
                area,
                &format!("Charts unavailable: {}", reason),
                Color::LightRed,
            );
            return;
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Max(chart::WIDTH),
            Constraint::Max(chart::WIDTH),
        ])
        .split(area);

    render_response_chart(f, chunks[0], tables);
    render_residual_chart(f, chunks[1], tables);
}

/// One dataset per unbroken run, so a missing step shows as a gap. Only the first run
/// carries the series name, keeping one legend entry per series.
fn series_datasets<'a>(
    segments: &'a [Vec<(f64, f64)>],
    name: &'static str,
    color: Color,
) -> Vec<Dataset<'a>> {
    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let graph_type = if segment.len() == 1 {
                GraphType::Scatter
            } else {
                GraphType::Line
            };
            let dataset = Dataset::default()
                .marker(Marker::Braille)
                .graph_type(graph_type)
                .style(Style::default().fg(color))
                .data(segment);
            if i == 0 { dataset.name(name) } else { dataset }
        })
        .collect()
}

fn all_points(segments: &[Vec<(f64, f64)>]) -> impl Iterator<Item = &(f64, f64)> {
    segments.iter().flatten()
}

fn render_response_chart(f: &mut Frame, area: Rect, tables: &ChartTables) {
    let experimental = tables.experimental_segments();
    let theoretical = tables.theoretical_segments();

    let x_bounds = bounds(
        all_points(&experimental)
            .chain(all_points(&theoretical))
            .map(|p| p.0),
    );
    let y_bounds = bounds(
        all_points(&experimental)
            .chain(all_points(&theoretical))
            .map(|p| p.1),
    );

    let mut datasets = series_datasets(&experimental, chart::EXPERIMENTAL_LABEL, Color::Cyan);
    datasets.extend(series_datasets(
        &theoretical,
        chart::THEORETICAL_LABEL,
        Color::LightMagenta,
    ));

    let widget = Chart::new(datasets)
        .block(chart_block(chart::RESPONSE_TITLE.to_string()))
        .x_axis(axis(chart::TIME_AXIS_TITLE, x_bounds))
        .y_axis(axis(chart::AMPLITUDE_AXIS_TITLE, y_bounds))
        .legend_position(Some(LegendPosition::Bottom))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));
    f.render_widget(widget, area);
}

fn render_residual_chart(f: &mut Frame, area: Rect, tables: &ChartTables) {
    let residuals = tables.residual_segments();

    let title = match tables.residual_rms() {
        Some(rms) => format!("{} (RMS {:.4})", chart::RESIDUAL_TITLE, rms),
        None => chart::RESIDUAL_TITLE.to_string(),
    };

    let datasets = series_datasets(&residuals, chart::RESIDUAL_LABEL, Color::Yellow);

    let widget = Chart::new(datasets)
        .block(chart_block(title))
        .x_axis(axis(
            chart::TIME_AXIS_TITLE,
            bounds(all_points(&residuals).map(|p| p.0)),
        ))
        .y_axis(axis(
            chart::RESIDUAL_AXIS_TITLE,
            bounds(all_points(&residuals).map(|p| p.1)),
        ))
        .legend_position(Some(LegendPosition::Bottom))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));
    f.render_widget(widget, area);
}

fn chart_block<'a>(title: String) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
}

fn axis(title: &str, [min, max]: [f64; 2]) -> Axis<'_> {
    Axis::default()
        .title(title)
        .style(Style::default().fg(Color::Gray))
        .bounds([min, max])
        .labels([format!("{:.2}", min), format!("{:.2}", (min + max) / 2.0), format!("{:.2}", max)])
}

fn render_placeholder(f: &mut Frame, area: Rect, text: &str, color: Color) {
    let placeholder = Paragraph::new(text.to_string())
        .style(Style::default().fg(color))
        .block(chart_block(chart::RESPONSE_TITLE.to_string()));
    f.render_widget(placeholder, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_run_gets_its_own_dataset() {
        let segments = vec![vec![(0.0, 1.1)], vec![(2.0, 3.1), (3.0, 4.1)]];
        assert_eq!(
            series_datasets(&segments, chart::EXPERIMENTAL_LABEL, Color::Cyan).len(),
            2
        );
        assert!(series_datasets(&[], chart::RESIDUAL_LABEL, Color::Yellow).is_empty());
    }

    #[test]
    fn bounds_cover_every_run() {
        let segments = vec![vec![(0.0, 1.0)], vec![(2.0, -3.0), (5.0, 4.0)]];
        assert_eq!(bounds(all_points(&segments).map(|p| p.0)), [0.0, 5.0]);
        assert_eq!(bounds(all_points(&segments).map(|p| p.1)), [-3.0, 4.0]);
    }
}
