//! Metrics page: execution records, a per-function response-time
//! chart, and aggregate statistics.

use crate::api::FunctionPlatform;
use crate::events::{Event, Source};
use crate::models::{MetricRecord, MetricsSummary};
use crate::ui::form::{self, TextField};
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph, Row, Table,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct MetricsState {
    /// Function id filter; 0 selects all functions.
    pub filter: TextField,
    pub records: Vec<MetricRecord>,
    pub summary: Option<MetricsSummary>,
    /// Whether a fetch has completed at least once.
    pub fetched: bool,
}

impl Default for MetricsState {
    fn default() -> Self {
        Self {
            filter: TextField::with_value("0"),
            records: Vec::new(),
            summary: None,
            fetched: false,
        }
    }
}

impl MetricsState {
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.filter.handle_key(key);
    }

    /// Fetch metrics for the current filter. A zero filter maps to
    /// the unfiltered listing.
    pub async fn refresh(&mut self, platform: &dyn FunctionPlatform) -> Event {
        let Some(filter) = self.filter.parse_filter() else {
            return Event::warning(
                Source::Metrics,
                "Enter a non-negative function id (0 = all).".to_string(),
            );
        };
        let func_id = (filter > 0).then_some(filter);
        match platform.get_metrics(func_id).await {
            Ok(records) => {
                self.summary = MetricsSummary::from_records(&records);
                let event = if records.is_empty() {
                    Event::info(Source::Metrics, "No metrics data available.".to_string())
                } else {
                    Event::success(
                        Source::Metrics,
                        format!("Loaded {} metric records", records.len()),
                    )
                };
                self.records = records;
                self.fetched = true;
                event
            }
            Err(e) => Event::api_error(Source::Metrics, &e),
        }
    }
}

/// Stable color per chart series.
fn series_color(index: usize) -> Color {
    const COLORS: [Color; 6] = [
        Color::Green,
        Color::Yellow,
        Color::Magenta,
        Color::Blue,
        Color::Red,
        Color::LightCyan,
    ];
    COLORS[index % COLORS.len()]
}

/// Group records into one point series per function, with x as
/// seconds since the earliest record.
fn build_series(records: &[MetricRecord]) -> Vec<(i64, Vec<(f64, f64)>)> {
    let Some(origin) = records.iter().map(|r| r.timestamp).min() else {
        return Vec::new();
    };
    let mut series: BTreeMap<i64, Vec<(f64, f64)>> = BTreeMap::new();
    for record in records {
        let x = (record.timestamp - origin).num_milliseconds() as f64 / 1000.0;
        series
            .entry(record.func_id)
            .or_default()
            .push((x, record.response_time));
    }
    series.into_iter().collect()
}

/// Render the filter, and once fetched either the records view or the
/// empty-set message.
pub fn render(f: &mut Frame, area: Rect, state: &MetricsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(8)])
        .split(area);

    form::render_field(
        f,
        chunks[0],
        "Filter by Function ID (0 = all)",
        state.filter.value(),
        true,
    );

    if !state.fetched {
        let hint = Paragraph::new("Press Enter to load metrics.")
            .style(Style::default().fg(Color::Gray))
            .block(bordered("Metrics"));
        f.render_widget(hint, chunks[1]);
        return;
    }
    if state.records.is_empty() {
        let empty = Paragraph::new("No metrics data available.")
            .style(Style::default().fg(Color::Gray))
            .block(bordered("Metrics"));
        f.render_widget(empty, chunks[1]);
        return;
    }

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40), // records table
            Constraint::Min(8),         // chart
            Constraint::Length(3),      // statistics
        ])
        .split(chunks[1]);

    render_table(f, body[0], &state.records);
    render_chart(f, body[1], &state.records);
    if let Some(summary) = &state.summary {
        render_stats(f, body[2], summary);
    }
}

fn bordered(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
}

fn render_table(f: &mut Frame, area: Rect, records: &[MetricRecord]) {
    let header = Row::new(vec!["Function", "Timestamp", "Response Time", "Errors"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    let rows = records.iter().map(|record| {
        let errors = record.errors.clone().unwrap_or_else(|| "-".to_string());
        let style = if record.errors.is_some() {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        Row::new(vec![
            record.func_id.to_string(),
            record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.3} s", record.response_time),
            errors,
        ])
        .style(style)
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(20),
            Constraint::Length(15),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(bordered("Metrics"));
    f.render_widget(table, area);
}

fn render_chart(f: &mut Frame, area: Rect, records: &[MetricRecord]) {
    let series = build_series(records);
    let datasets = series
        .iter()
        .enumerate()
        .map(|(i, (func_id, points))| {
            Dataset::default()
                .name(format!("fn {}", func_id))
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(series_color(i)))
                .data(points)
        })
        .collect::<Vec<_>>();

    let x_max = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|p| p.0))
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let y_max = records
        .iter()
        .map(|r| r.response_time)
        .fold(0.0_f64, f64::max)
        .max(0.1)
        * 1.1;

    let chart = Chart::new(datasets)
        .block(bordered("Response Time Over Time"))
        .x_axis(
            Axis::default()
                .title("Elapsed (s)")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(vec![
                    "0".to_string(),
                    format!("{:.0}", x_max / 2.0),
                    format!("{:.0}", x_max),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("Response Time (s)")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, y_max])
                .labels(vec![
                    "0.00".to_string(),
                    format!("{:.2}", y_max / 2.0),
                    format!("{:.2}", y_max),
                ]),
        );
    f.render_widget(chart, area);
}

fn render_stats(f: &mut Frame, area: Rect, summary: &MetricsSummary) {
    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(area);

    let avg = Paragraph::new(format!("{:.2} s", summary.avg_response_time))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(bordered("Avg Response Time"));
    f.render_widget(avg, tiles[0]);

    let total = Paragraph::new(summary.total.to_string())
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .block(bordered("Total Executions"));
    f.render_widget(total, tiles[1]);

    let error_rate = Paragraph::new(format!("{:.1}%", summary.error_rate))
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(summary.error_rate_color())
                .add_modifier(Modifier::BOLD),
        )
        .block(bordered("Error Rate"));
    f.render_widget(error_rate, tiles[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockFunctionPlatform;
    use crate::events::EventType;
    use chrono::{TimeZone, Utc};
    use mockall::predicate::eq;

    fn record(func_id: i64, offset_secs: i64, response_time: f64) -> MetricRecord {
        MetricRecord {
            func_id,
            timestamp: Utc
                .with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
                .unwrap()
                + chrono::Duration::seconds(offset_secs),
            response_time,
            errors: None,
        }
    }

    #[tokio::test]
    // A zero filter requests the unfiltered listing.
    async fn zero_filter_is_unfiltered() {
        let mut platform = MockFunctionPlatform::new();
        platform
            .expect_get_metrics()
            .with(eq(None))
            .times(1)
            .returning(|_| Ok(vec![record(1, 0, 0.5)]));

        let mut state = MetricsState::default();
        let event = state.refresh(&platform).await;
        assert_eq!(event.event_type, EventType::Success);
        assert!(state.summary.is_some());
    }

    #[tokio::test]
    // A positive filter is passed through as the func_id parameter.
    async fn positive_filter_is_forwarded() {
        let mut platform = MockFunctionPlatform::new();
        platform
            .expect_get_metrics()
            .with(eq(Some(3)))
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let mut state = MetricsState {
            filter: TextField::with_value("3"),
            ..Default::default()
        };
        state.refresh(&platform).await;
    }

    #[tokio::test]
    // An empty result set yields no summary and the info message.
    async fn empty_result_has_no_summary() {
        let mut platform = MockFunctionPlatform::new();
        platform
            .expect_get_metrics()
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let mut state = MetricsState::default();
        let event = state.refresh(&platform).await;
        assert_eq!(event.event_type, EventType::Info);
        assert_eq!(event.msg, "No metrics data available.");
        assert_eq!(state.summary, None);
        assert!(state.fetched);
    }

    #[tokio::test]
    // A negative filter is rejected locally.
    async fn negative_filter_is_rejected() {
        let platform = MockFunctionPlatform::new();
        let mut state = MetricsState {
            filter: TextField::with_value("-2"),
            ..Default::default()
        };
        let event = state.refresh(&platform).await;
        assert_eq!(event.event_type, EventType::Warning);
    }

    #[test]
    // Series are grouped by function with x relative to the earliest record.
    fn series_group_by_function() {
        let records = vec![record(2, 10, 0.3), record(1, 0, 0.5), record(2, 20, 0.7)];
        let series = build_series(&records);
        assert_eq!(series.len(), 2);

        let (first_id, first_points) = &series[0];
        assert_eq!(*first_id, 1);
        assert_eq!(first_points, &vec![(0.0, 0.5)]);

        let (second_id, second_points) = &series[1];
        assert_eq!(*second_id, 2);
        assert_eq!(second_points, &vec![(10.0, 0.3), (20.0, 0.7)]);
    }

    #[test]
    fn series_of_nothing_is_empty() {
        assert!(build_series(&[]).is_empty());
    }
}
