//! Dashboard screen rendering.

use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::environment::Environment;
use crate::events::{Event, EventType, Source};
use crate::ui::pages::{self, Page};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use std::collections::VecDeque;
use std::time::Instant;

/// State for the dashboard screen: the selected page, each page's
/// form state, and the activity log.
#[derive(Debug)]
pub struct DashboardState {
    /// The environment in which the application is running.
    pub environment: Environment,

    /// Base URL of the platform the console is talking to.
    pub api_url: String,

    /// The start time of the application, used for computing uptime.
    pub start_time: Instant,

    /// Currently selected page.
    pub page: Page,

    pub deploy: pages::deploy::DeployForm,
    pub manage: pages::manage::ManageState,
    pub execute: pages::execute::ExecuteState,
    pub metrics: pages::metrics::MetricsState,

    /// Outcomes of past actions, newest last.
    pub activity_logs: VecDeque<Event>,
}

impl DashboardState {
    pub fn new(environment: Environment, api_url: String, start_time: Instant) -> Self {
        Self {
            environment,
            api_url,
            start_time,
            page: Page::Deploy,
            deploy: pages::deploy::DeployForm::default(),
            manage: pages::manage::ManageState::default(),
            execute: pages::execute::ExecuteState::default(),
            metrics: pages::metrics::MetricsState::default(),
            activity_logs: VecDeque::new(),
        }
    }

    /// Add an event to the activity log with size limit
    pub fn add_to_activity_log(&mut self, event: Event) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    pub fn next_page(&mut self) {
        self.page = self.page.next();
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.prev();
    }

    /// Move field focus forward on the current page.
    pub fn focus_next(&mut self) {
        match self.page {
            Page::Deploy => self.deploy.focus_next(),
            Page::Manage => self.manage.focus_next(),
            Page::Execute => self.execute.focus_next(),
            Page::Metrics => {}
        }
    }

    /// Move field focus backward on the current page.
    pub fn focus_prev(&mut self) {
        match self.page {
            Page::Deploy => self.deploy.focus_prev(),
            Page::Manage => self.manage.focus_prev(),
            Page::Execute => self.execute.focus_prev(),
            Page::Metrics => {}
        }
    }

    /// Get a color for the page that produced an event.
    fn source_color(source: Source) -> Color {
        match source {
            Source::Deploy => Color::Green,
            Source::Manage => Color::Yellow,
            Source::Execute => Color::Magenta,
            Source::Metrics => Color::Blue,
        }
    }

    /// Format timestamp to include date but no year (MM-DD HH:MM:SS)
    fn format_compact_timestamp(timestamp: &str) -> String {
        if let Some((date_part, time_part)) = timestamp.split_once(' ') {
            if let Some(month_day) = date_part.get(5..) {
                format!("{} {}", month_day, time_part)
            } else {
                timestamp.to_string()
            }
        } else {
            timestamp.to_string()
        }
    }

    /// Keep long response bodies from flooding the log pane.
    fn truncate_message(msg: &str) -> String {
        const MAX_LEN: usize = 160;
        if msg.chars().count() <= MAX_LEN {
            return msg.to_string();
        }
        let truncated: String = msg.chars().take(MAX_LEN).collect();
        format!("{}…", truncated)
    }
}

/// Render the dashboard screen.
pub fn render_dashboard(f: &mut Frame, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3), // Title block
                Constraint::Min(0),    // Body area
                Constraint::Length(8), // Activity log
                Constraint::Length(2), // Footer block
            ]
            .as_ref(),
        )
        .split(f.area());

    let version = env!("CARGO_PKG_VERSION");
    let title_block = Block::default().borders(Borders::BOTTOM);
    let title = Paragraph::new(format!("=== FAAS CONSOLE v{} ===", version))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(title_block);
    f.render_widget(title, chunks[0]);

    // Body layout: sidebar and page area
    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(24), Constraint::Percentage(76)].as_ref())
        .split(chunks[1]);

    render_sidebar(f, body_chunks[0], state);

    match state.page {
        Page::Deploy => pages::deploy::render(f, body_chunks[1], &state.deploy),
        Page::Manage => pages::manage::render(f, body_chunks[1], &state.manage),
        Page::Execute => pages::execute::render(f, body_chunks[1], &state.execute),
        Page::Metrics => pages::metrics::render(f, body_chunks[1], &state.metrics),
    }

    render_activity_log(f, chunks[2], state);

    let footer_text = match state.page {
        Page::Deploy => "[Esc] Quit | [Ctrl+N/P] Page | [Tab] Field | [Ctrl+S] Deploy",
        Page::Manage => {
            "[Esc] Quit | [Ctrl+N/P] Page | [Tab] Field | [Enter] Load | [Ctrl+R] Refresh | [Ctrl+S] Update | [Ctrl+D] Delete"
        }
        Page::Execute => "[Esc] Quit | [Ctrl+N/P] Page | [Tab] Field | [Enter] Execute",
        Page::Metrics => "[Esc] Quit | [Ctrl+N/P] Page | [Enter] Refresh",
    };
    let footer = Paragraph::new(footer_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(footer, chunks[3]);
}

fn render_sidebar(f: &mut Frame, area: Rect, state: &DashboardState) {
    let sidebar_block = Block::default()
        .borders(Borders::RIGHT)
        .title("NAVIGATION")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let mut lines = Vec::new();
    for page in Page::ALL {
        if page == state.page {
            lines.push(Line::from(Span::styled(
                format!("▸ {}", page),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                format!("  {}", page),
                Style::default().fg(Color::Gray),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(format!("API: {}", state.api_url)));
    lines.push(Line::from(format!("ENVIRONMENT: {}", state.environment)));

    let uptime = state.start_time.elapsed();
    lines.push(Line::from(format!(
        "UPTIME: {}h {}m {}s",
        uptime.as_secs() / 3600,
        (uptime.as_secs() % 3600) / 60,
        uptime.as_secs() % 60
    )));

    let sidebar = Paragraph::new(lines)
        .block(sidebar_block)
        .style(Style::default().fg(Color::Cyan))
        .wrap(Wrap { trim: true });
    f.render_widget(sidebar, area);
}

fn render_activity_log(f: &mut Frame, area: Rect, state: &DashboardState) {
    let log_lines: Vec<Line> = state
        .activity_logs
        .iter()
        .filter(|event| event.should_display())
        .rev() // newest first
        .map(|event| {
            let icon = match event.event_type {
                EventType::Success => "✅",
                EventType::Warning => "⚠️",
                EventType::Error => "❌",
                EventType::Info => "ℹ️",
            };
            let source_color = DashboardState::source_color(event.source);
            let compact_time = DashboardState::format_compact_timestamp(&event.timestamp);
            let msg = DashboardState::truncate_message(&event.msg);

            Line::from(vec![
                Span::raw(format!("{} ", icon)),
                Span::styled(
                    format!("{} ", compact_time),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("[{}] ", event.source),
                    Style::default()
                        .fg(source_color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(msg, Style::default().fg(source_color)),
            ])
        })
        .collect();

    let log_paragraph = if log_lines.is_empty() {
        Paragraph::new(vec![Line::from("No activity yet.")])
    } else {
        Paragraph::new(log_lines)
    };

    let log_widget = log_paragraph
        .block(
            Block::default()
                .title("ACTIVITY")
                .borders(Borders::TOP)
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(log_widget, area);
}
