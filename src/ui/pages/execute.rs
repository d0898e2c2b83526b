//! Execute page: run a function with an ad-hoc JSON payload.

use crate::api::FunctionPlatform;
use crate::events::{Event, Source};
use crate::ui::form::{self, TextField};
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ExecuteField {
    #[default]
    FuncId,
    Payload,
}

#[derive(Debug, Clone)]
pub struct ExecuteState {
    pub func_id: TextField,
    /// Free-form JSON payload; any shape is accepted.
    pub payload: TextField,
    /// `result` text of the last successful execution, shown verbatim.
    pub result: Option<String>,
    pub focus: ExecuteField,
}

impl Default for ExecuteState {
    fn default() -> Self {
        Self {
            func_id: TextField::new(),
            payload: TextField::with_value("{}"),
            result: None,
            focus: ExecuteField::FuncId,
        }
    }
}

impl ExecuteState {
    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            ExecuteField::FuncId => ExecuteField::Payload,
            ExecuteField::Payload => ExecuteField::FuncId,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus_next();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.focus {
            ExecuteField::FuncId => {
                self.func_id.handle_key(key);
            }
            ExecuteField::Payload => {
                self.payload.handle_key(key);
            }
        }
    }

    /// Execute the function. The payload is parsed locally first; a
    /// parse failure never reaches the network.
    pub async fn submit(&mut self, platform: &dyn FunctionPlatform) -> Event {
        let Some(id) = self.func_id.parse_id() else {
            return Event::warning(Source::Execute, "Enter a positive function id.".to_string());
        };
        let payload: serde_json::Value = match serde_json::from_str(self.payload.value()) {
            Ok(value) => value,
            Err(_) => {
                self.result = None;
                return Event::local_error(Source::Execute, "Invalid JSON format!".to_string());
            }
        };
        match platform.execute_function(id, &payload).await {
            Ok(outcome) => {
                self.result = Some(outcome.result);
                Event::success(Source::Execute, format!("Function '{}' executed", id))
            }
            Err(e) => {
                self.result = None;
                Event::api_error(Source::Execute, &e)
            }
        }
    }
}

/// Render the execute form and the last result.
pub fn render(f: &mut Frame, area: Rect, state: &ExecuteState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(chunks[0]);

    form::render_field(
        f,
        top[0],
        "Function ID",
        state.func_id.value(),
        state.focus == ExecuteField::FuncId,
    );
    form::render_field(
        f,
        top[1],
        "Payload (JSON)",
        state.payload.value(),
        state.focus == ExecuteField::Payload,
    );

    let result_block = Block::default()
        .title("Result")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));
    let result = match &state.result {
        Some(text) => Paragraph::new(text.as_str()).style(Style::default().fg(Color::Green)),
        None => Paragraph::new("Press Enter to execute.").style(Style::default().fg(Color::Gray)),
    };
    f.render_widget(result.block(result_block).wrap(Wrap { trim: false }), chunks[1]);
}
