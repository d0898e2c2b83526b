//! Manage page: the function table plus load, update, and delete.

use crate::api::FunctionPlatform;
use crate::consts::cli_consts::function_timeout;
use crate::events::{Event, Source};
use crate::models::{Function, FunctionSpec, Language};
use crate::ui::form::{self, TextField};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph, Row, Table};

/// Focus order on the manage page. Edit fields are reachable only
/// while a function is loaded.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ManageField {
    #[default]
    FuncId,
    Name,
    Language,
    Timeout,
    Code,
}

/// Edit form pre-filled from a loaded function.
#[derive(Debug, Clone)]
pub struct EditForm {
    pub id: i64,
    pub name: TextField,
    pub language: Language,
    pub timeout: u32,
    pub code: TextField,
}

impl EditForm {
    fn from_function(func: &Function) -> Self {
        Self {
            id: func.id,
            name: TextField::with_value(&func.name),
            language: func.language,
            timeout: func.timeout,
            code: TextField::multiline_with_value(&func.code),
        }
    }

    fn spec(&self) -> FunctionSpec {
        FunctionSpec {
            name: self.name.value().to_string(),
            language: self.language,
            code: self.code.value().to_string(),
            timeout: function_timeout::clamp(self.timeout),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ManageState {
    pub functions: Vec<Function>,
    pub func_id: TextField,
    pub edit: Option<EditForm>,
    pub focus: ManageField,
    /// Whether the table has been fetched at least once.
    pub loaded: bool,
}

impl ManageState {
    pub fn focus_next(&mut self) {
        self.focus = match (self.focus, self.edit.is_some()) {
            (ManageField::FuncId, true) => ManageField::Name,
            (ManageField::FuncId, false) => ManageField::FuncId,
            (ManageField::Name, _) => ManageField::Language,
            (ManageField::Language, _) => ManageField::Timeout,
            (ManageField::Timeout, _) => ManageField::Code,
            (ManageField::Code, _) => ManageField::FuncId,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match (self.focus, self.edit.is_some()) {
            (ManageField::FuncId, true) => ManageField::Code,
            (ManageField::FuncId, false) => ManageField::FuncId,
            (ManageField::Name, _) => ManageField::FuncId,
            (ManageField::Language, _) => ManageField::Name,
            (ManageField::Timeout, _) => ManageField::Language,
            (ManageField::Code, _) => ManageField::Timeout,
        };
    }

    /// Fetch the function table.
    pub async fn refresh(&mut self, platform: &dyn FunctionPlatform) -> Event {
        match platform.list_functions().await {
            Ok(functions) => {
                let event = if functions.is_empty() {
                    Event::info(
                        Source::Manage,
                        "No functions available. Try deploying one.".to_string(),
                    )
                } else {
                    Event::success(
                        Source::Manage,
                        format!("Loaded {} functions", functions.len()),
                    )
                };
                self.functions = functions;
                self.loaded = true;
                event
            }
            Err(e) => Event::api_error(Source::Manage, &e),
        }
    }

    /// Load one function into the edit form.
    pub async fn load(&mut self, platform: &dyn FunctionPlatform) -> Event {
        let Some(id) = self.func_id.parse_id() else {
            return Event::warning(Source::Manage, "Enter a positive function id.".to_string());
        };
        match platform.get_function(id).await {
            Ok(func) => {
                self.edit = Some(EditForm::from_function(&func));
                self.focus = ManageField::Name;
                Event::success(Source::Manage, format!("Function '{}' loaded", id))
            }
            Err(e) => Event::api_error(Source::Manage, &e),
        }
    }

    /// Submit the edit form as a full replace.
    pub async fn update(&mut self, platform: &dyn FunctionPlatform) -> Event {
        let Some(edit) = &self.edit else {
            return Event::warning(Source::Manage, "Load a function first.".to_string());
        };
        if edit.name.is_empty() || edit.code.is_empty() {
            return Event::warning(
                Source::Manage,
                "Please enter both name and code.".to_string(),
            );
        }
        match platform.update_function(edit.id, &edit.spec()).await {
            Ok(()) => Event::success(Source::Manage, format!("Function '{}' updated", edit.id)),
            Err(e) => Event::api_error(Source::Manage, &e),
        }
    }

    /// Delete the loaded function and close the edit form.
    pub async fn delete(&mut self, platform: &dyn FunctionPlatform) -> Event {
        let Some(edit) = &self.edit else {
            return Event::warning(Source::Manage, "Load a function first.".to_string());
        };
        let id = edit.id;
        match platform.delete_function(id).await {
            Ok(()) => {
                self.edit = None;
                self.focus = ManageField::FuncId;
                Event::success(Source::Manage, format!("Function '{}' deleted", id))
            }
            Err(e) => Event::api_error(Source::Manage, &e),
        }
    }

    /// Route a key to the focused field or selector.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.focus == ManageField::FuncId {
            self.func_id.handle_key(key);
            return;
        }
        let Some(edit) = &mut self.edit else { return };
        match self.focus {
            ManageField::Name => {
                edit.name.handle_key(key);
            }
            ManageField::Code => {
                edit.code.handle_key(key);
            }
            ManageField::Language => {
                if matches!(
                    key.code,
                    KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
                ) {
                    edit.language = edit.language.toggled();
                }
            }
            ManageField::Timeout => {
                let step: i64 = match key.code {
                    KeyCode::Up => 1,
                    KeyCode::Down => -1,
                    KeyCode::PageUp => function_timeout::COARSE_STEP as i64,
                    KeyCode::PageDown => -(function_timeout::COARSE_STEP as i64),
                    _ => 0,
                };
                if step != 0 {
                    let next = (edit.timeout as i64 + step)
                        .clamp(function_timeout::MIN_SECS as i64, function_timeout::MAX_SECS as i64);
                    edit.timeout = next as u32;
                }
            }
            ManageField::FuncId => {}
        }
    }
}

/// Render the function table and, when loaded, the edit form.
pub fn render(f: &mut Frame, area: Rect, state: &ManageState) {
    let constraints: Vec<Constraint> = if state.edit.is_some() {
        vec![
            Constraint::Min(5),    // table
            Constraint::Length(3), // id field
            Constraint::Length(3), // name + language
            Constraint::Length(3), // timeout
            Constraint::Min(5),    // code
        ]
    } else {
        vec![Constraint::Min(5), Constraint::Length(3)]
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_table(f, chunks[0], state);

    form::render_field(
        f,
        chunks[1],
        "Function ID",
        state.func_id.value(),
        state.focus == ManageField::FuncId,
    );

    if let Some(edit) = &state.edit {
        let row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);

        form::render_field(
            f,
            row[0],
            "Function Name",
            edit.name.value(),
            state.focus == ManageField::Name,
        );

        let selector = Language::ALL
            .iter()
            .map(|lang| {
                if *lang == edit.language {
                    format!("[{}]", lang)
                } else {
                    format!(" {} ", lang)
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        let language = Paragraph::new(selector)
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .block(
                Block::default()
                    .title("Language")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(form::focus_style(state.focus == ManageField::Language)),
            );
        f.render_widget(language, row[1]);

        let timeout_gauge = Gauge::default()
            .block(
                Block::default()
                    .title("Timeout (seconds)")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(form::focus_style(state.focus == ManageField::Timeout)),
            )
            .gauge_style(form::focus_style(state.focus == ManageField::Timeout))
            .ratio(edit.timeout as f64 / function_timeout::MAX_SECS as f64)
            .label(format!("{} s", edit.timeout));
        f.render_widget(timeout_gauge, chunks[3]);

        form::render_field(
            f,
            chunks[4],
            "Code",
            edit.code.value(),
            state.focus == ManageField::Code,
        );
    }
}

fn render_table(f: &mut Frame, area: Rect, state: &ManageState) {
    let block = Block::default()
        .title("Functions")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));

    if !state.loaded {
        let hint = Paragraph::new("Loading functions...").block(block);
        f.render_widget(hint, area);
        return;
    }
    if state.functions.is_empty() {
        let empty = Paragraph::new("No functions available. Try deploying one.")
            .style(Style::default().fg(Color::Gray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["ID", "Name", "Language", "Timeout", "Code"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    let rows = state.functions.iter().map(|func| {
        Row::new(vec![
            func.id.to_string(),
            func.name.clone(),
            func.language.to_string(),
            format!("{} s", func.timeout),
            format!("{} B", func.code.len()),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Percentage(40),
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(block);
    f.render_widget(table, area);
}
