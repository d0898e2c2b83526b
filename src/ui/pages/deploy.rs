//! Deploy page: collect a function spec and create it on the platform.

use crate::api::FunctionPlatform;
use crate::consts::cli_consts::function_timeout;
use crate::events::{Event, Source};
use crate::models::{FunctionSpec, Language};
use crate::ui::form::{self, TextField};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

/// Focus order on the deploy form.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DeployField {
    Name,
    Language,
    Timeout,
    Code,
}

impl DeployField {
    fn next(self) -> Self {
        match self {
            DeployField::Name => DeployField::Language,
            DeployField::Language => DeployField::Timeout,
            DeployField::Timeout => DeployField::Code,
            DeployField::Code => DeployField::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            DeployField::Name => DeployField::Code,
            DeployField::Language => DeployField::Name,
            DeployField::Timeout => DeployField::Language,
            DeployField::Code => DeployField::Timeout,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeployForm {
    pub name: TextField,
    pub language: Language,
    pub timeout: u32,
    pub code: TextField,
    pub focus: DeployField,
}

impl Default for DeployForm {
    fn default() -> Self {
        Self {
            name: TextField::new(),
            language: Language::Python,
            timeout: function_timeout::DEFAULT_SECS,
            code: TextField::multiline(),
            focus: DeployField::Name,
        }
    }
}

impl DeployForm {
    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    fn spec(&self) -> FunctionSpec {
        FunctionSpec {
            name: self.name.value().to_string(),
            language: self.language,
            code: self.code.value().to_string(),
            timeout: function_timeout::clamp(self.timeout),
        }
    }

    /// Route a key to the focused field or selector.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.focus {
            DeployField::Name => {
                self.name.handle_key(key);
            }
            DeployField::Code => {
                self.code.handle_key(key);
            }
            DeployField::Language => {
                if matches!(
                    key.code,
                    KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
                ) {
                    self.language = self.language.toggled();
                }
            }
            DeployField::Timeout => {
                let step: i64 = match key.code {
                    KeyCode::Up => 1,
                    KeyCode::Down => -1,
                    KeyCode::PageUp => function_timeout::COARSE_STEP as i64,
                    KeyCode::PageDown => -(function_timeout::COARSE_STEP as i64),
                    _ => 0,
                };
                if step != 0 {
                    let next = (self.timeout as i64 + step)
                        .clamp(function_timeout::MIN_SECS as i64, function_timeout::MAX_SECS as i64);
                    self.timeout = next as u32;
                }
            }
        }
    }

    /// Deploy the function described by the form. An empty name or
    /// code aborts before any request is made.
    pub async fn submit(&self, platform: &dyn FunctionPlatform) -> Event {
        if self.name.is_empty() || self.code.is_empty() {
            return Event::warning(
                Source::Deploy,
                "Please enter both name and code.".to_string(),
            );
        }
        match platform.create_function(&self.spec()).await {
            Ok(func) => Event::success(
                Source::Deploy,
                format!("Function '{}' deployed successfully", func.id),
            ),
            Err(e) => Event::api_error(Source::Deploy, &e),
        }
    }
}

/// Render the deploy form.
pub fn render(f: &mut Frame, area: Rect, form: &DeployForm) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // name + language
            Constraint::Length(3), // timeout
            Constraint::Min(6),    // code
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    form::render_field(
        f,
        top[0],
        "Function Name",
        form.name.value(),
        form.focus == DeployField::Name,
    );

    let selector = Language::ALL
        .iter()
        .map(|lang| {
            if *lang == form.language {
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
                .border_style(form::focus_style(form.focus == DeployField::Language)),
        );
    f.render_widget(language, top[1]);

    let timeout_gauge = Gauge::default()
        .block(
            Block::default()
                .title("Timeout (seconds)")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(form::focus_style(form.focus == DeployField::Timeout)),
        )
        .gauge_style(form::focus_style(form.focus == DeployField::Timeout))
        .ratio(form.timeout as f64 / function_timeout::MAX_SECS as f64)
        .label(format!("{} s", form.timeout));
    f.render_widget(timeout_gauge, chunks[1]);

    form::render_field(
        f,
        chunks[2],
        "Function Code",
        form.code.value(),
        form.focus == DeployField::Code,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockFunctionPlatform;
    use crate::api::error::ApiError;
    use crate::events::EventType;
    use crate::models::Function;
    use mockall::predicate::eq;

    fn filled_form() -> DeployForm {
        DeployForm {
            name: TextField::with_value("hello"),
            language: Language::Python,
            timeout: 10,
            code: TextField::multiline_with_value("def handler(e): return e"),
            focus: DeployField::Name,
        }
    }

    #[tokio::test]
    // Empty name or code must not issue any request.
    async fn empty_fields_issue_no_request() {
        let platform = MockFunctionPlatform::new();
        let mut form = DeployForm::default();
        form.code = TextField::multiline_with_value("def handler(e): return e");

        let event = form.submit(&platform).await;
        assert_eq!(event.event_type, EventType::Warning);
        assert_eq!(event.msg, "Please enter both name and code.");
    }

    #[tokio::test]
    // A valid submission issues exactly one create with the supplied fields.
    async fn valid_submission_creates_once() {
        let mut platform = MockFunctionPlatform::new();
        let expected = FunctionSpec {
            name: "hello".into(),
            language: Language::Python,
            code: "def handler(e): return e".into(),
            timeout: 10,
        };
        platform
            .expect_create_function()
            .with(eq(expected))
            .times(1)
            .returning(|spec| {
                Ok(Function {
                    id: 7,
                    name: spec.name.clone(),
                    language: spec.language,
                    code: spec.code.clone(),
                    timeout: spec.timeout,
                })
            });

        let event = filled_form().submit(&platform).await;
        assert_eq!(event.event_type, EventType::Success);
        assert_eq!(event.msg, "Function '7' deployed successfully");
    }

    #[tokio::test]
    // A failed create surfaces the status code and body, unretried.
    async fn platform_failure_is_reported() {
        let mut platform = MockFunctionPlatform::new();
        platform
            .expect_create_function()
            .times(1)
            .returning(|_| {
                Err(ApiError::Http {
                    status: 500,
                    message: "sandbox pool exhausted".into(),
                })
            });

        let event = filled_form().submit(&platform).await;
        assert_eq!(event.event_type, EventType::Error);
        assert!(event.msg.contains("500"));
        assert!(event.msg.contains("sandbox pool exhausted"));
    }

    #[test]
    fn timeout_adjustment_is_clamped() {
        let mut form = DeployForm::default();
        form.focus = DeployField::Timeout;
        form.timeout = 299;
        form.handle_key(KeyEvent::from(KeyCode::PageUp));
        assert_eq!(form.timeout, 300);

        form.timeout = 2;
        form.handle_key(KeyEvent::from(KeyCode::PageDown));
        assert_eq!(form.timeout, 1);

        form.handle_key(KeyEvent::from(KeyCode::Down));
        assert_eq!(form.timeout, 1);
    }

    #[test]
    fn language_selector_toggles() {
        let mut form = DeployForm::default();
        form.focus = DeployField::Language;
        form.handle_key(KeyEvent::from(KeyCode::Right));
        assert_eq!(form.language, Language::Javascript);
        form.handle_key(KeyEvent::from(KeyCode::Left));
        assert_eq!(form.language, Language::Python);
    }
}
