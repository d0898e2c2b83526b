//! Form input primitives shared by the dashboard pages.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

/// A single editable text value. Editing is append and backspace; the
/// cursor always sits at the end of the value.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    value: String,
    multiline: bool,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty field that accepts Enter as a newline.
    pub fn multiline() -> Self {
        Self {
            value: String::new(),
            multiline: true,
        }
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            multiline: false,
        }
    }

    pub fn multiline_with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            multiline: true,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Feed a key into the field. Returns true when the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Control chords are action keys, never input
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => {
                self.value.push(c);
                true
            }
            KeyCode::Backspace => {
                self.value.pop();
                true
            }
            KeyCode::Enter if self.multiline => {
                self.value.push('\n');
                true
            }
            _ => false,
        }
    }

    /// Parse the field as a positive function id.
    pub fn parse_id(&self) -> Option<i64> {
        self.value.trim().parse::<i64>().ok().filter(|id| *id > 0)
    }

    /// Parse the field as a non-negative metrics filter (0 = all).
    pub fn parse_filter(&self) -> Option<i64> {
        self.value.trim().parse::<i64>().ok().filter(|id| *id >= 0)
    }
}

/// Border style marking the focused field.
pub fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Render a bordered text field, with a cursor mark when focused.
pub fn render_field(f: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let shown = if focused {
        format!("{}▌", value)
    } else {
        value.to_string()
    };
    let field = Paragraph::new(shown)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(focus_style(focused)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(field, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(field: &mut TextField, code: KeyCode) -> bool {
        field.handle_key(KeyEvent::from(code))
    }

    #[test]
    fn typing_appends_and_backspace_removes() {
        let mut field = TextField::new();
        press(&mut field, KeyCode::Char('a'));
        press(&mut field, KeyCode::Char('b'));
        assert_eq!(field.value(), "ab");
        press(&mut field, KeyCode::Backspace);
        assert_eq!(field.value(), "a");
    }

    #[test]
    fn enter_is_a_newline_only_when_multiline() {
        let mut single = TextField::new();
        assert!(!press(&mut single, KeyCode::Enter));
        assert_eq!(single.value(), "");

        let mut multi = TextField::multiline();
        assert!(press(&mut multi, KeyCode::Enter));
        assert_eq!(multi.value(), "\n");
    }

    #[test]
    fn control_chords_are_not_input() {
        let mut field = TextField::new();
        let chord = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(!field.handle_key(chord));
        assert_eq!(field.value(), "");
    }

    #[test]
    fn id_parsing_requires_a_positive_integer() {
        assert_eq!(TextField::with_value("7").parse_id(), Some(7));
        assert_eq!(TextField::with_value(" 12 ").parse_id(), Some(12));
        assert_eq!(TextField::with_value("0").parse_id(), None);
        assert_eq!(TextField::with_value("-3").parse_id(), None);
        assert_eq!(TextField::with_value("abc").parse_id(), None);
    }

    #[test]
    fn filter_parsing_accepts_zero() {
        assert_eq!(TextField::with_value("0").parse_filter(), Some(0));
        assert_eq!(TextField::with_value("3").parse_filter(), Some(3));
        assert_eq!(TextField::with_value("-1").parse_filter(), None);
    }
}
