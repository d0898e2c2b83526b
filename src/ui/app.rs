//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::api::{FunctionPlatform, PlatformClient};
use crate::environment::Environment;
use crate::ui::dashboard::{DashboardState, render_dashboard};
use crate::ui::pages::Page;
use crate::ui::pages::manage::ManageField;
use crate::ui::splash::render_splash;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Frame, Terminal, backend::Backend};
use std::time::{Duration, Instant};

/// The different screens in the application.
#[derive(Debug)]
pub enum Screen {
    /// Splash screen shown at the start of the application.
    Splash,
    /// Dashboard screen hosting the four pages.
    Dashboard(Box<DashboardState>),
}

/// Application state
pub struct App {
    /// The start time of the application, used for computing uptime.
    start_time: Instant,

    /// The environment in which the application is running.
    environment: Environment,

    /// Base URL of the platform API.
    api_url: String,

    /// Client for the execution platform.
    platform: PlatformClient,

    /// The current screen being displayed in the application.
    current_screen: Screen,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(environment: Environment, api_url: String, platform: PlatformClient) -> Self {
        Self {
            start_time: Instant::now(),
            environment,
            api_url,
            platform,
            current_screen: Screen::Splash,
        }
    }

    fn dashboard_state(&self) -> DashboardState {
        DashboardState::new(self.environment, self.api_url.clone(), self.start_time)
    }
}

/// Runs the application UI in a loop, handling events and rendering the appropriate screen.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    let splash_start = Instant::now();
    let splash_duration = Duration::from_secs(2);

    // UI event loop
    loop {
        terminal.draw(|f| render(f, &app.current_screen))?;

        // Handle splash-to-dashboard transition
        if let Screen::Splash = app.current_screen {
            if splash_start.elapsed() >= splash_duration {
                app.current_screen = Screen::Dashboard(Box::new(app.dashboard_state()));
                continue;
            }
        }

        // Poll for key events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }

                if key.code == KeyCode::Esc {
                    return Ok(());
                }

                match &mut app.current_screen {
                    Screen::Splash => {
                        // Any key press will skip the splash screen
                        app.current_screen = Screen::Dashboard(Box::new(app.dashboard_state()));
                    }
                    Screen::Dashboard(state) => {
                        handle_dashboard_key(state, &app.platform, key).await;
                    }
                }
            }
        }
    }
}

/// Routes a key press to the current page. Submit keys run the page's
/// platform call inline; the interaction blocks until it returns.
async fn handle_dashboard_key(
    state: &mut DashboardState,
    platform: &dyn FunctionPlatform,
    key: KeyEvent,
) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Page switching; entering a listing page fetches it immediately.
    if ctrl && matches!(key.code, KeyCode::Char('n') | KeyCode::Char('p')) {
        if key.code == KeyCode::Char('n') {
            state.next_page();
        } else {
            state.prev_page();
        }
        let entry_event = match state.page {
            Page::Manage => Some(state.manage.refresh(platform).await),
            Page::Metrics => Some(state.metrics.refresh(platform).await),
            Page::Deploy | Page::Execute => None,
        };
        if let Some(event) = entry_event {
            state.add_to_activity_log(event);
        }
        return;
    }

    match key.code {
        KeyCode::Tab => {
            state.focus_next();
            return;
        }
        KeyCode::BackTab => {
            state.focus_prev();
            return;
        }
        _ => {}
    }

    let event = match state.page {
        Page::Deploy => {
            if ctrl && key.code == KeyCode::Char('s') {
                Some(state.deploy.submit(platform).await)
            } else {
                state.deploy.handle_key(key);
                None
            }
        }
        Page::Manage => {
            if ctrl && key.code == KeyCode::Char('s') {
                Some(state.manage.update(platform).await)
            } else if ctrl && key.code == KeyCode::Char('d') {
                Some(state.manage.delete(platform).await)
            } else if ctrl && key.code == KeyCode::Char('r') {
                Some(state.manage.refresh(platform).await)
            } else if key.code == KeyCode::Enter && state.manage.focus == ManageField::FuncId {
                Some(state.manage.load(platform).await)
            } else {
                state.manage.handle_key(key);
                None
            }
        }
        Page::Execute => {
            if key.code == KeyCode::Enter {
                Some(state.execute.submit(platform).await)
            } else {
                state.execute.handle_key(key);
                None
            }
        }
        Page::Metrics => {
            if key.code == KeyCode::Enter {
                Some(state.metrics.refresh(platform).await)
            } else {
                state.metrics.handle_key(key);
                None
            }
        }
    };

    if let Some(event) = event {
        state.add_to_activity_log(event);
    }
}

/// Renders the current screen based on the application state.
fn render(f: &mut Frame, screen: &Screen) {
    match screen {
        Screen::Splash => render_splash(f),
        Screen::Dashboard(state) => render_dashboard(f, state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockFunctionPlatform;
    use crate::events::EventType;
    use crate::models::{Function, Language};

    fn dashboard() -> DashboardState {
        DashboardState::new(
            Environment::Local,
            "http://localhost:8000".to_string(),
            Instant::now(),
        )
    }

    #[tokio::test]
    // Switching onto the manage page fetches the function table once.
    async fn entering_manage_fetches_the_listing() {
        let mut platform = MockFunctionPlatform::new();
        platform.expect_list_functions().times(1).returning(|| {
            Ok(vec![Function {
                id: 1,
                name: "hello".into(),
                language: Language::Python,
                code: "def handler(e): return e".into(),
                timeout: 10,
            }])
        });

        let mut state = dashboard();
        let next_page = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
        handle_dashboard_key(&mut state, &platform, next_page).await;

        assert_eq!(state.page, Page::Manage);
        assert_eq!(state.manage.functions.len(), 1);
        assert_eq!(state.activity_logs.len(), 1);
    }

    #[tokio::test]
    // A deploy submit lands its outcome in the activity log.
    async fn deploy_submit_logs_the_outcome() {
        let platform = MockFunctionPlatform::new();
        let mut state = dashboard();

        let submit = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        handle_dashboard_key(&mut state, &platform, submit).await;

        let logged = state.activity_logs.back().unwrap();
        assert_eq!(logged.event_type, EventType::Warning);
        assert_eq!(logged.msg, "Please enter both name and code.");
    }

    #[tokio::test]
    // Typing routes into the focused field without touching the platform.
    async fn typing_reaches_the_focused_field() {
        let platform = MockFunctionPlatform::new();
        let mut state = dashboard();

        for c in "sum".chars() {
            handle_dashboard_key(&mut state, &platform, KeyEvent::from(KeyCode::Char(c))).await;
        }
        assert_eq!(state.deploy.name.value(), "sum");
        assert!(state.activity_logs.is_empty());
    }
}
