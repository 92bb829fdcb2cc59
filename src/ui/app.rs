//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::chart::ChartRenderer;
use crate::consts::cli_consts::UPDATE_QUEUE_SIZE;
use crate::environment::Environment;
use crate::events::Event as PanelEvent;
use crate::panel::{CommentsController, PanelUpdate};
use crate::ui::dashboard::{DashboardState, render_dashboard};
use crate::ui::splash::render_splash;
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use ratatui::{Frame, Terminal, backend::Backend};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// UI configuration data grouped by concern
#[derive(Debug, Clone)]
pub struct UIConfig {
    pub with_background_color: bool,
    pub max_comments: u32,
}

impl UIConfig {
    pub fn new(with_background_color: bool, max_comments: u32) -> Self {
        Self {
            with_background_color,
            max_comments,
        }
    }
}

/// The different screens in the application.
#[derive(Debug)]
pub enum Screen {
    /// Splash screen shown at the start of the application.
    Splash,
    /// Comments panel and charts.
    Dashboard(Box<DashboardState>),
}

/// Application state
pub struct App {
    /// The start time of the application, used for computing uptime.
    start_time: Instant,

    /// The backend the client talks to.
    environment: Environment,

    /// The current screen being displayed in the application.
    current_screen: Screen,

    comments: CommentsController,
    chart: ChartRenderer,

    /// Receives events from the controllers.
    event_receiver: mpsc::Receiver<PanelEvent>,

    /// Results of background requests, applied in arrival order.
    update_sender: mpsc::Sender<PanelUpdate>,
    update_receiver: mpsc::Receiver<PanelUpdate>,

    ui_config: UIConfig,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(
        environment: Environment,
        comments: CommentsController,
        chart: ChartRenderer,
        event_receiver: mpsc::Receiver<PanelEvent>,
        ui_config: UIConfig,
    ) -> Self {
        let (update_sender, update_receiver) = mpsc::channel(UPDATE_QUEUE_SIZE);
        Self {
            start_time: Instant::now(),
            environment,
            current_screen: Screen::Splash,
            comments,
            chart,
            event_receiver,
            update_sender,
            update_receiver,
            ui_config,
        }
    }

    /// Leaves the splash screen, then refreshes the panel and draws the charts once.
    fn open_dashboard(&mut self) {
        let state = DashboardState::new(
            self.environment.clone(),
            self.start_time,
            self.ui_config.clone(),
        );
        self.current_screen = Screen::Dashboard(Box::new(state));
        self.spawn_refresh(self.ui_config.max_comments);
        self.spawn_chart();
    }

    fn spawn_refresh(&self, max_comments: u32) {
        let comments = self.comments.clone();
        let updates = self.update_sender.clone();
        tokio::spawn(async move {
            let update = match comments.refresh(max_comments).await {
                Ok(refresh) => PanelUpdate::Refreshed(refresh),
                Err(e) => PanelUpdate::RefreshFailed(e.to_string()),
            };
            let _ = updates.send(update).await;
        });
    }

    fn spawn_chart(&self) {
        let chart = self.chart.clone();
        let updates = self.update_sender.clone();
        tokio::spawn(async move {
            let update = match chart.draw_chart().await {
                Ok(tables) => PanelUpdate::ChartLoaded(Box::new(tables)),
                Err(e) => PanelUpdate::ChartFailed(e.to_string()),
            };
            let _ = updates.send(update).await;
        });
    }

    fn spawn_delete_all(&self, max_comments: u32) {
        let comments = self.comments.clone();
        let updates = self.update_sender.clone();
        tokio::spawn(async move {
            // A failed delete is already in the activity log; the list stays as it is.
            if let Ok(refresh) = comments.delete_all(max_comments).await {
                let _ = updates.send(PanelUpdate::Refreshed(refresh)).await;
            }
        });
    }

    fn spawn_post(&self, text: String) {
        let comments = self.comments.clone();
        let updates = self.update_sender.clone();
        tokio::spawn(async move {
            if comments.post_comment(&text).await.is_ok() {
                let _ = updates.send(PanelUpdate::CommentPosted).await;
            }
        });
    }

    /// Handles a key press on the dashboard. Returns `true` when the user quits.
    fn handle_dashboard_key(&mut self, key: KeyEvent) -> bool {
        let Screen::Dashboard(state) = &mut self.current_screen else {
            return false;
        };

        if let Some(buffer) = state.compose.as_mut() {
            match key.code {
                KeyCode::Enter => {
                    let text = std::mem::take(buffer);
                    state.compose = None;
                    self.spawn_post(text);
                }
                KeyCode::Esc => state.compose = None,
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Char(c) => buffer.push(c),
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return true,
            KeyCode::Char('r') => {
                let max = state.panel.selector.value();
                self.spawn_refresh(max);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                if state.panel.selector.increase() {
                    let max = state.panel.selector.value();
                    self.spawn_refresh(max);
                }
            }
            KeyCode::Char('-') => {
                if state.panel.selector.decrease() {
                    let max = state.panel.selector.value();
                    self.spawn_refresh(max);
                }
            }
            KeyCode::Up => state.panel.select_previous(),
            KeyCode::Down => state.panel.select_next(),
            KeyCode::Char('d') => {
                if let Some(item) = state.panel.selected_comment().cloned() {
                    if item.deletable {
                        // Fire and forget; the item leaves the list right away.
                        drop(self.comments.delete_comment(&item));
                        state.panel.remove_comment(item.id);
                    }
                }
            }
            KeyCode::Char('D') => {
                let max = state.panel.selector.value();
                self.spawn_delete_all(max);
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                if state.panel.panel_visible {
                    state.compose = Some(String::new());
                }
            }
            _ => {}
        }
        false
    }
}

/// Runs the application UI in a loop, handling events and rendering the appropriate screen.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    let splash_start = Instant::now();
    let splash_duration = Duration::from_secs(2);

    // UI event loop
    loop {
        // Queue all incoming events for processing
        while let Ok(event) = app.event_receiver.try_recv() {
            if let Screen::Dashboard(state) = &mut app.current_screen {
                state.add_event(event);
            }
        }

        while let Ok(update) = app.update_receiver.try_recv() {
            if let Screen::Dashboard(state) = &mut app.current_screen {
                if state.apply_update(update) {
                    let max = state.panel.selector.value();
                    app.spawn_refresh(max);
                }
            }
        }

        if let Screen::Dashboard(state) = &mut app.current_screen {
            state.update();
        }
        terminal.draw(|f| render(f, &app.current_screen))?;

        // Handle splash-to-dashboard transition
        if let Screen::Splash = app.current_screen {
            if splash_start.elapsed() >= splash_duration {
                app.open_dashboard();
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

                match app.current_screen {
                    Screen::Splash => {
                        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                            return Ok(());
                        }
                        // Any other key skips the splash screen
                        app.open_dashboard();
                    }
                    Screen::Dashboard(_) => {
                        if app.handle_dashboard_key(key) {
                            return Ok(());
                        }
                    }
                }
            }
        }
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
    use crate::backend::MockBackend;
    use crate::backend::error::BackendError;
    use crate::models::LoginStatus;
    use crate::panel::CommentItem;
    use crate::session::setup::session_with_backend;
    use crossterm::event::KeyModifiers;
    use std::sync::Arc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(backend: MockBackend) -> App {
        let session = session_with_backend(Arc::new(backend), 5);
        App::new(
            Environment::Local,
            session.comments,
            session.chart,
            session.event_receiver,
            UIConfig::new(false, session.max_comments),
        )
    }

    fn dashboard(app: &mut App) -> &mut DashboardState {
        match &mut app.current_screen {
            Screen::Dashboard(state) => state,
            Screen::Splash => panic!("still on the splash screen"),
        }
    }

    fn logged_out_backend() -> MockBackend {
        let mut backend = MockBackend::new();
        backend
            .expect_login_status()
            .returning(|| Ok(LoginStatus::logged_out()));
        backend.expect_chart_data().returning(|| {
            Err(BackendError::Http {
                status: 500,
                message: "no data".to_string(),
            })
        });
        backend
    }

    #[tokio::test]
    async fn quit_keys_end_the_dashboard() {
        let mut app = app_with(logged_out_backend());
        app.open_dashboard();

        assert!(!app.handle_dashboard_key(press(KeyCode::Char('x'))));
        assert!(app.handle_dashboard_key(press(KeyCode::Char('q'))));
        assert!(app.handle_dashboard_key(press(KeyCode::Esc)));
    }

    #[tokio::test]
    async fn compose_collects_text_and_esc_cancels() {
        let mut app = app_with(logged_out_backend());
        app.open_dashboard();
        dashboard(&mut app).panel.panel_visible = true;

        app.handle_dashboard_key(press(KeyCode::Char('n')));
        for c in "hey".chars() {
            app.handle_dashboard_key(press(KeyCode::Char(c)));
        }
        app.handle_dashboard_key(press(KeyCode::Backspace));
        assert_eq!(dashboard(&mut app).compose.as_deref(), Some("he"));

        // Esc leaves compose mode instead of quitting.
        assert!(!app.handle_dashboard_key(press(KeyCode::Esc)));
        assert_eq!(dashboard(&mut app).compose, None);
    }

    #[tokio::test]
    async fn shifted_n_opens_compose_as_the_hint_says() {
        let mut app = app_with(logged_out_backend());
        app.open_dashboard();

        app.handle_dashboard_key(KeyEvent::new(KeyCode::Char('N'), KeyModifiers::SHIFT));
        assert_eq!(dashboard(&mut app).compose, None);

        dashboard(&mut app).panel.panel_visible = true;
        app.handle_dashboard_key(KeyEvent::new(KeyCode::Char('N'), KeyModifiers::SHIFT));
        assert_eq!(dashboard(&mut app).compose.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn delete_key_only_removes_own_comments() {
        let mut backend = logged_out_backend();
        backend.expect_delete_comment().returning(|_| Ok(()));
        let mut app = app_with(backend);
        app.open_dashboard();

        let item = |id, deletable| CommentItem {
            id,
            header: "someone on today".to_string(),
            content: "text".to_string(),
            deletable,
        };
        dashboard(&mut app)
            .panel
            .replace_comments(vec![item(1, false), item(2, true)]);

        app.handle_dashboard_key(press(KeyCode::Char('d')));
        assert_eq!(dashboard(&mut app).panel.comments.len(), 2);

        app.handle_dashboard_key(press(KeyCode::Down));
        app.handle_dashboard_key(press(KeyCode::Char('d')));
        let ids: Vec<i64> = dashboard(&mut app)
            .panel
            .comments
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }
}
