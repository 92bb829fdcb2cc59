//! Dashboard state management
//!
//! Contains the main dashboard state struct

use crate::chart::ChartState;
use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::environment::Environment;
use crate::events::Event as PanelEvent;
use crate::panel::PanelView;
use crate::ui::app::UIConfig;

use std::collections::VecDeque;
use std::time::Instant;

/// Dashboard state: the comments panel, the charts and the activity log.
#[derive(Debug)]
pub struct DashboardState {
    /// The backend the client talks to.
    pub environment: Environment,
    /// The start time of the application, used for computing uptime.
    pub start_time: Instant,
    /// Comments panel view model.
    pub panel: PanelView,
    /// Response and residual charts.
    pub chart: ChartState,
    /// Text being composed, while compose mode is open.
    pub compose: Option<String>,
    /// Queue of events waiting to be processed
    pub pending_events: VecDeque<PanelEvent>,
    /// Activity logs for display
    pub activity_logs: VecDeque<PanelEvent>,
    /// Whether to enable background colors
    pub with_background_color: bool,
    /// Animation tick counter
    pub tick: usize,
}

impl DashboardState {
    /// Creates a new instance of the dashboard state.
    pub fn new(environment: Environment, start_time: Instant, ui_config: UIConfig) -> Self {
        Self {
            environment,
            start_time,
            panel: PanelView::new(ui_config.max_comments),
            chart: ChartState::NotLoaded,
            compose: None,
            pending_events: VecDeque::new(),
            activity_logs: VecDeque::new(),
            with_background_color: ui_config.with_background_color,
            tick: 0,
        }
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: PanelEvent) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    /// Add an event to the processing queue
    pub fn add_event(&mut self, event: PanelEvent) {
        self.pending_events.push_back(event);
    }
}
