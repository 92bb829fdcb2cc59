//! Session setup and initialization

use crate::backend::error::BackendError;
use crate::backend::{Backend, BackendClient};
use crate::chart::ChartRenderer;
use crate::consts::cli_consts::EVENT_QUEUE_SIZE;
use crate::environment::Environment;
use crate::events::{Event, EventSender};
use crate::panel::CommentsController;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Session data shared by the TUI, headless mode and the one-shot commands
pub struct SessionData {
    /// Backend every controller talks to
    pub backend: Arc<dyn Backend>,
    /// Comments panel controller
    pub comments: CommentsController,
    /// Chart renderer
    pub chart: ChartRenderer,
    /// Receives events from the controllers
    pub event_receiver: mpsc::Receiver<Event>,
    /// Initial value of the comment count selector
    pub max_comments: u32,
}

/// Builds the HTTP client and wires the controllers to one event channel.
pub fn setup_session(
    env: Environment,
    max_comments: u32,
    session_cookie: Option<&str>,
) -> Result<SessionData, BackendError> {
    let backend: Arc<dyn Backend> = Arc::new(BackendClient::new(env, session_cookie)?);
    Ok(session_with_backend(backend, max_comments))
}

pub(crate) fn session_with_backend(backend: Arc<dyn Backend>, max_comments: u32) -> SessionData {
    let (events, event_receiver) = EventSender::channel(EVENT_QUEUE_SIZE);
    SessionData {
        comments: CommentsController::new(backend.clone(), events.clone()),
        chart: ChartRenderer::new(backend.clone(), events),
        backend,
        event_receiver,
        max_comments,
    }
}
