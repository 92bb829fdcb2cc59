//! Login state resolution

use crate::backend::Backend;
use crate::backend::error::BackendError;
use crate::events::{EventSender, EventType, Source};
use crate::logging::LogLevel;
use crate::models::LoginStatus;

/// Asks the backend who is logged in. Applying the answer to the view is up to the caller.
pub async fn resolve_login(
    backend: &dyn Backend,
    events: &EventSender,
) -> Result<LoginStatus, BackendError> {
    let status = backend.login_status().await?;
    let message = if status.logged_in {
        format!("Logged in as {}", status.user_email)
    } else {
        "Not logged in".to_string()
    };
    events
        .send(
            Source::LoginResolver,
            message,
            EventType::Success,
            LogLevel::Info,
        )
        .await;
    Ok(status)
}
