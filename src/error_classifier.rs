use crate::backend::error::BackendError;
use crate::logging::LogLevel;

/// Maps backend failures to the level they are reported at.
#[derive(Debug, Clone, Default)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, error: &BackendError) -> LogLevel {
        match error {
            // Rate limiting - low priority
            BackendError::Http { status, .. } if *status == 429 => LogLevel::Debug,

            // Server errors - temporary issues
            BackendError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

            // Session problems need the user to act
            BackendError::Http { status, .. } if *status == 401 || *status == 403 => {
                LogLevel::Error
            }

            BackendError::Validation(_) => LogLevel::Error,

            // Network issues - usually temporary
            BackendError::Network(_) => LogLevel::Warn,

            _ => LogLevel::Warn,
        }
    }
}
