//! Error handling for the backend module

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never produced a response: connection refused, timeout, TLS.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body was not the JSON shape we expected.
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The backend answered with a non-success status.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },

    /// Input rejected before anything was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A spawned request task panicked or was cancelled before it answered.
    #[error("Request task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl BackendError {
    pub async fn from_response(response: reqwest::Response) -> BackendError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        BackendError::Http {
            status,
            message: message.trim().to_string(),
        }
    }
}
