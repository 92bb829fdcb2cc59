use crate::backend::error::BackendError;
use crate::environment::Environment;
use crate::models::{Comment, LoginStatus, TransientResponse};

pub(crate) mod client;
pub use client::BackendClient;
pub mod error;

#[cfg(test)]
use mockall::automock;

/// Endpoints of the portfolio backend the client consumes.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    fn environment(&self) -> &Environment;

    /// `GET /loginStat`
    async fn login_status(&self) -> Result<LoginStatus, BackendError>;

    /// `GET /data?maxComments=N`. Comments come back in server order.
    async fn comments(&self, max_comments: Option<u32>) -> Result<Vec<Comment>, BackendError>;

    /// `POST /data` with the form field `text-input`.
    async fn post_comment(&self, text: &str) -> Result<(), BackendError>;

    /// `POST /delete-data` with the form body `id=<id>`.
    async fn delete_comment(&self, id: i64) -> Result<(), BackendError>;

    /// `POST /delete-all` with an empty body.
    async fn delete_all(&self) -> Result<(), BackendError>;

    /// `GET /chart-data`
    async fn chart_data(&self) -> Result<TransientResponse, BackendError>;
}
