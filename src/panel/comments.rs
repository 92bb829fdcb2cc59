//! Comments panel controller
//!
//! Refreshes, renders, posts and deletes comments against the backend.

use super::{CommentsOutcome, PanelRefresh};
use super::login::resolve_login;
use super::view::CommentItem;
use crate::backend::Backend;
use crate::backend::error::BackendError;
use crate::error_classifier::ErrorClassifier;
use crate::events::{EventSender, EventType, Source};
use crate::logging::LogLevel;
use crate::models::{Comment, validate_comment_text};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Builds the list item for one comment.
pub fn render_comment(comment: &Comment) -> CommentItem {
    CommentItem {
        id: comment.id,
        header: format!("{} on {}", comment.user_email, comment.display_date()),
        content: comment.content.clone(),
        deletable: comment.is_owned_by_current_user(),
    }
}

#[derive(Clone)]
pub struct CommentsController {
    backend: Arc<dyn Backend>,
    events: EventSender,
    classifier: ErrorClassifier,
}

impl CommentsController {
    pub fn new(backend: Arc<dyn Backend>, events: EventSender) -> Self {
        Self {
            backend,
            events,
            classifier: ErrorClassifier::new(),
        }
    }

    /// Resolves the session, then fetches up to `max_comments` comments if someone is logged in.
    ///
    /// Only a failed login lookup is an error. A failed list request still returns the
    /// resolved login, with the failure carried in [`CommentsOutcome::Failed`].
    pub async fn refresh(&self, max_comments: u32) -> Result<PanelRefresh, BackendError> {
        let login = match resolve_login(self.backend.as_ref(), &self.events).await {
            Ok(login) => login,
            Err(e) => {
                self.report_failure(Source::LoginResolver, "Login status unavailable", &e)
                    .await;
                return Err(e);
            }
        };

        if !login.logged_in {
            return Ok(PanelRefresh {
                login,
                comments: CommentsOutcome::NotFetched,
            });
        }

        let comments = match self.backend.comments(Some(max_comments)).await {
            Ok(comments) => comments,
            Err(e) => {
                self.report_failure(Source::CommentsPanel, "Failed to load comments", &e)
                    .await;
                return Ok(PanelRefresh {
                    login,
                    comments: CommentsOutcome::Failed(e.to_string()),
                });
            }
        };
        self.events
            .send(
                Source::CommentsPanel,
                format!("Loaded {} comments", comments.len()),
                EventType::Refresh,
                LogLevel::Info,
            )
            .await;

        Ok(PanelRefresh {
            login,
            comments: CommentsOutcome::Loaded(comments.iter().map(render_comment).collect()),
        })
    }

    /// Sends the delete without waiting for it. The caller removes the item right away;
    /// a failure only shows up in the activity log until the next refresh. The handle
    /// may be dropped.
    pub fn delete_comment(&self, item: &CommentItem) -> JoinHandle<Result<(), BackendError>> {
        self.delete_by_id(item.id)
    }

    /// Same as [`Self::delete_comment`] for a comment that is not on screen.
    pub fn delete_by_id(&self, id: i64) -> JoinHandle<Result<(), BackendError>> {
        let controller = self.clone();
        tokio::spawn(async move {
            let result = controller.backend.delete_comment(id).await;
            match &result {
                Ok(()) => {
                    controller
                        .events
                        .send(
                            Source::CommentsPanel,
                            format!("Deleted comment {}", id),
                            EventType::Success,
                            LogLevel::Info,
                        )
                        .await;
                }
                Err(e) => {
                    let context = format!("Failed to delete comment {}", id);
                    controller
                        .report_failure(Source::CommentsPanel, &context, e)
                        .await;
                }
            }
            result
        })
    }

    /// Deletes every comment, waits for the backend to confirm, then refreshes.
    pub async fn delete_all(&self, max_comments: u32) -> Result<PanelRefresh, BackendError> {
        if let Err(e) = self.backend.delete_all().await {
            self.report_failure(Source::CommentsPanel, "Failed to delete all comments", &e)
                .await;
            return Err(e);
        }
        self.events
            .send(
                Source::CommentsPanel,
                "Deleted all comments".to_string(),
                EventType::Success,
                LogLevel::Info,
            )
            .await;
        self.refresh(max_comments).await
    }

    /// Submits a new comment. Blank text is refused before anything is sent.
    pub async fn post_comment(&self, text: &str) -> Result<(), BackendError> {
        let result = match validate_comment_text(text) {
            Ok(text) => self.backend.post_comment(text).await,
            Err(reason) => Err(BackendError::Validation(reason)),
        };
        match &result {
            Ok(()) => {
                self.events
                    .send(
                        Source::CommentsPanel,
                        "Comment posted".to_string(),
                        EventType::Success,
                        LogLevel::Info,
                    )
                    .await;
            }
            Err(e) => {
                self.report_failure(Source::CommentsPanel, "Failed to post comment", e)
                    .await;
            }
        }
        result
    }

    async fn report_failure(&self, source: Source, context: &str, error: &BackendError) {
        self.events
            .send(
                source,
                format!("{}: {}", context, error),
                EventType::Error,
                self.classifier.classify(error),
            )
            .await;
    }
}
