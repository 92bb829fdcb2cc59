//! Comments panel: login resolution, the controller and the view model it fills.

pub mod comments;
pub mod login;
pub mod view;

pub use comments::CommentsController;
pub use view::{CommentItem, PanelView};

use crate::chart::ChartTables;
use crate::models::LoginStatus;

/// What happened to the comment list during a refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentsOutcome {
    /// Nobody is logged in, so no comments were requested.
    NotFetched,
    Loaded(Vec<CommentItem>),
    /// The session resolved but the list request failed.
    Failed(String),
}

/// Result of one panel refresh, applied to the view in a single step.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRefresh {
    pub login: LoginStatus,
    pub comments: CommentsOutcome,
}

/// Messages from background requests to the UI loop.
#[derive(Debug)]
pub enum PanelUpdate {
    Refreshed(PanelRefresh),
    RefreshFailed(String),
    CommentPosted,
    ChartLoaded(Box<ChartTables>),
    ChartFailed(String),
}
