//! Panel view model
//!
//! Everything the comments panel shows, independent of how it is drawn.

use super::{CommentsOutcome, PanelRefresh};
use crate::consts::cli_consts::{
    COMMENT_COUNT_OPTIONS, LOGIN_PATH, LOGIN_PROMPT, LOGOUT_PATH,
};
use crate::models::LoginStatus;

/// One rendered comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentItem {
    pub id: i64,
    /// `"<author> on <date>"`
    pub header: String,
    pub content: String,
    /// Only the author gets a delete control.
    pub deletable: bool,
}

/// The login/logout link in the page header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLink {
    pub text: String,
    pub target: &'static str,
}

/// The "number of comments" selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentCountSelector {
    options: Vec<u32>,
    index: usize,
}

impl CommentCountSelector {
    /// Starts on `initial`, adding it to the choices when it is not one of them.
    pub fn new(initial: u32) -> Self {
        let mut options = COMMENT_COUNT_OPTIONS.to_vec();
        if !options.contains(&initial) {
            options.push(initial);
            options.sort_unstable();
        }
        let index = options.iter().position(|&o| o == initial).unwrap_or(0);
        Self { options, index }
    }

    pub fn value(&self) -> u32 {
        self.options[self.index]
    }

    pub fn options(&self) -> &[u32] {
        &self.options
    }

    /// Moves to the next larger choice. Returns whether the value changed.
    pub fn increase(&mut self) -> bool {
        if self.index + 1 < self.options.len() {
            self.index += 1;
            return true;
        }
        false
    }

    /// Moves to the next smaller choice. Returns whether the value changed.
    pub fn decrease(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            return true;
        }
        false
    }
}

#[derive(Debug, Clone)]
pub struct PanelView {
    /// Rendered comments, in server order.
    pub comments: Vec<CommentItem>,
    pub selector: CommentCountSelector,
    pub login_link: Option<HeaderLink>,
    /// Notices appended above the list.
    pub notices: Vec<String>,
    pub panel_visible: bool,
    /// Shown in place of the list after a failed refresh.
    pub fallback: Option<String>,
    /// Index of the highlighted comment.
    pub selected: usize,
    login_prompt_shown: bool,
}

impl PanelView {
    pub fn new(max_comments: u32) -> Self {
        Self {
            comments: Vec::new(),
            selector: CommentCountSelector::new(max_comments),
            login_link: None,
            notices: Vec::new(),
            panel_visible: false,
            fallback: None,
            selected: 0,
            login_prompt_shown: false,
        }
    }

    pub fn apply_login(&mut self, status: &LoginStatus) {
        if status.logged_in {
            self.panel_visible = true;
            self.login_link = Some(HeaderLink {
                text: format!("Welcome, {}", status.user_email),
                target: LOGOUT_PATH,
            });
        } else {
            if !self.login_prompt_shown {
                self.notices.push(LOGIN_PROMPT.to_string());
                self.login_prompt_shown = true;
            }
            self.panel_visible = false;
            self.login_link = Some(HeaderLink {
                text: "Login".to_string(),
                target: LOGIN_PATH,
            });
        }
    }

    /// Clears the list and fills it with `items`.
    pub fn replace_comments(&mut self, items: Vec<CommentItem>) {
        self.comments.clear();
        self.comments.extend(items);
        self.fallback = None;
        self.clamp_selection();
    }

    /// Applies the login state first, so a failed list still gets its header link.
    pub fn apply_refresh(&mut self, refresh: PanelRefresh) {
        self.apply_login(&refresh.login);
        match refresh.comments {
            CommentsOutcome::NotFetched => {}
            CommentsOutcome::Loaded(items) => self.replace_comments(items),
            CommentsOutcome::Failed(reason) => {
                self.set_fallback(format!("Comments unavailable: {}", reason))
            }
        }
    }

    /// Removes exactly the item with `id`, if it is still displayed.
    pub fn remove_comment(&mut self, id: i64) -> Option<CommentItem> {
        let position = self.comments.iter().position(|c| c.id == id)?;
        let removed = self.comments.remove(position);
        self.clamp_selection();
        Some(removed)
    }

    pub fn set_fallback(&mut self, message: impl Into<String>) {
        self.fallback = Some(message.into());
    }

    pub fn selected_comment(&self) -> Option<&CommentItem> {
        self.comments.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.comments.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.comments.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64) -> CommentItem {
        CommentItem {
            id,
            header: format!("user{} on today", id),
            content: "text".to_string(),
            deletable: id % 2 == 0,
        }
    }

    #[test]
    fn logged_in_shows_panel_and_welcome_link() {
        let mut view = PanelView::new(5);
        view.apply_login(&LoginStatus::logged_in("ada@example.com"));

        assert!(view.panel_visible);
        assert!(view.notices.is_empty());
        assert_eq!(
            view.login_link,
            Some(HeaderLink {
                text: "Welcome, ada@example.com".to_string(),
                target: "/logout",
            })
        );
    }

    #[test]
    fn login_prompt_is_appended_once() {
        let mut view = PanelView::new(5);
        view.apply_login(&LoginStatus::logged_out());
        view.apply_login(&LoginStatus::logged_out());

        assert!(!view.panel_visible);
        assert_eq!(view.notices, vec![LOGIN_PROMPT.to_string()]);
        assert_eq!(view.login_link.as_ref().unwrap().target, "/login");
        assert_eq!(view.login_link.as_ref().unwrap().text, "Login");
    }

    #[test]
    fn replacing_does_not_accumulate() {
        let mut view = PanelView::new(5);
        view.replace_comments(vec![item(1), item(2)]);
        view.replace_comments(vec![item(1), item(2)]);
        assert_eq!(view.comments, vec![item(1), item(2)]);
    }

    #[test]
    fn replacing_clears_fallback() {
        let mut view = PanelView::new(5);
        view.set_fallback("Comments unavailable");
        view.replace_comments(vec![item(1)]);
        assert_eq!(view.fallback, None);
    }

    #[test]
    fn failed_list_still_applies_login() {
        let mut view = PanelView::new(5);
        view.replace_comments(vec![item(1)]);
        view.apply_refresh(PanelRefresh {
            login: LoginStatus::logged_in("ada@example.com"),
            comments: CommentsOutcome::Failed("HTTP error with status 500: boom".to_string()),
        });

        assert!(view.panel_visible);
        assert_eq!(
            view.login_link.as_ref().map(|l| l.text.as_str()),
            Some("Welcome, ada@example.com")
        );
        assert_eq!(
            view.fallback.as_deref(),
            Some("Comments unavailable: HTTP error with status 500: boom")
        );
        assert_eq!(view.comments, vec![item(1)]);
    }

    #[test]
    fn remove_takes_exactly_one_item() {
        let mut view = PanelView::new(5);
        view.replace_comments(vec![item(1), item(2), item(3)]);
        view.selected = 2;

        assert_eq!(view.remove_comment(2), Some(item(2)));
        assert_eq!(view.comments, vec![item(1), item(3)]);
        assert_eq!(view.selected, 1);
        assert_eq!(view.remove_comment(2), None);
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut view = PanelView::new(5);
        view.select_previous();
        assert_eq!(view.selected, 0);
        assert!(view.selected_comment().is_none());

        view.replace_comments(vec![item(1), item(2)]);
        view.select_next();
        view.select_next();
        assert_eq!(view.selected_comment().map(|c| c.id), Some(2));
    }

    #[test]
    fn selector_walks_the_options() {
        let mut selector = CommentCountSelector::new(10);
        assert_eq!(selector.value(), 10);
        assert!(selector.increase());
        assert_eq!(selector.value(), 20);
        assert!(selector.decrease());
        assert!(selector.decrease());
        assert_eq!(selector.value(), 5);
        assert!(!selector.decrease());
    }

    #[test]
    fn selector_keeps_an_unlisted_initial_value() {
        let selector = CommentCountSelector::new(7);
        assert_eq!(selector.value(), 7);
        assert_eq!(selector.options(), &[5, 7, 10, 20, 50]);
    }
}
