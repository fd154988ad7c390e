//! Page-level application state.
//!
//! All state lives in one [`AppState`] owned by a single controller; every
//! transition goes through [`AppState::dispatch`]. Requests are tagged with a
//! sequence number so a response that arrives after a newer submission, or
//! after the user navigated away, is dropped instead of overwriting the page.

use tracing::debug;

use crate::error::ApiError;
use crate::model::Assessment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Results,
    Compare,
}

#[derive(Debug, Clone)]
pub enum Action {
    Navigate(Page),
    /// The user submitted a query from the home page.
    Submit(String),
    /// A request finished.
    Completed {
        seq: u64,
        result: Result<Assessment, ApiError>,
    },
    /// "Back to search" from the results page.
    Back,
}

/// What the controller should do after a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Issue an assessment request for `query`, tagged `seq`.
    Request { seq: u64, query: String },
}

#[derive(Debug, Clone)]
pub struct AppState {
    page: Page,
    current: Option<Assessment>,
    pending: Option<u64>,
    error: Option<String>,
    next_seq: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            page: Page::Home,
            current: None,
            pending: None,
            error: None,
            next_seq: 1,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn current(&self) -> Option<&Assessment> {
        self.current.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn dispatch(&mut self, action: Action) -> Effect {
        match action {
            Action::Navigate(page) => {
                self.page = page;
                if matches!(page, Page::Home | Page::Compare) {
                    self.current = None;
                    self.pending = None;
                }
                Effect::None
            }
            Action::Back => {
                self.page = Page::Home;
                self.current = None;
                self.pending = None;
                Effect::None
            }
            Action::Submit(query) => {
                let query = query.trim();
                if query.is_empty() {
                    return Effect::None;
                }

                let seq = self.next_seq;
                self.next_seq += 1;
                self.pending = Some(seq);
                self.error = None;
                debug!(seq, query, "query submitted");

                Effect::Request {
                    seq,
                    query: query.to_string(),
                }
            }
            Action::Completed { seq, result } => {
                if self.pending != Some(seq) {
                    debug!(seq, pending = ?self.pending, "dropping stale response");
                    return Effect::None;
                }

                self.pending = None;
                match result {
                    Ok(assessment) => {
                        self.current = Some(assessment);
                        self.error = None;
                        self.page = Page::Results;
                    }
                    Err(e) => {
                        self.error = Some(e.user_message());
                    }
                }
                Effect::None
            }
        }
    }
}
