use crate::config::ClientConfig;
use crate::model::{AdminAnalytics, NoteRecord, SummaryEntry};
use crate::nav::{NavState, Route};
use crate::session::Session;
use crate::submit::Action;
use std::path::PathBuf;
use std::time::Duration;

pub mod admin;
pub mod auth;
pub mod config;
pub mod history;
pub mod notes;
pub mod password;
pub mod subscribe;
pub mod summarize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Navigation a flow asks for once its success message has been seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub route: Route,
    pub after: Duration,
}

impl Redirect {
    pub fn new(route: Route, after_ms: u64) -> Self {
        Self {
            route,
            after: Duration::from_millis(after_ms),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub messages: Vec<CmdMessage>,
    pub listed_notes: Vec<NoteRecord>,
    /// Size of the unfiltered list `listed_notes` was taken from.
    pub total_notes: Option<usize>,
    pub summaries: Vec<SummaryEntry>,
    pub summary_text: Option<String>,
    pub saved_path: Option<PathBuf>,
    pub analytics: Option<AdminAnalytics>,
    pub session: Option<Session>,
    pub nav: Option<NavState>,
    pub redirect: Option<Redirect>,
    pub config: Option<ClientConfig>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Result of a submit that the re-entrancy guard dropped.
    pub fn in_flight(action: Action) -> Self {
        Self::default().with_message(CmdMessage::info(action.busy_label()))
    }

    pub fn with_notes(mut self, listed: Vec<NoteRecord>, total: usize) -> Self {
        self.listed_notes = listed;
        self.total_notes = Some(total);
        self
    }

    pub fn with_summaries(mut self, summaries: Vec<SummaryEntry>) -> Self {
        self.summaries = summaries;
        self
    }

    pub fn with_summary_text(mut self, text: String) -> Self {
        self.summary_text = Some(text);
        self
    }

    pub fn with_saved_path(mut self, path: PathBuf) -> Self {
        self.saved_path = Some(path);
        self
    }

    pub fn with_analytics(mut self, analytics: AdminAnalytics) -> Self {
        self.analytics = Some(analytics);
        self
    }

    /// Attaches the session and the navigation it implies.
    pub fn with_session(mut self, session: Session) -> Self {
        self.nav = Some(NavState::from_session(&session));
        self.session = Some(session);
        self
    }

    pub fn with_redirect(mut self, redirect: Redirect) -> Self {
        self.redirect = Some(redirect);
        self
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }
}
