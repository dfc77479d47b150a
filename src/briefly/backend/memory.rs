//! In-process [`Backend`] for tests and offline embedding.
//!
//! Keeps users, tokens, notes and summaries in memory and behaves like the
//! real service for the paths the client exercises. Failures can be scripted
//! with [`MemoryBackend::fail_next`]; every call is counted so tests can
//! assert how many requests a flow actually issued.
//!
//! Each call yields to the scheduler once, so concurrent submits interleave
//! the way they would against a real server. The state lock is never held
//! across that yield.

use super::Backend;
use crate::error::{BrieflyError, Result};
use crate::model::{
    AccessToken, AdminAnalytics, CreatedUser, Credentials, NoteRecord, Registration,
    SubscriptionTier, SummarizeResponse, SummaryContent, SummaryEntry, SummaryUpload,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A failure to return from the next call instead of doing any work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedFailure {
    /// No response at all.
    Network,
    /// A non-2xx response with an optional server message.
    Status(u16, Option<String>),
}

impl ScriptedFailure {
    fn into_error(self) -> BrieflyError {
        match self {
            ScriptedFailure::Network => BrieflyError::Network("scripted network failure".into()),
            ScriptedFailure::Status(status, message) => BrieflyError::Request { status, message },
        }
    }
}

#[derive(Debug, Clone)]
struct User {
    username: String,
    email: String,
    password: String,
    is_admin: bool,
}

#[derive(Debug, Clone)]
struct StoredSummary {
    entry: SummaryEntry,
    text: String,
}

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    tokens: HashMap<String, String>,
    reset_tokens: HashMap<String, String>,
    notes: HashMap<String, Vec<NoteRecord>>,
    summaries: HashMap<String, Vec<StoredSummary>>,
    subscriptions: HashMap<String, SubscriptionTier>,
    failures: VecDeque<ScriptedFailure>,
    calls: usize,
    next_id: i64,
    next_token: u64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn issue_token(&mut self, username: &str) -> String {
        self.next_token += 1;
        let token = format!("token-{}", self.next_token);
        self.tokens.insert(token.clone(), username.to_string());
        token
    }

    fn user(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    fn authorize(&self, token: &str) -> Result<String> {
        self.tokens.get(token).cloned().ok_or(BrieflyError::Request {
            status: 401,
            message: Some("Could not validate credentials".into()),
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an account that can log in immediately.
    pub fn with_user(self, username: &str, email: &str, password: &str, is_admin: bool) -> Self {
        self.lock().users.push(User {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            is_admin,
        });
        self
    }

    /// Seeds a note for `username`.
    pub fn with_note(self, username: &str, content: &str) -> Self {
        {
            let mut state = self.lock();
            let id = state.next_id();
            state
                .notes
                .entry(username.to_string())
                .or_default()
                .push(NoteRecord::new(id, content));
        }
        self
    }

    /// Queues a failure; queued failures are consumed one per call, in order.
    pub fn fail_next(&self, failure: ScriptedFailure) {
        self.lock().failures.push_back(failure);
    }

    /// Number of calls received so far, including failed ones.
    pub fn calls(&self) -> usize {
        self.lock().calls
    }

    /// The pending reset token for `email`, as if read from the reset mail.
    pub fn reset_token_for(&self, email: &str) -> Option<String> {
        let state = self.lock();
        let username = &state.users.iter().find(|u| u.email == email)?.username;
        let token = state
            .reset_tokens
            .iter()
            .find(|(_, owner)| *owner == username)
            .map(|(token, _)| token.clone());
        token
    }

    pub fn subscription_of(&self, username: &str) -> Option<SubscriptionTier> {
        self.lock().subscriptions.get(username).copied()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn enter(&self) -> Result<()> {
        let failure = {
            let mut state = self.lock();
            state.calls += 1;
            state.failures.pop_front()
        };
        tokio::task::yield_now().await;
        match failure {
            Some(failure) => Err(failure.into_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn register(&self, registration: &Registration) -> Result<CreatedUser> {
        self.enter().await?;
        let mut state = self.lock();
        let taken = state
            .users
            .iter()
            .any(|u| u.username == registration.username || u.email == registration.email);
        if taken {
            return Err(BrieflyError::Request {
                status: 409,
                message: None,
            });
        }
        let id = state.next_id();
        state.users.push(User {
            username: registration.username.clone(),
            email: registration.email.clone(),
            password: registration.password.clone(),
            is_admin: false,
        });
        Ok(CreatedUser {
            id: Some(id),
            username: registration.username.clone(),
            email: registration.email.clone(),
        })
    }

    async fn login(&self, credentials: &Credentials) -> Result<AccessToken> {
        self.enter().await?;
        let mut state = self.lock();
        let is_admin = match state.user(&credentials.username) {
            Some(user) if user.password == credentials.password => user.is_admin,
            _ => {
                return Err(BrieflyError::Request {
                    status: 401,
                    message: Some("Incorrect username or password".into()),
                })
            }
        };
        let access_token = state.issue_token(&credentials.username);
        Ok(AccessToken {
            access_token,
            token_type: "bearer".into(),
            is_admin,
        })
    }

    async fn refresh(&self, token: &str) -> Result<AccessToken> {
        self.enter().await?;
        let mut state = self.lock();
        let username = state.authorize(token)?;
        state.tokens.remove(token);
        let is_admin = state.user(&username).is_some_and(|u| u.is_admin);
        let access_token = state.issue_token(&username);
        Ok(AccessToken {
            access_token,
            token_type: "bearer".into(),
            is_admin,
        })
    }

    async fn forgot_password(&self, email: &str) -> Result<()> {
        self.enter().await?;
        let mut state = self.lock();
        let Some(username) = state
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.username.clone())
        else {
            // Unknown addresses are acknowledged the same way.
            return Ok(());
        };
        state.next_token += 1;
        let reset = format!("reset-{}", state.next_token);
        state.reset_tokens.insert(reset, username);
        Ok(())
    }

    async fn reset_password(&self, reset_token: &str, new_password: &str) -> Result<()> {
        self.enter().await?;
        let mut state = self.lock();
        let username = state
            .reset_tokens
            .remove(reset_token)
            .ok_or(BrieflyError::Request {
                status: 400,
                message: Some("Invalid or expired token".into()),
            })?;
        if let Some(user) = state.users.iter_mut().find(|u| u.username == username) {
            user.password = new_password.to_string();
        }
        Ok(())
    }

    async fn list_notes(&self, token: &str) -> Result<Vec<NoteRecord>> {
        self.enter().await?;
        let state = self.lock();
        let username = state.authorize(token)?;
        Ok(state.notes.get(&username).cloned().unwrap_or_default())
    }

    async fn create_note(&self, token: &str, content: &str) -> Result<NoteRecord> {
        self.enter().await?;
        let mut state = self.lock();
        let username = state.authorize(token)?;
        let note = NoteRecord::new(state.next_id(), content);
        state.notes.entry(username).or_default().push(note.clone());
        Ok(note)
    }

    async fn list_history(&self, token: &str) -> Result<Vec<SummaryEntry>> {
        self.enter().await?;
        let state = self.lock();
        let username = state.authorize(token)?;
        Ok(state
            .summaries
            .get(&username)
            .map(|all| all.iter().map(|s| s.entry.clone()).collect())
            .unwrap_or_default())
    }

    async fn summary_content(&self, token: &str, id: i64) -> Result<SummaryContent> {
        self.enter().await?;
        let state = self.lock();
        let text = find_summary(&state, token, id)?;
        Ok(SummaryContent { summary: text })
    }

    async fn download_summary(&self, token: &str, id: i64) -> Result<Vec<u8>> {
        self.enter().await?;
        let state = self.lock();
        Ok(find_summary(&state, token, id)?.into_bytes())
    }

    async fn summarize(&self, token: &str, upload: &SummaryUpload) -> Result<SummarizeResponse> {
        self.enter().await?;
        let mut state = self.lock();
        let username = state.authorize(token)?;
        if upload.bytes.is_empty() {
            return Err(BrieflyError::Request {
                status: 400,
                message: Some("Empty file".into()),
            });
        }
        let id = state.next_id();
        let text = format!(
            "Summary of {} ({}, {})",
            upload.filename, upload.length, upload.style
        );
        state.summaries.entry(username).or_default().push(StoredSummary {
            entry: SummaryEntry {
                id,
                filename: upload.filename.clone(),
            },
            text: text.clone(),
        });
        Ok(SummarizeResponse {
            summary: text,
            file_path: format!("summaries/summary_{id}.txt"),
        })
    }

    async fn admin_analytics(&self, token: &str) -> Result<AdminAnalytics> {
        self.enter().await?;
        let state = self.lock();
        let username = state.authorize(token)?;
        if !state.user(&username).is_some_and(|u| u.is_admin) {
            return Err(BrieflyError::Request {
                status: 403,
                message: Some("Not authorized".into()),
            });
        }
        Ok(AdminAnalytics {
            total_summaries: state.summaries.values().map(Vec::len).sum::<usize>() as u64,
            total_users: state.users.len() as u64,
            is_admin: true,
        })
    }

    async fn subscribe(&self, token: &str, tier: SubscriptionTier) -> Result<()> {
        self.enter().await?;
        let mut state = self.lock();
        let username = state.authorize(token)?;
        state.subscriptions.insert(username, tier);
        Ok(())
    }
}

fn find_summary(state: &State, token: &str, id: i64) -> Result<String> {
    let username = state.authorize(token)?;
    state
        .summaries
        .get(&username)
        .and_then(|all| all.iter().find(|s| s.entry.id == id))
        .map(|s| s.text.clone())
        .ok_or(BrieflyError::Request {
            status: 404,
            message: Some("Summary not found".into()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn login_issues_token_with_admin_flag() {
        let backend = MemoryBackend::new().with_user("root", "root@x.io", "Secret1!", true);
        let token = backend.login(&credentials("root", "Secret1!")).await.unwrap();
        assert!(token.is_admin);
        assert_eq!(token.token_type, "bearer");

        let err = backend.login(&credentials("root", "nope")).await.unwrap_err();
        assert_eq!(err.to_string(), "Error 401: Incorrect username or password");
    }

    #[tokio::test]
    async fn scripted_failures_are_consumed_in_order() {
        let backend = MemoryBackend::new();
        backend.fail_next(ScriptedFailure::Network);
        backend.fail_next(ScriptedFailure::Status(500, None));

        assert!(matches!(
            backend.forgot_password("a@b.co").await,
            Err(BrieflyError::Network(_))
        ));
        assert!(matches!(
            backend.forgot_password("a@b.co").await,
            Err(BrieflyError::Request { status: 500, .. })
        ));
        assert!(backend.forgot_password("a@b.co").await.is_ok());
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test]
    async fn unknown_token_is_unauthorized() {
        let backend = MemoryBackend::new();
        assert!(matches!(
            backend.list_notes("forged").await,
            Err(BrieflyError::Request { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn reset_token_is_single_use() {
        let backend = MemoryBackend::new().with_user("ann", "ann@x.io", "Old1pass!", false);
        backend.forgot_password("ann@x.io").await.unwrap();
        let reset = backend.reset_token_for("ann@x.io").unwrap();

        backend.reset_password(&reset, "New1pass!").await.unwrap();
        assert!(backend.login(&credentials("ann", "New1pass!")).await.is_ok());
        assert!(backend.reset_password(&reset, "Again1!!").await.is_err());
    }
}
