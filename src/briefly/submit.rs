//! # Submission State Machine
//!
//! ```text
//!            submit (valid)              call resolved
//!   Idle ───────────────────► Submitting ─────────────► Succeeded
//!    ▲                          │    ▲                     │
//!    │                          │    └──── submit ─────────┤
//!    │                 call rejected                       │
//!    │                          ▼                          │
//!    └──────────────────── Failed(reason) ◄────────────────┘
//!                               │
//!                               └──── submit ────► Submitting
//! ```
//!
//! Every state except `Submitting` accepts the next explicit submit. A submit
//! that arrives while `Submitting` is dropped: it is not queued, it does not
//! error, and it never produces a second network call. There is no automatic
//! retry; a failure waits for the user.
//!
//! Failure reasons are the display form of the error, after the action's
//! default message has been filled in for server responses that carried none.

use crate::error::Result;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The user action a submission performs. Drives labels and default messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
    AddNote,
    Summarize,
    Subscribe,
}

impl Action {
    /// Shown when the server rejects the call without a message of its own.
    pub fn default_failure(&self) -> &'static str {
        match self {
            Action::Login => "Invalid username or password",
            Action::Register => "Username or email already exists",
            Action::ForgotPassword => "Failed to send reset link",
            Action::ResetPassword => "Failed to reset password",
            Action::AddNote => "Failed to add note.",
            Action::Summarize => "An error occurred while generating the summary.",
            Action::Subscribe => "Failed to update subscription",
        }
    }

    pub fn idle_label(&self) -> &'static str {
        match self {
            Action::Login => "Login",
            Action::Register => "Register",
            Action::ForgotPassword => "Send reset link",
            Action::ResetPassword => "Reset password",
            Action::AddNote => "Add Note",
            Action::Summarize => "Generate Summary",
            Action::Subscribe => "Subscribe",
        }
    }

    pub fn busy_label(&self) -> &'static str {
        match self {
            Action::Login => "Logging in…",
            Action::Register => "Registering…",
            Action::ForgotPassword => "Sending…",
            Action::ResetPassword => "Saving…",
            Action::AddNote => "Adding…",
            Action::Summarize => "Summarizing…",
            Action::Subscribe => "Subscribing…",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

/// Re-entrancy-guarded runner for one action.
#[derive(Debug)]
pub struct Submission {
    action: Action,
    phase: Mutex<SubmitPhase>,
}

impl Submission {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            phase: Mutex::new(SubmitPhase::Idle),
        }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    fn lock(&self) -> MutexGuard<'_, SubmitPhase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self) -> SubmitPhase {
        self.lock().clone()
    }

    pub fn is_submitting(&self) -> bool {
        *self.lock() == SubmitPhase::Submitting
    }

    /// Whether the submit control should be disabled.
    pub fn is_disabled(&self) -> bool {
        self.is_submitting()
    }

    /// Button text for the current phase.
    pub fn label(&self) -> &'static str {
        if self.is_submitting() {
            self.action.busy_label()
        } else {
            self.action.idle_label()
        }
    }

    /// The reason of the last failed attempt, if the last attempt failed.
    pub fn failure(&self) -> Option<String> {
        match &*self.lock() {
            SubmitPhase::Failed(reason) => Some(reason.clone()),
            _ => None,
        }
    }

    fn try_begin(&self) -> bool {
        let mut phase = self.lock();
        if *phase == SubmitPhase::Submitting {
            return false;
        }
        *phase = SubmitPhase::Submitting;
        true
    }

    fn finish(&self, next: SubmitPhase) {
        *self.lock() = next;
    }

    /// Runs `call` unless an earlier call is still in flight.
    ///
    /// `Ok(None)` means the submit was dropped by the guard and `call` was
    /// never invoked. Errors carry the action's default message when the
    /// server did not send one.
    pub async fn run<T, F, Fut>(&self, call: F) -> Result<Option<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if !self.try_begin() {
            tracing::debug!(action = ?self.action, "submission already in flight, dropping");
            return Ok(None);
        }

        match call().await {
            Ok(value) => {
                self.finish(SubmitPhase::Succeeded);
                Ok(Some(value))
            }
            Err(err) => {
                let err = err.with_default_message(self.action.default_failure());
                tracing::warn!(action = ?self.action, error = %err, "submission failed");
                self.finish(SubmitPhase::Failed(err.to_string()));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BrieflyError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn success_moves_to_succeeded() {
        let submission = Submission::new(Action::AddNote);
        assert_eq!(submission.phase(), SubmitPhase::Idle);

        let value = submission.run(|| async { Ok(7) }).await.unwrap();
        assert_eq!(value, Some(7));
        assert_eq!(submission.phase(), SubmitPhase::Succeeded);
    }

    #[tokio::test]
    async fn failure_records_reason_with_default_message() {
        let submission = Submission::new(Action::Register);
        let err = submission
            .run(|| async {
                Err::<(), _>(BrieflyError::Request {
                    status: 409,
                    message: None,
                })
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Error 409: Username or email already exists");
        assert_eq!(
            submission.failure().as_deref(),
            Some("Error 409: Username or email already exists")
        );
    }

    #[tokio::test]
    async fn failure_without_response_is_generic() {
        let submission = Submission::new(Action::Login);
        let _ = submission
            .run(|| async { Err::<(), _>(BrieflyError::Network("refused".into())) })
            .await;
        assert_eq!(
            submission.phase(),
            SubmitPhase::Failed("Network error. Please try again later.".into())
        );
    }

    #[tokio::test]
    async fn concurrent_submit_is_dropped_without_a_second_call() {
        let submission = Submission::new(Action::AddNote);
        let calls = AtomicUsize::new(0);
        let counter = &calls;

        let call = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok("done")
        };

        let (first, second) = tokio::join!(submission.run(call), submission.run(call));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.unwrap(), Some("done"));
        assert_eq!(second.unwrap(), None);
        assert_eq!(submission.phase(), SubmitPhase::Succeeded);
    }

    #[tokio::test]
    async fn failed_and_succeeded_both_rearm() {
        let submission = Submission::new(Action::ResetPassword);
        let _ = submission
            .run(|| async { Err::<(), _>(BrieflyError::Network("down".into())) })
            .await;
        assert!(submission.failure().is_some());

        submission.run(|| async { Ok(()) }).await.unwrap();
        assert_eq!(submission.phase(), SubmitPhase::Succeeded);

        let again = submission.run(|| async { Ok(1) }).await.unwrap();
        assert_eq!(again, Some(1));
    }

    #[test]
    fn label_tracks_phase() {
        let submission = Submission::new(Action::ForgotPassword);
        assert_eq!(submission.label(), "Send reset link");
        assert!(!submission.is_disabled());

        assert!(submission.try_begin());
        assert_eq!(submission.label(), "Sending…");
        assert!(submission.is_disabled());
        assert!(!submission.try_begin());
    }
}
