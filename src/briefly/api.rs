//! # API Facade
//!
//! The API layer is a thin facade over the command layer and the single entry
//! point for every briefly operation, whatever the UI.
//!
//! It owns the per-screen state that has to outlive a single call:
//! - one [`FormState`] per form (values, inline errors, submission machine)
//! - one [`Submission`] for each action without a form (summarize, subscribe)
//! - the [`NoteCache`] behind the notes list
//!
//! Each method fills the relevant form from its arguments and dispatches to
//! `commands/*`. No business logic lives here and nothing is printed.
//!
//! ## Generic Over Ports
//!
//! `BrieflyApi<S: SessionStore, B: Backend>`:
//! - Production: `BrieflyApi<FileSessionStore, HttpBackend>`
//! - Testing: `BrieflyApi<InMemorySessionStore, MemoryBackend>`

use crate::backend::Backend;
use crate::commands::{self, config::ConfigAction, notes::NoteCache, CmdResult};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::filter::LengthRange;
use crate::form::{Field, FormKind, FormState, FormValues};
use crate::model::{SubscriptionTier, SummaryLength, SummaryStyle};
use crate::nav::SessionWatcher;
use crate::session::SessionStore;
use crate::submit::{Action, Submission};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct BrieflyApi<S: SessionStore, B: Backend> {
    store: Arc<S>,
    backend: B,
    config: ClientConfig,
    config_dir: PathBuf,
    login_form: FormState,
    registration_form: FormState,
    forgot_form: FormState,
    reset_form: FormState,
    note_form: FormState,
    summarize: Submission,
    subscribe: Submission,
    notes: NoteCache,
}

impl<S: SessionStore, B: Backend> BrieflyApi<S, B> {
    pub fn new(store: S, backend: B, config: ClientConfig, config_dir: PathBuf) -> Self {
        let policy = config.password_policy;
        Self {
            store: Arc::new(store),
            backend,
            config_dir,
            login_form: FormState::new(FormKind::Login, policy),
            registration_form: FormState::new(FormKind::Registration, policy),
            forgot_form: FormState::new(FormKind::ForgotPassword, policy),
            reset_form: FormState::new(FormKind::ResetPassword, policy),
            note_form: FormState::new(FormKind::NewNote, policy),
            summarize: Submission::new(Action::Summarize),
            subscribe: Submission::new(Action::Subscribe),
            notes: NoteCache::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session_store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The live state of one form, e.g. for inline errors on blur.
    pub fn form(&self, kind: FormKind) -> &FormState {
        match kind {
            FormKind::Login => &self.login_form,
            FormKind::Registration => &self.registration_form,
            FormKind::ForgotPassword => &self.forgot_form,
            FormKind::ResetPassword => &self.reset_form,
            FormKind::NewNote => &self.note_form,
        }
    }

    pub fn submission(&self, action: Action) -> &Submission {
        match action {
            Action::Login => self.login_form.submission(),
            Action::Register => self.registration_form.submission(),
            Action::ForgotPassword => self.forgot_form.submission(),
            Action::ResetPassword => self.reset_form.submission(),
            Action::AddNote => self.note_form.submission(),
            Action::Summarize => &self.summarize,
            Action::Subscribe => &self.subscribe,
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<CmdResult> {
        self.login_form.fill(
            FormValues::new()
                .with(Field::Username, username)
                .with(Field::Password, password),
        );
        commands::auth::login(self.store.as_ref(), &self.backend, &self.login_form).await
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<CmdResult> {
        self.registration_form.fill(
            FormValues::new()
                .with(Field::Username, username)
                .with(Field::Email, email)
                .with(Field::Password, password)
                .with(Field::Confirm, confirm),
        );
        commands::auth::register(&self.backend, &self.registration_form).await
    }

    pub fn logout(&self) -> Result<CmdResult> {
        commands::auth::logout(self.store.as_ref())
    }

    pub async fn refresh(&self) -> Result<CmdResult> {
        commands::auth::refresh(self.store.as_ref(), &self.backend).await
    }

    pub fn status(&self) -> Result<CmdResult> {
        commands::auth::status(self.store.as_ref())
    }

    pub async fn forgot_password(&self, email: &str) -> Result<CmdResult> {
        self.forgot_form.fill(FormValues::new().with(Field::Email, email));
        commands::password::forgot(&self.backend, &self.forgot_form).await
    }

    pub async fn reset_password(
        &self,
        reset_token: &str,
        password: &str,
        confirm: &str,
    ) -> Result<CmdResult> {
        self.reset_form.fill(
            FormValues::new()
                .with(Field::Password, password)
                .with(Field::Confirm, confirm),
        );
        commands::password::reset(&self.backend, &self.reset_form, reset_token).await
    }

    /// Fetches notes and filters them by length. Bounds are raw input text.
    pub async fn list_notes(&self, min: Option<&str>, max: Option<&str>) -> Result<CmdResult> {
        let range = LengthRange::from_inputs(min, max);
        commands::notes::list(self.store.as_ref(), &self.backend, &self.notes, &range).await
    }

    /// Re-filters the notes fetched by the last [`Self::list_notes`].
    pub fn filter_notes(&self, min: Option<&str>, max: Option<&str>) -> CmdResult {
        commands::notes::filter(&self.notes, &LengthRange::from_inputs(min, max))
    }

    pub async fn add_note(&self, content: &str) -> Result<CmdResult> {
        self.note_form.set_value(Field::Content, content);
        commands::notes::add(
            self.store.as_ref(),
            &self.backend,
            &self.note_form,
            &self.notes,
        )
        .await
    }

    pub async fn history(&self) -> Result<CmdResult> {
        commands::history::list(self.store.as_ref(), &self.backend).await
    }

    pub async fn view_summary(&self, id: i64) -> Result<CmdResult> {
        commands::history::view(self.store.as_ref(), &self.backend, id).await
    }

    pub async fn download_summary(&self, id: i64, output_dir: &Path) -> Result<CmdResult> {
        commands::history::download(self.store.as_ref(), &self.backend, id, output_dir).await
    }

    pub async fn summarize(
        &self,
        file: &Path,
        length: SummaryLength,
        style: SummaryStyle,
    ) -> Result<CmdResult> {
        let upload = commands::summarize::prepare_upload(file, length, style)?;
        commands::summarize::run(self.store.as_ref(), &self.backend, &self.summarize, upload).await
    }

    pub async fn admin_analytics(&self) -> Result<CmdResult> {
        commands::admin::analytics(self.store.as_ref(), &self.backend).await
    }

    pub async fn subscribe(&self, tier: SubscriptionTier) -> Result<CmdResult> {
        commands::subscribe::run(self.store.as_ref(), &self.backend, &self.subscribe, tier).await
    }

    pub fn config_action(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.config_dir, action)
    }
}

impl<S: SessionStore + 'static, B: Backend> BrieflyApi<S, B> {
    /// Starts polling the session store at the configured interval.
    pub fn watch_session(&self) -> SessionWatcher {
        SessionWatcher::spawn(self.session_store(), self.config.poll_interval())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::error::BrieflyError;
    use crate::nav::{NavState, Route};
    use crate::session::memory::InMemorySessionStore;
    use crate::submit::SubmitPhase;
    use crate::validate::{FieldError, PasswordPolicy};
    use std::time::Duration;

    fn api(backend: MemoryBackend) -> BrieflyApi<InMemorySessionStore, MemoryBackend> {
        let config = ClientConfig {
            poll_interval_ms: 10,
            ..ClientConfig::default()
        };
        BrieflyApi::new(
            InMemorySessionStore::new(),
            backend,
            config,
            std::env::temp_dir(),
        )
    }

    #[tokio::test]
    async fn login_then_notes_round_trip() {
        let api = api(MemoryBackend::new().with_user("reader", "r@x.io", "Secret1!", false));

        let result = api.login("reader", "Secret1!").await.unwrap();
        assert_eq!(result.redirect.map(|r| r.route), Some(Route::History));

        api.add_note("tiny").await.unwrap();
        api.add_note("a somewhat longer note").await.unwrap();

        let listed = api.list_notes(Some("5"), None).await.unwrap();
        assert_eq!(listed.total_notes, Some(2));
        assert_eq!(listed.listed_notes.len(), 1);

        let all = api.filter_notes(Some(""), Some("abc"));
        assert_eq!(all.listed_notes.len(), 2);
    }

    #[tokio::test]
    async fn configured_policy_reaches_registration() {
        let config = ClientConfig {
            password_policy: PasswordPolicy::Standard,
            ..ClientConfig::default()
        };
        let api = BrieflyApi::new(
            InMemorySessionStore::new(),
            MemoryBackend::new(),
            config,
            std::env::temp_dir(),
        );
        api.register("new_user", "n@x.io", "Valid1Aa", "Valid1Aa")
            .await
            .unwrap();
        assert_eq!(api.form(FormKind::Registration).phase(), SubmitPhase::Succeeded);
    }

    #[tokio::test]
    async fn blur_shows_inline_errors_before_submit() {
        let api = api(MemoryBackend::new());
        let form = api.form(FormKind::Registration);
        form.set_value(Field::Email, "not-an-email");

        let errors = form.blur(Field::Email);
        assert_eq!(errors.get(Field::Email), Some(FieldError::EmailInvalid));
        assert_eq!(
            errors.primary(),
            Some((Field::Username, FieldError::UsernameTooShort))
        );
    }

    #[tokio::test]
    async fn protected_calls_need_a_session() {
        let api = api(MemoryBackend::new());
        assert!(matches!(api.history().await, Err(BrieflyError::AuthRequired)));
        assert!(matches!(
            api.subscribe(SubscriptionTier::Premium).await,
            Err(BrieflyError::AuthRequired)
        ));
        assert_eq!(api.backend().calls(), 0);
    }

    #[tokio::test]
    async fn watcher_follows_login_and_logout() {
        let api = api(MemoryBackend::new().with_user("root", "r@x.io", "Secret1!", true));
        let mut watcher = api.watch_session();
        assert_eq!(watcher.current(), NavState::default());

        api.login("root", "Secret1!").await.unwrap();
        let state = tokio::time::timeout(Duration::from_secs(2), watcher.changed())
            .await
            .unwrap();
        assert_eq!(
            state,
            Some(NavState {
                logged_in: true,
                is_admin: true
            })
        );

        api.logout().unwrap();
        let state = tokio::time::timeout(Duration::from_secs(2), watcher.changed())
            .await
            .unwrap();
        assert_eq!(state, Some(NavState::default()));
    }
}
