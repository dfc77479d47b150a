use crate::backend::Backend;
use crate::commands::{CmdMessage, CmdResult, Redirect};
use crate::error::Result;
use crate::form::{Field, FormState};
use crate::model::{Credentials, Registration};
use crate::nav::Route;
use crate::session::SessionStore;
use crate::submit::Action;

pub const LOGIN_REDIRECT_MS: u64 = 1000;
pub const REGISTER_REDIRECT_MS: u64 = 1500;

/// Submits the login form and stores the issued token and admin flag.
pub async fn login<S, B>(store: &S, backend: &B, form: &FormState) -> Result<CmdResult>
where
    S: SessionStore + ?Sized,
    B: Backend + ?Sized,
{
    let submitted = form
        .submit(|values| async move {
            let credentials = Credentials {
                username: values.trimmed(Field::Username).to_string(),
                password: values.get(Field::Password).to_string(),
            };
            backend.login(&credentials).await
        })
        .await?;
    let Some(token) = submitted else {
        return Ok(CmdResult::in_flight(Action::Login));
    };

    store.set_session(&token.access_token, token.is_admin)?;
    let session = store.get_session()?;
    Ok(CmdResult::default()
        .with_message(CmdMessage::success("Login successful"))
        .with_session(session)
        .with_redirect(Redirect::new(Route::History, LOGIN_REDIRECT_MS)))
}

pub fn logout<S: SessionStore + ?Sized>(store: &S) -> Result<CmdResult> {
    let was_logged_in = store.get_session()?.is_authenticated();
    store.clear_session()?;
    let message = if was_logged_in {
        CmdMessage::success("Logged out")
    } else {
        CmdMessage::info("Not logged in")
    };
    Ok(CmdResult::default()
        .with_message(message)
        .with_session(store.get_session()?))
}

pub async fn register<B: Backend + ?Sized>(backend: &B, form: &FormState) -> Result<CmdResult> {
    let submitted = form
        .submit(|values| async move {
            let registration = Registration {
                username: values.trimmed(Field::Username).to_string(),
                email: values.trimmed(Field::Email).to_string(),
                password: values.get(Field::Password).to_string(),
            };
            backend.register(&registration).await
        })
        .await?;
    if submitted.is_none() {
        return Ok(CmdResult::in_flight(Action::Register));
    }

    Ok(CmdResult::default()
        .with_message(CmdMessage::success("Registration successful! Redirecting..."))
        .with_redirect(Redirect::new(Route::Login, REGISTER_REDIRECT_MS)))
}

/// Exchanges the current token for a fresh one, keeping the admin flag.
pub async fn refresh<S, B>(store: &S, backend: &B) -> Result<CmdResult>
where
    S: SessionStore + ?Sized,
    B: Backend + ?Sized,
{
    let session = store.get_session()?;
    let token = session.require_token()?;
    let fresh = backend
        .refresh(token)
        .await
        .map_err(|err| err.with_default_message("Failed to refresh session"))?;

    store.set_session(&fresh.access_token, session.is_admin())?;
    Ok(CmdResult::default()
        .with_message(CmdMessage::success("Session refreshed"))
        .with_session(store.get_session()?))
}

pub fn status<S: SessionStore + ?Sized>(store: &S) -> Result<CmdResult> {
    Ok(CmdResult::default().with_session(store.get_session()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::{MemoryBackend, ScriptedFailure};
    use crate::error::BrieflyError;
    use crate::form::{FormKind, FormValues};
    use crate::nav::NavItem;
    use crate::session::memory::InMemorySessionStore;
    use crate::session::Session;
    use crate::submit::SubmitPhase;
    use crate::validate::{FieldError, PasswordPolicy};

    fn login_form(username: &str, password: &str) -> FormState {
        let form = FormState::new(FormKind::Login, PasswordPolicy::Strict);
        form.fill(
            FormValues::new()
                .with(Field::Username, username)
                .with(Field::Password, password),
        );
        form
    }

    fn registration_form(username: &str, email: &str, password: &str, confirm: &str) -> FormState {
        let form = FormState::new(FormKind::Registration, PasswordPolicy::Strict);
        form.fill(
            FormValues::new()
                .with(Field::Username, username)
                .with(Field::Email, email)
                .with(Field::Password, password)
                .with(Field::Confirm, confirm),
        );
        form
    }

    #[tokio::test]
    async fn login_writes_session_and_redirects_to_history() {
        let store = InMemorySessionStore::new();
        let backend = MemoryBackend::new().with_user("admin_1", "a@x.io", "Secret1!", true);

        let result = login(&store, &backend, &login_form(" admin_1 ", "Secret1!"))
            .await
            .unwrap();

        let session = store.get_session().unwrap();
        assert!(session.is_authenticated());
        assert!(session.is_admin());
        assert_eq!(
            result.redirect,
            Some(Redirect::new(Route::History, LOGIN_REDIRECT_MS))
        );
        assert!(result
            .nav
            .unwrap()
            .items()
            .contains(&NavItem::Link(Route::Admin)));
    }

    #[tokio::test]
    async fn invalid_login_form_never_calls_the_backend() {
        let store = InMemorySessionStore::new();
        let backend = MemoryBackend::new();

        let err = login(&store, &backend, &login_form("ab", ""))
            .await
            .unwrap_err();
        match err {
            BrieflyError::Validation(errors) => {
                assert_eq!(
                    errors.primary(),
                    Some((Field::Username, FieldError::UsernameTooShort))
                );
                assert_eq!(errors.get(Field::Password), Some(FieldError::Required));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn rejected_login_leaves_session_untouched() {
        let store = InMemorySessionStore::new();
        let backend = MemoryBackend::new().with_user("bob", "b@x.io", "Secret1!", false);
        let form = login_form("bob", "wrong");

        let err = login(&store, &backend, &form).await.unwrap_err();
        assert_eq!(err.to_string(), "Error 401: Incorrect username or password");
        assert!(matches!(form.phase(), SubmitPhase::Failed(_)));
        assert_eq!(store.get_session().unwrap(), Session::default());
    }

    #[tokio::test]
    async fn network_failure_surfaces_generic_message() {
        let store = InMemorySessionStore::new();
        let backend = MemoryBackend::new();
        backend.fail_next(ScriptedFailure::Network);

        let err = login(&store, &backend, &login_form("bob", "x"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Network error. Please try again later.");
    }

    #[tokio::test]
    async fn duplicate_registration_uses_default_message() {
        let backend = MemoryBackend::new().with_user("taken", "t@x.io", "Secret1!", false);
        let form = registration_form("taken", "new@x.io", "Valid1Aa!", "Valid1Aa!");

        let err = register(&backend, &form).await.unwrap_err();
        assert_eq!(err.to_string(), "Error 409: Username or email already exists");
    }

    #[tokio::test]
    async fn registration_redirects_to_login() {
        let backend = MemoryBackend::new();
        let form = registration_form("new_user", "new@x.io", "Valid1Aa!", "Valid1Aa!");

        let result = register(&backend, &form).await.unwrap();
        assert_eq!(
            result.redirect,
            Some(Redirect::new(Route::Login, REGISTER_REDIRECT_MS))
        );
        assert_eq!(form.phase(), SubmitPhase::Succeeded);
    }

    #[tokio::test]
    async fn registration_mismatch_is_reported_on_confirm_only() {
        let backend = MemoryBackend::new();
        let form = registration_form("new_user", "new@x.io", "Abc12345!", "Abc12345");

        let err = register(&backend, &form).await.unwrap_err();
        let BrieflyError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Confirm), Some(FieldError::PasswordMismatch));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn refresh_replaces_token_and_keeps_admin_flag() {
        let backend = MemoryBackend::new().with_user("root", "r@x.io", "Secret1!", true);
        let store = InMemorySessionStore::new();
        login(&store, &backend, &login_form("root", "Secret1!"))
            .await
            .unwrap();
        let before = store.get_session().unwrap();

        refresh(&store, &backend).await.unwrap();
        let after = store.get_session().unwrap();
        assert_ne!(before.token(), after.token());
        assert!(after.is_admin());
    }

    #[tokio::test]
    async fn refresh_without_session_short_circuits() {
        let backend = MemoryBackend::new();
        let store = InMemorySessionStore::new();
        assert!(matches!(
            refresh(&store, &backend).await,
            Err(BrieflyError::AuthRequired)
        ));
        assert_eq!(backend.calls(), 0);
    }

    #[test]
    fn logout_is_idempotent() {
        let store = InMemorySessionStore::with_session(Session::new("tok", true));
        logout(&store).unwrap();
        let result = logout(&store).unwrap();
        assert_eq!(result.messages[0].content, "Not logged in");
        assert!(!store.get_session().unwrap().is_admin());
    }
}
