use crate::backend::Backend;
use crate::commands::{CmdMessage, CmdResult, Redirect};
use crate::error::{BrieflyError, Result};
use crate::form::{Field, FormState};
use crate::nav::Route;
use crate::submit::Action;

pub const RESET_REDIRECT_MS: u64 = 1200;

/// Requests a reset link. The reply is the same whether or not the address
/// is known.
pub async fn forgot<B: Backend + ?Sized>(backend: &B, form: &FormState) -> Result<CmdResult> {
    let submitted = form
        .submit(|values| async move {
            backend.forgot_password(values.trimmed(Field::Email)).await
        })
        .await?;
    if submitted.is_none() {
        return Ok(CmdResult::in_flight(Action::ForgotPassword));
    }

    Ok(CmdResult::default().with_message(CmdMessage::success(
        "If that email exists, a reset link has been sent.",
    )))
}

/// Sets a new password using the token from the reset link.
pub async fn reset<B: Backend + ?Sized>(
    backend: &B,
    form: &FormState,
    reset_token: &str,
) -> Result<CmdResult> {
    let reset_token = reset_token.trim();
    if reset_token.is_empty() {
        return Err(BrieflyError::Api(
            "Reset token is missing. Use the link from the reset email.".to_string(),
        ));
    }

    let submitted = form
        .submit(|values| async move {
            backend
                .reset_password(reset_token, values.get(Field::Password))
                .await
        })
        .await?;
    if submitted.is_none() {
        return Ok(CmdResult::in_flight(Action::ResetPassword));
    }

    Ok(CmdResult::default()
        .with_message(CmdMessage::success("Password updated. You can now sign in."))
        .with_redirect(Redirect::new(Route::Login, RESET_REDIRECT_MS)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::{MemoryBackend, ScriptedFailure};
    use crate::form::{FormKind, FormValues};
    use crate::validate::{FieldError, PasswordPolicy};

    fn forgot_form(email: &str) -> FormState {
        let form = FormState::new(FormKind::ForgotPassword, PasswordPolicy::Strict);
        form.fill(FormValues::new().with(Field::Email, email));
        form
    }

    fn reset_form(policy: PasswordPolicy, password: &str, confirm: &str) -> FormState {
        let form = FormState::new(FormKind::ResetPassword, policy);
        form.fill(
            FormValues::new()
                .with(Field::Password, password)
                .with(Field::Confirm, confirm),
        );
        form
    }

    #[tokio::test]
    async fn forgot_then_reset() {
        let backend = MemoryBackend::new().with_user("ann", "ann@x.io", "Old1pass!", false);

        forgot(&backend, &forgot_form("  ann@x.io ")).await.unwrap();
        let token = backend.reset_token_for("ann@x.io").unwrap();

        let form = reset_form(PasswordPolicy::Strict, "New1pass!", "New1pass!");
        let result = reset(&backend, &form, &token).await.unwrap();
        assert_eq!(
            result.redirect,
            Some(Redirect::new(Route::Login, RESET_REDIRECT_MS))
        );
    }

    #[tokio::test]
    async fn unknown_email_gets_the_same_reply() {
        let backend = MemoryBackend::new();
        let result = forgot(&backend, &forgot_form("nobody@x.io")).await.unwrap();
        assert_eq!(
            result.messages[0].content,
            "If that email exists, a reset link has been sent."
        );
    }

    #[tokio::test]
    async fn forgot_failure_without_message_uses_default() {
        let backend = MemoryBackend::new();
        backend.fail_next(ScriptedFailure::Status(500, None));
        let err = forgot(&backend, &forgot_form("a@x.io")).await.unwrap_err();
        assert_eq!(err.to_string(), "Error 500: Failed to send reset link");
    }

    #[tokio::test]
    async fn reset_applies_configured_policy() {
        let backend = MemoryBackend::new();

        let strict = reset_form(PasswordPolicy::Strict, "Valid1Aa", "Valid1Aa");
        let err = reset(&backend, &strict, "reset-1").await.unwrap_err();
        let BrieflyError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            errors.get(Field::Password),
            Some(FieldError::PasswordMissingSpecial)
        );

        let standard = reset_form(PasswordPolicy::Standard, "Valid1Aa", "Valid1Aa");
        let err = reset(&backend, &standard, "reset-1").await.unwrap_err();
        assert_eq!(err.to_string(), "Error 400: Invalid or expired token");
    }

    #[tokio::test]
    async fn missing_reset_token_is_rejected_locally() {
        let backend = MemoryBackend::new();
        let form = reset_form(PasswordPolicy::Strict, "Valid1Aa!", "Valid1Aa!");
        assert!(matches!(
            reset(&backend, &form, "  ").await,
            Err(BrieflyError::Api(_))
        ));
        assert_eq!(backend.calls(), 0);
    }
}
