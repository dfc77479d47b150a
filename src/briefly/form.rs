//! # Form Validation
//!
//! A form is a fixed set of [`Field`]s. [`validate_form`] runs every field's
//! validator for a [`FormKind`] and collects the failures into [`FieldErrors`].
//! A field is present in the map if and only if its validator rejected it.
//!
//! ## Primary error
//!
//! When several fields fail, toast-style surfaces show only one of them. The
//! primary error is the first failing field in priority order: username,
//! email, password, confirm, content. `Field`'s `Ord` encodes that order, so
//! the primary error is simply the first entry of the map.
//!
//! ## FormState
//!
//! [`FormState`] holds the current values, the last computed errors, and the
//! [`Submission`] machine for one form instance. Validation re-runs on every
//! [`FormState::blur`] and unconditionally on [`FormState::submit`]; the result
//! computed at submit time is the one that decides whether the call happens.

use crate::error::{BrieflyError, Result};
use crate::submit::{Action, SubmitPhase, Submission};
use crate::validate::{
    validate_confirmation, validate_email, validate_login_password, validate_note,
    validate_password, validate_username, FieldError, PasswordPolicy,
};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Declaration order is primary-error priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Username,
    Email,
    Password,
    Confirm,
    Content,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::Email => "email",
            Field::Password => "password",
            Field::Confirm => "confirm",
            Field::Content => "content",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Registration,
    ForgotPassword,
    ResetPassword,
    NewNote,
}

impl FormKind {
    pub fn fields(&self) -> &'static [Field] {
        match self {
            FormKind::Login => &[Field::Username, Field::Password],
            FormKind::Registration => &[
                Field::Username,
                Field::Email,
                Field::Password,
                Field::Confirm,
            ],
            FormKind::ForgotPassword => &[Field::Email],
            FormKind::ResetPassword => &[Field::Password, Field::Confirm],
            FormKind::NewNote => &[Field::Content],
        }
    }

    pub fn action(&self) -> Action {
        match self {
            FormKind::Login => Action::Login,
            FormKind::Registration => Action::Register,
            FormKind::ForgotPassword => Action::ForgotPassword,
            FormKind::ResetPassword => Action::ResetPassword,
            FormKind::NewNote => Action::AddNote,
        }
    }
}

/// Raw field values as typed. Missing fields read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<Field, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    pub fn get(&self, field: Field) -> &str {
        self.0.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Value with surrounding whitespace removed, as sent for text fields.
    pub fn trimmed(&self, field: Field) -> &str {
        self.get(field).trim()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Field name to rejection reason. Empty means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, FieldError>);

impl FieldErrors {
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.0.get(&field).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first failing field in priority order.
    pub fn primary(&self) -> Option<(Field, FieldError)> {
        self.0.iter().next().map(|(f, e)| (*f, *e))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.0.iter().map(|(f, e)| (*f, *e))
    }

    fn record(&mut self, field: Field, result: std::result::Result<(), FieldError>) {
        if let Err(err) = result {
            self.0.insert(field, err);
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.primary() {
            Some((_, err)) => write!(f, "{}", err),
            None => Ok(()),
        }
    }
}

/// Runs every validator that belongs to `kind`.
pub fn validate_form(kind: FormKind, values: &FormValues, policy: PasswordPolicy) -> FieldErrors {
    let mut errors = FieldErrors::default();

    for field in kind.fields() {
        let value = values.get(*field);
        let result = match (kind, field) {
            (_, Field::Username) => validate_username(value),
            (_, Field::Email) => validate_email(value),
            (FormKind::Login, Field::Password) => validate_login_password(value),
            (_, Field::Password) => validate_password(value, policy),
            (_, Field::Confirm) => validate_confirmation(values.get(Field::Password), value),
            (_, Field::Content) => validate_note(value),
        };
        errors.record(*field, result);
    }

    errors
}

#[derive(Debug, Default)]
struct FormFields {
    values: FormValues,
    errors: FieldErrors,
}

/// Values, inline errors and submission state of one form instance.
#[derive(Debug)]
pub struct FormState {
    kind: FormKind,
    policy: PasswordPolicy,
    fields: Mutex<FormFields>,
    submission: Submission,
}

impl FormState {
    pub fn new(kind: FormKind, policy: PasswordPolicy) -> Self {
        Self {
            kind,
            policy,
            fields: Mutex::new(FormFields::default()),
            submission: Submission::new(kind.action()),
        }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    fn lock(&self) -> MutexGuard<'_, FormFields> {
        self.fields.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_value(&self, field: Field, value: impl Into<String>) {
        self.lock().values.set(field, value);
    }

    pub fn fill(&self, values: FormValues) {
        self.lock().values = values;
    }

    pub fn values(&self) -> FormValues {
        self.lock().values.clone()
    }

    pub fn errors(&self) -> FieldErrors {
        self.lock().errors.clone()
    }

    /// Re-runs the whole form's validation when the user leaves `field`.
    pub fn blur(&self, field: Field) -> FieldErrors {
        tracing::trace!(form = ?self.kind, %field, "blur");
        self.revalidate()
    }

    fn revalidate(&self) -> FieldErrors {
        let mut fields = self.lock();
        fields.errors = validate_form(self.kind, &fields.values, self.policy);
        fields.errors.clone()
    }

    /// Clears values and errors, e.g. after a note was created.
    pub fn reset(&self) {
        let mut fields = self.lock();
        fields.values.clear();
        fields.errors = FieldErrors::default();
    }

    pub fn phase(&self) -> SubmitPhase {
        self.submission.phase()
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    /// Validates and, when valid, performs `call` through the submission machine.
    ///
    /// Returns `Ok(None)` without validating or calling when this form is
    /// already submitting. Validation failures come back as
    /// [`BrieflyError::Validation`] and leave the submission phase untouched.
    pub async fn submit<T, F, Fut>(&self, call: F) -> Result<Option<T>>
    where
        F: FnOnce(FormValues) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if self.submission.is_submitting() {
            tracing::debug!(form = ?self.kind, "submit ignored, request already in flight");
            return Ok(None);
        }

        let errors = self.revalidate();
        if !errors.is_valid() {
            return Err(BrieflyError::Validation(errors));
        }

        let values = self.values();
        self.submission.run(|| call(values)).await
    }
}
