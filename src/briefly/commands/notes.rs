use crate::backend::Backend;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::filter::{filter_notes, LengthRange};
use crate::form::{Field, FormState};
use crate::model::NoteRecord;
use crate::session::SessionStore;
use crate::submit::Action;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Client-side copy of the user's notes, in server order.
///
/// Filled by [`list`] and extended by [`add`] with the record the server
/// returned. Never holds anything the server has not confirmed.
#[derive(Debug, Default)]
pub struct NoteCache {
    notes: Mutex<Vec<NoteRecord>>,
}

impl NoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<NoteRecord>> {
        self.notes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn replace(&self, notes: Vec<NoteRecord>) {
        *self.lock() = notes;
    }

    pub fn append(&self, note: NoteRecord) {
        self.lock().push(note);
    }

    pub fn snapshot(&self) -> Vec<NoteRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Fetches the notes, refreshes the cache and applies `range`.
pub async fn list<S, B>(
    store: &S,
    backend: &B,
    cache: &NoteCache,
    range: &LengthRange,
) -> Result<CmdResult>
where
    S: SessionStore + ?Sized,
    B: Backend + ?Sized,
{
    let session = store.get_session()?;
    let token = session.require_token()?;
    let notes = backend
        .list_notes(token)
        .await
        .map_err(|err| err.with_default_message("Failed to load notes."))?;

    cache.replace(notes);
    Ok(filter(cache, range))
}

/// Re-applies `range` to the cached notes without a request.
pub fn filter(cache: &NoteCache, range: &LengthRange) -> CmdResult {
    let notes = cache.snapshot();
    let listed = filter_notes(&notes, range);
    let mut result = CmdResult::default();
    if listed.is_empty() && !notes.is_empty() {
        result.add_message(CmdMessage::warning("No notes match the length filter."));
    }
    result.with_notes(listed, notes.len())
}

/// Creates a note, appends the stored record to the cache and clears the form.
pub async fn add<S, B>(
    store: &S,
    backend: &B,
    form: &FormState,
    cache: &NoteCache,
) -> Result<CmdResult>
where
    S: SessionStore + ?Sized,
    B: Backend + ?Sized,
{
    let session = store.get_session()?;
    let token = session.require_token()?;

    let submitted = form
        .submit(|values| async move {
            backend
                .create_note(token, values.trimmed(Field::Content))
                .await
        })
        .await?;
    let Some(note) = submitted else {
        return Ok(CmdResult::in_flight(Action::AddNote));
    };

    tracing::debug!(id = note.id, "note created");
    cache.append(note);
    form.reset();

    let notes = cache.snapshot();
    let total = notes.len();
    Ok(CmdResult::default()
        .with_message(CmdMessage::success("Note added"))
        .with_notes(notes, total))
}
