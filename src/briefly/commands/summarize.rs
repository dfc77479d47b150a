use crate::backend::Backend;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{BrieflyError, Result};
use crate::model::{SummaryLength, SummaryStyle, SummaryUpload};
use crate::session::SessionStore;
use crate::submit::{Action, Submission};
use std::fs;
use std::path::Path;

pub const MISSING_INPUT_MESSAGE: &str = "Please fill in all fields.";

/// Reads `file` into an upload. An unreadable or empty file counts as a
/// missing field.
pub fn prepare_upload(
    file: &Path,
    length: SummaryLength,
    style: SummaryStyle,
) -> Result<SummaryUpload> {
    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| BrieflyError::Api(MISSING_INPUT_MESSAGE.to_string()))?;
    let bytes = match fs::read(file) {
        Ok(bytes) if !bytes.is_empty() => bytes,
        Ok(_) => return Err(BrieflyError::Api(MISSING_INPUT_MESSAGE.to_string())),
        Err(err) => {
            tracing::debug!(path = %file.display(), error = %err, "cannot read document");
            return Err(BrieflyError::Api(MISSING_INPUT_MESSAGE.to_string()));
        }
    };
    Ok(SummaryUpload {
        filename,
        bytes,
        length,
        style,
    })
}

pub async fn run<S, B>(
    store: &S,
    backend: &B,
    submission: &Submission,
    upload: SummaryUpload,
) -> Result<CmdResult>
where
    S: SessionStore + ?Sized,
    B: Backend + ?Sized,
{
    let session = store.get_session()?;
    let token = session.require_token()?;

    let submitted = submission
        .run(|| async move { backend.summarize(token, &upload).await })
        .await?;
    let Some(response) = submitted else {
        return Ok(CmdResult::in_flight(Action::Summarize));
    };

    let mut result = CmdResult::default()
        .with_message(CmdMessage::success("Summary generated successfully!"))
        .with_summary_text(response.summary);
    if !response.file_path.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "Stored on the server as {}",
            response.file_path
        )));
    }
    Ok(result)
}
