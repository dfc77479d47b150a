use crate::backend::Backend;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{BrieflyError, Result};
use crate::session::SessionStore;
use std::fs;
use std::path::{Path, PathBuf};

pub async fn list<S, B>(store: &S, backend: &B) -> Result<CmdResult>
where
    S: SessionStore + ?Sized,
    B: Backend + ?Sized,
{
    let session = store.get_session()?;
    let token = session.require_token()?;
    let summaries = backend
        .list_history(token)
        .await
        .map_err(|err| err.with_default_message("Failed to load history."))?;

    let mut result = CmdResult::default();
    if summaries.is_empty() {
        result.add_message(CmdMessage::info("No summaries yet."));
    }
    Ok(result.with_summaries(summaries))
}

pub async fn view<S, B>(store: &S, backend: &B, id: i64) -> Result<CmdResult>
where
    S: SessionStore + ?Sized,
    B: Backend + ?Sized,
{
    let session = store.get_session()?;
    let token = session.require_token()?;
    let content = backend
        .summary_content(token, id)
        .await
        .map_err(|err| err.with_default_message("Failed to load summary."))?;
    Ok(CmdResult::default().with_summary_text(content.summary))
}

pub fn download_filename(id: i64) -> String {
    format!("summary_{id}.txt")
}

/// Saves the raw summary as `summary_<id>.txt` inside `output_dir`.
pub async fn download<S, B>(
    store: &S,
    backend: &B,
    id: i64,
    output_dir: &Path,
) -> Result<CmdResult>
where
    S: SessionStore + ?Sized,
    B: Backend + ?Sized,
{
    let session = store.get_session()?;
    let token = session.require_token()?;
    let bytes = backend
        .download_summary(token, id)
        .await
        .map_err(|err| err.with_default_message("Failed to download summary."))?;

    let path = write_download(output_dir, id, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "summary saved");
    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("Saved {}", path.display())))
        .with_saved_path(path))
}

fn write_download(output_dir: &Path, id: i64, bytes: &[u8]) -> Result<PathBuf> {
    if !output_dir.exists() {
        fs::create_dir_all(output_dir).map_err(BrieflyError::Io)?;
    }
    let path = output_dir.join(download_filename(id));
    fs::write(&path, bytes).map_err(BrieflyError::Io)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::model::{Credentials, SummaryLength, SummaryStyle, SummaryUpload};
    use crate::session::memory::InMemorySessionStore;

    async fn with_one_summary() -> (MemoryBackend, InMemorySessionStore, i64) {
        let backend = MemoryBackend::new().with_user("reader", "r@x.io", "Secret1!", false);
        let token = backend
            .login(&Credentials {
                username: "reader".into(),
                password: "Secret1!".into(),
            })
            .await
            .unwrap();
        let upload = SummaryUpload {
            filename: "paper.pdf".into(),
            bytes: b"%PDF-1.4".to_vec(),
            length: SummaryLength::Short,
            style: SummaryStyle::Simple,
        };
        backend.summarize(&token.access_token, &upload).await.unwrap();
        let id = backend.list_history(&token.access_token).await.unwrap()[0].id;

        let store = InMemorySessionStore::new();
        store.set_session(&token.access_token, false).unwrap();
        (backend, store, id)
    }

    #[tokio::test]
    async fn list_and_view() {
        let (backend, store, id) = with_one_summary().await;

        let listed = list(&store, &backend).await.unwrap();
        assert_eq!(listed.summaries.len(), 1);
        assert_eq!(listed.summaries[0].filename, "paper.pdf");

        let viewed = view(&store, &backend, id).await.unwrap();
        assert_eq!(
            viewed.summary_text.as_deref(),
            Some("Summary of paper.pdf (short, simple)")
        );
    }

    #[tokio::test]
    async fn download_writes_summary_file() {
        let (backend, store, id) = with_one_summary().await;
        let dir = tempfile::tempdir().unwrap();

        let result = download(&store, &backend, id, &dir.path().join("out"))
            .await
            .unwrap();
        let path = result.saved_path.unwrap();
        assert_eq!(path.file_name().unwrap(), download_filename(id).as_str());
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "Summary of paper.pdf (short, simple)"
        );
    }

    #[tokio::test]
    async fn missing_summary_reports_server_message() {
        let (backend, store, _) = with_one_summary().await;
        let err = view(&store, &backend, 999).await.unwrap_err();
        assert_eq!(err.to_string(), "Error 404: Summary not found");
    }

    #[tokio::test]
    async fn history_requires_session() {
        let backend = MemoryBackend::new();
        let store = InMemorySessionStore::new();
        assert!(matches!(
            list(&store, &backend).await,
            Err(BrieflyError::AuthRequired)
        ));
    }
}
