use super::{Session, SessionStore};
use crate::error::{BrieflyError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const SESSION_FILENAME: &str = "session.json";

/// Keeps the session in `session.json` under the data directory.
pub struct FileSessionStore {
    root: PathBuf,
}

impl FileSessionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(SESSION_FILENAME)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(BrieflyError::Io)?;
        }
        Ok(())
    }

    fn save(&self, session: &Session) -> Result<()> {
        self.ensure_dir(&self.root)?;
        let content = serde_json::to_string_pretty(session).map_err(BrieflyError::Serialization)?;
        fs::write(self.path(), content).map_err(BrieflyError::Io)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get_session(&self) -> Result<Session> {
        let path = self.path();
        if !path.exists() {
            return Ok(Session::default());
        }
        let content = fs::read_to_string(&path).map_err(BrieflyError::Io)?;
        if content.trim().is_empty() {
            return Ok(Session::default());
        }
        let session: Session =
            serde_json::from_str(&content).map_err(BrieflyError::Serialization)?;
        Ok(session)
    }

    fn set_session(&self, token: &str, is_admin: bool) -> Result<()> {
        self.save(&Session::new(token, is_admin))?;
        tracing::info!(is_admin, "session stored");
        Ok(())
    }

    fn clear_session(&self) -> Result<()> {
        let path = self.path();
        if path.exists() {
            fs::remove_file(path).map_err(BrieflyError::Io)?;
            tracing::info!("session cleared");
        }
        Ok(())
    }
}
