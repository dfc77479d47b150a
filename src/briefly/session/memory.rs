use super::{Session, SessionStore};
use crate::error::Result;
use std::sync::{Mutex, PoisonError};

/// Session store without persistence.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    session: Mutex<Session>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an arbitrary stored state, e.g. a stale admin flag.
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }

    fn replace(&self, session: Session) {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = session;
    }
}

impl SessionStore for InMemorySessionStore {
    fn get_session(&self) -> Result<Session> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn set_session(&self, token: &str, is_admin: bool) -> Result<()> {
        self.replace(Session::new(token, is_admin));
        Ok(())
    }

    fn clear_session(&self) -> Result<()> {
        self.replace(Session::default());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear() {
        let store = InMemorySessionStore::new();
        assert!(!store.get_session().unwrap().is_authenticated());

        store.set_session("abc", false).unwrap();
        assert_eq!(store.get_session().unwrap().token(), Some("abc"));

        store.clear_session().unwrap();
        assert_eq!(store.get_session().unwrap(), Session::default());
    }

    #[test]
    fn seeded_stale_state_reports_no_admin() {
        let store = InMemorySessionStore::with_session(Session::from_parts(None, true));
        assert!(!store.get_session().unwrap().is_admin());
    }
}
