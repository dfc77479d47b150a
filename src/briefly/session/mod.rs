//! # Session Storage
//!
//! The session is the only state shared across otherwise independent flows:
//! login and logout write it, everything that needs authorization or renders
//! navigation reads it.
//!
//! ## Design
//!
//! [`Session`] is a plain value. Persistence goes through the [`SessionStore`]
//! port so the same flows run against:
//! - [`fs::FileSessionStore`]: `session.json` in the data directory (production)
//! - [`memory::InMemorySessionStore`]: no persistence (tests, embedding)
//!
//! ## Stale admin flag
//!
//! The stored admin flag is never read directly. [`Session::is_admin`] only
//! reports `true` when a token is also present, so a leftover flag from a
//! half-cleared store cannot grant admin navigation.
//!
//! ## Storage Format
//!
//! ```text
//! <data dir>/
//! ├── config.json     # Client configuration
//! └── session.json    # {"token": "...", "is_admin": false, "logged_in_at": "..."}
//! ```

use crate::error::{BrieflyError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod fs;
pub mod memory;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    is_admin: bool,
    #[serde(default)]
    logged_in_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(token: impl Into<String>, is_admin: bool) -> Self {
        Self {
            token: Some(token.into()),
            is_admin,
            logged_in_at: Some(Utc::now()),
        }
    }

    /// Builds a session from raw stored parts, including inconsistent ones.
    pub fn from_parts(token: Option<String>, is_admin: bool) -> Self {
        Self {
            token,
            is_admin,
            logged_in_at: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Effective admin flag: false whenever there is no token.
    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.is_admin
    }

    pub fn logged_in_at(&self) -> Option<DateTime<Utc>> {
        self.logged_in_at
    }

    /// The bearer token, or `AuthRequired` without touching the network.
    pub fn require_token(&self) -> Result<&str> {
        self.token().ok_or(BrieflyError::AuthRequired)
    }
}

/// Read/write port for the process-wide session.
pub trait SessionStore: Send + Sync {
    fn get_session(&self) -> Result<Session>;

    fn set_session(&self, token: &str, is_admin: bool) -> Result<()>;

    fn clear_session(&self) -> Result<()>;
}
