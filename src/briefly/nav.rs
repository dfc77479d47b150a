//! # Navigation
//!
//! Navigation only needs two bits from the session: is someone logged in, and
//! are they (effectively) an admin. [`NavState`] captures those bits and
//! [`NavState::items`] turns them into the menu.
//!
//! Other actors (another terminal, another tab) can change the session at any
//! time, and nothing notifies us. [`SessionWatcher`] re-reads the store on a
//! fixed interval from a tokio task and publishes every change on a
//! `tokio::sync::watch` channel, so consumers see updates within one interval
//! without knowing how the session is stored.

use crate::session::{Session, SessionStore};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Summary,
    History,
    Subscribe,
    Admin,
}

impl Route {
    pub fn label(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Summary => "Summary",
            Route::History => "User History",
            Route::Subscribe => "Subscribe",
            Route::Admin => "Admin Panel",
        }
    }

    /// The CLI command that reaches this screen.
    pub fn command(&self) -> &'static str {
        match self {
            Route::Home => "briefly status",
            Route::Login => "briefly login",
            Route::Register => "briefly register",
            Route::Summary => "briefly summarize",
            Route::History => "briefly history list",
            Route::Subscribe => "briefly subscribe",
            Route::Admin => "briefly admin",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Link(Route),
    Logout,
}

impl NavItem {
    pub fn label(&self) -> &'static str {
        match self {
            NavItem::Link(route) => route.label(),
            NavItem::Logout => "Logout",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavState {
    pub logged_in: bool,
    pub is_admin: bool,
}

impl NavState {
    pub fn from_session(session: &Session) -> Self {
        Self {
            logged_in: session.is_authenticated(),
            is_admin: session.is_admin(),
        }
    }

    pub fn items(&self) -> Vec<NavItem> {
        if !self.logged_in {
            return vec![
                NavItem::Link(Route::Home),
                NavItem::Link(Route::Login),
                NavItem::Link(Route::Register),
            ];
        }

        let mut items = vec![
            NavItem::Link(Route::Home),
            NavItem::Link(Route::Summary),
            NavItem::Link(Route::History),
            NavItem::Link(Route::Subscribe),
        ];
        if self.is_admin {
            items.push(NavItem::Link(Route::Admin));
        }
        items.push(NavItem::Logout);
        items
    }
}

/// Polls a session store and publishes [`NavState`] changes.
///
/// The polling task ends on its own once every receiver is dropped, and is
/// aborted when the watcher itself is dropped.
pub struct SessionWatcher {
    rx: watch::Receiver<NavState>,
    handle: JoinHandle<()>,
}

impl SessionWatcher {
    /// Must be called from within a tokio runtime.
    pub fn spawn<S>(store: Arc<S>, every: Duration) -> Self
    where
        S: SessionStore + ?Sized + 'static,
    {
        let initial = read_state(store.as_ref()).unwrap_or_default();
        let (tx, rx) = watch::channel(initial);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    break;
                }
                let Some(next) = read_state(store.as_ref()) else {
                    continue;
                };
                tx.send_if_modified(|current| {
                    if *current == next {
                        return false;
                    }
                    tracing::debug!(?next, "navigation state changed");
                    *current = next;
                    true
                });
            }
        });

        Self { rx, handle }
    }

    pub fn current(&self) -> NavState {
        *self.rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<NavState> {
        self.rx.clone()
    }

    /// Waits for the next change. `None` once the polling task has stopped.
    pub async fn changed(&mut self) -> Option<NavState> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}

impl Drop for SessionWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn read_state<S: SessionStore + ?Sized>(store: &S) -> Option<NavState> {
    match store.get_session() {
        Ok(session) => Some(NavState::from_session(&session)),
        Err(err) => {
            tracing::warn!(error = %err, "could not read session");
            None
        }
    }
}
