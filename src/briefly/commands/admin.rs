use crate::backend::Backend;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::session::SessionStore;

/// Site-wide counters. The server decides who may see them; the local admin
/// flag only controls whether the menu offers the screen.
pub async fn analytics<S, B>(store: &S, backend: &B) -> Result<CmdResult>
where
    S: SessionStore + ?Sized,
    B: Backend + ?Sized,
{
    let session = store.get_session()?;
    let token = session.require_token()?;
    let analytics = backend
        .admin_analytics(token)
        .await
        .map_err(|err| err.with_default_message("Failed to load analytics."))?;
    Ok(CmdResult::default()
        .with_analytics(analytics)
        .with_session(session))
}
