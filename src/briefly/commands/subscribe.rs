use crate::backend::Backend;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::SubscriptionTier;
use crate::session::SessionStore;
use crate::submit::{Action, Submission};

pub async fn run<S, B>(
    store: &S,
    backend: &B,
    submission: &Submission,
    tier: SubscriptionTier,
) -> Result<CmdResult>
where
    S: SessionStore + ?Sized,
    B: Backend + ?Sized,
{
    let session = store.get_session()?;
    let token = session.require_token()?;

    let submitted = submission
        .run(|| backend.subscribe(token, tier))
        .await?;
    if submitted.is_none() {
        return Ok(CmdResult::in_flight(Action::Subscribe));
    }

    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Subscribed to {tier} successfully!"
    ))))
}
