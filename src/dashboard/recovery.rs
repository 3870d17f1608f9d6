//! Dashboard load with one re-authorization on failure.

use std::sync::Arc;

use thiserror::Error;

use crate::{
    dashboard::{DashboardError, DashboardLoader, DashboardOptions, DashboardSnapshot},
    management::{Authorizer, Session, TokenManager, TokenStore},
    spotify::{
        SpotifyApi,
        auth::{CallbackReceiver, relogin},
    },
};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("authorization failed or timed out")]
    Unauthorized,

    #[error("cannot update the stored session: {0}")]
    Session(String),

    #[error(transparent)]
    Dashboard(#[from] DashboardError),
}

/// Loads the dashboard for `session`.
///
/// Any failed load clears the stored token and redirects to authorization
/// once. The load is repeated with the token delivered to `receiver`. If that
/// second load fails too, the new token is cleared as well and the error is
/// returned; there is no further redirect.
pub async fn load_or_reauthorize<C, S, A, R>(
    client: Arc<C>,
    manager: &TokenManager<S, A>,
    receiver: &R,
    session: Session,
    options: DashboardOptions,
) -> Result<(Session, DashboardSnapshot), LoadError>
where
    C: SpotifyApi,
    S: TokenStore,
    A: Authorizer,
    R: CallbackReceiver,
{
    let loader = DashboardLoader::new(Arc::clone(&client), session.clone(), options);
    match loader.load().await {
        Ok(snapshot) => return Ok((session, snapshot)),
        Err(e) => tracing::warn!(endpoint = %e.endpoint(), error = %e, "dashboard load failed"),
    }

    let session = relogin(manager, receiver)
        .await
        .map_err(|e| LoadError::Session(e.to_string()))?
        .ok_or(LoadError::Unauthorized)?;

    let loader = DashboardLoader::new(client, session.clone(), options);
    match loader.load().await {
        Ok(snapshot) => Ok((session, snapshot)),
        Err(e) => {
            if let Err(clear_err) = manager.clear().await {
                tracing::warn!(error = %clear_err, "cannot clear rejected token");
            }
            Err(e.into())
        }
    }
}
