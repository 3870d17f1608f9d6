//! Current-playback polling.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{management::Session, spotify::SpotifyApi, types::CurrentPlayback};

pub const PLAYBACK_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Refreshes the current playback on a fixed interval.
pub struct PlaybackPoller<C> {
    client: Arc<C>,
    session: Session,
    period: Duration,
    cancel_token: CancellationToken,
}

impl<C: SpotifyApi + 'static> PlaybackPoller<C> {
    /// Create a new poller
    ///
    /// # Arguments
    /// * `client` - Spotify client shared with the dashboard load
    /// * `session` - Session whose token authorizes the requests
    /// * `period` - Time between two polls
    /// * `cancel_token` - Optional external cancellation token
    pub fn new(
        client: Arc<C>,
        session: Session,
        period: Duration,
        cancel_token: Option<CancellationToken>,
    ) -> Self {
        Self {
            client,
            session,
            period,
            cancel_token: cancel_token.unwrap_or_default(),
        }
    }

    /// Start polling in a background task.
    ///
    /// The first poll happens one period after the call. Updates are
    /// published through the returned handle.
    #[must_use]
    pub fn spawn(self) -> PollerHandle {
        let (tx, rx) = watch::channel(None);
        let cancel_token = self.cancel_token.clone();
        let task = tokio::spawn(self.run(tx));

        PollerHandle {
            cancel_token,
            task,
            updates: rx,
        }
    }

    async fn run(self, tx: watch::Sender<Option<CurrentPlayback>>) {
        let mut interval = time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => break,
                _ = interval.tick() => {}
            }

            let result = tokio::select! {
                _ = self.cancel_token.cancelled() => break,
                result = self.client.current_playback(self.session.token()) => result,
            };

            // the owner may have torn down while the response was decoded
            if self.cancel_token.is_cancelled() {
                debug!("discarding playback received after shutdown");
                break;
            }

            match result {
                Ok(playback) => {
                    if tx.send(playback).is_err() {
                        debug!("no playback subscribers left, stopping poller");
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "playback poll failed"),
            }
        }
    }
}

/// Handle to a running [`PlaybackPoller`].
///
/// Dropping the handle cancels the poller.
pub struct PollerHandle {
    cancel_token: CancellationToken,
    task: JoinHandle<()>,
    updates: watch::Receiver<Option<CurrentPlayback>>,
}

impl PollerHandle {
    pub fn subscribe(&self) -> watch::Receiver<Option<CurrentPlayback>> {
        self.updates.clone()
    }

    /// Waits for the next poll result. `None` once the poller has stopped.
    pub async fn next(&mut self) -> Option<Option<CurrentPlayback>> {
        self.updates.changed().await.ok()?;
        Some(self.updates.borrow_and_update().clone())
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops polling and waits for the task to finish.
    pub async fn shutdown(mut self) {
        self.cancel_token.cancel();
        if let Err(e) = (&mut self.task).await {
            warn!(error = %e, "playback poller task failed");
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
