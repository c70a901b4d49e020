//! Periodic artwork rotation.
//!
//! A single spawned task owns the writer side of [`RotationState`]: every
//! tick it re-fetches the object-ID listing, picks the ID at the current
//! cursor (wrapping modulo the listing length), fetches that object, and
//! publishes it as the current artwork. Request handlers only ever take
//! read-time snapshots.

use crate::client::{ArtworkRecord, CollectionClient, FetchError};
use chrono::Utc;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Current rotation snapshot.
///
/// `current` stays `None` until the first successful tick, which is what the
/// landing page keys its loading view on. `cursor` advances by exactly one
/// per tick whether or not the tick succeeded, so a poisoned object ID can
/// never wedge the rotation.
#[derive(Debug, Clone, Default)]
pub struct Rotation {
    pub current: Option<ArtworkRecord>,
    pub cursor: usize,
    /// Display timestamp of the last successful tick
    pub updated_at: Option<String>,
}

/// Shared rotation state. Only the rotation task writes; handlers clone a
/// snapshot out of the lock and release it immediately.
pub type RotationState = Arc<RwLock<Rotation>>;

/// Create a fresh rotation state in its loading condition.
#[must_use]
pub fn new_state() -> RotationState {
    Arc::new(RwLock::new(Rotation::default()))
}

/// Drive the rotation until the cancellation token fires.
///
/// Each tick runs to completion before the next is started, so ticks can
/// never overlap or complete out of order; a tick that outlives its interval
/// simply delays the next one (missed intervals are skipped).
pub async fn run_rotator(
    client: Arc<CollectionClient>,
    state: RotationState,
    interval: Duration,
    cancel_token: CancellationToken,
) {
    info!("Starting artwork rotation task (every {}s)", interval.as_secs());

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            () = cancel_token.cancelled() => {
                info!("Artwork rotation task stopping");
                break;
            }
            _ = ticker.tick() => {
                tick(&client, &state).await;
            }
        }
    }
}

/// Run one rotation tick against the shared state.
pub async fn tick(client: &CollectionClient, state: &RotationState) {
    let cursor = {
        match state.read() {
            Ok(guard) => guard.cursor,
            Err(e) => {
                error!("Failed to acquire rotation read lock: {e}");
                return;
            }
        }
    };

    debug!("Rotation tick starting at cursor {cursor}");
    let outcome = fetch_at_cursor(client, cursor).await;

    let mut guard = match state.write() {
        Ok(guard) => guard,
        Err(e) => {
            error!("Failed to acquire rotation write lock: {e}");
            return;
        }
    };
    match outcome {
        Ok(record) => {
            debug!(
                "Rotation tick {cursor} complete, now showing object {:?}",
                record.object_id()
            );
            guard.current = Some(record);
            guard.updated_at = Some(Utc::now().format("%H:%M:%S UTC").to_string());
        }
        Err(err) => {
            // Keep the previous artwork on screen rather than publishing the
            // failure; the cursor still advances below.
            error!("Rotation tick at cursor {cursor} failed: {err}");
        }
    }
    guard.cursor += 1;
}

async fn fetch_at_cursor(
    client: &CollectionClient,
    cursor: usize,
) -> Result<ArtworkRecord, FetchError> {
    let ids = client.list_object_ids().await?;
    if ids.is_empty() {
        return Err(FetchError::EmptyResponse);
    }
    let id = ids[cursor % ids.len()];
    client.fetch_object(id).await
}
