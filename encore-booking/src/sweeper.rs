use std::sync::Arc;

use chrono::{DateTime, Utc};
use encore_domain::SeatEvent;
use encore_registry::{RegistryError, SeatStore};
use tokio::sync::broadcast;
use tokio::time::{interval, Duration};
use tracing::{error, info};

/// Reclaims seats whose hold outlived the window, independent of any
/// client still being connected. The store already corrects lapsed holds
/// lazily on read and lock, so the sweeper only bounds how long a stale
/// hold can linger and notifies seat-map subscribers of the release.
pub struct ExpirySweeper {
    store: Arc<dyn SeatStore>,
    events: broadcast::Sender<SeatEvent>,
}

impl ExpirySweeper {
    pub fn new(store: Arc<dyn SeatStore>, events: broadcast::Sender<SeatEvent>) -> Self {
        Self { store, events }
    }

    /// One reclaim pass. Uses the same compare-and-set path as any other
    /// writer; the sweeper's only privilege is acting without a matching
    /// user id. Returns the number of seats released.
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> Result<usize, RegistryError> {
        let released = self.store.release_expired(now).await?;
        for seat in &released {
            let _ = self.events.send(SeatEvent::Released {
                event_id: seat.event_id,
                seat_id: seat.id,
            });
        }
        if !released.is_empty() {
            info!(reclaimed = released.len(), "expiry sweep reclaimed seats");
        }
        Ok(released.len())
    }

    /// Periodic sweep loop, spawned at startup.
    pub async fn run(self, period: Duration) {
        info!(period_seconds = period.as_secs(), "expiry sweeper started");
        let mut ticker = interval(period);
        loop {
            ticker.tick().await;
            if let Err(e) = self.sweep_once(Utc::now()).await {
                error!("expiry sweep failed: {}", e);
            }
        }
    }
}
