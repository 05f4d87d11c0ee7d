use std::sync::Arc;

use chrono::Utc;
use encore_domain::{Seat, SeatEvent, SeatState, SeatStatus};
use encore_registry::{RegistryError, SeatStore};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

/// Per-seat outcome of a batch lock request. Partial success is the
/// expected shape of the contract: lock what you can, report what you
/// couldn't, never abort siblings over one contended seat.
#[derive(Debug, Clone, Serialize)]
pub struct LockOutcome {
    pub locked_seat_ids: Vec<Uuid>,
    pub failed_seat_ids: Vec<Uuid>,
}

/// Serializes lock/unlock requests against the seat registry. Contention
/// is resolved at the data layer by the registry's compare-and-set, so two
/// concurrent requests for the same seat get exactly one winner and the
/// loser sees the seat in `failed_seat_ids` within the same response.
pub struct LockCoordinator {
    store: Arc<dyn SeatStore>,
    events: broadcast::Sender<SeatEvent>,
    /// Maximum seats one user may hold per event, 0 = unlimited.
    max_seats_per_user: usize,
}

impl LockCoordinator {
    pub fn new(
        store: Arc<dyn SeatStore>,
        events: broadcast::Sender<SeatEvent>,
        max_seats_per_user: usize,
    ) -> Self {
        Self {
            store,
            events,
            max_seats_per_user,
        }
    }

    /// Attempt to hold each seat for `user_id`. Seats already held by
    /// another user or booked land in `failed_seat_ids`; successful locks
    /// are not rolled back when a sibling fails. Re-locking a seat the
    /// caller already holds counts as locked without refreshing the window.
    pub async fn request_lock(
        &self,
        event_id: Uuid,
        user_id: &str,
        seat_ids: &[Uuid],
    ) -> Result<LockOutcome, RegistryError> {
        let mut budget = self.remaining_budget(event_id, user_id).await?;

        let mut locked_seat_ids = Vec::new();
        let mut failed_seat_ids = Vec::new();

        for seat_id in seat_ids {
            if budget == Some(0) {
                // Over the cap; seats the caller already holds still count
                // as locked so retries stay idempotent.
                let seat = self.store.get_seat(event_id, *seat_id).await?;
                if seat.is_held_by(user_id) {
                    locked_seat_ids.push(*seat_id);
                } else {
                    failed_seat_ids.push(*seat_id);
                }
                continue;
            }

            let held_at = Utc::now();
            let attempt = self
                .store
                .apply_transition(
                    event_id,
                    *seat_id,
                    SeatStatus::Available,
                    SeatState::Held {
                        user_id: user_id.to_string(),
                        held_at,
                    },
                )
                .await;

            match attempt {
                Ok(seat) => {
                    let _ = self.events.send(SeatEvent::Held {
                        event_id,
                        seat_id: seat.id,
                        held_at,
                    });
                    locked_seat_ids.push(*seat_id);
                    if let Some(b) = budget.as_mut() {
                        *b -= 1;
                    }
                }
                Err(RegistryError::Conflict { .. }) => {
                    // Retried lock from the holder is naturally idempotent
                    // per seat; the window is not extended.
                    let seat = self.store.get_seat(event_id, *seat_id).await?;
                    if seat.is_held_by(user_id) {
                        locked_seat_ids.push(*seat_id);
                    } else {
                        failed_seat_ids.push(*seat_id);
                    }
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            %event_id,
            user_id,
            locked = locked_seat_ids.len(),
            failed = failed_seat_ids.len(),
            "lock request processed"
        );

        Ok(LockOutcome {
            locked_seat_ids,
            failed_seat_ids,
        })
    }

    /// Release the caller's holds on the given seats. Seats not held by
    /// the caller are silently skipped, which makes unlock idempotent and
    /// scoped to the requester's own holds. Returns the released seats.
    pub async fn request_unlock(
        &self,
        event_id: Uuid,
        user_id: &str,
        seat_ids: &[Uuid],
    ) -> Result<Vec<Seat>, RegistryError> {
        let mut released = Vec::new();
        for seat_id in seat_ids {
            if let Some(seat) = self.store.release_hold(event_id, *seat_id, user_id).await? {
                let _ = self.events.send(SeatEvent::Released {
                    event_id,
                    seat_id: seat.id,
                });
                released.push(seat);
            }
        }
        info!(%event_id, user_id, released = released.len(), "unlock request processed");
        Ok(released)
    }

    /// How many more seats the user may hold for this event, None when the
    /// cap is disabled. The count is a snapshot; the cap is a business rule,
    /// not a consistency guarantee.
    async fn remaining_budget(
        &self,
        event_id: Uuid,
        user_id: &str,
    ) -> Result<Option<usize>, RegistryError> {
        if self.max_seats_per_user == 0 {
            return Ok(None);
        }
        let held = self
            .store
            .list_seats(event_id)
            .await?
            .iter()
            .filter(|s| s.is_held_by(user_id))
            .count();
        Ok(Some(self.max_seats_per_user.saturating_sub(held)))
    }
}
