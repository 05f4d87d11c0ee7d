use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use encore_domain::{HoldPolicy, Seat, SeatState, SeatStatus};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::repository::{RegistryError, SeatStore};

/// In-memory seat registry. One write lock serializes all mutation, which
/// gives every entry point the single-compare-and-set atomicity the
/// contract requires. Expired holds are corrected lazily inside the lock,
/// before any read is answered or any new lock granted.
pub struct MemorySeatStore {
    policy: HoldPolicy,
    events: RwLock<HashMap<Uuid, HashMap<Uuid, Seat>>>,
}

impl MemorySeatStore {
    pub fn new(policy: HoldPolicy) -> Self {
        Self {
            policy,
            events: RwLock::new(HashMap::new()),
        }
    }

    /// Release the hold in place if its window has elapsed.
    fn expire_in_place(policy: &HoldPolicy, seat: &mut Seat, now: DateTime<Utc>) -> bool {
        if seat.status == SeatStatus::Held {
            if let Some(held_at) = seat.held_at {
                if policy.is_expired(held_at, now) {
                    debug!(seat_id = %seat.id, "releasing lapsed hold");
                    seat.apply(SeatState::Available);
                    return true;
                }
            }
        }
        false
    }
}

#[async_trait]
impl SeatStore for MemorySeatStore {
    async fn insert_seats(&self, event_id: Uuid, seats: Vec<Seat>) -> Result<(), RegistryError> {
        let mut events = self.events.write().await;
        if events.contains_key(&event_id) {
            return Err(RegistryError::EventExists(event_id));
        }
        let map = seats.into_iter().map(|s| (s.id, s)).collect();
        events.insert(event_id, map);
        Ok(())
    }

    async fn remove_event(&self, event_id: Uuid) -> Result<(), RegistryError> {
        let mut events = self.events.write().await;
        events
            .remove(&event_id)
            .map(|_| ())
            .ok_or(RegistryError::EventNotFound(event_id))
    }

    async fn list_seats(&self, event_id: Uuid) -> Result<Vec<Seat>, RegistryError> {
        let now = Utc::now();
        let mut events = self.events.write().await;
        let seats = events
            .get_mut(&event_id)
            .ok_or(RegistryError::EventNotFound(event_id))?;

        let mut snapshot: Vec<Seat> = seats
            .values_mut()
            .map(|seat| {
                Self::expire_in_place(&self.policy, seat, now);
                seat.clone()
            })
            .collect();
        snapshot.sort_by_key(|s| (s.row, s.column));
        Ok(snapshot)
    }

    async fn get_seat(&self, event_id: Uuid, seat_id: Uuid) -> Result<Seat, RegistryError> {
        let now = Utc::now();
        let mut events = self.events.write().await;
        let seats = events
            .get_mut(&event_id)
            .ok_or(RegistryError::EventNotFound(event_id))?;
        let seat = seats
            .get_mut(&seat_id)
            .ok_or(RegistryError::SeatNotFound(seat_id))?;
        Self::expire_in_place(&self.policy, seat, now);
        Ok(seat.clone())
    }

    async fn apply_transition(
        &self,
        event_id: Uuid,
        seat_id: Uuid,
        expected: SeatStatus,
        next: SeatState,
    ) -> Result<Seat, RegistryError> {
        let now = Utc::now();
        let mut events = self.events.write().await;
        let seats = events
            .get_mut(&event_id)
            .ok_or(RegistryError::EventNotFound(event_id))?;
        let seat = seats
            .get_mut(&seat_id)
            .ok_or(RegistryError::SeatNotFound(seat_id))?;

        // Correction must land before any new lock is granted.
        Self::expire_in_place(&self.policy, seat, now);

        if seat.status != expected {
            return Err(RegistryError::Conflict { seat_id });
        }
        seat.apply(next);
        Ok(seat.clone())
    }

    async fn release_hold(
        &self,
        event_id: Uuid,
        seat_id: Uuid,
        user_id: &str,
    ) -> Result<Option<Seat>, RegistryError> {
        let now = Utc::now();
        let mut events = self.events.write().await;
        let seats = events
            .get_mut(&event_id)
            .ok_or(RegistryError::EventNotFound(event_id))?;
        let seat = seats
            .get_mut(&seat_id)
            .ok_or(RegistryError::SeatNotFound(seat_id))?;

        Self::expire_in_place(&self.policy, seat, now);

        if !seat.is_held_by(user_id) {
            return Ok(None);
        }
        seat.apply(SeatState::Available);
        Ok(Some(seat.clone()))
    }

    async fn book_seats(
        &self,
        event_id: Uuid,
        user_id: &str,
        seat_ids: &[Uuid],
        booking_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Seat>, RegistryError> {
        if seat_ids.is_empty() {
            return Err(RegistryError::EmptySeatSet);
        }

        let mut events = self.events.write().await;
        let seats = events
            .get_mut(&event_id)
            .ok_or(RegistryError::EventNotFound(event_id))?;

        // Validate every guard before mutating anything: a booking with
        // missing seats is meaningless, so finalization is not partial.
        for seat_id in seat_ids {
            let seat = seats
                .get(seat_id)
                .ok_or(RegistryError::SeatNotFound(*seat_id))?;
            match (seat.status, seat.held_by.as_deref(), seat.held_at) {
                (SeatStatus::Held, Some(holder), Some(held_at)) if holder == user_id => {
                    if self.policy.is_expired(held_at, now) {
                        return Err(RegistryError::HoldExpired { seat_id: *seat_id });
                    }
                }
                _ => return Err(RegistryError::Conflict { seat_id: *seat_id }),
            }
        }

        let mut booked = Vec::with_capacity(seat_ids.len());
        for seat_id in seat_ids {
            let seat = seats
                .get_mut(seat_id)
                .ok_or(RegistryError::SeatNotFound(*seat_id))?;
            seat.apply(SeatState::Booked { booking_id });
            booked.push(seat.clone());
        }
        Ok(booked)
    }

    async fn release_expired(&self, now: DateTime<Utc>) -> Result<Vec<Seat>, RegistryError> {
        let mut events = self.events.write().await;
        let mut released = Vec::new();
        for seats in events.values_mut() {
            for seat in seats.values_mut() {
                if Self::expire_in_place(&self.policy, seat, now) {
                    released.push(seat.clone());
                }
            }
        }
        Ok(released)
    }
}
