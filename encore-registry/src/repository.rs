use async_trait::async_trait;
use chrono::{DateTime, Utc};
use encore_domain::{Seat, SeatState, SeatStatus};
use uuid::Uuid;

/// Registry failures. Seat-level conflicts during locking are turned into
/// per-seat outcomes by the coordinator; only structural failures (unknown
/// event or seat) reach callers as request-level errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Event not found: {0}")]
    EventNotFound(Uuid),

    #[error("Seat not found: {0}")]
    SeatNotFound(Uuid),

    #[error("Seat map already exists for event: {0}")]
    EventExists(Uuid),

    #[error("Seat state changed concurrently: {seat_id}")]
    Conflict { seat_id: Uuid },

    #[error("Hold window lapsed for seat: {seat_id}")]
    HoldExpired { seat_id: Uuid },

    #[error("Seat set must not be empty")]
    EmptySeatSet,
}

/// Repository trait for seat state access. The registry is the single
/// shared mutable resource; every mutation funnels through one of the
/// compare-and-set entry points below so concurrent writers cannot lose
/// updates. A SQL or Redis backend implements the same contract with a
/// transactional update per call.
#[async_trait]
pub trait SeatStore: Send + Sync {
    /// Seed the seat map for an event. Fails if the event already has one.
    async fn insert_seats(&self, event_id: Uuid, seats: Vec<Seat>) -> Result<(), RegistryError>;

    /// Drop an event's seat map.
    async fn remove_event(&self, event_id: Uuid) -> Result<(), RegistryError>;

    /// Snapshot of all seats for an event, ordered by (row, column).
    /// Holds past their window are released before the snapshot is taken,
    /// so an expired hold is never reported as HELD.
    async fn list_seats(&self, event_id: Uuid) -> Result<Vec<Seat>, RegistryError>;

    async fn get_seat(&self, event_id: Uuid, seat_id: Uuid) -> Result<Seat, RegistryError>;

    /// Atomic per-seat compare-and-set: applies `next` only while the
    /// current status equals `expected`, otherwise fails with `Conflict`.
    /// Underlies the lock path.
    async fn apply_transition(
        &self,
        event_id: Uuid,
        seat_id: Uuid,
        expected: SeatStatus,
        next: SeatState,
    ) -> Result<Seat, RegistryError>;

    /// Release a hold only if `user_id` is the holder. Returns the released
    /// seat, or None when the seat was not held by the caller (a no-op, not
    /// an error). This is the status CAS with the holder guard folded in;
    /// checking the holder outside the store would reopen the lost-update
    /// window the CAS exists to close.
    async fn release_hold(
        &self,
        event_id: Uuid,
        seat_id: Uuid,
        user_id: &str,
    ) -> Result<Option<Seat>, RegistryError>;

    /// All-or-nothing HELD(user) -> BOOKED across the seat set. Every guard
    /// (holder match, hold window) is verified before any seat is mutated;
    /// on failure nothing changes. Lapsed holds fail with `HoldExpired`,
    /// any other guard failure with `Conflict`.
    async fn book_seats(
        &self,
        event_id: Uuid,
        user_id: &str,
        seat_ids: &[Uuid],
        booking_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Seat>, RegistryError>;

    /// Release every hold whose window has elapsed at `now`, across all
    /// events. Returns the reclaimed seats. Sweeper entry point.
    async fn release_expired(&self, now: DateTime<Utc>) -> Result<Vec<Seat>, RegistryError>;
}
