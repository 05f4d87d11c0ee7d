use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Seat status in the reservation lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Available,
    Held,
    Booked,
}

/// Target state for a registry transition. Carries the data the new state
/// needs so the store never has to read a clock of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatState {
    Available,
    Held {
        user_id: String,
        held_at: DateTime<Utc>,
    },
    Booked {
        booking_id: Uuid,
    },
}

impl SeatState {
    pub fn status(&self) -> SeatStatus {
        match self {
            SeatState::Available => SeatStatus::Available,
            SeatState::Held { .. } => SeatStatus::Held,
            SeatState::Booked { .. } => SeatStatus::Booked,
        }
    }
}

/// A single seat for one event instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub id: Uuid,
    pub event_id: Uuid,
    pub row: u32,
    pub column: u32,
    /// Price in minor currency units
    pub price: i64,
    pub status: SeatStatus,
    pub held_by: Option<String>,
    pub held_at: Option<DateTime<Utc>>,
    pub booking_id: Option<Uuid>,
}

impl Seat {
    pub fn available(event_id: Uuid, row: u32, column: u32, price: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            row,
            column,
            price,
            status: SeatStatus::Available,
            held_by: None,
            held_at: None,
            booking_id: None,
        }
    }

    /// Apply a target state. Keeps the invariant that held_by/held_at are
    /// set exactly when the seat is HELD.
    pub fn apply(&mut self, state: SeatState) {
        match state {
            SeatState::Available => {
                self.status = SeatStatus::Available;
                self.held_by = None;
                self.held_at = None;
            }
            SeatState::Held { user_id, held_at } => {
                self.status = SeatStatus::Held;
                self.held_by = Some(user_id);
                self.held_at = Some(held_at);
            }
            SeatState::Booked { booking_id } => {
                self.status = SeatStatus::Booked;
                self.held_by = None;
                self.held_at = None;
                self.booking_id = Some(booking_id);
            }
        }
    }

    pub fn is_held_by(&self, user_id: &str) -> bool {
        self.status == SeatStatus::Held && self.held_by.as_deref() == Some(user_id)
    }
}
