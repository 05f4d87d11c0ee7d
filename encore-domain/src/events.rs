use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Seat lifecycle notifications fanned out to connected seat-map clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeatEvent {
    Held {
        event_id: Uuid,
        seat_id: Uuid,
        held_at: DateTime<Utc>,
    },
    Released {
        event_id: Uuid,
        seat_id: Uuid,
    },
    Booked {
        event_id: Uuid,
        seat_id: Uuid,
        booking_id: Uuid,
    },
}

impl SeatEvent {
    pub fn event_id(&self) -> Uuid {
        match self {
            SeatEvent::Held { event_id, .. }
            | SeatEvent::Released { event_id, .. }
            | SeatEvent::Booked { event_id, .. } => *event_id,
        }
    }
}
