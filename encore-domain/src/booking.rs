use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A confirmed booking. Every referenced seat is BOOKED and no seat is
/// referenced by two live bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: String,
    pub seat_ids: Vec<Uuid>,
    /// Sum of seat prices in minor currency units
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
}
