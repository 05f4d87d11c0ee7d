use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use encore_domain::{Booking, SeatEvent};
use encore_registry::{RegistryError, SeatStore};
use tokio::sync::broadcast;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// Boundary between a hold and a permanent booking. Converts the caller's
/// holds into one booking record, all-or-nothing across the seat set: a
/// booking with missing seats is meaningless, so unlike locking there is no
/// partial outcome here.
pub struct BookingFinalizer {
    store: Arc<dyn SeatStore>,
    bookings: RwLock<HashMap<Uuid, Booking>>,
    events: broadcast::Sender<SeatEvent>,
}

impl BookingFinalizer {
    pub fn new(store: Arc<dyn SeatStore>, events: broadcast::Sender<SeatEvent>) -> Self {
        Self {
            store,
            bookings: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// Transition every listed seat HELD(user) -> BOOKED and record the
    /// booking. Fails with `HoldExpired` when the window lapsed, `Conflict`
    /// when any seat is not held by the caller; in either case no seat is
    /// mutated and no booking is recorded.
    pub async fn finalize(
        &self,
        event_id: Uuid,
        user_id: &str,
        seat_ids: &[Uuid],
    ) -> Result<Booking, RegistryError> {
        let mut unique: Vec<Uuid> = Vec::with_capacity(seat_ids.len());
        for id in seat_ids {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }
        if unique.is_empty() {
            return Err(RegistryError::EmptySeatSet);
        }

        let booking_id = Uuid::new_v4();
        let now = Utc::now();
        let seats = self
            .store
            .book_seats(event_id, user_id, &unique, booking_id, now)
            .await?;

        let total_amount = seats.iter().map(|s| s.price).sum();
        let booking = Booking {
            id: booking_id,
            event_id,
            user_id: user_id.to_string(),
            seat_ids: unique,
            total_amount,
            created_at: now,
        };

        self.bookings
            .write()
            .await
            .insert(booking.id, booking.clone());

        for seat in &seats {
            let _ = self.events.send(SeatEvent::Booked {
                event_id,
                seat_id: seat.id,
                booking_id,
            });
        }

        info!(
            %event_id,
            user_id,
            booking_id = %booking.id,
            seats = booking.seat_ids.len(),
            total_amount = booking.total_amount,
            "booking finalized"
        );
        Ok(booking)
    }

    pub async fn get_booking(&self, booking_id: Uuid) -> Option<Booking> {
        self.bookings.read().await.get(&booking_id).cloned()
    }

    /// Bookings belonging to one user, newest first.
    pub async fn list_bookings(&self, user_id: &str) -> Vec<Booking> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        bookings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_domain::{HoldPolicy, Seat, SeatState, SeatStatus};
    use encore_registry::MemorySeatStore;

    use chrono::Duration;

    async fn setup(seats: usize) -> (Arc<MemorySeatStore>, BookingFinalizer, Uuid, Vec<Uuid>) {
        let store = Arc::new(MemorySeatStore::new(HoldPolicy::new(600)));
        let event_id = Uuid::new_v4();
        let rows: Vec<Seat> = (0..seats)
            .map(|i| Seat::available(event_id, 1, i as u32 + 1, 2500))
            .collect();
        let ids = rows.iter().map(|s| s.id).collect();
        store.insert_seats(event_id, rows).await.unwrap();

        let (tx, _) = broadcast::channel(64);
        let finalizer = BookingFinalizer::new(store.clone(), tx);
        (store, finalizer, event_id, ids)
    }

    async fn hold(store: &MemorySeatStore, event_id: Uuid, seat_id: Uuid, user: &str, ago: i64) {
        store
            .apply_transition(
                event_id,
                seat_id,
                SeatStatus::Available,
                SeatState::Held {
                    user_id: user.to_string(),
                    held_at: Utc::now() - Duration::seconds(ago),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_finalize_creates_booking_and_books_seats() {
        let (store, finalizer, event_id, ids) = setup(2).await;
        for id in &ids {
            hold(&store, event_id, *id, "user-a", 30).await;
        }

        let booking = finalizer.finalize(event_id, "user-a", &ids).await.unwrap();
        assert_eq!(booking.seat_ids, ids);
        assert_eq!(booking.total_amount, 5000);

        for id in &ids {
            let seat = store.get_seat(event_id, *id).await.unwrap();
            assert_eq!(seat.status, SeatStatus::Booked);
            assert_eq!(seat.booking_id, Some(booking.id));
        }
        assert!(finalizer.get_booking(booking.id).await.is_some());
    }

    #[tokio::test]
    async fn test_finalize_lapsed_hold_fails_without_mutation() {
        let (store, finalizer, event_id, ids) = setup(1).await;
        hold(&store, event_id, ids[0], "user-a", 700).await;

        let err = finalizer
            .finalize(event_id, "user-a", &ids)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::HoldExpired { .. }));
        assert!(finalizer.list_bookings("user-a").await.is_empty());
    }

    #[tokio::test]
    async fn test_finalize_foreign_hold_conflicts() {
        let (store, finalizer, event_id, ids) = setup(2).await;
        hold(&store, event_id, ids[0], "user-a", 10).await;
        hold(&store, event_id, ids[1], "user-b", 10).await;

        let err = finalizer
            .finalize(event_id, "user-a", &ids)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Conflict { seat_id } if seat_id == ids[1]));

        // Prior state intact for the seat whose guard passed.
        let seat = store.get_seat(event_id, ids[0]).await.unwrap();
        assert!(seat.is_held_by("user-a"));
    }

    #[tokio::test]
    async fn test_finalize_rejects_empty_seat_set() {
        let (_, finalizer, event_id, _) = setup(1).await;
        let err = finalizer.finalize(event_id, "user-a", &[]).await.unwrap_err();
        assert!(matches!(err, RegistryError::EmptySeatSet));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_no_double_booking_under_concurrency() {
        let (store, _, event_id, ids) = setup(1).await;
        hold(&store, event_id, ids[0], "user-a", 10).await;

        let (tx, _) = broadcast::channel(64);
        let finalizer = Arc::new(BookingFinalizer::new(store.clone(), tx));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let finalizer = finalizer.clone();
            let seat_ids = ids.clone();
            handles.push(tokio::spawn(async move {
                finalizer.finalize(event_id, "user-a", &seat_ids).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        // The first finalize books the seat; every retry hits the CAS guard.
        assert_eq!(successes, 1);
    }
}
