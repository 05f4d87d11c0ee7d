use chrono::{DateTime, Utc};
use encore_domain::{HoldPolicy, Seat};
use serde::Serialize;
use uuid::Uuid;

/// Countdown state reconstructed from server-recorded hold timestamps.
/// This is the single authoritative reconciliation consumed by every UI
/// surface; clients must never reset a reloaded timer to the full window.
#[derive(Debug, Clone, Serialize)]
pub struct HoldSession {
    pub seat_ids: Vec<Uuid>,
    /// Earliest hold timestamp across the user's seats; the countdown runs
    /// from the oldest hold so it never overstates the time left.
    pub held_at: DateTime<Utc>,
    pub remaining_seconds: i64,
}

/// Derive the caller's active hold session from a seat snapshot.
/// Remaining time is `hold_duration - (now - held_at)` clamped at zero;
/// zero remaining means the hold is treated as expired even if the sweeper
/// has not physically reclaimed the seats yet, and no session is returned.
pub fn reconcile_session(
    seats: &[Seat],
    user_id: &str,
    policy: &HoldPolicy,
    now: DateTime<Utc>,
) -> Option<HoldSession> {
    let mut seat_ids = Vec::new();
    let mut earliest: Option<DateTime<Utc>> = None;

    for seat in seats {
        if !seat.is_held_by(user_id) {
            continue;
        }
        let Some(held_at) = seat.held_at else {
            continue;
        };
        if policy.is_expired(held_at, now) {
            continue;
        }
        seat_ids.push(seat.id);
        earliest = Some(match earliest {
            Some(e) if e <= held_at => e,
            _ => held_at,
        });
    }

    let held_at = earliest?;
    let remaining_seconds = policy.remaining_seconds(held_at, now);
    if remaining_seconds == 0 {
        return None;
    }
    Some(HoldSession {
        seat_ids,
        held_at,
        remaining_seconds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use encore_domain::SeatState;

    fn seat_held_by(event_id: Uuid, user: &str, ago_seconds: i64) -> Seat {
        let mut seat = Seat::available(event_id, 1, 1, 5000);
        seat.apply(SeatState::Held {
            user_id: user.to_string(),
            held_at: Utc::now() - Duration::seconds(ago_seconds),
        });
        seat
    }

    #[test]
    fn test_reload_yields_remaining_window() {
        let event_id = Uuid::new_v4();
        let seats = vec![seat_held_by(event_id, "user-a", 120)];
        let policy = HoldPolicy::new(600);

        let session = reconcile_session(&seats, "user-a", &policy, Utc::now()).unwrap();
        assert_eq!(session.seat_ids, vec![seats[0].id]);
        // 600 - 120, one second of slack for the test clock
        assert!((479..=480).contains(&session.remaining_seconds));
    }

    #[test]
    fn test_earliest_hold_governs_countdown() {
        let event_id = Uuid::new_v4();
        let seats = vec![
            seat_held_by(event_id, "user-a", 300),
            seat_held_by(event_id, "user-a", 60),
        ];
        let policy = HoldPolicy::new(600);

        let session = reconcile_session(&seats, "user-a", &policy, Utc::now()).unwrap();
        assert_eq!(session.seat_ids.len(), 2);
        assert!(session.remaining_seconds <= 300);
    }

    #[test]
    fn test_lapsed_hold_yields_no_session() {
        let event_id = Uuid::new_v4();
        let seats = vec![seat_held_by(event_id, "user-a", 601)];
        let policy = HoldPolicy::new(600);

        assert!(reconcile_session(&seats, "user-a", &policy, Utc::now()).is_none());
    }

    #[test]
    fn test_other_users_holds_ignored() {
        let event_id = Uuid::new_v4();
        let seats = vec![seat_held_by(event_id, "user-b", 60)];
        let policy = HoldPolicy::new(600);

        assert!(reconcile_session(&seats, "user-a", &policy, Utc::now()).is_none());
    }
}
