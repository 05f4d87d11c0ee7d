use chrono::{DateTime, Duration, Utc};

/// Hold window policy shared by the coordinator, the sweeper and the
/// session-timer reconciliation. All three must agree on the duration or
/// the countdown a client reconstructs drifts from what the server enforces.
#[derive(Debug, Clone, Copy)]
pub struct HoldPolicy {
    pub hold_seconds: u64,
}

pub const DEFAULT_HOLD_SECONDS: u64 = 600;

impl HoldPolicy {
    pub fn new(hold_seconds: u64) -> Self {
        Self { hold_seconds }
    }

    pub fn hold_duration(&self) -> Duration {
        Duration::seconds(self.hold_seconds as i64)
    }

    /// A hold is expired once the full window has elapsed. The window is
    /// fixed from held_at and never refreshed by later activity.
    pub fn is_expired(&self, held_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - held_at >= self.hold_duration()
    }

    /// Seconds left in the window, clamped at zero.
    pub fn remaining_seconds(&self, held_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        (self.hold_seconds as i64 - (now - held_at).num_seconds()).max(0)
    }
}

impl Default for HoldPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD_SECONDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_is_clamped() {
        let policy = HoldPolicy::new(600);
        let now = Utc::now();

        let held_at = now - Duration::seconds(60);
        assert_eq!(policy.remaining_seconds(held_at, now), 540);
        assert!(!policy.is_expired(held_at, now));

        let held_at = now - Duration::seconds(601);
        assert_eq!(policy.remaining_seconds(held_at, now), 0);
        assert!(policy.is_expired(held_at, now));
    }

    #[test]
    fn test_expiry_boundary() {
        let policy = HoldPolicy::new(600);
        let now = Utc::now();
        // Exactly at the window edge the hold is gone.
        let held_at = now - Duration::seconds(600);
        assert!(policy.is_expired(held_at, now));
        assert_eq!(policy.remaining_seconds(held_at, now), 0);
    }
}
