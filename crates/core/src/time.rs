use chrono::{DateTime, Duration, Utc};

/// Instant UI tests pin their clocks to (2023-11-14T22:13:20Z).
pub const TEST_INSTANT_SECS: i64 = 1_700_000_000;

/// Where notice timestamps come from.
///
/// The desktop app reads the system time; rendering tests pin one instant so
/// that expiry and ordering come out the same on every run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clock {
    pinned: Option<DateTime<Utc>>,
}

impl Clock {
    #[must_use]
    pub fn system() -> Self {
        Self { pinned: None }
    }

    #[must_use]
    pub fn pinned(at: DateTime<Utc>) -> Self {
        Self { pinned: Some(at) }
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.pinned.unwrap_or_else(Utc::now)
    }
}

#[must_use]
pub fn test_instant() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(TEST_INSTANT_SECS)
}
