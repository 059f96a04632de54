use chrono::{DateTime, Duration, Utc};

/// How long a transient message stays on screen.
pub const NOTICE_TTL_SECS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Danger,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub text: String,
    pub severity: Severity,
    pub shown_at: DateTime<Utc>,
}

impl Notice {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.shown_at >= ttl
    }
}

/// Newest-first stack of transient messages that expire on their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeBoard {
    next_id: u64,
    ttl: Duration,
    notices: Vec<Notice>,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(Duration::seconds(NOTICE_TTL_SECS))
    }
}

impl NoticeBoard {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            next_id: 1,
            ttl,
            notices: Vec::new(),
        }
    }

    pub fn push(&mut self, text: impl Into<String>, severity: Severity, now: DateTime<Utc>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.notices.insert(
            0,
            Notice {
                id,
                text: text.into(),
                severity,
                shown_at: now,
            },
        );
        id
    }

    /// Drop every notice older than the TTL. Returns how many were removed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.notices.len();
        let ttl = self.ttl;
        self.notices.retain(|notice| !notice.is_expired(now, ttl));
        before - self.notices.len()
    }

    /// True if a call to [`NoticeBoard::prune`] at `now` would remove something.
    #[must_use]
    pub fn any_expired(&self, now: DateTime<Utc>) -> bool {
        self.notices
            .iter()
            .any(|notice| notice.is_expired(now, self.ttl))
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|notice| notice.id != id);
        before != self.notices.len()
    }

    #[must_use]
    pub fn active(&self) -> &[Notice] {
        &self.notices
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
