use std::time::{Duration, Instant};

/// How long a success message stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Transient success message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    message: String,
    shown_at: Instant,
}

impl Notification {
    pub fn new(message: impl Into<String>, shown_at: Instant) -> Self {
        Self {
            message: message.into(),
            shown_at,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn expires_at(&self) -> Instant {
        self.shown_at + NOTIFICATION_TTL
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < NOTIFICATION_TTL
    }
}
