use chrono::{DateTime, Duration, Utc};
use std::sync::{Mutex, PoisonError};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub variant: Variant,
    pub shown_at: DateTime<Utc>,
}

/// Куда контроллеры отправляют сообщения для пользователя.
pub trait NotificationSink: Send + Sync {
    fn show(&self, message: &str, variant: Variant);

    fn success(&self, message: &str) {
        self.show(message, Variant::Success);
    }

    fn error(&self, message: &str) {
        self.show(message, Variant::Error);
    }
}

/// Всплывающее уведомление: видно только последнее сообщение и только `ttl` после показа.
#[derive(Debug)]
pub struct Snackbar {
    current: Mutex<Option<Notification>>,
    ttl: Duration,
}

impl Snackbar {
    pub fn new(ttl_ms: i64) -> Self {
        Self {
            current: Mutex::new(None),
            ttl: Duration::milliseconds(ttl_ms),
        }
    }

    /// Текущее сообщение, если оно еще не скрылось.
    pub fn current(&self) -> Option<Notification> {
        self.visible_at(Utc::now())
    }

    pub fn visible_at(&self, now: DateTime<Utc>) -> Option<Notification> {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        current
            .as_ref()
            .filter(|n| now - n.shown_at < self.ttl)
            .cloned()
    }

    /// Последнее показанное сообщение независимо от таймера.
    pub fn last(&self) -> Option<Notification> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for Snackbar {
    fn default() -> Self {
        Self::new(2500)
    }
}

impl NotificationSink for Snackbar {
    fn show(&self, message: &str, variant: Variant) {
        info!(?variant, "{}", message);
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *current = Some(Notification {
            message: message.to_string(),
            variant,
            shown_at: Utc::now(),
        });
    }
}
