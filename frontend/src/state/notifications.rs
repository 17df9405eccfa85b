use std::collections::VecDeque;

use crate::api::ApiError;

const MAX_PENDING: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Queue of transient user-facing messages (the toast area of a view).
#[derive(Debug, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NotificationLevel::Success, message.into());
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NotificationLevel::Info, message.into());
    }

    /// Logs the failure and queues its user-facing message.
    pub fn error(&mut self, context: &str, error: &ApiError) {
        match error {
            ApiError::Server { .. } | ApiError::Decode(_) | ApiError::Storage(_) => {
                log::error!("{}: {}", context, error)
            }
            _ => log::warn!("{}: {}", context, error),
        }
        self.push(NotificationLevel::Error, error.user_message());
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.queue.back()
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn push(&mut self, level: NotificationLevel, message: String) {
        if self.queue.len() == MAX_PENDING {
            self.queue.pop_front();
        }
        self.queue.push_back(Notification { level, message });
    }
}
