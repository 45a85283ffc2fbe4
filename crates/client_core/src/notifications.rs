use tokio::sync::broadcast;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// User-facing toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: Option<String>,
}

/// Fan-out of notifications to whatever surface is listening. Sending with no
/// subscribers is not an error.
#[derive(Clone)]
pub struct Notifier {
    events: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(256);
        Self { events }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.events.subscribe()
    }

    pub fn success(&self, title: impl Into<String>, description: Option<String>) {
        let title = title.into();
        info!(%title, description = description.as_deref().unwrap_or(""), "notification");
        let _ = self.events.send(Notification {
            level: NotificationLevel::Success,
            title,
            description,
        });
    }

    pub fn error(&self, title: impl Into<String>, description: Option<String>) {
        let title = title.into();
        warn!(%title, description = description.as_deref().unwrap_or(""), "notification");
        let _ = self.events.send(Notification {
            level: NotificationLevel::Error,
            title,
            description,
        });
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
