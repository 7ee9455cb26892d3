use std::time::{Duration, Instant};

/// Type of notification to display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Info,
    Warning,
    Error,
}

impl NotificationType {
    fn timeout(&self) -> Duration {
        match self {
            NotificationType::Info => Duration::from_secs(3),
            NotificationType::Warning => Duration::from_secs(5),
            NotificationType::Error => Duration::from_secs(8),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            NotificationType::Info => "Info",
            NotificationType::Warning => "Warning",
            NotificationType::Error => "Error",
        }
    }
}

/// A transient popup message that dismisses itself.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
    pub timestamp: Instant,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Error)
    }

    fn new(message: impl Into<String>, notification_type: NotificationType) -> Self {
        Self {
            message: message.into(),
            notification_type,
            timestamp: Instant::now(),
        }
    }

    pub fn should_dismiss(&self) -> bool {
        self.timestamp.elapsed() > self.notification_type.timeout()
    }
}
