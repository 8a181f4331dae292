use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity or category for user-visible notifications.
///
/// This enum classifies notifications by their intent and visual styling,
/// allowing the UI to display them appropriately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    /// Indicates a successful operation or positive outcome.
    Success,
    /// Indicates an error or failure that may affect functionality.
    Error,
    /// Neutral informational message that does not indicate success or failure.
    #[default]
    Info,
    /// Indicates a non-critical issue that the user should be aware of, but
    /// does not prevent normal operation.
    Warning,
}

impl NotificationType {
    /// Lowercase label used when rendering the notification.
    pub fn label(self) -> &'static str {
        match self {
            NotificationType::Success => "success",
            NotificationType::Error => "error",
            NotificationType::Info => "info",
            NotificationType::Warning => "warning",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A notification payload pushed by the backend for the user interface.
#[derive(Debug, Clone)]
pub struct NotificationMessage {
    /// The type/severity of the notification, determining its visual style.
    pub notification_type: NotificationType,
    /// The text content to display to the user.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_info() {
        assert_eq!(NotificationType::default(), NotificationType::Info);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&NotificationType::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
        assert_eq!(NotificationType::Error.to_string(), "error");
    }
}
