use serde::{Deserialize, Serialize};

/// Base address used when neither the config file nor the environment
/// provides one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// How long a notification stays visible when the caller does not pick a
/// duration, in milliseconds.
pub const DEFAULT_NOTIFICATION_DURATION_MS: i64 = 3000;

/// Connection settings for the remote catalog REST service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base address every request path is appended to.
    pub base_url: String,
    /// Client-wide request timeout in seconds. No timeout when unset.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

/// Settings for the transient notification queue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Duration applied when a notification is added without one. Zero or
    /// negative disables auto-expiry.
    pub default_duration_ms: i64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: DEFAULT_NOTIFICATION_DURATION_MS,
        }
    }
}

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Remote service connection settings.
    pub api: ApiConfig,
    /// Notification queue settings.
    pub notifications: NotificationConfig,
}
