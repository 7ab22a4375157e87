// common/src/models/notification.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a transient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
    Warn,
    #[default]
    Info,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::Success => "success",
            NotificationLevel::Error => "error",
            NotificationLevel::Warn => "warn",
            NotificationLevel::Info => "info",
        }
    }
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLevel(pub String);

impl fmt::Display for UnknownLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown notification level: {}", self.0)
    }
}

impl std::error::Error for UnknownLevel {}

impl FromStr for NotificationLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(NotificationLevel::Success),
            "error" => Ok(NotificationLevel::Error),
            "warn" => Ok(NotificationLevel::Warn),
            "info" => Ok(NotificationLevel::Info),
            other => Err(UnknownLevel(other.to_string())),
        }
    }
}

/// A transient, user-visible message held by the notification bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Short random token, unique within the bus
    pub id: String,
    pub text: String,
    pub level: NotificationLevel,
}
