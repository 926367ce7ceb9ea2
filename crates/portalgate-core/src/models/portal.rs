use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Address the browsing surface is (or should be) showing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortalLocation(String);

impl PortalLocation {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PortalLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PortalLocation {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PortalLocation {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Notification from the browsing surface that its displayed location changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub location: PortalLocation,
    pub at: DateTime<Utc>,
}

impl NavigationEvent {
    pub fn new(location: impl Into<PortalLocation>) -> Self {
        Self {
            location: location.into(),
            at: Utc::now(),
        }
    }
}
