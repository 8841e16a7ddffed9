#![cfg_attr(test, allow(clippy::unwrap_used))]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a release.
///
/// Serialized as its upper-case code (`DEPLOYED`, `PENDING_INSTALL`, ...),
/// which is also the value storage backends put in their `STATUS` label.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Unknown,
    Deployed,
    Deleted,
    Superseded,
    Failed,
    Deleting,
    PendingInstall,
    PendingUpgrade,
    PendingRollback,
}

impl Status {
    pub const ALL: [Status; 9] = [
        Status::Unknown,
        Status::Deployed,
        Status::Deleted,
        Status::Superseded,
        Status::Failed,
        Status::Deleting,
        Status::PendingInstall,
        Status::PendingUpgrade,
        Status::PendingRollback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Unknown => "UNKNOWN",
            Status::Deployed => "DEPLOYED",
            Status::Deleted => "DELETED",
            Status::Superseded => "SUPERSEDED",
            Status::Failed => "FAILED",
            Status::Deleting => "DELETING",
            Status::PendingInstall => "PENDING_INSTALL",
            Status::PendingUpgrade => "PENDING_UPGRADE",
            Status::PendingRollback => "PENDING_ROLLBACK",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown release status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// A named, versioned deployment unit.
///
/// The payload is owned by the release-management layer; storage only
/// carries it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Release {
    pub name: String,
    pub version: u32,
    pub status: Status,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Release {
    pub fn new(name: impl Into<String>, version: u32, status: Status) -> Self {
        Self {
            name: name.into(),
            version,
            status,
            payload: serde_json::Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{} ({})", self.name, self.version, self.status)
    }
}
