//! Door status values as reported by the control surface.

use serde::Serialize;
use std::fmt;

/// Reported state of a door's strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LockStatus {
    Locked,
    Unlocked,
    /// The channel could not be read.
    Error,
    /// Neither `Lock` nor `LockFeedback` is wired.
    Unsupported,
}

impl LockStatus {
    /// Map a channel level: `true` means released.
    pub fn from_state(released: bool) -> Self {
        if released { Self::Unlocked } else { Self::Locked }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
            Self::Error => "error",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for LockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reported state of a door's magnetic lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MagStatus {
    Engaged,
    Disengaged,
    /// The channel could not be read.
    Error,
    /// Neither `Mag` nor `MagFeedback` is wired.
    Unsupported,
}

impl MagStatus {
    /// Map a channel level: `true` means engaged.
    pub fn from_state(engaged: bool) -> Self {
        if engaged { Self::Engaged } else { Self::Disengaged }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Engaged => "engaged",
            Self::Disengaged => "disengaged",
            Self::Error => "error",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for MagStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one door, serialized as
/// `{"id", "name", "lock", "mag"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoorStatus {
    pub id: String,
    pub name: Option<String>,
    pub lock: LockStatus,
    pub mag: MagStatus,
}
