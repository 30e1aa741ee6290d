//! Declarative description of boards and doors.
//!
//! The configuration is a JSON document listing interface kits, each with
//! the doors wired to it, plus the shared secret of the control surface.
//! Keys are PascalCase so existing deployment files load unchanged:
//!
//! ```
//! use latchkey_core::Config;
//!
//! let config: Config = serde_json::from_str(r#"{
//!     "Secret": "s3cret",
//!     "InterfaceKits": [
//!         { "Serial": 31337, "Doors": [ { "ID": "front", "Lock": 3 } ] }
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(config.doors().count(), 1);
//! assert_eq!(config.feedback_timeout, 2000);
//! ```

use crate::constants::{DEFAULT_FEEDBACK_TIMEOUT_MS, REDACTED};
use crate::{Error, Result, Secret};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::Path;

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Config {
    /// Upper bound on status reads, in milliseconds.
    #[serde(default = "default_feedback_timeout")]
    pub feedback_timeout: u64,

    /// Boards in configuration order.
    #[serde(default)]
    pub interface_kits: Vec<BoardConfig>,

    /// Shared secret expected in the `secret` query parameter.
    #[serde(default)]
    pub secret: Secret,
}

fn default_feedback_timeout() -> u64 {
    DEFAULT_FEEDBACK_TIMEOUT_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feedback_timeout: DEFAULT_FEEDBACK_TIMEOUT_MS,
            interface_kits: Vec::new(),
            secret: Secret::default(),
        }
    }
}

/// How to reach one interface kit and which doors it drives.
///
/// Every field is optional. Without `Host` the board is attached locally;
/// `Serial` wins over `Label` when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoardConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_timeout: Option<u64>,

    #[serde(default)]
    pub doors: Vec<DoorConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Unlock pulse override for every door on this board, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_delay: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<i32>,
}

/// One door and the channels wired to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DoorConfig {
    #[serde(rename = "ID", default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_feedback: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mag: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mag_feedback: Option<usize>,
}

impl Config {
    /// Read and parse a configuration file.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be read and
    /// `Error::ConfigParse` if it is not a valid configuration document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Like [`Config::load`], but a missing file yields an empty configuration.
    ///
    /// Used by the mutating commands so a first `config set` creates the file.
    ///
    /// # Errors
    /// Any error other than "file not found" is returned unchanged.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load(path) {
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            other => other,
        }
    }

    /// Write the configuration back as pretty-printed JSON.
    ///
    /// On unix the file is restricted to its owner since it holds the
    /// shared secret and board passwords.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut body = serde_json::to_string_pretty(self)?;
        body.push('\n');

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        std::os::unix::fs::OpenOptionsExt::mode(&mut options, 0o600);
        let mut file = options.open(path)?;

        // The creation mode does not apply to a file that already exists.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(body.as_bytes())?;
        Ok(())
    }

    /// Apply a `name=value` assignment from the command line.
    ///
    /// Recognized names are `secret` and `feedbacktimeout` (case-insensitive).
    ///
    /// # Errors
    /// Returns `Error::InvalidSetting` if the argument is not of the form
    /// `name=value`, names an unknown setting, or carries a non-numeric
    /// timeout.
    pub fn apply_setting(&mut self, assignment: &str) -> Result<()> {
        let Some((name, value)) = assignment.split_once('=') else {
            return Err(Error::InvalidSetting(format!(
                "argument is not in the format of name=value: {assignment}"
            )));
        };

        match name.trim().to_ascii_lowercase().as_str() {
            "secret" => self.secret = Secret::new(value),
            "feedbacktimeout" => {
                self.feedback_timeout = value.trim().parse().map_err(|_| {
                    Error::InvalidSetting(format!("feedbacktimeout must be milliseconds, got {value}"))
                })?;
            }
            other => {
                return Err(Error::InvalidSetting(format!("unknown setting: {other}")));
            }
        }

        Ok(())
    }

    /// Check the topology before any board is attached.
    ///
    /// # Errors
    /// - `Error::Config` if a door has an empty identifier
    /// - `Error::DuplicateDoor` if two doors share an identifier
    /// - `Error::ChannelConflict` if two doors on one board drive the same output
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();

        for (board_index, board) in self.interface_kits.iter().enumerate() {
            let position = board_index + 1;
            let mut outputs: HashMap<usize, &str> = HashMap::new();

            for door in &board.doors {
                if door.id.trim().is_empty() {
                    return Err(Error::Config(format!(
                        "interface kit #{position} has a door without an ID"
                    )));
                }
                if !ids.insert(door.id.as_str()) {
                    return Err(Error::DuplicateDoor(door.id.clone()));
                }

                for channel in door.lock.iter().chain(door.mag.iter()) {
                    if let Some(first) = outputs.insert(*channel, door.id.as_str()) {
                        return Err(Error::ChannelConflict {
                            board: position,
                            channel: *channel,
                            first: first.to_string(),
                            second: door.id.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// All doors across all boards, in configuration order.
    pub fn doors(&self) -> impl Iterator<Item = &DoorConfig> {
        self.interface_kits.iter().flat_map(|board| board.doors.iter())
    }

    /// Remove a door by identifier. Returns `true` if a door was removed.
    pub fn remove_door(&mut self, id: &str) -> bool {
        for board in &mut self.interface_kits {
            if let Some(index) = board.doors.iter().position(|door| door.id == id) {
                board.doors.remove(index);
                return true;
            }
        }
        false
    }

    /// Copy suitable for display, with the secret and passwords masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.secret.is_empty() {
            copy.secret = Secret::new(REDACTED);
        }
        for board in &mut copy.interface_kits {
            if board.password.is_some() {
                board.password = Some(REDACTED.to_string());
            }
        }
        copy
    }
}
