//! Common types shared across interface kit implementations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a digital channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// Sensor line read by the board.
    Input,

    /// Actuator line driven by the board.
    Output,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// Generic device information.
///
/// Contains metadata about an attached interface kit such as name,
/// serial number, label and channel counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device name (e.g., "PhidgetInterfaceKit 8/8/8").
    pub name: String,

    /// Optional device serial number.
    pub serial_number: Option<i32>,

    /// Optional user-assigned label.
    pub label: Option<String>,

    /// Number of digital inputs.
    pub input_count: usize,

    /// Number of digital outputs.
    pub output_count: usize,
}

impl DeviceInfo {
    /// Create a new DeviceInfo with required fields.
    pub fn new(name: impl Into<String>, input_count: usize, output_count: usize) -> Self {
        Self {
            name: name.into(),
            serial_number: None,
            label: None,
            input_count,
            output_count,
        }
    }

    /// Set the serial number.
    pub fn with_serial_number(mut self, serial_number: i32) -> Self {
        self.serial_number = Some(serial_number);
        self
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
