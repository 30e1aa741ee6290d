//! Ways of locating an interface kit.
//!
//! A board is either attached directly to this host or reached through a
//! remote web service. In both cases it may be selected by serial number,
//! by label, or left open so the first available board is used.

use std::fmt;

/// How an interface kit is located when it is opened.
#[derive(Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Connector {
    /// First locally attached board.
    Any,

    /// Locally attached board with this serial number.
    Serial(i32),

    /// Locally attached board with this label.
    Label(String),

    /// Board served by a remote host, by serial number or the first one
    /// available when `serial` is `None`.
    RemoteSerial {
        serial: Option<i32>,
        host: String,
        port: u16,
        password: String,
    },

    /// Board served by a remote host, by label.
    RemoteLabel {
        label: String,
        host: String,
        port: u16,
        password: String,
    },
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Serial(serial) => write!(f, "serial {serial}"),
            Self::Label(label) => write!(f, "label {label:?}"),
            Self::RemoteSerial {
                serial: Some(serial),
                host,
                port,
                ..
            } => write!(f, "serial {serial} at {host}:{port}"),
            Self::RemoteSerial {
                serial: None,
                host,
                port,
                ..
            } => write!(f, "any at {host}:{port}"),
            Self::RemoteLabel {
                label, host, port, ..
            } => write!(f, "label {label:?} at {host}:{port}"),
        }
    }
}

// Passwords stay out of logs.
impl fmt::Debug for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Connector({self})")
    }
}
